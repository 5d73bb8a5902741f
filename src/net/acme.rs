//! Automatic certificate management over ACME.
//!
//! The ACME account is created with the provider's terms of service accepted,
//! so no operator prompt is ever shown. Issued certificates are cached on disk
//! so restarts reuse them instead of hitting the provider's rate limits.
//!
//! Issuance errors are logged and are not fatal: the listener keeps serving.

use futures_util::StreamExt;
use rustls_acme::{axum::AxumAcceptor, caches::DirCache, AcmeConfig};

use crate::net::tls::{install_crypto_provider, AutoTls};

/// Build the TLS acceptor and start the background issuance/renewal task.
///
/// Must be called from within a Tokio runtime.
pub fn acceptor(auto: &AutoTls) -> AxumAcceptor {
    install_crypto_provider();

    let contact = auto.contact.iter().map(|email| format!("mailto:{}", email));

    let mut state = AcmeConfig::new(&auto.domains)
        .contact(contact)
        .cache(DirCache::new(auto.cache_dir.clone()))
        .directory_lets_encrypt(auto.production)
        .state();
    let acceptor = state.axum_acceptor(state.default_rustls_config());

    tracing::info!(
        domains = ?auto.domains,
        cache_dir = %auto.cache_dir.display(),
        production = auto.production,
        "ACME certificate manager started"
    );

    tokio::spawn(async move {
        while let Some(event) = state.next().await {
            match event {
                Ok(ok) => tracing::info!(event = ?ok, "ACME event"),
                Err(err) => tracing::error!(error = ?err, "ACME certificate error"),
            }
        }
    });

    acceptor
}
