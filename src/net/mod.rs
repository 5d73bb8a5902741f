//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Settings
//!     → tls.rs (TlsMode::select, pure)
//!     → Plain:  TcpListener
//!       Manual: tls.rs loads PEM cert/key → rustls
//!       Auto:   acme.rs builds ACME acceptor with on-disk cache
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Exactly one transport mode per run, decided once from configuration
//! - Certificate problems are reported before any socket is bound
//! - No fallback between modes

pub mod acme;
pub mod tls;

use thiserror::Error;
use tokio::net::TcpListener;

pub use tls::{AutoTls, TlsMode, AUTO_TLS_CACHE_DIR};

/// Errors from binding or securing the listener.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to bind to address.
    #[error("bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Certificate or key file could not be read.
    #[error("read {path}: {source}")]
    ReadPem {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Certificate file holds no certificates.
    #[error("{path}: no certificate found")]
    NoCertificate { path: String },

    /// Key file holds no private key.
    #[error("{path}: no private key found")]
    NoPrivateKey { path: String },

    /// Certificate and key were rejected by the TLS stack.
    #[error("load key pair: {0}")]
    KeyPair(#[source] std::io::Error),

    /// The server failed while running.
    #[error("serve: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bind the `host:port` listen string. Name resolution is left to the OS.
pub async fn bind(listen: &str) -> Result<TcpListener, TransportError> {
    let listener = TcpListener::bind(listen)
        .await
        .map_err(|source| TransportError::Bind {
            addr: listen.to_string(),
            source,
        })?;
    tracing::debug!(listen, "Listener bound");
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_ephemeral_port() {
        let listener = bind("127.0.0.1:0").await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn port_in_use_is_bind_error() {
        let held = bind("127.0.0.1:0").await.unwrap();
        let addr = held.local_addr().unwrap().to_string();

        let err = bind(&addr).await.unwrap_err();
        assert!(matches!(err, TransportError::Bind { .. }));
        assert!(err.to_string().starts_with(&format!("bind {addr}: ")));
    }

    #[tokio::test]
    async fn missing_port_is_bind_error() {
        let err = bind("127.0.0.1").await.unwrap_err();
        assert!(matches!(err, TransportError::Bind { .. }));
    }
}
