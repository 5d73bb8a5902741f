//! Transport mode selection and certificate loading.

use std::io;
use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::sign::CertifiedKey;
use rustls::InconsistentKeys;

use crate::config::Settings;
use crate::net::TransportError;

/// Where ACME-issued certificates are cached between runs.
pub const AUTO_TLS_CACHE_DIR: &str = "/var/www/.cache";

/// How the listener accepts connections. Exactly one per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsMode {
    /// No transport security.
    Plain,
    /// Operator-supplied certificate and private key.
    Manual { cert_path: PathBuf, key_path: PathBuf },
    /// Certificates obtained and renewed through ACME.
    Auto(AutoTls),
}

/// ACME parameters for [`TlsMode::Auto`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoTls {
    pub cache_dir: PathBuf,
    pub domains: Vec<String>,
    pub contact: Vec<String>,
    pub production: bool,
}

impl TlsMode {
    /// Decide the transport mode.
    ///
    /// `use_https` gates everything: `use_auto_tls` is only consulted inside
    /// it, and when it wins the manual certificate fields are not read.
    pub fn select(settings: &Settings) -> Self {
        if !settings.use_https {
            return TlsMode::Plain;
        }

        if settings.use_auto_tls {
            return TlsMode::Auto(AutoTls {
                cache_dir: PathBuf::from(AUTO_TLS_CACHE_DIR),
                domains: settings.auto_tls.domains.clone(),
                contact: settings.auto_tls.contact.clone(),
                production: settings.auto_tls.production,
            });
        }

        TlsMode::Manual {
            cert_path: PathBuf::from(&settings.cert_file),
            key_path: PathBuf::from(&settings.key_file),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TlsMode::Plain => "plain",
            TlsMode::Manual { .. } => "manual-tls",
            TlsMode::Auto(_) => "auto-tls",
        }
    }

    pub fn is_tls(&self) -> bool {
        !matches!(self, TlsMode::Plain)
    }
}

/// Load TLS configuration from certificate and key files.
///
/// Both files are PEM. The key may be PKCS#8, PKCS#1 or SEC1.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TransportError> {
    install_crypto_provider();

    let cert_pem = read_pem(cert_path).await?;
    let key_pem = read_pem(key_path).await?;

    let certs = rustls_pemfile::certs(&mut cert_pem.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| TransportError::ReadPem {
            path: cert_path.display().to_string(),
            source,
        })?;
    if certs.is_empty() {
        return Err(TransportError::NoCertificate {
            path: cert_path.display().to_string(),
        });
    }

    let key = rustls_pemfile::private_key(&mut key_pem.as_slice())
        .map_err(|source| TransportError::ReadPem {
            path: key_path.display().to_string(),
            source,
        })?
        .ok_or_else(|| TransportError::NoPrivateKey {
            path: key_path.display().to_string(),
        })?;

    check_key_pair(&certs, &key)?;

    let certs = certs.iter().map(|cert| cert.to_vec()).collect();
    RustlsConfig::from_der(certs, key.secret_der().to_vec())
        .await
        .map_err(TransportError::KeyPair)
}

/// Reject a private key that does not belong to the leaf certificate.
fn check_key_pair(
    certs: &[CertificateDer<'static>],
    key: &PrivateKeyDer<'static>,
) -> Result<(), TransportError> {
    let provider = rustls::crypto::aws_lc_rs::default_provider();
    let signing_key = provider
        .key_provider
        .load_private_key(key.clone_key())
        .map_err(|e| TransportError::KeyPair(io::Error::new(io::ErrorKind::InvalidData, e)))?;

    match CertifiedKey::new(certs.to_vec(), signing_key).keys_match() {
        Ok(()) | Err(rustls::Error::InconsistentKeys(InconsistentKeys::Unknown)) => Ok(()),
        Err(e) => Err(TransportError::KeyPair(io::Error::new(io::ErrorKind::InvalidData, e))),
    }
}

/// Install the process-wide rustls crypto provider unless one is already set.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

async fn read_pem(path: &Path) -> Result<Vec<u8>, TransportError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| TransportError::ReadPem {
            path: path.display().to_string(),
            source,
        })
}
