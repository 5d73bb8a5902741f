//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Listen address (e.g., "127.0.0.1:5000").
    pub listen: String,

    /// Path to the operations database.
    pub db: String,

    /// Directory holding marker images.
    pub markers: String,

    /// Directory holding ammo images.
    pub ammo: String,

    /// Duplicate the request log into `ocap.log`.
    pub logger: bool,

    /// Serve over TLS.
    pub use_https: bool,

    /// Obtain certificates automatically. Only consulted when `use_https` is set.
    pub use_auto_tls: bool,

    /// Path to certificate file (PEM).
    pub cert_file: String,

    /// Path to private key file (PEM).
    pub key_file: String,

    /// Automatic certificate management settings.
    pub auto_tls: AutoTlsConfig,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:5000".to_string(),
            db: "data.db".to_string(),
            markers: "markers".to_string(),
            ammo: "ammo".to_string(),
            logger: false,
            use_https: false,
            use_auto_tls: false,
            cert_file: String::new(),
            key_file: String::new(),
            auto_tls: AutoTlsConfig::default(),
            request_timeout_secs: 30,
        }
    }
}

/// ACME settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AutoTlsConfig {
    /// Domains to request certificates for.
    pub domains: Vec<String>,

    /// Contact e-mail addresses registered with the ACME account.
    pub contact: Vec<String>,

    /// Use the Let's Encrypt production directory instead of staging.
    pub production: bool,
}

impl Default for AutoTlsConfig {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            contact: Vec::new(),
            production: true,
        }
    }
}
