//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Required paths and addresses are non-empty
//! - Auto TLS has something to request a certificate for
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Settings → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::Settings;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check the configuration, collecting every problem found.
pub fn validate_config(config: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let required = [
        ("listen", &config.listen),
        ("db", &config.db),
        ("markers", &config.markers),
        ("ammo", &config.ammo),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError {
                field,
                message: "must not be empty",
            });
        }
    }

    if config.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "request_timeout_secs",
            message: "must be greater than zero",
        });
    }

    if config.use_https && config.use_auto_tls && config.auto_tls.domains.is_empty() {
        errors.push(ValidationError {
            field: "auto_tls.domains",
            message: "must list at least one domain when use_auto_tls is set",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
