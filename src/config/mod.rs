//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! setting.toml
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → Settings (validated, immutable)
//!     → borrowed by every startup stage
//! ```
//!
//! # Design Decisions
//! - Config is loaded once at startup and never mutated
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Manual certificate paths are left to the transport layer

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AutoTlsConfig, Settings};
pub use validation::ValidationError;
