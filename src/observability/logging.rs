//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for process diagnostics
//! - Honour `RUST_LOG`, falling back to a service default
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Installed once, before configuration is read, so config errors are logged

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "ocap_web=info,tower_http=info";

/// Install the global tracing subscriber.
///
/// Returns `false` if a subscriber was already installed (e.g. by a test harness).
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
