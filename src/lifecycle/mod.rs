//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Initialize subsystems (subsystems.rs)
//!     → Open request log sink → Select transport → Bind and serve
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Stop accepting, drain, return
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then storage, then logging, listener last
//! - Fail fast: the first stage error aborts startup, tagged with its stage
//! - Nothing is reachable from the network until every stage has succeeded

pub mod error;
pub mod signals;
pub mod startup;
pub mod subsystems;

pub use error::{StartupError, Subsystem};
pub use startup::{run, Prepared, Startup};
pub use subsystems::{Repositories, SubsystemConstructors, Subsystems};
