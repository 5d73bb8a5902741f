//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Diagnostics:
//!     startup stages, transport events
//!     → logging.rs (tracing subscriber, stderr/stdout)
//!
//! Request log:
//!     every HTTP request
//!     → access_log.rs middleware (one JSON line)
//!     → LogSink (console, or console + ocap.log)
//! ```
//!
//! # Design Decisions
//! - Diagnostics and the request log are separate streams
//! - The request log sink is built once and owned by the router
//! - A failed request-log write never fails the request

pub mod access_log;
pub mod logging;

pub use access_log::{request_logger, LogSink, LOG_FILE_NAME};
