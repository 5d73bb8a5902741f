//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (bind per TlsMode, serve, graceful shutdown)
//!     → TraceLayer → request_logger → TimeoutLayer
//!     → handlers.rs (repositories via State<Subsystems>)
//!     → Send to client
//! ```

pub mod handlers;
pub mod server;

pub use handlers::build_router;
pub use server::HttpServer;
