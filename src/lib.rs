//! OCAP web service.
//!
//! Startup orchestrator for the operation capture web service: loads the
//! configuration, opens the storage-backed repositories, attaches the request
//! log, and serves HTTP in exactly one transport mode.
//!
//! # Architecture Overview
//!
//! ```text
//!   setting.toml
//!        │
//!        ▼
//!   ┌─────────┐   ┌──────────────────────────────┐   ┌──────────────┐
//!   │ config  │──▶│ storage: operation → marker  │──▶│ observability│
//!   │ loader  │   │          → ammo (fail fast)  │   │  LogSink     │
//!   └─────────┘   └──────────────────────────────┘   └──────┬───────┘
//!        │                                                  │
//!        ▼                                                  ▼
//!   ┌─────────────────────┐                          ┌──────────────┐
//!   │ net: TlsMode::select│─────────────────────────▶│ http server  │
//!   │ Plain/Manual/Auto   │                          │ bind + serve │
//!   └─────────────────────┘                          └──────────────┘
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod storage;

pub use config::Settings;
pub use http::HttpServer;
pub use lifecycle::{run, Startup, StartupError};
pub use net::TlsMode;
