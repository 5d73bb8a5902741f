//! Storage-backed repositories.
//!
//! # Data Flow
//! ```text
//! Settings.db      → operation.rs (SQLite operations table)
//! Settings.markers → marker.rs   (marker image index)
//! Settings.ammo    → ammo.rs     (ammo image index)
//!     → handles moved into the HTTP layer's AppState
//! ```
//!
//! # Design Decisions
//! - Each handle is opened once at startup and lives as long as the process
//! - Handles are cheap to clone (shared internals) so handlers can hold them
//! - No teardown: dropping the last clone releases the resource

pub mod ammo;
mod images;
pub mod marker;
pub mod operation;

use std::path::PathBuf;

use thiserror::Error;

pub use ammo::AmmoRepo;
pub use marker::MarkerRepo;
pub use operation::{Operation, OperationFilter, OperationRepo};

/// Errors raised while opening or querying a repository.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The database could not be opened or queried.
    #[error("database: {0}")]
    Database(#[from] rusqlite::Error),

    /// A required directory does not exist or is not a directory.
    #[error("{path}: not a directory")]
    NotADirectory { path: PathBuf },

    /// Reading a directory failed.
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A lock guarding the repository was poisoned by a panicking holder.
    #[error("repository lock poisoned")]
    Poisoned,
}
