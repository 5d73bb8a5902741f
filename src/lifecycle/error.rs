//! Startup error taxonomy.
//!
//! Each variant's message starts with the tag of the stage that failed, so the
//! operator sees e.g. `marker: markers: not a directory`.

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::net::TransportError;
use crate::storage::RepoError;

/// The storage-backed subsystems, in construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    Operation,
    Marker,
    Ammo,
}

impl Subsystem {
    /// Construction order.
    pub const ALL: [Subsystem; 3] = [Subsystem::Operation, Subsystem::Marker, Subsystem::Ammo];

    pub fn name(self) -> &'static str {
        match self {
            Subsystem::Operation => "operation",
            Subsystem::Marker => "marker",
            Subsystem::Ammo => "ammo",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fatal startup failure.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Configuration missing, unreadable or invalid.
    #[error("setting: {0}")]
    Setting(ConfigError),

    /// A repository failed to open.
    #[error("{subsystem}: {error}")]
    Subsystem { subsystem: Subsystem, error: RepoError },

    /// The request log file could not be opened.
    #[error("open logger file: {0}")]
    LogFile(std::io::Error),

    /// Binding or running the listener failed.
    #[error("start server: {0}")]
    Serve(TransportError),
}

impl StartupError {
    /// The subsystem that failed, if this is a subsystem error.
    pub fn subsystem(&self) -> Option<Subsystem> {
        match self {
            StartupError::Subsystem { subsystem, .. } => Some(*subsystem),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn messages_carry_stage_tags() {
        let err = StartupError::Subsystem {
            subsystem: Subsystem::Marker,
            error: RepoError::NotADirectory {
                path: PathBuf::from("markers"),
            },
        };
        assert_eq!(err.to_string(), "marker: markers: not a directory");
        assert_eq!(err.subsystem(), Some(Subsystem::Marker));

        let err = StartupError::LogFile(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.to_string(), "open logger file: gone");
        assert_eq!(err.subsystem(), None);

        let err = StartupError::Serve(TransportError::NoCertificate { path: "cert.pem".into() });
        assert_eq!(err.to_string(), "start server: cert.pem: no certificate found");
    }

    #[test]
    fn subsystem_order_and_names() {
        let names: Vec<_> = Subsystem::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["operation", "marker", "ammo"]);
    }
}
