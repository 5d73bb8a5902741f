//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize the repositories in dependency order
//! - Open the request log sink
//! - Select the transport mode and bind the listener
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and tagged with its stage
//! - Stages run one after another, never concurrently
//! - Listeners start last (traffic only when ready)

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{load_config, Settings};
use crate::http::{build_router, HttpServer};
use crate::lifecycle::error::StartupError;
use crate::lifecycle::subsystems::{Repositories, SubsystemConstructors, Subsystems};
use crate::net::TlsMode;
use crate::observability::{LogSink, LOG_FILE_NAME};

/// Load the configuration at `config_path`, start every stage, and serve.
pub async fn run(config_path: &Path) -> Result<(), StartupError> {
    let settings = load_config(config_path).map_err(StartupError::Setting)?;
    tracing::info!(path = %config_path.display(), listen = %settings.listen, "Configuration loaded");

    Startup::new(settings).prepare()?.serve().await
}

/// Everything needed to bring the service up from a loaded configuration.
#[derive(Debug, Clone)]
pub struct Startup {
    settings: Settings,
    log_path: PathBuf,
}

impl Startup {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            log_path: PathBuf::from(LOG_FILE_NAME),
        }
    }

    /// Write the request log file somewhere other than `./ocap.log`.
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    /// Run every stage up to, but not including, binding the listener.
    pub fn prepare(self) -> Result<Prepared, StartupError> {
        self.prepare_with(&Repositories)
    }

    /// Like [`Startup::prepare`] with custom repository constructors.
    pub fn prepare_with<C>(self, constructors: &C) -> Result<Prepared, StartupError>
    where
        C: SubsystemConstructors + ?Sized,
    {
        let subsystems = Subsystems::init_with(constructors, &self.settings)?;

        let sink = if self.settings.logger {
            let sink = LogSink::open(&self.log_path).map_err(StartupError::LogFile)?;
            tracing::info!(path = %self.log_path.display(), "Request log file opened");
            sink
        } else {
            LogSink::console()
        };

        let router = build_router(
            subsystems,
            sink.clone(),
            Duration::from_secs(self.settings.request_timeout_secs),
        );

        let mode = TlsMode::select(&self.settings);
        tracing::info!(mode = mode.name(), "Transport selected");

        Ok(Prepared {
            server: HttpServer::new(router, self.settings.listen, mode),
            sink,
        })
    }
}

/// A fully wired service that has not opened its listener yet.
pub struct Prepared {
    server: HttpServer,
    sink: LogSink,
}

impl Prepared {
    pub fn mode(&self) -> &TlsMode {
        self.server.mode()
    }

    pub fn listen(&self) -> &str {
        self.server.listen()
    }

    pub fn log_sink(&self) -> &LogSink {
        &self.sink
    }

    /// Bind and serve. Blocks until the listener stops.
    pub async fn serve(self) -> Result<(), StartupError> {
        self.server.run().await.map_err(StartupError::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_in(dir: &Path) -> Settings {
        std::fs::create_dir_all(dir.join("markers")).unwrap();
        std::fs::create_dir_all(dir.join("ammo")).unwrap();
        Settings {
            db: dir.join("data.db").display().to_string(),
            markers: dir.join("markers").display().to_string(),
            ammo: dir.join("ammo").display().to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn console_sink_without_logger() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join(LOG_FILE_NAME);
        let prepared = Startup::new(settings_in(dir.path()))
            .with_log_path(&log_path)
            .prepare()
            .unwrap();

        assert!(prepared.log_sink().file_path().is_none());
        assert!(!log_path.exists());
        assert_eq!(prepared.mode(), &TlsMode::Plain);
        assert_eq!(prepared.listen(), "127.0.0.1:5000");
    }

    #[test]
    fn logger_opens_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join(LOG_FILE_NAME);
        let settings = Settings {
            logger: true,
            ..settings_in(dir.path())
        };

        let prepared = Startup::new(settings).with_log_path(&log_path).prepare().unwrap();
        assert_eq!(prepared.log_sink().file_path(), Some(log_path.as_path()));
        assert!(log_path.exists());
    }

    #[test]
    fn unopenable_log_file_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            logger: true,
            ..settings_in(dir.path())
        };

        let err = Startup::new(settings)
            .with_log_path(dir.path().join("missing").join(LOG_FILE_NAME))
            .prepare()
            .err()
            .unwrap();
        assert!(matches!(err, StartupError::LogFile(_)));
        assert!(err.to_string().starts_with("open logger file: "));
    }

    #[test]
    fn subsystem_failure_precedes_logger() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join(LOG_FILE_NAME);
        let settings = Settings {
            logger: true,
            ammo: dir.path().join("no-ammo").display().to_string(),
            ..settings_in(dir.path())
        };

        let err = Startup::new(settings)
            .with_log_path(&log_path)
            .prepare()
            .err()
            .unwrap();
        assert!(err.to_string().starts_with("ammo: "));
        assert!(!log_path.exists());
    }

    #[test]
    fn selects_manual_tls_from_settings() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            use_https: true,
            cert_file: "bad/path".into(),
            key_file: "bad/key".into(),
            ..settings_in(dir.path())
        };

        let prepared = Startup::new(settings).prepare().unwrap();
        assert_eq!(
            prepared.mode(),
            &TlsMode::Manual {
                cert_path: PathBuf::from("bad/path"),
                key_path: PathBuf::from("bad/key"),
            }
        );
    }
}
