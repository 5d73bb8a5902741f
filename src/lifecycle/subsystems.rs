//! Ordered construction of the storage-backed subsystems.

use std::path::Path;

use crate::config::Settings;
use crate::lifecycle::error::{StartupError, Subsystem};
use crate::storage::{AmmoRepo, MarkerRepo, OperationRepo, RepoError};

/// Constructors for the three repositories.
///
/// [`Subsystems::init_with`] calls them in the order operation, marker, ammo
/// and stops at the first error.
pub trait SubsystemConstructors {
    fn operation(&self, settings: &Settings) -> Result<OperationRepo, RepoError>;
    fn marker(&self, settings: &Settings) -> Result<MarkerRepo, RepoError>;
    fn ammo(&self, settings: &Settings) -> Result<AmmoRepo, RepoError>;
}

/// Opens the real repositories from the configured paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct Repositories;

impl SubsystemConstructors for Repositories {
    fn operation(&self, settings: &Settings) -> Result<OperationRepo, RepoError> {
        OperationRepo::open(Path::new(&settings.db))
    }

    fn marker(&self, settings: &Settings) -> Result<MarkerRepo, RepoError> {
        MarkerRepo::open(Path::new(&settings.markers))
    }

    fn ammo(&self, settings: &Settings) -> Result<AmmoRepo, RepoError> {
        AmmoRepo::open(Path::new(&settings.ammo))
    }
}

/// The long-lived repository handles shared by every request handler.
#[derive(Debug, Clone)]
pub struct Subsystems {
    pub operations: OperationRepo,
    pub markers: MarkerRepo,
    pub ammo: AmmoRepo,
}

impl Subsystems {
    /// Open the real repositories.
    pub fn init(settings: &Settings) -> Result<Self, StartupError> {
        Self::init_with(&Repositories, settings)
    }

    /// Construct each subsystem in order, aborting on the first failure.
    pub fn init_with<C>(constructors: &C, settings: &Settings) -> Result<Self, StartupError>
    where
        C: SubsystemConstructors + ?Sized,
    {
        let operations = constructors
            .operation(settings)
            .map_err(|error| failed(Subsystem::Operation, error))?;
        tracing::info!(db = %settings.db, "Operation repository ready");

        let markers = constructors
            .marker(settings)
            .map_err(|error| failed(Subsystem::Marker, error))?;
        tracing::info!(dir = %settings.markers, count = markers.len(), "Marker repository ready");

        let ammo = constructors
            .ammo(settings)
            .map_err(|error| failed(Subsystem::Ammo, error))?;
        tracing::info!(dir = %settings.ammo, count = ammo.len(), "Ammo repository ready");

        Ok(Self {
            operations,
            markers,
            ammo,
        })
    }
}

fn failed(subsystem: Subsystem, error: RepoError) -> StartupError {
    tracing::error!(subsystem = %subsystem, error = %error, "Subsystem failed to initialize");
    StartupError::Subsystem { subsystem, error }
}
