//! Ammo image repository.

use std::path::Path;
use std::sync::Arc;

use crate::storage::images::ImageIndex;
use crate::storage::RepoError;

/// Handle to the ammo image directory.
#[derive(Debug, Clone)]
pub struct AmmoRepo {
    index: Arc<ImageIndex>,
}

impl AmmoRepo {
    /// Index the ammo directory. Fails if it does not exist.
    pub fn open(dir: &Path) -> Result<Self, RepoError> {
        let index = ImageIndex::scan(dir)?;
        tracing::debug!(dir = %dir.display(), ammo = index.len(), "Ammo repository opened");
        Ok(Self {
            index: Arc::new(index),
        })
    }

    /// Path of the ammo icon with the given name.
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.index.get(name)
    }

    /// Number of indexed images.
    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }
}
