//! Directory-backed image index shared by the marker and ammo repositories.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::RepoError;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg", "webp", "paa"];

/// Lookup table from lower-case file stem to image path.
///
/// When several files share a stem, the extension listed first in
/// `IMAGE_EXTENSIONS` wins, then the lexically smaller path.
#[derive(Debug, Clone, Default)]
pub(crate) struct ImageIndex {
    entries: HashMap<String, PathBuf>,
}

impl ImageIndex {
    /// Scan `root` (non-recursively) for image files.
    pub(crate) fn scan(root: &Path) -> Result<Self, RepoError> {
        if !root.is_dir() {
            return Err(RepoError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let io_err = |source| RepoError::Io {
            path: root.to_path_buf(),
            source,
        };

        let mut entries: HashMap<String, PathBuf> = HashMap::new();
        for entry in fs::read_dir(root).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !path.is_file() || extension_rank(&path).is_none() {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match entries.entry(stem.to_lowercase()) {
                Entry::Vacant(slot) => {
                    slot.insert(path);
                }
                Entry::Occupied(mut slot) => {
                    let ignored = if precedes(&path, slot.get()) {
                        slot.insert(path)
                    } else {
                        path
                    };
                    tracing::warn!(
                        kept = %slot.get().display(),
                        ignored = %ignored.display(),
                        "Duplicate image name"
                    );
                }
            }
        }

        Ok(Self { entries })
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Path> {
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);
        self.entries.get(&stem.to_lowercase()).map(PathBuf::as_path)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

fn extension_rank(path: &Path) -> Option<usize> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().position(|known| *known == ext)
}

/// Whether `candidate` should replace `current` for the same stem.
fn precedes(candidate: &Path, current: &Path) -> bool {
    (extension_rank(candidate), candidate) < (extension_rank(current), current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_images_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Flag.png"), b"png").unwrap();
        fs::write(dir.path().join("notes.txt"), b"text").unwrap();
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let index = ImageIndex::scan(dir.path()).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("flag"), Some(dir.path().join("Flag.png").as_path()));
        assert_eq!(index.get("FLAG.png"), Some(dir.path().join("Flag.png").as_path()));
        assert!(index.get("notes").is_none());
    }

    #[test]
    fn duplicate_stems_prefer_extension_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("flag.svg"), b"svg").unwrap();
        fs::write(dir.path().join("flag.png"), b"png").unwrap();
        fs::write(dir.path().join("flag.webp"), b"webp").unwrap();
        fs::write(dir.path().join("shell.jpeg"), b"jpeg").unwrap();
        fs::write(dir.path().join("shell.jpg"), b"jpg").unwrap();

        let index = ImageIndex::scan(dir.path()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("flag"), Some(dir.path().join("flag.png").as_path()));
        assert_eq!(index.get("shell"), Some(dir.path().join("shell.jpg").as_path()));
    }

    #[test]
    fn missing_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageIndex::scan(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, RepoError::NotADirectory { .. }));
    }

    #[test]
    fn file_instead_of_directory_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = ImageIndex::scan(file.path()).unwrap_err();
        assert!(matches!(err, RepoError::NotADirectory { .. }));
    }
}
