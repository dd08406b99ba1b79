use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::models::License;

use super::{RecordStore, StoreError};

/// JSON file store.
///
/// The file holds a pretty-printed array of license objects:
///
/// ```json
/// [
///   {
///     "key": "0b6f…",
///     "owner": "alice",
///     "boundIp": null,
///     "createdAt": 1700000000000,
///     "expiresAt": null,
///     "active": true,
///     "notes": ""
///   }
/// ]
/// ```
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Writes an empty collection if the file does not exist yet.
    pub fn ensure_exists(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        tracing::info!("Initializing empty license store at {}", self.path.display());
        self.write("[]")
    }
}

impl RecordStore for FileStore {
    fn load(&self) -> Vec<License> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Err(e) = self.ensure_exists() {
                    tracing::warn!("Failed to initialize {}: {}", self.path.display(), e);
                }
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(
                "License store {} is malformed, treating as empty: {}",
                self.path.display(),
                e
            );
            Vec::new()
        })
    }

    fn save(&self, records: &[License]) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(records)?;
        self.write(&contents)
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore").field("path", &self.path).finish()
    }
}
