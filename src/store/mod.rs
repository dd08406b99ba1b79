//! Record store: the full set of license records, loaded and saved as one unit.
//!
//! There is no caching and no partial update. Every service operation loads
//! the whole collection and, if it changed anything, saves the whole
//! collection back. Last writer wins.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

use crate::models::License;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Storage backend for license records.
pub trait RecordStore: Send + Sync {
    /// Returns every record.
    ///
    /// Missing storage is initialized empty. Unreadable or malformed storage
    /// is treated as empty rather than reported.
    fn load(&self) -> Vec<License>;

    /// Replaces the stored collection with `records`.
    fn save(&self, records: &[License]) -> Result<(), StoreError>;
}
