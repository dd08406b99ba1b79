use std::sync::RwLock;

use crate::models::License;

use super::{RecordStore, StoreError};

/// In-process store with the same full-snapshot contract as [`super::FileStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<License>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing set of records.
    pub fn with_records(records: Vec<License>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Vec<License> {
        match self.records.read() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn save(&self, records: &[License]) -> Result<(), StoreError> {
        let mut guard = match self.records.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = records.to_vec();
        Ok(())
    }
}
