//! In-memory [`CameraRepository`] for tests and dry runs.

use camera_map_camera_models::CameraRecord;

use crate::{CameraRepository, DbError};

/// Holds the collection in memory. `load` on a fresh repository returns an
/// empty collection, matching a database file that does not exist yet.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    records: Vec<CameraRecord>,
    saves: usize,
}

impl MemoryRepository {
    /// Creates a repository pre-populated with `records`.
    #[must_use]
    pub const fn with_records(records: Vec<CameraRecord>) -> Self {
        Self { records, saves: 0 }
    }

    /// Number of times [`CameraRepository::save`] has been called.
    #[must_use]
    pub const fn saves(&self) -> usize {
        self.saves
    }

    /// Consumes the repository, returning the stored collection.
    #[must_use]
    pub fn into_records(self) -> Vec<CameraRecord> {
        self.records
    }
}

impl CameraRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<CameraRecord>, DbError> {
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[CameraRecord]) -> Result<(), DbError> {
        self.records = records.to_vec();
        self.saves += 1;
        Ok(())
    }
}
