#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Storage for the camera database.
//!
//! The whole collection is a single JSON array of [`CameraRecord`]s. Batches
//! never edit records in place: they regenerate one [`CameraCategory`] at a
//! time through [`CameraRepository::upsert_category`], which removes every
//! existing record of that category and appends the fresh ones. Running the
//! same batch twice therefore leaves the collection unchanged.

pub mod json_file;
pub mod memory;
pub mod paths;

use std::collections::BTreeSet;

use camera_map_camera_models::{CameraCategory, CameraRecord};

pub use json_file::JsonFileRepository;
pub use memory::MemoryRepository;

/// Errors that can occur while loading or saving the camera database.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// I/O error (file read/write/rename).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The database file is not a valid JSON array of camera records.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two records in the merged collection share an id.
    #[error("Duplicate camera id: {id}")]
    DuplicateId {
        /// The repeated id.
        id: String,
    },

    /// A batch tried to insert a record outside the category it regenerates.
    #[error("Record {id} has category {actual}, expected {expected}")]
    CategoryMismatch {
        /// Id of the offending record.
        id: String,
        /// Category being regenerated.
        expected: CameraCategory,
        /// Category of the offending record.
        actual: CameraCategory,
    },
}

/// Counts produced by a replace-by-category upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertReport {
    /// Category that was regenerated.
    pub category: CameraCategory,
    /// Records of that category removed from the previous collection.
    pub removed: usize,
    /// Fresh records appended.
    pub added: usize,
    /// Size of the collection after the upsert.
    pub total: usize,
}

/// Load/save access to the full camera collection.
///
/// Implementations only need [`load`](Self::load) and
/// [`save`](Self::save); the replace-by-category contract is provided on top
/// of them.
pub trait CameraRepository {
    /// Reads the full collection. A collection that does not exist yet is
    /// empty, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stored collection cannot be read or parsed.
    fn load(&self) -> Result<Vec<CameraRecord>, DbError>;

    /// Replaces the stored collection with `records`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the collection cannot be written.
    fn save(&mut self, records: &[CameraRecord]) -> Result<(), DbError>;

    /// Replaces every record of `category` with `records`.
    ///
    /// Loads the collection, drops all records whose type belongs to
    /// `category`, appends `records` in order, and saves the result. Nothing
    /// is saved if any incoming record is outside `category` or if the merged
    /// collection would contain a duplicate id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if loading or saving fails, or if the merged
    /// collection violates the category or id-uniqueness rules.
    fn upsert_category(
        &mut self,
        category: CameraCategory,
        records: Vec<CameraRecord>,
    ) -> Result<UpsertReport, DbError> {
        if let Some(stray) = records.iter().find(|r| r.category() != category) {
            return Err(DbError::CategoryMismatch {
                id: stray.id.clone(),
                expected: category,
                actual: stray.category(),
            });
        }

        let existing = self.load()?;
        let before = existing.len();

        let mut merged: Vec<CameraRecord> = existing
            .into_iter()
            .filter(|r| r.category() != category)
            .collect();
        let removed = before - merged.len();
        let added = records.len();
        merged.extend(records);

        ensure_unique_ids(&merged)?;
        self.save(&merged)?;

        log::info!(
            "Regenerated {category}: removed {removed}, added {added}, total {}",
            merged.len()
        );

        Ok(UpsertReport {
            category,
            removed,
            added,
            total: merged.len(),
        })
    }
}

/// Checks that no two records share an id.
///
/// # Errors
///
/// Returns [`DbError::DuplicateId`] naming the first repeated id.
pub fn ensure_unique_ids(records: &[CameraRecord]) -> Result<(), DbError> {
    let mut seen = BTreeSet::new();
    for record in records {
        if !seen.insert(record.id.as_str()) {
            return Err(DbError::DuplicateId {
                id: record.id.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use camera_map_camera_models::{CameraRecord, CameraType};

    pub fn record(id: &str, camera_type: CameraType) -> CameraRecord {
        CameraRecord {
            id: id.to_owned(),
            camera_number: id.to_owned(),
            lat: -31.95,
            lng: 115.86,
            camera_type,
            owner: "WA Police".to_owned(),
            direction: None,
            coverage: "360".to_owned(),
            purpose: "Speed enforcement".to_owned(),
            network: "WA Police Speed Enforcement".to_owned(),
            suburb: "Perth".to_owned(),
            location: None,
            data_source: "test".to_owned(),
            last_updated: "2025-10-28".to_owned(),
            detection_types: None,
            extra: std::collections::BTreeMap::new(),
        }
    }
}
