//! [`CameraRepository`] backed by the pretty-printed JSON database file.
//!
//! Saves are staged in a hidden sibling file and renamed over the target,
//! so a failed write leaves the previous collection intact.

use std::fs;
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use camera_map_camera_models::CameraRecord;

use crate::paths::{ensure_dir, staging_path};
use crate::{CameraRepository, DbError};

/// Reads and writes the camera collection as a JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Creates a repository for the database file at `path`. The file does
    /// not need to exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a repository for [`crate::paths::database_path`].
    #[must_use]
    pub fn open_default() -> Self {
        Self::new(crate::paths::database_path())
    }

    /// Path of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CameraRepository for JsonFileRepository {
    fn load(&self) -> Result<Vec<CameraRecord>, DbError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!(
                    "{} does not exist yet, starting from an empty collection",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let records: Vec<CameraRecord> = serde_json::from_str(&contents)?;
        log::debug!(
            "Loaded {} cameras from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    fn save(&mut self, records: &[CameraRecord]) -> Result<(), DbError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }

        let mut output = serde_json::to_string_pretty(records)?;
        output.push('\n');

        let staging = staging_path(&self.path);
        let result = write_staged(&staging, output.as_bytes())
            .and_then(|()| fs::rename(&staging, &self.path));
        if let Err(e) = result {
            fs::remove_file(&staging).ok();
            return Err(e.into());
        }

        log::debug!("Saved {} cameras to {}", records.len(), self.path.display());
        Ok(())
    }
}

fn write_staged(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use camera_map_camera_models::{CameraCategory, CameraType};

    use super::*;
    use crate::test_support::record;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("camera_map_json_file_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = scratch_dir("missing");
        let repo = JsonFileRepository::new(dir.join("cameras_database.json"));
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_preserves_records() {
        let dir = scratch_dir("save_load");
        let mut repo = JsonFileRepository::new(dir.join("nested/cameras_database.json"));
        let records = vec![
            record("WAPOL-1001", CameraType::FixedSpeed),
            record("COP-7", CameraType::PublicSafety),
        ];

        repo.save(&records).unwrap();
        assert_eq!(repo.load().unwrap(), records);
        assert!(!staging_path(repo.path()).exists());
    }

    #[test]
    fn saved_file_is_indented_json_with_trailing_newline() {
        let dir = scratch_dir("format");
        let mut repo = JsonFileRepository::new(dir.join("cameras_database.json"));
        repo.save(&[record("WAPOL-1001", CameraType::FixedSpeed)])
            .unwrap();

        let contents = fs::read_to_string(repo.path()).unwrap();
        assert!(contents.starts_with("[\n  {\n    \"id\": \"WAPOL-1001\","));
        assert!(contents.contains("\"direction\": null"));
        assert!(contents.ends_with("]\n"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = scratch_dir("malformed");
        let path = dir.join("cameras_database.json");
        fs::write(&path, "{ not json").unwrap();

        let repo = JsonFileRepository::new(&path);
        assert!(matches!(repo.load(), Err(DbError::Json(_))));
    }

    #[test]
    fn failed_save_removes_staging_file() {
        let dir = scratch_dir("failed_save");
        // A directory in place of the database file makes the final rename fail.
        let path = dir.join("cameras_database.json");
        fs::create_dir_all(path.join("occupied")).unwrap();

        let mut repo = JsonFileRepository::new(&path);
        let result = repo.save(&[record("COP-1", CameraType::PublicSafety)]);

        assert!(matches!(result, Err(DbError::Io(_))));
        assert!(!staging_path(&path).exists());
        assert!(path.join("occupied").is_dir());
    }

    #[test]
    fn failed_upsert_leaves_file_untouched() {
        let dir = scratch_dir("failed_upsert");
        let path = dir.join("cameras_database.json");
        let mut repo = JsonFileRepository::new(&path);
        repo.save(&[record("COP-1", CameraType::PublicSafety)])
            .unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let result = repo.upsert_category(
            CameraCategory::Enforcement,
            vec![
                record("WAPOL-1001", CameraType::FixedSpeed),
                record("WAPOL-1001", CameraType::FixedSpeed),
            ],
        );

        assert!(matches!(result, Err(DbError::DuplicateId { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }
}
