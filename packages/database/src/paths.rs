#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for the camera database.
//!
//! Paths are relative to the working directory the batch is run from, the
//! same place the database file has always lived.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File name of the camera database.
pub const DATABASE_FILE_NAME: &str = "cameras_database.json";

/// File name of the City of Perth CCTV export consumed by the CSV batch.
pub const CITY_OF_PERTH_CSV_FILE_NAME: &str = "perth_cameras_raw.csv";

/// Returns the default camera database path.
#[must_use]
pub fn database_path() -> PathBuf {
    PathBuf::from(DATABASE_FILE_NAME)
}

/// Returns the default City of Perth CSV path.
#[must_use]
pub fn city_of_perth_csv_path() -> PathBuf {
    PathBuf::from(CITY_OF_PERTH_CSV_FILE_NAME)
}

/// Returns the sibling temp file a save is staged in before being renamed
/// over `path` (e.g. `data/cameras_database.json` ->
/// `data/.cameras_database.json.tmp`).
#[must_use]
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or(path.as_os_str()));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_path_is_hidden_sibling() {
        assert_eq!(
            staging_path(Path::new("data/cameras_database.json")),
            PathBuf::from("data/.cameras_database.json.tmp")
        );
        assert_eq!(
            staging_path(Path::new("cameras_database.json")),
            PathBuf::from(".cameras_database.json.tmp")
        );
    }

    #[test]
    fn ensure_dir_accepts_empty_parent() {
        // `Path::new("cameras_database.json").parent()` is `Some("")`.
        ensure_dir(Path::new("")).unwrap();
    }
}
