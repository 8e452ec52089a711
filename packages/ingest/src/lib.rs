#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for regenerating camera batches in the camera database.
//!
//! A batch run builds the fresh records for one category (from an embedded
//! location table or a CSV export) and hands them to
//! [`CameraRepository::upsert_category`], which replaces the category in the
//! stored collection.

pub mod audit;
pub mod summary;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use camera_map_camera_models::CameraRecord;
use camera_map_database::{CameraRepository, DbError, JsonFileRepository, UpsertReport, paths};
use camera_map_source::SourceError;
use camera_map_source::batch_def::BatchDefinition;
use camera_map_source::csv_ingest::ingest_csv_file;
use camera_map_source::progress::ProgressCallback;

pub use summary::CollectionSummary;

/// Errors that can occur during a batch run.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Loading or saving the camera database failed.
    #[error(transparent)]
    Database(#[from] DbError),

    /// Building the batch records failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// No batch with this id is configured.
    #[error("Unknown batch: {0}")]
    UnknownBatch(String),
}

/// Outcome of one batch run.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Id of the batch that ran.
    pub batch_id: String,
    /// Counts from the category upsert.
    pub report: UpsertReport,
    /// Source rows skipped as malformed (CSV batches only).
    pub skipped_rows: usize,
    /// How long the run took.
    pub duration: Duration,
}

/// Returns all configured batches from the TOML registry.
#[must_use]
pub fn all_batches() -> Vec<BatchDefinition> {
    camera_map_source::registry::all_batches()
}

/// Looks up a configured batch by id.
///
/// # Errors
///
/// Returns [`IngestError::UnknownBatch`] if no batch has this id.
pub fn find_batch(id: &str) -> Result<BatchDefinition, IngestError> {
    camera_map_source::registry::find_batch(id)
        .ok_or_else(|| IngestError::UnknownBatch(id.to_owned()))
}

/// Builds the fresh records of `batch` without touching the database.
///
/// CSV batches read `csv_path`, or [`paths::city_of_perth_csv_path`] when
/// it is `None`. Returns the records and the number of skipped rows.
///
/// # Errors
///
/// Returns [`IngestError`] if the batch definition is invalid or the CSV
/// file cannot be read.
pub fn build_records(
    batch: &BatchDefinition,
    csv_path: Option<&Path>,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(Vec<CameraRecord>, usize), IngestError> {
    if batch.is_csv() {
        let path = csv_path.map_or_else(paths::city_of_perth_csv_path, Path::to_path_buf);
        let ingest = ingest_csv_file(batch, &path, progress)?;
        Ok((ingest.records, ingest.skipped.len()))
    } else {
        let records = batch.table_records()?;
        progress.set_total(records.len() as u64);
        progress.inc(records.len() as u64);
        progress.finish(format!("[{}] {} records", batch.id(), records.len()));
        Ok((records, 0))
    }
}

/// Regenerates the category owned by `batch`.
///
/// Validates the id reservations of every configured batch, builds the
/// batch records, and replaces the batch's category in `repo`.
///
/// # Errors
///
/// Returns [`IngestError`] if the id reservations overlap, the records
/// cannot be built, or the repository upsert fails. Nothing is written on
/// error.
pub fn run_batch<R: CameraRepository + ?Sized>(
    repo: &mut R,
    batch: &BatchDefinition,
    csv_path: Option<&Path>,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<BatchOutcome, IngestError> {
    let start = Instant::now();
    log::info!("Running batch: {} ({})", batch.name(), batch.id());

    camera_map_source::registry::id_registry()?;

    let (records, skipped_rows) = build_records(batch, csv_path, progress)?;
    log::info!("[{}] Adding {} {} cameras", batch.id(), records.len(), batch.category);

    let report = repo.upsert_category(batch.category, records)?;

    let duration = start.elapsed();
    log::info!(
        "[{}] Done in {:.2}s: removed {}, added {}, skipped {skipped_rows} rows, {} total",
        batch.id(),
        duration.as_secs_f64(),
        report.removed,
        report.added,
        report.total
    );

    Ok(BatchOutcome {
        batch_id: batch.id().to_owned(),
        report,
        skipped_rows,
        duration,
    })
}

/// Runs every configured batch in registry order.
///
/// CSV batches whose input file does not exist are skipped with a warning.
/// The first failing batch stops the run; batches before it stay applied.
///
/// # Errors
///
/// Returns the [`IngestError`] of the first batch that fails.
pub fn run_all<R, F>(
    repo: &mut R,
    csv_path: Option<&Path>,
    mut progress_for: F,
) -> Result<Vec<BatchOutcome>, IngestError>
where
    R: CameraRepository + ?Sized,
    F: FnMut(&BatchDefinition) -> Arc<dyn ProgressCallback>,
{
    let mut outcomes = Vec::new();
    for batch in &all_batches() {
        if batch.is_csv() {
            let path: PathBuf = csv_path.map_or_else(paths::city_of_perth_csv_path, Path::to_path_buf);
            if !path.exists() {
                log::warn!(
                    "[{}] Skipping: input file {} not found",
                    batch.id(),
                    path.display()
                );
                continue;
            }
        }
        let progress = progress_for(batch);
        outcomes.push(run_batch(repo, batch, csv_path, &progress)?);
    }
    Ok(outcomes)
}

/// Runs the batch `batch_id` against the JSON database at `database` and
/// summarizes the resulting collection.
///
/// # Errors
///
/// Returns [`IngestError`] if the batch is unknown or fails.
pub fn run_batch_on_file(
    batch_id: &str,
    database: &Path,
    csv_path: Option<&Path>,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(BatchOutcome, CollectionSummary), IngestError> {
    let batch = find_batch(batch_id)?;
    let mut repo = JsonFileRepository::new(database);
    let outcome = run_batch(&mut repo, &batch, csv_path, progress)?;
    let summary = CollectionSummary::from_records(&repo.load()?);
    Ok((outcome, summary))
}
