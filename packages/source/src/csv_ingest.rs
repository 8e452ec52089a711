//! CSV ingestion for batches whose positions come from a council export.
//!
//! Reads a delimited file with a (possibly BOM-prefixed) header row,
//! converts each row's Web Mercator `x`/`y` to WGS84, rounds to six decimal
//! places, and builds one [`CameraRecord`] per row. Bad rows are skipped
//! with a warning; the rest of the file is still ingested.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use camera_map_camera_models::CameraRecord;
use camera_map_projection::{COORDINATE_DECIMALS, webmercator_to_latlng};

use crate::SourceError;
use crate::batch_def::{BatchDefinition, BatchSource, Placement};
use crate::parsing::{RowSkip, clean_header, parse_projected_xy, require_str};
use crate::progress::ProgressCallback;

/// A skipped row and the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the file.
    pub line: u64,
    /// Why the row was skipped.
    pub reason: RowSkip,
}

/// Result of ingesting one CSV file.
#[derive(Debug, Clone)]
pub struct CsvIngest {
    /// Records built from the valid rows, in file order.
    pub records: Vec<CameraRecord>,
    /// Rows that were skipped.
    pub skipped: Vec<SkippedRow>,
}

/// Opens `path` and ingests it with [`ingest_csv`].
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened or its header row
/// is unusable.
pub fn ingest_csv_file(
    batch: &BatchDefinition,
    path: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<CsvIngest, SourceError> {
    log::info!("[{}] Reading {}", batch.id(), path.display());
    ingest_csv(batch, File::open(path)?, progress)
}

/// Ingests CSV rows from `reader` using the column mapping of `batch`.
///
/// # Errors
///
/// Returns [`SourceError`] if `batch` is not a CSV batch, the header row
/// cannot be read, or a mapped column is missing from it. Individual bad
/// rows never fail the ingest.
pub fn ingest_csv<R: Read>(
    batch: &BatchDefinition,
    reader: R,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<CsvIngest, SourceError> {
    let BatchSource::Csv {
        x_column,
        y_column,
        number_column,
        camera_type,
        suburb,
        delimiter,
    } = &batch.source
    else {
        return Err(SourceError::Definition {
            batch: batch.id().to_owned(),
            message: "not a CSV batch".to_owned(),
        });
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(
            delimiter
                .as_deref()
                .and_then(|d| d.as_bytes().first().copied())
                .unwrap_or(b','),
        )
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(clean_header).collect();

    for column in [x_column, y_column, number_column] {
        if !headers.contains(column) {
            return Err(SourceError::MissingColumn {
                batch: batch.id().to_owned(),
                column: column.clone(),
            });
        }
    }

    let rows: Vec<_> = csv_reader.records().collect();
    progress.set_total(rows.len() as u64);

    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();
    let mut seen_numbers = BTreeSet::new();

    for (i, result) in rows.into_iter().enumerate() {
        progress.inc(1);
        // Header is line 1.
        let fallback_line = i as u64 + 2;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                let line = e.position().map_or(fallback_line, csv::Position::line);
                skip(batch, &mut skipped, line, RowSkip::Unreadable {
                    message: e.to_string(),
                });
                continue;
            }
        };
        let line = row.position().map_or(fallback_line, csv::Position::line);

        let fields: BTreeMap<String, String> = headers
            .iter()
            .cloned()
            .zip(row.iter().map(str::to_owned))
            .collect();

        let parsed = require_str(&fields, number_column).and_then(|number| {
            let (x, y) = parse_projected_xy(&fields, x_column, y_column)?;
            if seen_numbers.contains(number) {
                return Err(RowSkip::DuplicateCameraNumber {
                    number: number.to_owned(),
                });
            }
            Ok((number.to_owned(), x, y))
        });

        let (number, x, y) = match parsed {
            Ok(v) => v,
            Err(reason) => {
                skip(batch, &mut skipped, line, reason);
                continue;
            }
        };

        let position = webmercator_to_latlng(x, y).rounded(COORDINATE_DECIMALS);
        let record = batch.build_record(
            batch.ids.id(&number),
            number.clone(),
            Placement {
                camera_type: camera_type.clone(),
                lat: position.lat,
                lng: position.lng,
                suburb: suburb.clone(),
                location: None,
                direction: None,
            },
        );
        log::debug!(
            "[{}] line {line}: {} at ({}, {})",
            batch.id(),
            record.id,
            record.lat,
            record.lng
        );
        seen_numbers.insert(number);
        records.push(record);
    }

    log::info!(
        "[{}] CSV ingest complete: {} records, {} skipped",
        batch.id(),
        records.len(),
        skipped.len()
    );
    progress.finish(format!(
        "[{}] {} records, {} skipped",
        batch.id(),
        records.len(),
        skipped.len()
    ));

    Ok(CsvIngest { records, skipped })
}

fn skip(batch: &BatchDefinition, skipped: &mut Vec<SkippedRow>, line: u64, reason: RowSkip) {
    log::warn!("[{}] Skipping line {line}: {reason}", batch.id());
    skipped.push(SkippedRow { line, reason });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::null_progress;
    use crate::registry::find_batch;

    fn city_of_perth() -> BatchDefinition {
        find_batch("city_of_perth").unwrap()
    }

    fn ingest(csv: &str) -> CsvIngest {
        ingest_csv(&city_of_perth(), csv.as_bytes(), &null_progress()).unwrap()
    }

    #[test]
    fn converts_rows_to_records() {
        let result = ingest(
            "\u{feff}x,y,Camera Number,Status\n\
             12897353.75,-3757523.2,101,Active\n",
        );

        assert!(result.skipped.is_empty());
        let record = &result.records[0];
        assert_eq!(record.id, "COP-101");
        assert_eq!(record.camera_number, "101");
        assert_eq!(record.owner, "City of Perth");
        assert_eq!(record.network, "City of Perth CityWatch");
        assert_eq!(record.purpose, "Public safety monitoring");
        assert_eq!(record.suburb, "Perth CBD");
        assert_eq!(record.coverage, "360");
        assert_eq!(record.location, None);
        assert_eq!(record.direction, None);
        assert_eq!(record.camera_type.as_str(), "Public Safety");
        assert!((record.lng - 115.8589).abs() < 1e-6, "{}", record.lng);
        assert!((record.lat - -31.9559).abs() < 1e-6, "{}", record.lat);
    }

    #[test]
    fn coordinates_are_rounded_to_six_places() {
        let result = ingest("x,y,Camera Number\n12897353.123,-3757523.987,5\n");
        let record = &result.records[0];
        for value in [record.lat, record.lng] {
            let scaled = value * 1e6;
            assert!((scaled - scaled.round()).abs() < 1e-6, "{value}");
        }
    }

    #[test]
    fn non_numeric_x_row_is_skipped() {
        let result = ingest(
            "x,y,Camera Number\n\
             12897353.75,-3757523.2,1\n\
             abc,-3757523.2,2\n\
             12897400.0,-3757600.0,3\n",
        );

        let ids: Vec<&str> = result.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["COP-1", "COP-3"]);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].line, 3);
        assert!(matches!(
            result.skipped[0].reason,
            RowSkip::InvalidNumber { ref field, .. } if field == "x"
        ));
    }

    #[test]
    fn missing_camera_number_and_short_rows_are_skipped() {
        let result = ingest(
            "x,y,Camera Number\n\
             12897353.75,-3757523.2,\n\
             12897353.75\n\
             12897353.75,-3757523.2,9\n",
        );
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.skipped.len(), 2);
    }

    #[test]
    fn duplicate_camera_numbers_keep_first_row() {
        let result = ingest(
            "x,y,Camera Number\n\
             12897353.75,-3757523.2,7\n\
             12897400.0,-3757600.0,7\n",
        );
        assert_eq!(result.records.len(), 1);
        assert!((result.records[0].lng - 115.8589).abs() < 1e-6);
        assert!(matches!(
            result.skipped[0].reason,
            RowSkip::DuplicateCameraNumber { .. }
        ));
    }

    #[test]
    fn camera_number_is_trimmed_before_use() {
        let result = ingest(
            "x,y,Camera Number\n\
             12897353.75,-3757523.2, 42 \n\
             12897400.0,-3757600.0,42\n",
        );
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].id, "COP-42");
        assert_eq!(result.records[0].camera_number, "42");
        assert!(matches!(
            result.skipped[0].reason,
            RowSkip::DuplicateCameraNumber { ref number } if number == "42"
        ));
    }

    #[test]
    fn missing_header_column_is_an_error() {
        let err = ingest_csv(
            &city_of_perth(),
            "x,Camera Number\n1,2\n".as_bytes(),
            &null_progress(),
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn { ref column, .. } if column == "y"));
    }

    #[test]
    fn table_batch_is_rejected() {
        let batch = find_batch("wa_police_ai").unwrap();
        assert!(ingest_csv(&batch, "x,y\n".as_bytes(), &null_progress()).is_err());
    }
}
