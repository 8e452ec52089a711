//! Shared row-parsing utilities for camera sources.
//!
//! Field lookups and coordinate parsing used by the CSV ingestion path. A
//! failed lookup yields a [`RowSkip`] explaining why the row was dropped.

use std::collections::BTreeMap;

/// Why a source row was skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowSkip {
    /// The row has no value for a required column.
    #[error("missing value for '{field}'")]
    MissingField {
        /// Column name.
        field: String,
    },

    /// A numeric column holds something that is not a finite number.
    #[error("'{field}' is not a number: {value:?}")]
    InvalidNumber {
        /// Column name.
        field: String,
        /// Raw value.
        value: String,
    },

    /// The row repeats a camera number seen earlier in the same file.
    #[error("duplicate camera number {number}")]
    DuplicateCameraNumber {
        /// Repeated camera number.
        number: String,
    },

    /// The CSV reader could not decode the row.
    #[error("unreadable row: {message}")]
    Unreadable {
        /// Reader error message.
        message: String,
    },
}

/// Returns the trimmed, non-empty value of `field`.
///
/// # Errors
///
/// Returns [`RowSkip::MissingField`] if the column is absent or blank.
pub fn require_str<'a>(row: &'a BTreeMap<String, String>, field: &str) -> Result<&'a str, RowSkip> {
    row.get(field)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RowSkip::MissingField {
            field: field.to_owned(),
        })
}

/// Parses `field` as a finite `f64`.
///
/// # Errors
///
/// Returns [`RowSkip`] if the column is missing, blank, or not a finite
/// number.
pub fn require_f64(row: &BTreeMap<String, String>, field: &str) -> Result<f64, RowSkip> {
    let raw = require_str(row, field)?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RowSkip::InvalidNumber {
            field: field.to_owned(),
            value: raw.to_owned(),
        })
}

/// Parses a projected `(x, y)` pair from two columns.
///
/// # Errors
///
/// Returns the [`RowSkip`] for the first column that fails to parse.
pub fn parse_projected_xy(
    row: &BTreeMap<String, String>,
    x_field: &str,
    y_field: &str,
) -> Result<(f64, f64), RowSkip> {
    Ok((require_f64(row, x_field)?, require_f64(row, y_field)?))
}

/// Normalizes a CSV header cell: drops a UTF-8 byte-order mark and
/// surrounding whitespace.
#[must_use]
pub fn clean_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_owned()
}
