#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Camera batch definitions and record construction.
//!
//! Each batch is described by a TOML file embedded at compile time (see
//! [`registry`]). A batch owns one [`CameraCategory`] and knows how to build
//! the fresh records for it, either from a table of fixed locations or by
//! parsing a CSV export (see [`csv_ingest`]).
//!
//! [`CameraCategory`]: camera_map_camera_models::CameraCategory

pub mod batch_def;
pub mod csv_ingest;
pub mod id_policy;
pub mod parsing;
pub mod progress;
pub mod registry;

/// Errors that can occur while loading batch definitions or building records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV header could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Batch definition TOML is malformed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required CSV column is missing from the header row.
    #[error("[{batch}] CSV header has no '{column}' column")]
    MissingColumn {
        /// Batch id.
        batch: String,
        /// Missing column name.
        column: String,
    },

    /// A batch produced more records than its id range can number.
    #[error("[{batch}] {count} records exceed the id range capacity of {capacity}")]
    IdRangeExhausted {
        /// Batch id.
        batch: String,
        /// Records the batch tried to number.
        count: usize,
        /// Size of the reserved range.
        capacity: u32,
    },

    /// Two batches reserve overlapping id ranges in the same namespace.
    #[error("Id ranges of {first} and {second} overlap in namespace {namespace}")]
    IdRangeOverlap {
        /// First batch id.
        first: String,
        /// Second batch id.
        second: String,
        /// Shared id namespace.
        namespace: String,
    },

    /// Batch definition is internally inconsistent.
    #[error("[{batch}] invalid definition: {message}")]
    Definition {
        /// Batch id.
        batch: String,
        /// Description of what went wrong.
        message: String,
    },
}
