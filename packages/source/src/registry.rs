//! Batch registry — loads all batch definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/batches/` is baked into the binary
//! at compile time via [`include_str!`]. Adding a new batch is as simple as
//! creating a new TOML file, adding it to the list below, and picking an id
//! range that [`IdRegistry`] accepts.

use crate::SourceError;
use crate::batch_def::{BatchDefinition, parse_batch_toml};
use crate::id_policy::IdRegistry;

/// TOML configs embedded at compile time.
const BATCH_TOMLS: &[(&str, &str)] = &[
    // ── Fixed location tables ────────────────────────────────────────
    (
        "wa_police_enforcement",
        include_str!("../batches/wa_police_enforcement.toml"),
    ),
    ("wa_police_ai", include_str!("../batches/wa_police_ai.toml")),
    // ── CSV exports ──────────────────────────────────────────────────
    ("city_of_perth", include_str!("../batches/city_of_perth.toml")),
];

/// Total number of configured batches (used in tests).
#[cfg(test)]
const EXPECTED_BATCH_COUNT: usize = 3;

/// Returns all configured batch definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (the configs are embedded, so
/// this is caught by the registry tests).
#[must_use]
pub fn all_batches() -> Vec<BatchDefinition> {
    BATCH_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_batch_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Returns the batch with the given id.
#[must_use]
pub fn find_batch(id: &str) -> Option<BatchDefinition> {
    all_batches().into_iter().find(|b| b.id == id)
}

/// Builds the id reservation registry for all configured batches.
///
/// # Errors
///
/// Returns [`SourceError::IdRangeOverlap`] if two batches reserve
/// overlapping ranges.
pub fn id_registry() -> Result<IdRegistry, SourceError> {
    IdRegistry::from_batches(&all_batches())
}
