//! Centralised id range reservations.
//!
//! Every numbered batch reserves a sequence range inside its id namespace
//! (`WAPOL`, `COP`, ...). [`IdRegistry`] collects the reservations of all
//! batches and rejects overlapping ranges, so adding a batch can never
//! reuse ids that belong to another category.

use std::ops::RangeInclusive;

use crate::SourceError;
use crate::batch_def::BatchDefinition;

/// A sequence range reserved by one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Batch that owns the range.
    pub batch_id: String,
    /// Id namespace (e.g., `"WAPOL"`).
    pub namespace: String,
    /// Full id prefix (e.g., `"WAPOL-AI-"`).
    pub id_prefix: String,
    /// Reserved sequence numbers.
    pub range: RangeInclusive<u32>,
}

/// All id reservations, validated to be disjoint within each namespace.
#[derive(Debug, Clone, Default)]
pub struct IdRegistry {
    reservations: Vec<Reservation>,
}

impl IdRegistry {
    /// Collects the reservations of `batches`.
    ///
    /// Batches without a numeric range (ids taken from the source) reserve
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::IdRangeOverlap`] if two batches reserve
    /// overlapping ranges in the same namespace.
    pub fn from_batches(batches: &[BatchDefinition]) -> Result<Self, SourceError> {
        let mut registry = Self::default();
        for batch in batches {
            if let Some(range) = batch.ids.range() {
                registry.reserve(Reservation {
                    batch_id: batch.id.clone(),
                    namespace: batch.ids.namespace().to_owned(),
                    id_prefix: batch.ids.id_prefix.clone(),
                    range,
                })?;
            }
        }
        Ok(registry)
    }

    /// Adds a reservation.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::IdRangeOverlap`] if it overlaps an existing
    /// reservation in the same namespace.
    pub fn reserve(&mut self, reservation: Reservation) -> Result<(), SourceError> {
        if let Some(existing) = self.reservations.iter().find(|r| {
            r.namespace == reservation.namespace
                && r.range.start() <= reservation.range.end()
                && reservation.range.start() <= r.range.end()
        }) {
            return Err(SourceError::IdRangeOverlap {
                first: existing.batch_id.clone(),
                second: reservation.batch_id,
                namespace: reservation.namespace,
            });
        }
        self.reservations.push(reservation);
        Ok(())
    }

    /// Returns the reservation owned by `batch_id`.
    #[must_use]
    pub fn reservation(&self, batch_id: &str) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.batch_id == batch_id)
    }

    /// Returns all reservations in registration order.
    #[must_use]
    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }
}
