//! Collection summary printed after a batch run.

use std::collections::BTreeMap;
use std::fmt;

use camera_map_camera_models::{CameraCategory, CameraRecord};

/// Record counts of a camera collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Total number of records.
    pub total: usize,
    /// Counts keyed by the record `type` tag.
    pub by_type: BTreeMap<String, usize>,
    /// Counts keyed by id namespace (`WAPOL`, `COP`, ...).
    pub by_namespace: BTreeMap<String, usize>,
    /// Counts keyed by regeneration category.
    pub by_category: BTreeMap<CameraCategory, usize>,
}

impl CollectionSummary {
    /// Counts `records`.
    #[must_use]
    pub fn from_records(records: &[CameraRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            *summary
                .by_type
                .entry(record.camera_type.as_str().to_owned())
                .or_default() += 1;
            *summary
                .by_namespace
                .entry(record.id_namespace().to_owned())
                .or_default() += 1;
            *summary.by_category.entry(record.category()).or_default() += 1;
        }
        summary
    }

    /// Number of records in `category`.
    #[must_use]
    pub fn category_count(&self, category: CameraCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}

impl fmt::Display for CollectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cameras by source:")?;
        for (namespace, count) in &self.by_namespace {
            writeln!(f, "  - {namespace}: {count}")?;
        }
        writeln!(f, "Cameras by type:")?;
        for (camera_type, count) in &self.by_type {
            writeln!(f, "  - {camera_type}: {count}")?;
        }
        write!(f, "Total cameras in database: {}", self.total)
    }
}

#[cfg(test)]
mod tests {
    use camera_map_database::{CameraRepository, MemoryRepository};
    use camera_map_source::progress::null_progress;

    use super::*;
    use crate::{find_batch, run_batch};

    #[test]
    fn counts_table_batches() {
        let mut repo = MemoryRepository::default();
        for id in ["wa_police_enforcement", "wa_police_ai"] {
            run_batch(&mut repo, &find_batch(id).unwrap(), None, &null_progress()).unwrap();
        }

        let summary = CollectionSummary::from_records(&repo.load().unwrap());
        assert_eq!(summary.total, 51);
        assert_eq!(summary.by_namespace.get("WAPOL"), Some(&51));
        assert_eq!(summary.by_type.get("AI Camera"), Some(&8));
        assert_eq!(summary.by_type.get("Point-to-Point"), Some(&2));
        assert_eq!(summary.category_count(CameraCategory::Enforcement), 43);
        assert_eq!(summary.category_count(CameraCategory::PublicSafety), 0);
    }

    #[test]
    fn display_lists_namespaces_and_total() {
        let summary = CollectionSummary::from_records(&[]);
        let text = summary.to_string();
        assert!(text.starts_with("Cameras by source:"));
        assert!(text.ends_with("Total cameras in database: 0"));
    }
}
