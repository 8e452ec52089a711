//! Config-driven camera batch definition.
//!
//! [`BatchDefinition`] captures everything unique about a batch in a
//! serializable config struct: which category it regenerates, how its ids
//! are numbered, the defaults stamped on every record, and where the camera
//! positions come from.

use std::ops::RangeInclusive;

use camera_map_camera_models::{
    CameraCategory, CameraRecord, CameraType, DetectionType, Direction,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::SourceError;

// ── Top-level batch definition ──────────────────────────────────────────

/// A complete, config-driven camera batch.
///
/// Loaded from TOML files at compile time (see [`crate::registry`]).
#[derive(Debug, Clone, Deserialize)]
pub struct BatchDefinition {
    /// Unique identifier (e.g., `"wa_police_enforcement"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Category this batch regenerates. Re-running the batch replaces every
    /// record of this category.
    pub category: CameraCategory,
    /// How record ids and camera numbers are formed.
    pub ids: IdAllocation,
    /// Values stamped on every record.
    pub defaults: RecordDefaults,
    /// Per-type overrides, checked in order; the first match wins.
    #[serde(default)]
    pub profiles: Vec<TypeProfile>,
    /// Where camera positions come from.
    pub source: BatchSource,
}

// ── Id allocation ───────────────────────────────────────────────────────

/// Id prefix and, for numbered batches, the reserved numeric range.
#[derive(Debug, Clone, Deserialize)]
pub struct IdAllocation {
    /// Prefix of every record id (e.g., `"WAPOL-"`).
    pub id_prefix: String,
    /// Prefix of camera numbers. When absent the camera number equals the id.
    #[serde(default)]
    pub camera_number_prefix: Option<String>,
    /// First sequence number. Required for table batches.
    #[serde(default)]
    pub base: Option<u32>,
    /// Size of the reserved range. Required for table batches.
    #[serde(default)]
    pub capacity: Option<u32>,
}

impl IdAllocation {
    /// Returns the reserved sequence range, if this allocation numbers its
    /// own records.
    #[must_use]
    pub fn range(&self) -> Option<RangeInclusive<u32>> {
        let base = self.base?;
        let capacity = self.capacity.filter(|c| *c > 0)?;
        Some(base..=base.checked_add(capacity - 1)?)
    }

    /// Authority namespace of the ids (the prefix up to its first `-`).
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.id_prefix
            .split_once('-')
            .map_or(self.id_prefix.as_str(), |(ns, _)| ns)
    }

    /// Formats the record id for `key` (a sequence number or source id).
    #[must_use]
    pub fn id(&self, key: impl std::fmt::Display) -> String {
        format!("{}{key}", self.id_prefix)
    }

    /// Formats the camera number for `key`.
    #[must_use]
    pub fn camera_number(&self, key: impl std::fmt::Display) -> String {
        self.camera_number_prefix
            .as_ref()
            .map_or_else(|| self.id(&key), |prefix| format!("{prefix}{key}"))
    }
}

// ── Record defaults ─────────────────────────────────────────────────────

/// Values stamped on every record a batch builds.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordDefaults {
    /// Controlling authority.
    pub owner: String,
    /// Network or program name.
    pub network: String,
    /// Purpose description.
    pub purpose: String,
    /// Coverage angle (e.g., `"360"`).
    pub coverage: String,
    /// Provenance of the data.
    pub data_source: String,
    /// Date the source data was checked.
    pub last_updated: NaiveDate,
    /// Facing direction for entries that do not give one.
    #[serde(default)]
    pub direction: Option<String>,
    /// Detection types for AI cameras.
    #[serde(default)]
    pub detection_types: Option<Vec<DetectionType>>,
}

/// Overrides applied to records whose type tag contains [`Self::matches`].
#[derive(Debug, Clone, Deserialize)]
pub struct TypeProfile {
    /// Substring of the type tag this profile applies to.
    pub matches: String,
    /// Owner override.
    #[serde(default)]
    pub owner: Option<String>,
    /// Network override.
    #[serde(default)]
    pub network: Option<String>,
    /// Purpose override.
    #[serde(default)]
    pub purpose: Option<String>,
}

// ── Source config ───────────────────────────────────────────────────────

/// Where a batch gets its camera positions.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchSource {
    /// A fixed table of locations in the definition itself. Records are
    /// numbered sequentially from [`IdAllocation::base`].
    Table {
        /// The listed cameras, in id order.
        cameras: Vec<TableEntry>,
    },
    /// A CSV export with Web Mercator positions. Record ids come from the
    /// camera number column.
    Csv {
        /// Column holding projected x (meters east).
        x_column: String,
        /// Column holding projected y (meters north).
        y_column: String,
        /// Column holding the source's camera number.
        number_column: String,
        /// Type tag for every row.
        camera_type: CameraType,
        /// Suburb for every row.
        suburb: String,
        /// Field delimiter (default: comma).
        #[serde(default)]
        delimiter: Option<String>,
    },
}

/// One row of a [`BatchSource::Table`].
#[derive(Debug, Clone, Deserialize)]
pub struct TableEntry {
    /// Suburb or area name.
    pub suburb: String,
    /// Street-level location.
    #[serde(default)]
    pub location: Option<String>,
    /// Type tag.
    #[serde(rename = "type")]
    pub camera_type: CameraType,
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
    /// Facing direction, overriding [`RecordDefaults::direction`].
    #[serde(default)]
    pub direction: Option<String>,
}

/// Per-record values that vary row by row.
#[derive(Debug, Clone)]
pub struct Placement {
    /// Type tag.
    pub camera_type: CameraType,
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
    /// Suburb or area name.
    pub suburb: String,
    /// Street-level location.
    pub location: Option<String>,
    /// Facing direction.
    pub direction: Option<Direction>,
}

impl BatchDefinition {
    /// Returns the batch id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable batch name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this batch reads a CSV file.
    #[must_use]
    pub const fn is_csv(&self) -> bool {
        matches!(self.source, BatchSource::Csv { .. })
    }

    /// Number of records a table batch lists, or `None` for CSV batches.
    #[must_use]
    pub fn listed_count(&self) -> Option<usize> {
        match &self.source {
            BatchSource::Table { cameras } => Some(cameras.len()),
            BatchSource::Csv { .. } => None,
        }
    }

    /// Checks that the definition is internally consistent: table batches
    /// have an id range large enough for their entries, and every type tag
    /// belongs to the batch's category.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] describing the first inconsistency.
    pub fn validate(&self) -> Result<(), SourceError> {
        match &self.source {
            BatchSource::Table { cameras } => {
                let (Some(base), Some(capacity)) =
                    (self.ids.base, self.ids.capacity.filter(|c| *c > 0))
                else {
                    return Err(self.definition_error(
                        "table batches need ids.base and a non-zero ids.capacity",
                    ));
                };
                if base.checked_add(capacity).is_none() {
                    return Err(self.definition_error(&format!(
                        "ids.base {base} + ids.capacity {capacity} does not fit in u32"
                    )));
                }
                if cameras.len() > capacity as usize {
                    return Err(SourceError::IdRangeExhausted {
                        batch: self.id.clone(),
                        count: cameras.len(),
                        capacity,
                    });
                }
                if let Some(entry) = cameras
                    .iter()
                    .find(|e| e.camera_type.category() != self.category)
                {
                    return Err(self.definition_error(&format!(
                        "{} entry at {} is not in category {}",
                        entry.camera_type, entry.suburb, self.category
                    )));
                }
            }
            BatchSource::Csv { camera_type, .. } => {
                if camera_type.category() != self.category {
                    return Err(self.definition_error(&format!(
                        "type {camera_type} is not in category {}",
                        self.category
                    )));
                }
            }
        }
        Ok(())
    }

    /// Builds the records of a table batch, numbered from `ids.base`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if this is a CSV batch or the definition does
    /// not [`validate`](Self::validate).
    pub fn table_records(&self) -> Result<Vec<CameraRecord>, SourceError> {
        let BatchSource::Table { cameras } = &self.source else {
            return Err(self.definition_error("CSV batches need an input file"));
        };
        self.validate()?;

        let Some(range) = self.ids.range() else {
            return Err(self.definition_error("table batches need an id range"));
        };
        let mut records = Vec::with_capacity(cameras.len());

        for (i, (sequence, entry)) in range.zip(cameras).enumerate() {
            let record = self.build_record(
                self.ids.id(sequence),
                self.ids.camera_number(sequence),
                Placement {
                    camera_type: entry.camera_type.clone(),
                    lat: entry.lat,
                    lng: entry.lng,
                    suburb: entry.suburb.clone(),
                    location: entry.location.clone(),
                    direction: entry.direction.as_deref().map(Direction::from),
                },
            );
            log::debug!(
                "[{}] {}. {} camera at {} - {}",
                self.id,
                i + 1,
                record.camera_type,
                record.suburb,
                record.location.as_deref().unwrap_or("?")
            );
            records.push(record);
        }

        Ok(records)
    }

    /// Builds one record, applying the defaults and the first matching
    /// [`TypeProfile`].
    #[must_use]
    pub fn build_record(
        &self,
        id: String,
        camera_number: String,
        placement: Placement,
    ) -> CameraRecord {
        let profile = self
            .profiles
            .iter()
            .find(|p| placement.camera_type.as_str().contains(&p.matches));
        let pick = |over: Option<&Option<String>>, default: &String| {
            over.and_then(Option::clone)
                .unwrap_or_else(|| default.clone())
        };

        CameraRecord {
            id,
            camera_number,
            lat: placement.lat,
            lng: placement.lng,
            owner: pick(profile.map(|p| &p.owner), &self.defaults.owner),
            direction: placement
                .direction
                .or_else(|| self.defaults.direction.as_deref().map(Direction::from)),
            coverage: self.defaults.coverage.clone(),
            purpose: pick(profile.map(|p| &p.purpose), &self.defaults.purpose),
            network: pick(profile.map(|p| &p.network), &self.defaults.network),
            suburb: placement.suburb,
            location: placement.location,
            data_source: self.defaults.data_source.clone(),
            last_updated: self.defaults.last_updated.to_string(),
            detection_types: self.defaults.detection_types.clone(),
            camera_type: placement.camera_type,
            extra: std::collections::BTreeMap::new(),
        }
    }

    fn definition_error(&self, message: &str) -> SourceError {
        SourceError::Definition {
            batch: self.id.clone(),
            message: message.to_owned(),
        }
    }
}

/// Parses and validates a [`BatchDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed, missing required fields, or
/// fails [`BatchDefinition::validate`].
pub fn parse_batch_toml(toml_str: &str) -> Result<BatchDefinition, SourceError> {
    let definition: BatchDefinition = toml::de::from_str(toml_str)?;
    definition.validate()?;
    Ok(definition)
}
