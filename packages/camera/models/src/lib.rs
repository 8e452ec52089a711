#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Camera record types and the regeneration category taxonomy.
//!
//! This crate defines the canonical [`CameraRecord`] stored in the camera
//! database file, the [`CameraType`] tags used by every data source, and the
//! [`CameraCategory`] grouping that decides which records a batch replaces
//! when it is re-run.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Category used for replace-by-category regeneration.
///
/// Every [`CameraType`] belongs to exactly one category. A batch declares
/// the category it owns; re-running the batch removes all records of that
/// category before inserting its fresh records.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CameraCategory {
    /// Police speed, red-light and average-speed cameras
    Enforcement,
    /// AI cameras detecting phone use, seatbelt violations and speeding
    AiDetection,
    /// Council CCTV used for public safety monitoring
    PublicSafety,
    /// Tags no batch owns (hand-submitted records and the like)
    Unclassified,
}

impl CameraCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Enforcement,
            Self::AiDetection,
            Self::PublicSafety,
            Self::Unclassified,
        ]
    }
}

/// The `type` tag of a camera record.
///
/// Known tags serialize exactly as they appear in the dataset. Any other tag
/// read from disk is kept verbatim in [`CameraType::Other`] so a batch run
/// never rewrites records it does not own.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CameraType {
    /// Fixed speed camera (`"Fixed Speed"`)
    FixedSpeed,
    /// Combined red-light and speed camera (`"Red-Light Speed"`)
    RedLightSpeed,
    /// Average speed camera pair (`"Point-to-Point"`)
    PointToPoint,
    /// AI detection camera (`"AI Camera"`)
    AiCamera,
    /// Council CCTV camera (`"Public Safety"`)
    PublicSafety,
    /// Any tag not listed above.
    Other(String),
}

impl CameraType {
    /// Returns the tag exactly as it is stored in the dataset.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::FixedSpeed => "Fixed Speed",
            Self::RedLightSpeed => "Red-Light Speed",
            Self::PointToPoint => "Point-to-Point",
            Self::AiCamera => "AI Camera",
            Self::PublicSafety => "Public Safety",
            Self::Other(tag) => tag,
        }
    }

    /// Returns the regeneration category this type belongs to.
    ///
    /// Unknown tags are classified by keyword so that hand-entered variants
    /// such as `"Mobile Speed"` are still replaced by the enforcement batch.
    #[must_use]
    pub fn category(&self) -> CameraCategory {
        match self {
            Self::FixedSpeed | Self::RedLightSpeed | Self::PointToPoint => {
                CameraCategory::Enforcement
            }
            Self::AiCamera => CameraCategory::AiDetection,
            Self::PublicSafety => CameraCategory::PublicSafety,
            Self::Other(tag) => {
                if ["Speed", "Red-Light", "Point-to-Point"]
                    .iter()
                    .any(|keyword| tag.contains(keyword))
                {
                    CameraCategory::Enforcement
                } else {
                    CameraCategory::Unclassified
                }
            }
        }
    }

    /// Returns all known (non-[`CameraType::Other`]) types.
    #[must_use]
    pub const fn known() -> &'static [Self] {
        &[
            Self::FixedSpeed,
            Self::RedLightSpeed,
            Self::PointToPoint,
            Self::AiCamera,
            Self::PublicSafety,
        ]
    }
}

impl From<String> for CameraType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "Fixed Speed" => Self::FixedSpeed,
            "Red-Light Speed" => Self::RedLightSpeed,
            "Point-to-Point" => Self::PointToPoint,
            "AI Camera" => Self::AiCamera,
            "Public Safety" => Self::PublicSafety,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for CameraType {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_owned())
    }
}

impl From<CameraType> for String {
    fn from(value: CameraType) -> Self {
        match value {
            CameraType::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for CameraType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Violation an AI detection camera is configured to detect.
///
/// Tags are stored in snake case. Unknown tags are kept verbatim in
/// [`DetectionType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DetectionType {
    /// Driver handling a mobile phone (`"mobile_phone"`)
    MobilePhone,
    /// Occupant not wearing a seatbelt (`"seatbelt"`)
    Seatbelt,
    /// Vehicle exceeding the speed limit (`"speed"`)
    Speed,
    /// Any tag not listed above.
    Other(String),
}

impl DetectionType {
    /// Returns the tag exactly as it is stored in the dataset.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::MobilePhone => "mobile_phone",
            Self::Seatbelt => "seatbelt",
            Self::Speed => "speed",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for DetectionType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "mobile_phone" => Self::MobilePhone,
            "seatbelt" => Self::Seatbelt,
            "speed" => Self::Speed,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for DetectionType {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_owned())
    }
}

impl From<DetectionType> for String {
    fn from(value: DetectionType) -> Self {
        match value {
            DetectionType::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for DetectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Facing direction of a camera.
///
/// Batches write compass labels (`"North"`), while hand-entered records
/// carry a bearing in degrees. Both are written back in the form they were
/// read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Direction {
    /// Bearing in degrees, stored as a JSON number.
    Bearing(serde_json::Number),
    /// Free-text label, stored as a JSON string.
    Label(String),
}

impl From<String> for Direction {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

impl From<&str> for Direction {
    fn from(label: &str) -> Self {
        Self::Label(label.to_owned())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearing(degrees) => write!(f, "{degrees}°"),
            Self::Label(label) => f.pad(label),
        }
    }
}

/// A single camera in the database file.
///
/// Field order matches the on-disk layout. Keys this type does not model
/// (for example `created_by` on hand-submitted records) are kept in
/// [`CameraRecord::extra`] and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    /// Globally unique id, namespaced by authority (e.g. `"WAPOL-1001"`).
    pub id: String,
    /// Human-facing camera identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub camera_number: String,
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
    /// Camera type tag.
    #[serde(rename = "type")]
    pub camera_type: CameraType,
    /// Authority that controls the camera.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner: String,
    /// Facing direction. `None` when the camera covers all directions or the
    /// source does not say.
    #[serde(default)]
    pub direction: Option<Direction>,
    /// Coverage angle in degrees, `"360"` for all-direction coverage.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub coverage: String,
    /// What the camera is used for.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub purpose: String,
    /// Program or network the camera belongs to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network: String,
    /// Suburb or area name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suburb: String,
    /// Street-level location, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Where the record came from.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data_source: String,
    /// Date the record was last refreshed (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_updated: String,
    /// Violations detected, present only for AI detection cameras. Kept in
    /// the order they were listed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_types: Option<Vec<DetectionType>>,
    /// Any keys not modelled above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CameraRecord {
    /// Returns the regeneration category of this record.
    #[must_use]
    pub fn category(&self) -> CameraCategory {
        self.camera_type.category()
    }

    /// Returns the authority namespace of the id: everything before the
    /// first `-`, or the whole id when it has no dash.
    #[must_use]
    pub fn id_namespace(&self) -> &str {
        self.id.split_once('-').map_or(self.id.as_str(), |(ns, _)| ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> CameraRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn known_types_roundtrip_through_strings() {
        for camera_type in CameraType::known() {
            let tag: String = camera_type.clone().into();
            assert_eq!(CameraType::from(tag), *camera_type);
        }
    }

    #[test]
    fn unknown_type_is_preserved() {
        let camera_type = CameraType::from("Mobile Speed Trailer");
        assert_eq!(
            camera_type,
            CameraType::Other("Mobile Speed Trailer".to_owned())
        );
        assert_eq!(camera_type.to_string(), "Mobile Speed Trailer");
    }

    #[test]
    fn categories_follow_type() {
        assert_eq!(
            CameraType::FixedSpeed.category(),
            CameraCategory::Enforcement
        );
        assert_eq!(
            CameraType::PointToPoint.category(),
            CameraCategory::Enforcement
        );
        assert_eq!(CameraType::AiCamera.category(), CameraCategory::AiDetection);
        assert_eq!(
            CameraType::PublicSafety.category(),
            CameraCategory::PublicSafety
        );
        assert_eq!(
            CameraType::from("Mobile Speed").category(),
            CameraCategory::Enforcement
        );
        assert_eq!(
            CameraType::from("Traffic Flow").category(),
            CameraCategory::Unclassified
        );
    }

    #[test]
    fn category_parses_from_snake_case() {
        assert_eq!(
            "ai_detection".parse::<CameraCategory>().unwrap(),
            CameraCategory::AiDetection
        );
        assert_eq!(CameraCategory::PublicSafety.to_string(), "public_safety");
    }

    #[test]
    fn record_serializes_null_direction_and_skips_missing_location() {
        let record = parse(
            r#"{"id":"COP-12","camera_number":"12","lat":-31.95,"lng":115.86,
                "type":"Public Safety","owner":"City of Perth","direction":null}"#,
        );
        let value = serde_json::to_value(&record).unwrap();
        assert!(value["direction"].is_null());
        assert!(value.get("location").is_none());
        assert!(value.get("detection_types").is_none());
        assert!(value.get("purpose").is_none());
        assert_eq!(value["type"], "Public Safety");
    }

    #[test]
    fn record_keeps_unknown_keys() {
        let record = parse(
            r#"{"id":"USER-1700000000000","lat":-31.9,"lng":115.8,"type":"Speed",
                "created_by":"admin","created_at":"2025-10-29T01:02:03Z"}"#,
        );
        assert_eq!(record.extra["created_by"], "admin");
        assert_eq!(record.category(), CameraCategory::Enforcement);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["created_at"], "2025-10-29T01:02:03Z");
        assert!(value.get("camera_number").is_none());
    }

    #[test]
    fn detection_types_keep_listed_order_and_unknown_tags() {
        let record = parse(
            r#"{"id":"WAPOL-AI-2000","lat":-32.02,"lng":115.855,"type":"AI Camera",
                "detection_types":["speed","mobile_phone","tailgating"]}"#,
        );
        assert_eq!(
            record.detection_types.as_deref(),
            Some(
                &[
                    DetectionType::Speed,
                    DetectionType::MobilePhone,
                    DetectionType::Other("tailgating".to_owned()),
                ][..]
            )
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value["detection_types"],
            serde_json::json!(["speed", "mobile_phone", "tailgating"])
        );
    }

    #[test]
    fn hand_entered_bearing_survives_roundtrip() {
        let json = r#"{"id":"USER-1730000000000","lat":-31.9,"lng":115.8,"type":"Traffic Flow",
            "coverage":"directional","direction":90,"created_by":"admin"}"#;
        let record = parse(json);
        assert_eq!(
            record.direction,
            Some(Direction::Bearing(serde_json::Number::from(90_u32)))
        );
        assert_eq!(record.category(), CameraCategory::Unclassified);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["direction"], 90);
        assert_eq!(value["created_by"], "admin");

        let labelled = parse(r#"{"id":"X-1","lat":0.0,"lng":0.0,"type":"Speed","direction":"North"}"#);
        assert_eq!(labelled.direction, Some(Direction::from("North")));
        assert_eq!(serde_json::to_value(&labelled).unwrap()["direction"], "North");
    }

    #[test]
    fn id_namespace_is_prefix_before_dash() {
        let mut record = parse(r#"{"id":"WAPOL-AI-2003","lat":0.0,"lng":0.0,"type":"AI Camera"}"#);
        assert_eq!(record.id_namespace(), "WAPOL");
        record.id = "standalone".to_owned();
        assert_eq!(record.id_namespace(), "standalone");
    }
}
