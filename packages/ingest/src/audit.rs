//! Reports cameras from different categories that sit close together.
//!
//! Batches never merge records across categories, so the same physical
//! camera can appear once per source. This module only reports candidate
//! pairs; it does not modify the collection.

use camera_map_camera_models::CameraRecord;
use camera_map_projection::LatLng;
use geo::{Distance, Haversine, Point};

/// Default search radius in meters.
pub const DEFAULT_RADIUS_M: f64 = 25.0;

/// Two records from different categories within the search radius.
#[derive(Debug, Clone, Copy)]
pub struct NearbyPair<'a> {
    /// Record that appears first in the collection.
    pub first: &'a CameraRecord,
    /// Record that appears later in the collection.
    pub second: &'a CameraRecord,
    /// Great-circle distance between them in meters.
    pub distance_m: f64,
}

fn point(record: &CameraRecord) -> Point<f64> {
    LatLng {
        lat: record.lat,
        lng: record.lng,
    }
    .into()
}

/// Finds pairs of records in different categories that lie within
/// `radius_m` meters of each other, nearest first.
#[must_use]
pub fn find_nearby_pairs(records: &[CameraRecord], radius_m: f64) -> Vec<NearbyPair<'_>> {
    let points: Vec<Point<f64>> = records.iter().map(point).collect();
    let mut pairs = Vec::new();

    for (i, first) in records.iter().enumerate() {
        for (j, second) in records.iter().enumerate().skip(i + 1) {
            if first.category() == second.category() {
                continue;
            }
            let distance_m = Haversine.distance(points[i], points[j]);
            if distance_m <= radius_m {
                pairs.push(NearbyPair {
                    first,
                    second,
                    distance_m,
                });
            }
        }
    }

    pairs.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    log::debug!(
        "Found {} cross-category pairs within {radius_m} m among {} records",
        pairs.len(),
        records.len()
    );
    pairs
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use camera_map_camera_models::CameraType;

    use super::*;

    fn record(id: &str, camera_type: CameraType, lat: f64, lng: f64) -> CameraRecord {
        CameraRecord {
            id: id.to_owned(),
            camera_number: String::new(),
            lat,
            lng,
            camera_type,
            owner: String::new(),
            direction: None,
            coverage: String::new(),
            purpose: String::new(),
            network: String::new(),
            suburb: String::new(),
            location: None,
            data_source: String::new(),
            last_updated: String::new(),
            detection_types: None,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn reports_only_cross_category_pairs() {
        let records = vec![
            record("WAPOL-1001", CameraType::FixedSpeed, -31.9559, 115.8589),
            record("WAPOL-1002", CameraType::RedLightSpeed, -31.95591, 115.8589),
            record("COP-1", CameraType::PublicSafety, -31.95592, 115.8589),
            record("COP-2", CameraType::PublicSafety, -31.0, 115.0),
        ];

        let pairs = find_nearby_pairs(&records, DEFAULT_RADIUS_M);
        let ids: Vec<(&str, &str)> = pairs
            .iter()
            .map(|p| (p.first.id.as_str(), p.second.id.as_str()))
            .collect();
        assert_eq!(ids, [("WAPOL-1002", "COP-1"), ("WAPOL-1001", "COP-1")]);
        assert!(pairs[0].distance_m < pairs[1].distance_m);
        assert!(pairs[1].distance_m < 3.0);
    }

    #[test]
    fn empty_collection_has_no_pairs() {
        assert!(find_nearby_pairs(&[], DEFAULT_RADIUS_M).is_empty());
    }
}
