#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spherical Web Mercator (EPSG:3857) to WGS84 (EPSG:4326) conversion.
//!
//! Some council datasets publish camera positions as projected Web Mercator
//! meters. These helpers convert them to latitude/longitude degrees using
//! the inverse spherical Mercator formula. No datum correction is applied,
//! so results are an approximation rather than geodetically exact.

use std::f64::consts::PI;

/// Half the width of the Web Mercator plane in meters. Valid projected
/// coordinates lie within `±MERCATOR_EXTENT` on both axes.
pub const MERCATOR_EXTENT: f64 = 20_037_508.34;

/// Decimal places kept for coordinates converted from projected sources
/// (about 0.11 m of precision).
pub const COORDINATE_DECIMALS: u32 = 6;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Returns this position with both components rounded to `places`
    /// decimal places.
    #[must_use]
    pub fn rounded(self, places: u32) -> Self {
        Self {
            lat: round_coordinate(self.lat, places),
            lng: round_coordinate(self.lng, places),
        }
    }
}

impl From<LatLng> for geo::Point<f64> {
    fn from(value: LatLng) -> Self {
        Self::new(value.lng, value.lat)
    }
}

/// Converts Web Mercator meters to WGS84 latitude/longitude.
///
/// Longitude is linear in `x`. Latitude scales `y` to an intermediate angle
/// and applies the inverse Mercator transform. Inputs beyond
/// [`MERCATOR_EXTENT`] are not rejected; their latitudes approach ±90°.
#[must_use]
pub fn webmercator_to_latlng(x: f64, y: f64) -> LatLng {
    let lng = (x / MERCATOR_EXTENT) * 180.0;
    let intermediate = (y / MERCATOR_EXTENT) * 180.0;
    let lat = 180.0 / PI * (2.0 * (intermediate * PI / 180.0).exp().atan() - PI / 2.0);
    LatLng { lat, lng }
}

/// Converts WGS84 latitude/longitude to Web Mercator meters `(x, y)`.
///
/// The forward counterpart of [`webmercator_to_latlng`].
#[must_use]
pub fn latlng_to_webmercator(lat: f64, lng: f64) -> (f64, f64) {
    let x = lng * MERCATOR_EXTENT / 180.0;
    let y = ((90.0 + lat) * PI / 360.0).tan().ln() / (PI / 180.0);
    (x, y * MERCATOR_EXTENT / 180.0)
}

/// Returns whether `(x, y)` lies inside the defined Web Mercator extent.
#[must_use]
pub fn is_within_extent(x: f64, y: f64) -> bool {
    x.abs() <= MERCATOR_EXTENT && y.abs() <= MERCATOR_EXTENT
}

/// Rounds `value` to `places` decimal places, halves away from zero.
#[must_use]
pub fn round_coordinate(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(i32::try_from(places).unwrap_or(i32::MAX));
    (value * factor).round() / factor
}
