//! Local flat-earth frame
//!
//! Converts between geographic degrees and local north/east meters using
//! constant scale factors. Only valid over a small area around the
//! reference latitude.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Meters per degree of latitude (mean value near 51°N).
pub const METERS_PER_DEGREE_LAT: f64 = 111_132.954;

/// Meters per degree of longitude at the equator.
pub const METERS_PER_DEGREE_LON_EQUATOR: f64 = 111_320.0;

/// Default reference latitude (Southampton Water).
pub const DEFAULT_REFERENCE_LAT: f64 = 50.88;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalFrame {
    meters_per_degree_lat: f64,
    meters_per_degree_lon: f64,
}

impl LocalFrame {
    /// Scale factors are computed once here and never again.
    pub fn new(reference_lat: f64) -> Self {
        LocalFrame {
            meters_per_degree_lat: METERS_PER_DEGREE_LAT,
            meters_per_degree_lon: METERS_PER_DEGREE_LON_EQUATOR * reference_lat.to_radians().cos(),
        }
    }

    pub fn meters_per_degree_lat(&self) -> f64 {
        self.meters_per_degree_lat
    }

    pub fn meters_per_degree_lon(&self) -> f64 {
        self.meters_per_degree_lon
    }

    /// Displacement from `(lat1, lon1)` to `(lat2, lon2)` as `[north, east]` meters.
    pub fn to_local(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Vector2<f64> {
        Vector2::new(
            (lat2 - lat1) * self.meters_per_degree_lat,
            (lon2 - lon1) * self.meters_per_degree_lon,
        )
    }

    /// Moves a position by `north_m` / `east_m` meters. Returns `(lat, lon)`.
    pub fn offset(&self, lat: f64, lon: f64, north_m: f64, east_m: f64) -> (f64, f64) {
        (
            lat + north_m / self.meters_per_degree_lat,
            lon + east_m / self.meters_per_degree_lon,
        )
    }
}

impl Default for LocalFrame {
    fn default() -> Self {
        LocalFrame::new(DEFAULT_REFERENCE_LAT)
    }
}
