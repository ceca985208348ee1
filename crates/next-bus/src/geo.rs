//! Great-circle distance between two points using the haversine formula.
//!
//! ```text
//! h = sin²(Δφ/2) + cos φ1 ⋅ cos φ2 ⋅ sin²(Δλ/2)
//! c = 2 ⋅ atan2(√h, √(1−h))
//! d = R ⋅ c
//! ```
//!
//! **Distance is returned in metres.** The result is used to rank stops, not
//! for precise measurement, so the Earth is treated as a sphere.

use serde::{Deserialize, Serialize};

/// Mean radius of the Earth in metres.
pub const EARTH_RADIUS_METRES: f64 = 6_371_000.0;

/// A point on the Earth's surface, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Distance in metres to `other`.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        distance(self, other)
    }
}

/// Haversine distance in metres between `a` and `b`.
///
/// Latitude and longitude are not range-checked: out-of-range values give a
/// finite but meaningless result.
#[must_use]
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // rounding can push `h` a hair outside [0, 1] for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METRES * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const EYRE_SQUARE: Coordinate = Coordinate::new(53.2743, -9.0490);
    const SALTHILL: Coordinate = Coordinate::new(53.2610, -9.0700);

    #[test]
    fn same_point_is_zero() {
        assert!(distance(EYRE_SQUARE, EYRE_SQUARE).abs() < 1e-9);
    }

    #[test]
    fn symmetric() {
        let there = distance(EYRE_SQUARE, SALTHILL);
        let back = distance(SALTHILL, EYRE_SQUARE);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn known_distance_in_metres() {
        // Washington Monument to the White House, roughly 550 m
        let start = Coordinate::new(38.898556, -77.037852);
        let end = Coordinate::new(38.897147, -77.043934);
        let metres = distance(start, end);
        assert!((metres - 549.6).abs() < 1.0, "got {metres}");
    }

    #[test]
    fn antipodal_points() {
        let north = Coordinate::new(90.0, 0.0);
        let south = Coordinate::new(-90.0, 0.0);
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_METRES;
        assert!((distance(north, south) - half_circumference).abs() < 1e-3);
    }

    #[test]
    fn out_of_range_is_finite() {
        let odd = Coordinate::new(270.0, -540.0);
        let metres = distance(odd, EYRE_SQUARE);
        assert!(metres.is_finite());
        assert!(metres >= 0.0);
    }

    #[test]
    fn method_matches_function() {
        assert!((EYRE_SQUARE.distance_to(SALTHILL) - distance(EYRE_SQUARE, SALTHILL)).abs() < 1e-9);
    }
}
