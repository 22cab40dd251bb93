//! Great-circle distance on a spherical Earth.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in decimal degrees.
///
/// Serializes as `{"latitude": .., "longitude": ..}`, the shape used by the
/// places provider for both request centers and result locations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` when both components are finite and inside
    /// `[-90, 90]` / `[-180, 180]`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Haversine distance between `a` and `b`, in meters.
///
/// Range checking is the caller's job; any finite input yields a finite result.
#[must_use]
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lng / 2.0).sin().powi(2);

    // Rounding can push `h` just past 1.0 for antipodal points.
    2.0 * EARTH_RADIUS_M * h.clamp(0.0, 1.0).sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_relative_eq(actual: f64, expected: f64, tolerance: f64) {
        let rel = ((actual - expected) / expected).abs();
        assert!(
            rel <= tolerance,
            "expected {expected}, got {actual} (relative error {rel})"
        );
    }

    #[test]
    fn same_point_is_zero() {
        for c in [
            Coordinate::new(12.34, 56.78),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(-90.0, 180.0),
            Coordinate::new(49.2827, -123.1207),
        ] {
            assert_eq!(haversine_distance(c, c), 0.0, "{c:?}");
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (Coordinate::new(12.34, 56.78), Coordinate::new(12.3401, 56.7801)),
            (Coordinate::new(49.2827, -123.1207), Coordinate::new(47.6062, -122.3321)),
            (Coordinate::new(-33.8688, 151.2093), Coordinate::new(51.5074, -0.1278)),
        ];
        for (a, b) in pairs {
            assert_eq!(haversine_distance(a, b), haversine_distance(b, a));
        }
    }

    #[test]
    fn antipodal_points_are_half_circumference_apart() {
        let a = Coordinate::new(12.34, -56.78);
        let b = Coordinate::new(-12.34, 123.22);
        assert_relative_eq(
            haversine_distance(a, b),
            EARTH_RADIUS_M * std::f64::consts::PI,
            1e-6,
        );
    }

    #[test]
    fn poles_are_half_circumference_apart() {
        let north = Coordinate::new(90.0, 0.0);
        let south = Coordinate::new(-90.0, 0.0);
        assert_relative_eq(
            haversine_distance(north, south),
            EARTH_RADIUS_M * std::f64::consts::PI,
            1e-9,
        );
    }

    #[test]
    fn vancouver_to_seattle_is_about_195_km() {
        let vancouver = Coordinate::new(49.2827, -123.1207);
        let seattle = Coordinate::new(47.6062, -122.3321);
        let d = haversine_distance(vancouver, seattle);
        assert!((d - 195_300.0).abs() < 1_000.0, "got {d}");
    }

    #[test]
    fn small_offset_is_roughly_fifteen_meters() {
        let a = Coordinate::new(12.34, 56.78);
        let b = Coordinate::new(12.3401, 56.7801);
        let d = haversine_distance(a, b);
        assert!(d > 10.0 && d < 20.0, "got {d}");
    }

    #[test]
    fn coordinate_validity_bounds() {
        assert!(Coordinate::new(90.0, -180.0).is_valid());
        assert!(Coordinate::new(-90.0, 180.0).is_valid());
        assert!(!Coordinate::new(90.5, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn coordinate_serializes_with_full_field_names() {
        let json = serde_json::to_value(Coordinate::new(12.34, 56.78)).unwrap();
        assert_eq!(json, serde_json::json!({"latitude": 12.34, "longitude": 56.78}));
    }
}
