//! Great-circle distance and bearing between coordinates.
//!
//! Distances use the haversine formula on a sphere of radius 6371 km.
//! None of these functions validate coordinate ranges; callers sanitize
//! input beforehand.

use geo::{HaversineBearing, Point};

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const METERS_PER_DEGREE: f64 = 111_320.0;

pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Haversine distance between two points in kilometers
pub fn distance_km(p1: Point, p2: Point) -> f64 {
    let d_lat = to_radians(p2.y() - p1.y());
    let d_lon = to_radians(p2.x() - p1.x());

    let a = (d_lat / 2.0).sin().powi(2)
        + to_radians(p1.y()).cos() * to_radians(p2.y()).cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair outside [0, 1] for antipodal points
    let a = a.clamp(0.0, 1.0);

    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Haversine distance between two points in meters
pub fn distance_m(p1: Point, p2: Point) -> f64 {
    distance_km(p1, p2) * 1000.0
}

/// Initial bearing (forward azimuth) from `p1` to `p2` in degrees.
///
/// The raw value lies in (-180, 180]; pass it through [`normalize_bearing`]
/// before classifying it.
pub fn bearing(p1: Point, p2: Point) -> f64 {
    p1.haversine_bearing(p2)
}

/// Fold any finite angle into [0, 360)
pub fn normalize_bearing(degrees: f64) -> f64 {
    let normalized = degrees % 360.0;
    let normalized = if normalized < 0.0 { normalized + 360.0 } else { normalized };
    // -1e-15 % 360 + 360 rounds to exactly 360.0
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Shorter arc between two bearings, in [0, 180]
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Convert meters to degrees at equator (for bounding box queries)
pub fn meters_to_degrees_approx(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn valencia() -> Point {
        Point::new(-0.3763, 39.4699)
    }

    #[test]
    fn test_distance_known_pair() {
        // Distance from NYC to LA is approximately 3,936 km
        let nyc = Point::new(-74.0060, 40.7128);
        let la = Point::new(-118.2437, 34.0522);

        let dist = distance_km(nyc, la);
        assert!((dist - 3_936.0).abs() < 50.0); // Within 50km
    }

    #[test]
    fn test_distance_symmetric_and_zero() {
        let a = valencia();
        let b = Point::new(-0.3550, 39.4812);

        assert_abs_diff_eq!(distance_km(a, b), distance_km(b, a), epsilon = 1e-6);
        assert_eq!(distance_km(a, a), 0.0);
        assert!(distance_km(a, b) > 0.0);
    }

    #[test]
    fn test_distance_antipodal_is_finite() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(180.0, 0.0);

        let dist = distance_km(a, b);
        assert!(dist.is_finite());
        assert_abs_diff_eq!(dist, std::f64::consts::PI * EARTH_RADIUS_KM, epsilon = 1e-3);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = Point::new(0.0, 0.0);

        assert_abs_diff_eq!(bearing(origin, Point::new(0.0, 1.0)), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bearing(origin, Point::new(1.0, 0.0)), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(normalize_bearing(bearing(origin, Point::new(0.0, -1.0))), 180.0, epsilon = 1e-9);
        assert_abs_diff_eq!(normalize_bearing(bearing(origin, Point::new(-1.0, 0.0))), 270.0, epsilon = 1e-9);
    }

    #[test]
    fn test_forward_and_reverse_bearing_are_opposite() {
        let a = valencia();
        let b = Point::new(-0.3710, 39.4735);

        let forward = normalize_bearing(bearing(a, b));
        let reverse = normalize_bearing(bearing(b, a));

        assert_abs_diff_eq!(angular_difference(forward, reverse), 180.0, epsilon = 0.01);
    }

    #[test]
    fn test_normalize_bearing() {
        assert_eq!(normalize_bearing(0.0), 0.0);
        assert_eq!(normalize_bearing(-90.0), 270.0);
        assert_eq!(normalize_bearing(360.0), 0.0);
        assert_eq!(normalize_bearing(725.0), 5.0);
        let tiny = normalize_bearing(-1e-15);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_angular_difference_takes_shorter_arc() {
        assert_eq!(angular_difference(10.0, 350.0), 20.0);
        assert_eq!(angular_difference(350.0, 10.0), 20.0);
        assert_eq!(angular_difference(0.0, 180.0), 180.0);
        assert_eq!(angular_difference(90.0, 90.0), 0.0);
    }

    #[test]
    fn test_radian_conversion() {
        assert_abs_diff_eq!(to_radians(180.0), std::f64::consts::PI, epsilon = 1e-12);
        assert_abs_diff_eq!(to_degrees(to_radians(42.5)), 42.5, epsilon = 1e-12);
    }
}
