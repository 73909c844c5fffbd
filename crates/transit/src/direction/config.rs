//! Tuning for the direction engine.

use geo::Point;

use crate::models::types::{Result, TransitError};

/// Neighbors closer than this are treated as the same stop
pub const DEFAULT_MIN_DISTANCE_M: f64 = 30.0;
/// Neighbors farther than this are not the next stop on the line
pub const DEFAULT_MAX_DISTANCE_M: f64 = 600.0;
/// Plaça de l'Ajuntament, Valencia
pub const DEFAULT_CENTER_LAT: f64 = 39.4699;
pub const DEFAULT_CENTER_LON: f64 = -0.3763;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionConfig {
    pub min_distance_m: f64,
    pub max_distance_m: f64,
    /// Reference point for toward/away classification (x = lon, y = lat)
    pub center: Point,
}

impl DirectionConfig {
    pub fn new(min_distance_m: f64, max_distance_m: f64, center: Point) -> Result<Self> {
        if !min_distance_m.is_finite() || !max_distance_m.is_finite() {
            return Err(TransitError::InvalidConfig(format!(
                "distance window must be finite, got {min_distance_m}..{max_distance_m}"
            )));
        }

        if min_distance_m < 0.0 || min_distance_m >= max_distance_m {
            return Err(TransitError::InvalidConfig(format!(
                "expected 0 <= min < max, got {min_distance_m}..{max_distance_m}"
            )));
        }

        if !(-90.0..=90.0).contains(&center.y()) || !(-180.0..=180.0).contains(&center.x()) {
            return Err(TransitError::InvalidConfig(format!(
                "center out of range: lat {}, lon {}",
                center.y(),
                center.x()
            )));
        }

        Ok(Self {
            min_distance_m,
            max_distance_m,
            center,
        })
    }

    /// Builder-style override of the reference center
    pub fn with_center(self, lat: f64, lon: f64) -> Result<Self> {
        Self::new(self.min_distance_m, self.max_distance_m, Point::new(lon, lat))
    }

    /// `min < distance <= max`
    pub fn within_window(&self, distance_m: f64) -> bool {
        distance_m > self.min_distance_m && distance_m <= self.max_distance_m
    }
}

impl Default for DirectionConfig {
    fn default() -> Self {
        Self {
            min_distance_m: DEFAULT_MIN_DISTANCE_M,
            max_distance_m: DEFAULT_MAX_DISTANCE_M,
            center: Point::new(DEFAULT_CENTER_LON, DEFAULT_CENTER_LAT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let config = DirectionConfig::default();

        assert!(!config.within_window(29.0));
        assert!(!config.within_window(30.0));
        assert!(config.within_window(31.0));
        assert!(config.within_window(599.0));
        assert!(config.within_window(600.0));
        assert!(!config.within_window(601.0));
    }

    #[test]
    fn test_rejects_invalid_window() {
        let center = Point::new(0.0, 0.0);

        assert!(DirectionConfig::new(600.0, 30.0, center).is_err());
        assert!(DirectionConfig::new(30.0, 30.0, center).is_err());
        assert!(DirectionConfig::new(-1.0, 30.0, center).is_err());
        assert!(DirectionConfig::new(0.0, f64::INFINITY, center).is_err());
        assert!(DirectionConfig::new(f64::NAN, 10.0, center).is_err());
        assert!(DirectionConfig::new(0.0, 10.0, center).is_ok());
    }

    #[test]
    fn test_rejects_center_out_of_range() {
        let config = DirectionConfig::default();

        assert!(matches!(
            config.with_center(91.0, 0.0),
            Err(TransitError::InvalidConfig(_))
        ));
        assert!(config.with_center(48.8566, 2.3522).is_ok());
    }
}
