//! Compass sector classification.
//!
//! The circle is split into eight 45° sectors centered on the compass
//! points. North is the only sector whose start exceeds its end; it wraps
//! through 0°.

use crate::spatial::queries::normalize_bearing;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompassSector {
    pub label: &'static str,
    pub arrow: &'static str,
    #[cfg_attr(feature = "serde", serde(skip))]
    start: u16,
    #[cfg_attr(feature = "serde", serde(skip))]
    end: u16,
}

// Bounds are stored in tenths of a degree so the table stays exact.
const fn sector(label: &'static str, arrow: &'static str, start: u16, end: u16) -> CompassSector {
    CompassSector { label, arrow, start, end }
}

pub const NORTH: CompassSector = sector("N", "↑", 3375, 225);
pub const NORTH_EAST: CompassSector = sector("NE", "↗", 225, 675);
pub const EAST: CompassSector = sector("E", "→", 675, 1125);
pub const SOUTH_EAST: CompassSector = sector("SE", "↘", 1125, 1575);
pub const SOUTH: CompassSector = sector("S", "↓", 1575, 2025);
pub const SOUTH_WEST: CompassSector = sector("SW", "↙", 2025, 2475);
pub const WEST: CompassSector = sector("W", "←", 2475, 2925);
pub const NORTH_WEST: CompassSector = sector("NW", "↖", 2925, 3375);

pub const SECTORS: [CompassSector; 8] = [
    NORTH, NORTH_EAST, EAST, SOUTH_EAST, SOUTH, SOUTH_WEST, WEST, NORTH_WEST,
];

impl CompassSector {
    pub fn start(&self) -> f64 {
        f64::from(self.start) / 10.0
    }

    pub fn end(&self) -> f64 {
        f64::from(self.end) / 10.0
    }

    /// Whether a normalized bearing falls in `[start, end)`
    pub fn contains(&self, bearing: f64) -> bool {
        let (start, end) = (self.start(), self.end());
        if start > end {
            bearing >= start || bearing < end
        } else {
            bearing >= start && bearing < end
        }
    }
}

/// Sector containing `bearing`. Non-finite input falls back to north.
pub fn classify(bearing: f64) -> CompassSector {
    let bearing = normalize_bearing(bearing);
    SECTORS
        .iter()
        .copied()
        .find(|sector| sector.contains(bearing))
        .unwrap_or(NORTH)
}

/// Rounded whole-degree bearing; 359.5 and above show as 0
pub fn rounded_degrees(bearing: f64) -> u16 {
    let rounded = normalize_bearing(bearing).round();
    if rounded >= 360.0 || !rounded.is_finite() {
        0
    } else {
        rounded as u16
    }
}

/// Label such as `"N · 14°"`
pub fn compass_label(bearing: f64) -> String {
    format!("{} · {}°", classify(bearing).label, rounded_degrees(bearing))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_north_wraparound() {
        assert_eq!(classify(337.5), NORTH);
        assert_eq!(classify(0.0), NORTH);
        assert_eq!(classify(22.49), NORTH);
        assert_eq!(classify(359.999), NORTH);
        assert_eq!(classify(22.5), NORTH_EAST);
        assert_eq!(classify(337.49), NORTH_WEST);
    }

    #[test]
    fn test_each_sector_boundary() {
        let expected = [
            (67.5, EAST),
            (112.5, SOUTH_EAST),
            (157.5, SOUTH),
            (180.0, SOUTH),
            (202.5, SOUTH_WEST),
            (247.5, WEST),
            (292.5, NORTH_WEST),
        ];
        for (bearing, sector) in expected {
            assert_eq!(classify(bearing), sector, "bearing {bearing}");
        }
    }

    #[test]
    fn test_classification_is_exhaustive() {
        let mut bearing = 0.0;
        while bearing < 360.0 {
            let matching = SECTORS.iter().filter(|s| s.contains(bearing)).count();
            assert_eq!(matching, 1, "bearing {bearing} matched {matching} sectors");
            bearing += 0.25;
        }
    }

    #[test]
    fn test_unnormalized_input() {
        assert_eq!(classify(-90.0), WEST);
        assert_eq!(classify(450.0), EAST);
        assert_eq!(classify(f64::NAN), NORTH);
    }

    #[test]
    fn test_compass_label() {
        assert_eq!(compass_label(14.2), "N · 14°");
        assert_eq!(compass_label(135.0), "SE · 135°");
    }

    #[test]
    fn test_compass_label_wraps_360_to_zero() {
        // Plain rounding would print "N · 360°"; labels stay in 0..=359
        assert_eq!(compass_label(359.5), "N · 0°");
        assert_eq!(compass_label(359.7), "N · 0°");
        assert_eq!(compass_label(359.4), "N · 359°");
    }
}
