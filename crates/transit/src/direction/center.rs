//! Travel direction relative to a reference center point.

use std::fmt;

use geo::Point;

use crate::spatial::queries::{angular_difference, bearing, normalize_bearing};

/// Travel within this many degrees of the center bearing heads toward it
pub const TOWARD_MAX_DIFFERENCE: f64 = 45.0;
/// Travel at least this many degrees off the center bearing heads away
pub const AWAY_MIN_DIFFERENCE: f64 = 135.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CenterRelation {
    Toward,
    Away,
    Along,
}

impl CenterRelation {
    /// Bucket an angular difference in [0, 180]
    pub fn from_difference(difference: f64) -> Self {
        if difference <= TOWARD_MAX_DIFFERENCE {
            Self::Toward
        } else if difference >= AWAY_MIN_DIFFERENCE {
            Self::Away
        } else {
            Self::Along
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Toward => "toward center",
            Self::Away => "away from center",
            Self::Along => "along",
        }
    }
}

impl fmt::Display for CenterRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify travel from `source` along `travel_bearing` against `center`
pub fn classify(source: Point, travel_bearing: f64, center: Point) -> CenterRelation {
    let to_center = normalize_bearing(bearing(source, center));
    CenterRelation::from_difference(angular_difference(travel_bearing, to_center))
}
