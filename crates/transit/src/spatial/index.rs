//! R-tree nodes for spatial indexing.
//!
//! Wraps stops with their lon/lat position for radius queries.
//!
//! ## Two-Stage Filtering
//!
//! Radius queries use a two-stage filtering approach:
//! 1. **R-tree filter**: envelope lookup in degree space, sized generously
//!    so no stop within the radius is missed
//! 2. **Haversine filter**: exact great-circle distance on the survivors
//!
//! Longitude degrees shrink with latitude, so the envelope widens by
//! `1 / cos(lat)` and covers every longitude close to the poles. A search
//! window crossing ±180° is split into one envelope per side.

use std::sync::Arc;

use geo::Point;
use rstar::{PointDistance, RTreeObject, AABB};

use crate::models::stop::Stop;
use crate::spatial::queries::meters_to_degrees_approx;

#[derive(Clone, Debug)]
pub struct StopNode {
    pub stop: Arc<Stop>,
    point: [f64; 2],
}

impl StopNode {
    pub fn new(stop: Arc<Stop>) -> Self {
        let point = [stop.location.x(), stop.location.y()];
        Self { stop, point }
    }
}

impl RTreeObject for StopNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Degree-space envelopes jointly containing every point within `radius_m`
/// of `center`
pub fn search_envelopes(center: Point, radius_m: f64) -> Vec<AABB<[f64; 2]>> {
    // 10% slack over the equatorial conversion
    let d_lat = meters_to_degrees_approx(radius_m) * 1.1;
    let cos_lat = (center.y().abs() + d_lat).min(90.0).to_radians().cos();
    let (min_lat, max_lat) = (center.y() - d_lat, center.y() + d_lat);

    let d_lon = if cos_lat > 1e-6 { d_lat / cos_lat } else { 180.0 };
    if d_lon >= 180.0 {
        return vec![AABB::from_corners([-180.0, min_lat], [180.0, max_lat])];
    }

    let (min_lon, max_lon) = (center.x() - d_lon, center.x() + d_lon);
    let mut envelopes = vec![AABB::from_corners(
        [min_lon.max(-180.0), min_lat],
        [max_lon.min(180.0), max_lat],
    )];

    // Wrap the overhang across the antimeridian
    if min_lon < -180.0 {
        envelopes.push(AABB::from_corners([min_lon + 360.0, min_lat], [180.0, max_lat]));
    }
    if max_lon > 180.0 {
        envelopes.push(AABB::from_corners([-180.0, min_lat], [max_lon - 360.0, max_lat]));
    }

    envelopes
}
