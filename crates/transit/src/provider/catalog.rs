//! In-memory stop catalog with a spatial index.
//!
//! Holds one snapshot of the stop collection, answers lookups and radius
//! queries, and runs the direction engine over its stops.

use std::collections::HashMap;
use std::sync::Arc;

use geo::Point;
use rstar::RTree;
use tracing::warn;

use crate::direction::{compute_route_directions, DirectionConfig, StopDirectionMap};
use crate::identifiers::*;
use crate::models::{stop::Stop, types::*};
use crate::spatial::index::{search_envelopes, StopNode};
use crate::spatial::queries::distance_m;

/// In-memory stop collection with spatial indexing
///
/// This type is cheap to clone since all data is stored in `Arc`s.
#[derive(Clone)]
pub struct StopCatalog {
    stops: Vec<Arc<Stop>>,
    stop_map: HashMap<StopIdentifier, Arc<Stop>>,
    stop_tree: RTree<StopNode>,
}

impl StopCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            stops: Vec::new(),
            stop_map: HashMap::new(),
            stop_tree: RTree::new(),
        }
    }

    /// Build a catalog from loaded stops.
    ///
    /// Stop ids must be unique; later duplicates are dropped with a warning
    /// so one bad record does not reject the whole collection.
    pub fn from_stops(stops: impl IntoIterator<Item = Stop>) -> Self {
        let mut kept = Vec::new();
        let mut stop_map = HashMap::new();

        for stop in stops {
            if stop_map.contains_key(&stop.id) {
                warn!(stop_id = %stop.id, "duplicate stop id, keeping first occurrence");
                continue;
            }
            let stop = Arc::new(stop);
            stop_map.insert(stop.id.clone(), stop.clone());
            kept.push(stop);
        }

        let stop_tree = RTree::bulk_load(kept.iter().cloned().map(StopNode::new).collect());

        Self {
            stops: kept,
            stop_map,
            stop_tree,
        }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn get_stop(&self, id: &StopIdentifier) -> Result<Arc<Stop>> {
        self.stop_map
            .get(id)
            .cloned()
            .ok_or_else(|| TransitError::StopNotFound(id.clone()))
    }

    /// Stops in load order
    pub fn all_stops(&self) -> &[Arc<Stop>] {
        &self.stops
    }

    /// Stops within `radius_m` of `point`, closest first, with distances in meters
    pub fn stops_near(&self, point: Point, radius_m: f64) -> Vec<(Arc<Stop>, f64)> {
        // Validate radius is positive
        if radius_m <= 0.0 || !radius_m.is_finite() {
            return Vec::new();
        }

        let mut found: Vec<_> = search_envelopes(point, radius_m)
            .iter()
            .flat_map(|envelope| self.stop_tree.locate_in_envelope(envelope))
            .map(|node| (node.stop.clone(), distance_m(point, node.stop.location)))
            .filter(|(_, distance)| *distance <= radius_m)
            .collect();

        found.sort_by(|(a, da), (b, db)| da.total_cmp(db).then_with(|| a.id.cmp(&b.id)));
        found
    }

    /// The `n` closest stops to `point`, optionally limited to `radius_m`
    ///
    /// Without a radius the `n` tree neighbors (planar degree order) bound
    /// the search, which is then rerun as an exact haversine radius query.
    pub fn nearest_stops(&self, point: Point, radius_m: Option<f64>, n: usize) -> Vec<(Arc<Stop>, f64)> {
        let radius_m = match radius_m {
            Some(radius_m) => radius_m,
            None => {
                let farthest = self
                    .stop_tree
                    .nearest_neighbor_iter(&[point.x(), point.y()])
                    .take(n)
                    .map(|node| distance_m(point, node.stop.location))
                    .fold(None, |max: Option<f64>, d| Some(max.map_or(d, |m| m.max(d))));

                match farthest {
                    // 1 m of slack keeps the bounding stops inside the exact filter
                    Some(farthest) => farthest + 1.0,
                    None => return Vec::new(),
                }
            }
        };

        let mut found = self.stops_near(point, radius_m);
        found.truncate(n);
        found
    }

    /// Run the direction engine over every stop in the catalog
    pub fn directions(&self, config: &DirectionConfig) -> StopDirectionMap {
        compute_route_directions(self.stops.iter().map(|stop| stop.as_ref()), config)
    }
}

impl Default for StopCatalog {
    fn default() -> Self {
        Self::new()
    }
}
