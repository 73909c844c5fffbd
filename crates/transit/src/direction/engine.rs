//! Next-stop inference per line and head sign.
//!
//! Stops serving the same line toward the same head sign are assumed to lie
//! along one path. Each stop's nearest such peer inside the configured
//! distance window is taken as the next stop in that direction.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::direction::center::{self, CenterRelation};
use crate::direction::compass::{self, CompassSector};
use crate::direction::config::DirectionConfig;
use crate::identifiers::*;
use crate::models::stop::{DirectionKey, RouteMembership, Stop};
use crate::spatial::queries::{bearing, distance_m, normalize_bearing};

/// One inferred "next stop" for a stop and one of its line/head sign pairs
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DirectionRecord {
    pub stop_id: StopIdentifier,
    pub line_id: LineIdentifier,
    pub line_short_name: Arc<str>,
    pub line_long_name: Arc<str>,
    pub head_sign: Arc<str>,
    pub neighbor_stop_id: StopIdentifier,
    pub neighbor_name: Arc<str>,
    pub distance_m: u32,
    /// Degrees in [0, 360), 0 = north
    pub bearing: f64,
    pub compass: CompassSector,
    pub compass_label: String,
    pub relation_to_center: CenterRelation,
}

impl DirectionRecord {
    pub fn arrow(&self) -> &'static str {
        self.compass.arrow
    }
}

/// Direction records keyed by source stop
pub type StopDirectionMap = BTreeMap<StopIdentifier, Vec<DirectionRecord>>;

#[derive(Clone, Copy)]
struct GroupEntry<'a> {
    stop: &'a Stop,
    route: &'a RouteMembership,
}

/// Bucket every (stop, route) pair by line and normalized head sign.
///
/// A stop listing the same line and head sign twice is kept once.
fn group_by_direction<'a>(
    stops: impl IntoIterator<Item = &'a Stop>,
) -> BTreeMap<DirectionKey, Vec<GroupEntry<'a>>> {
    let mut groups: BTreeMap<DirectionKey, Vec<GroupEntry<'a>>> = BTreeMap::new();
    let mut seen: HashSet<(DirectionKey, &'a StopIdentifier)> = HashSet::new();

    for stop in stops {
        for route in &stop.routes {
            let Some(key) = route.direction_key() else {
                continue;
            };
            if !seen.insert((key.clone(), &stop.id)) {
                continue;
            }
            groups.entry(key).or_default().push(GroupEntry { stop, route });
        }
    }

    groups
}

/// Nearest candidate inside the distance window, with its distance in meters.
///
/// The source itself (by id) is skipped. Equal distances resolve to the
/// smaller stop id so the result does not depend on candidate order.
pub fn find_closest_neighbor<'a>(
    source: &Stop,
    candidates: impl IntoIterator<Item = &'a Stop>,
    config: &DirectionConfig,
) -> Option<(&'a Stop, f64)> {
    let mut best: Option<(&'a Stop, f64)> = None;

    for candidate in candidates {
        if candidate.id == source.id {
            continue;
        }

        let distance = distance_m(source.location, candidate.location);
        if !config.within_window(distance) {
            continue;
        }

        let closer = match best {
            None => true,
            Some((current, current_distance)) => {
                distance < current_distance
                    || (distance == current_distance && candidate.id < current.id)
            }
        };
        if closer {
            best = Some((candidate, distance));
        }
    }

    best
}

fn build_record(
    source: GroupEntry<'_>,
    line_id: &LineIdentifier,
    neighbor: &Stop,
    distance: f64,
    config: &DirectionConfig,
) -> DirectionRecord {
    let travel_bearing = normalize_bearing(bearing(source.stop.location, neighbor.location));

    DirectionRecord {
        stop_id: source.stop.id.clone(),
        line_id: line_id.clone(),
        line_short_name: source.route.display_short_name().into(),
        line_long_name: source.route.display_long_name().into(),
        head_sign: source.route.head_sign().unwrap_or_default().into(),
        neighbor_stop_id: neighbor.id.clone(),
        neighbor_name: neighbor.name.clone(),
        distance_m: distance.round() as u32,
        bearing: travel_bearing,
        compass: compass::classify(travel_bearing),
        compass_label: compass::compass_label(travel_bearing),
        relation_to_center: center::classify(source.stop.location, travel_bearing, config.center),
    }
}

/// Infer the next stop for every stop and every line/head sign it serves.
///
/// Stops without a qualifying neighbor are absent from the result. The
/// computation is a pure function of its input.
pub fn compute_route_directions<'a>(
    stops: impl IntoIterator<Item = &'a Stop>,
    config: &DirectionConfig,
) -> StopDirectionMap {
    let groups = group_by_direction(stops);
    let mut result = StopDirectionMap::new();
    let mut record_count = 0usize;

    for (key, entries) in &groups {
        for source in entries {
            let candidates = entries.iter().map(|entry| entry.stop);
            let Some((neighbor, distance)) = find_closest_neighbor(source.stop, candidates, config)
            else {
                continue;
            };

            let record = build_record(*source, &key.line_id, neighbor, distance, config);
            result.entry(source.stop.id.clone()).or_default().push(record);
            record_count += 1;
        }
    }

    debug!(
        groups = groups.len(),
        stops = result.len(),
        records = record_count,
        "computed route directions"
    );

    result
}
