use std::collections::HashSet;

use headsign_transit::prelude::*;
use headsign_transit::spatial::{distance_m, normalize_bearing};

// One meter of latitude on a 6371 km sphere
const DEG_PER_M: f64 = 1.0 / 111_194.93;

fn line_7(head_sign: &str) -> RouteMembership {
    RouteMembership::new("7", head_sign).with_names("7", "Marxalenes - Torrefiel")
}

/// Three stops on one meridian: south end, middle (180 m north), north end
/// (another 220 m north)
fn corridor() -> Vec<Stop> {
    let base_lat = 39.48;
    let lon = -0.38;
    vec![
        Stop::new("south", base_lat, lon, "Sud").with_route(line_7("Torrefiel")),
        Stop::new("middle", base_lat + 180.0 * DEG_PER_M, lon, "Mig").with_route(line_7("Torrefiel")),
        Stop::new("north", base_lat + 400.0 * DEG_PER_M, lon, "Nord").with_route(line_7("Torrefiel")),
    ]
}

#[test]
fn middle_stop_picks_the_closer_end() {
    let stops = corridor();
    let directions = compute_route_directions(&stops, &DirectionConfig::default());

    let middle = &directions[&StopIdentifier::new("middle")];
    assert_eq!(middle.len(), 1);

    let record = &middle[0];
    assert_eq!(record.neighbor_stop_id.as_str(), "south");
    let expected = distance_m(stops[1].location, stops[0].location).round() as u32;
    assert_eq!(record.distance_m, expected);
    assert!((179..=181).contains(&record.distance_m));
    assert_eq!(record.compass.label, "S");
    assert_eq!(record.line_id.as_str(), "7");
    assert_eq!(record.head_sign.as_ref(), "Torrefiel");
}

#[test]
fn ends_point_at_the_middle() {
    let directions = compute_route_directions(&corridor(), &DirectionConfig::default());

    let south = &directions[&StopIdentifier::new("south")][0];
    let north = &directions[&StopIdentifier::new("north")][0];

    assert_eq!(south.neighbor_stop_id.as_str(), "middle");
    assert_eq!(south.compass.label, "N");
    assert_eq!(north.neighbor_stop_id.as_str(), "middle");
    assert_eq!(north.compass.label, "S");
}

#[test]
fn bearings_are_normalized() {
    let directions = compute_route_directions(&corridor(), &DirectionConfig::default());

    for record in directions.values().flatten() {
        assert!((0.0..360.0).contains(&record.bearing));
        assert_eq!(record.bearing, normalize_bearing(record.bearing));
    }
}

#[test]
fn center_relation_follows_the_configured_center() {
    let stops = corridor();
    // Center far to the north: south -> middle travels toward it
    let north_center = DirectionConfig::default().with_center(40.0, -0.38).unwrap();
    let directions = compute_route_directions(&stops, &north_center);
    assert_eq!(
        directions[&StopIdentifier::new("south")][0].relation_to_center,
        CenterRelation::Toward
    );
    assert_eq!(
        directions[&StopIdentifier::new("north")][0].relation_to_center,
        CenterRelation::Away
    );

    // Center far to the east: north-south travel is tangential
    let east_center = DirectionConfig::default().with_center(39.48, 0.5).unwrap();
    let directions = compute_route_directions(&stops, &east_center);
    assert_eq!(
        directions[&StopIdentifier::new("middle")][0].relation_to_center,
        CenterRelation::Along
    );
}

#[test]
fn stops_without_membership_produce_nothing() {
    let mut stops = corridor();
    stops.push(Stop::new("bare", 39.48 + 100.0 * DEG_PER_M, -0.38, "Sense línia"));
    stops.push(
        Stop::new("no-head-sign", 39.48 + 300.0 * DEG_PER_M, -0.38, "Sense destí")
            .with_route(line_7("  ")),
    );

    let directions = compute_route_directions(&stops, &DirectionConfig::default());

    assert!(!directions.contains_key(&StopIdentifier::new("bare")));
    assert!(!directions.contains_key(&StopIdentifier::new("no-head-sign")));
    for record in directions.values().flatten() {
        assert_ne!(record.neighbor_stop_id.as_str(), "bare");
        assert_ne!(record.neighbor_stop_id.as_str(), "no-head-sign");
    }
}

#[test]
fn opposite_head_signs_do_not_mix() {
    let mut stops = corridor();
    // Return direction stop right next to the middle stop
    stops.push(
        Stop::new("middle-return", 39.48 + 220.0 * DEG_PER_M, -0.38, "Mig (tornada)")
            .with_route(line_7("Marxalenes")),
    );

    let directions = compute_route_directions(&stops, &DirectionConfig::default());

    assert_eq!(
        directions[&StopIdentifier::new("middle")][0].neighbor_stop_id.as_str(),
        "south"
    );
    assert!(!directions.contains_key(&StopIdentifier::new("middle-return")));
}

#[test]
fn repeated_runs_are_identical() {
    let stops = corridor();
    let config = DirectionConfig::default();

    let first = compute_route_directions(&stops, &config);
    let second = compute_route_directions(&stops, &config);
    assert_eq!(first, second);
}

#[test]
fn input_order_does_not_change_output() {
    let stops = corridor();
    let mut reversed = stops.clone();
    reversed.reverse();
    let config = DirectionConfig::default();

    let forward = compute_route_directions(&stops, &config);
    let backward = compute_route_directions(&reversed, &config);

    let as_set = |map: &StopDirectionMap| -> HashSet<(String, String, u32)> {
        map.values()
            .flatten()
            .map(|r| (r.stop_id.to_string(), r.neighbor_stop_id.to_string(), r.distance_m))
            .collect()
    };
    assert_eq!(as_set(&forward), as_set(&backward));
}
