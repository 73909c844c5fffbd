use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use headsign_transit::prelude::*;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Open the output file, or stdout when no path is given
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(std::io::BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

/// Pretty-printed JSON followed by a newline
pub fn write_json<T: Serialize>(value: &T, mut writer: impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value).context("Failed to serialize JSON")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn record_to_feature(record: &DirectionRecord, from: &Stop, to: &Stop) -> Feature {
    let line = Value::LineString(vec![
        vec![from.lon(), from.lat()],
        vec![to.lon(), to.lat()],
    ]);

    let mut properties = serde_json::Map::new();
    properties.insert("stop_id".to_string(), serde_json::json!(record.stop_id.as_str()));
    properties.insert("line_id".to_string(), serde_json::json!(record.line_id.as_str()));
    properties.insert("line_short_name".to_string(), serde_json::json!(record.line_short_name.as_ref()));
    properties.insert("head_sign".to_string(), serde_json::json!(record.head_sign.as_ref()));
    properties.insert("neighbor_stop_id".to_string(), serde_json::json!(record.neighbor_stop_id.as_str()));
    properties.insert("distance_m".to_string(), serde_json::json!(record.distance_m));
    properties.insert("bearing".to_string(), serde_json::json!(record.bearing));
    properties.insert("compass_label".to_string(), serde_json::json!(record.compass_label));
    properties.insert("arrow".to_string(), serde_json::json!(record.arrow()));
    properties.insert("relation_to_center".to_string(), serde_json::json!(record.relation_to_center.label()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(line)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// One `LineString` feature per record, from the stop to its neighbor
pub fn directions_to_geojson(directions: &StopDirectionMap, catalog: &StopCatalog) -> Result<GeoJson> {
    let mut features = Vec::new();

    for record in directions.values().flatten() {
        let from = catalog.get_stop(&record.stop_id)?;
        let to = catalog.get_stop(&record.neighbor_stop_id)?;
        features.push(record_to_feature(record, &from, &to));
    }

    Ok(GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }))
}

#[derive(Debug, Serialize)]
pub struct NearbyStop {
    pub stop_id: StopIdentifier,
    pub name: Arc<str>,
    pub location_description: Arc<str>,
    pub distance_m: u32,
    pub lines: Vec<String>,
}

impl NearbyStop {
    pub fn new(stop: &Stop, distance_m: f64) -> Self {
        let mut lines: Vec<String> = stop
            .routes
            .iter()
            .map(|route| route.display_short_name().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        lines.sort();
        lines.dedup();

        Self {
            stop_id: stop.id.clone(),
            name: stop.name.clone(),
            location_description: stop.location_description.clone(),
            distance_m: distance_m.round() as u32,
            lines,
        }
    }
}
