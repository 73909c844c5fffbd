//! Stop catalog loading.
//!
//! Accepts the `stopsInExtent` payload either as XML or as its JSON
//! rendition. Bad coordinates coerce to 0.0 and records without an id are
//! skipped, so one broken stop never rejects the whole file.

use anyhow::{Context, Result};
use headsign_transit::prelude::*;
use roxmltree::{Document, Node};
use serde::Deserialize;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Xml,
    Json,
}

impl InputFormat {
    /// Guess from the file extension, then from the first non-blank byte
    pub fn detect(path: &Path, contents: &str) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase) {
            Some(ext) if ext == "xml" => Self::Xml,
            Some(ext) if ext == "json" => Self::Json,
            _ if contents.trim_start().starts_with('<') => Self::Xml,
            _ => Self::Json,
        }
    }
}

/// Scalar value that may arrive as text or as a JSON number
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Scalar {
    fn text(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
        }
    }

    fn number(&self) -> Option<f64> {
        match self {
            Self::Text(s) => s.trim().parse().ok(),
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawRoute {
    #[serde(rename = "headSign")]
    head_sign: Option<Scalar>,
    id_linea: Option<Scalar>,
    #[serde(rename = "LN")]
    long_name: Option<Scalar>,
    #[serde(rename = "SN")]
    short_name: Option<Scalar>,
    #[serde(rename = "type")]
    route_type: Option<Scalar>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawStop {
    lat: Option<Scalar>,
    lon: Option<Scalar>,
    name: Option<Scalar>,
    #[serde(rename = "stopId")]
    stop_id: Option<Scalar>,
    ubica: Option<Scalar>,
    #[serde(skip)]
    routes: Vec<RawRoute>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

#[derive(Deserialize)]
struct RawRoutes {
    #[serde(rename = "rtI")]
    rt_i: Option<OneOrMany<RawRoute>>,
}

fn text_of(value: &Option<Scalar>) -> String {
    value.as_ref().map(Scalar::text).unwrap_or_default()
}

fn coordinate(value: &Option<Scalar>, limit: f64, field: &str, stop_id: &str) -> f64 {
    match value.as_ref().and_then(Scalar::number) {
        Some(v) if v.is_finite() && v.abs() <= limit => v,
        _ => {
            log::warn!("Stop {}: invalid {} {:?}, using 0", stop_id, field, value);
            0.0
        }
    }
}

impl RawRoute {
    fn into_membership(self) -> RouteMembership {
        let line_id = text_of(&self.id_linea);
        let head_sign = text_of(&self.head_sign);

        RouteMembership {
            line_id: (!line_id.is_empty()).then(|| LineIdentifier::new(line_id)),
            short_name: text_of(&self.short_name).into(),
            long_name: text_of(&self.long_name).into(),
            head_sign: (!head_sign.is_empty()).then(|| head_sign.into()),
            route_type: text_of(&self.route_type).into(),
        }
    }
}

impl RawStop {
    fn into_stop(self) -> Option<Stop> {
        let id = text_of(&self.stop_id);
        if id.is_empty() {
            log::warn!("Skipping stop without id (name {:?})", text_of(&self.name));
            return None;
        }

        let lat = coordinate(&self.lat, 90.0, "latitude", &id);
        let lon = coordinate(&self.lon, 180.0, "longitude", &id);

        let mut stop = Stop::new(id, lat, lon, text_of(&self.name));
        stop.location_description = text_of(&self.ubica).into();
        stop.routes = self.routes.into_iter().map(RawRoute::into_membership).collect();
        Some(stop)
    }
}

/// Read and parse a stop catalog file
pub fn load_stops(path: &Path, format: Option<InputFormat>) -> Result<Vec<Stop>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let format = format.unwrap_or_else(|| InputFormat::detect(path, &contents));
    log::debug!("Parsing {} as {:?}", path.display(), format);

    match format {
        InputFormat::Xml => parse_xml(&contents),
        InputFormat::Json => parse_json(&contents),
    }
}

fn child_scalar(node: Node, tag: &str) -> Option<Scalar> {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .map(|text| Scalar::Text(text.trim().to_string()))
}

/// Parse the `stopsInExtent` XML document
pub fn parse_xml(xml: &str) -> Result<Vec<Stop>> {
    let doc = Document::parse(xml).context("Failed to parse stop catalog XML")?;

    let stops = doc
        .descendants()
        .filter(|n| n.has_tag_name("stop"))
        .filter_map(|stop_node| {
            let routes = stop_node
                .children()
                .filter(|n| n.has_tag_name("routes"))
                .flat_map(|routes| routes.descendants().filter(|n| n.has_tag_name("rtI")))
                .map(|rt| RawRoute {
                    head_sign: child_scalar(rt, "headSign"),
                    id_linea: child_scalar(rt, "id_linea"),
                    long_name: child_scalar(rt, "LN"),
                    short_name: child_scalar(rt, "SN"),
                    route_type: child_scalar(rt, "type"),
                })
                .collect();

            RawStop {
                lat: child_scalar(stop_node, "lat"),
                lon: child_scalar(stop_node, "lon"),
                name: child_scalar(stop_node, "name"),
                stop_id: child_scalar(stop_node, "stopId"),
                ubica: child_scalar(stop_node, "ubica"),
                routes,
            }
            .into_stop()
        })
        .collect::<Vec<_>>();

    log::info!("Parsed {} stops from XML", stops.len());
    Ok(stops)
}

fn raw_stop_from_json(value: serde_json::Value) -> Option<RawStop> {
    let routes_value = value.get("routes").cloned();

    let mut raw: RawStop = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(err) => {
            log::warn!("Skipping malformed stop record: {}", err);
            return None;
        }
    };

    raw.routes = match routes_value {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(routes) => match serde_json::from_value::<RawRoutes>(routes) {
            Ok(RawRoutes { rt_i }) => rt_i.map(OneOrMany::into_vec).unwrap_or_default(),
            Err(err) => {
                log::warn!("Stop {}: unreadable routes ({}), ignoring", text_of(&raw.stop_id), err);
                Vec::new()
            }
        },
    };

    Some(raw)
}

/// Parse the JSON rendition: `{"stop": [...]}`, where `routes.rtI` may be
/// one object or an array
pub fn parse_json(json: &str) -> Result<Vec<Stop>> {
    let root: serde_json::Value =
        serde_json::from_str(json).context("Failed to parse stop catalog JSON")?;

    let records = match root.get("stop").cloned() {
        Some(serde_json::Value::Array(items)) => items,
        Some(item @ serde_json::Value::Object(_)) => vec![item],
        _ => {
            log::warn!("Catalog JSON has no \"stop\" list");
            Vec::new()
        }
    };

    let stops = records
        .into_iter()
        .filter_map(raw_stop_from_json)
        .filter_map(RawStop::into_stop)
        .collect::<Vec<_>>();

    log::info!("Parsed {} stops from JSON", stops.len());
    Ok(stops)
}
