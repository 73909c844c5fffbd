//! Stops and the lines serving them.

use std::sync::Arc;

use geo::Point;

use crate::identifiers::*;
use crate::models::types::RouteType;

/// A boarding location with the lines that serve it
#[derive(Clone, Debug)]
pub struct Stop {
    pub id: StopIdentifier,
    /// x = longitude, y = latitude (decimal degrees)
    pub location: Point,
    pub name: Arc<str>,
    /// Free-text description of where the stop is (street, corner)
    pub location_description: Arc<str>,
    pub routes: Vec<RouteMembership>,
}

impl Stop {
    pub fn new(id: impl Into<StopIdentifier>, lat: f64, lon: f64, name: impl AsRef<str>) -> Self {
        Self {
            id: id.into(),
            location: Point::new(lon, lat),
            name: name.as_ref().into(),
            location_description: "".into(),
            routes: Vec::new(),
        }
    }

    pub fn with_route(mut self, route: RouteMembership) -> Self {
        self.routes.push(route);
        self
    }

    pub fn lat(&self) -> f64 {
        self.location.y()
    }

    pub fn lon(&self) -> f64 {
        self.location.x()
    }
}

/// Key shared by all stops served by the same line in the same direction
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirectionKey {
    pub line_id: LineIdentifier,
    /// Trimmed and lower-cased head sign
    pub head_sign: String,
}

/// One line (in one direction) serving a stop.
///
/// The same line may appear several times on a stop with different head
/// signs when it runs both ways.
#[derive(Clone, Debug)]
pub struct RouteMembership {
    pub line_id: Option<LineIdentifier>,
    pub short_name: Arc<str>,
    pub long_name: Arc<str>,
    pub head_sign: Option<Arc<str>>,
    /// Raw route type tag as delivered by the catalog
    pub route_type: Arc<str>,
}

impl Default for RouteMembership {
    fn default() -> Self {
        Self {
            line_id: None,
            short_name: "".into(),
            long_name: "".into(),
            head_sign: None,
            route_type: "".into(),
        }
    }
}

impl RouteMembership {
    pub fn new(line_id: impl Into<LineIdentifier>, head_sign: impl AsRef<str>) -> Self {
        Self {
            line_id: Some(line_id.into()),
            head_sign: Some(head_sign.as_ref().into()),
            ..Self::default()
        }
    }

    pub fn with_names(mut self, short_name: impl AsRef<str>, long_name: impl AsRef<str>) -> Self {
        self.short_name = short_name.as_ref().into();
        self.long_name = long_name.as_ref().into();
        self
    }

    /// Line id if present and not blank
    pub fn line_id(&self) -> Option<&LineIdentifier> {
        self.line_id
            .as_ref()
            .filter(|id| !id.as_str().trim().is_empty())
    }

    /// Head sign with surrounding whitespace removed, if not blank
    pub fn head_sign(&self) -> Option<&str> {
        self.head_sign
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Grouping key, present only when both line id and head sign are set
    pub fn direction_key(&self) -> Option<DirectionKey> {
        let line_id = self.line_id()?;
        let head_sign = self.head_sign()?;

        Some(DirectionKey {
            line_id: line_id.clone(),
            head_sign: head_sign.to_lowercase(),
        })
    }

    /// Short name, falling back to the line id when missing or blank
    pub fn display_short_name(&self) -> &str {
        Self::or_line_id(&self.short_name, self.line_id.as_ref())
    }

    /// Long name, falling back to the line id when missing or blank
    pub fn display_long_name(&self) -> &str {
        Self::or_line_id(&self.long_name, self.line_id.as_ref())
    }

    pub fn route_type(&self) -> Option<RouteType> {
        RouteType::from_tag(&self.route_type)
    }

    fn or_line_id<'a>(name: &'a str, line_id: Option<&'a LineIdentifier>) -> &'a str {
        if !name.trim().is_empty() {
            return name;
        }
        line_id.map(LineIdentifier::as_str).unwrap_or_default()
    }
}
