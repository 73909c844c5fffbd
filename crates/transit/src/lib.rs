//! # headsign-transit
//!
//! Infers, for every transit stop, the next stop along each line and head
//! sign it serves, and labels that hop with a compass direction and its
//! relation to a city center.
//!
//! ## Features
//!
//! - **Geo-math**: haversine distance, initial bearing, angle folding
//! - **Direction inference**: nearest same-line/same-head-sign neighbor
//!   inside a distance window, classified by compass sector and center
//!   relation
//! - **Spatial queries**: R-tree backed radius and nearest-stop lookups
//!
//! ## Example
//!
//! ```
//! use headsign_transit::prelude::*;
//!
//! let line = RouteMembership::new("19", "Platja");
//! let stops = vec![
//!     Stop::new("1", 39.4699, -0.3763, "Ajuntament").with_route(line.clone()),
//!     Stop::new("2", 39.4717, -0.3763, "Sant Vicent").with_route(line),
//! ];
//!
//! let directions = compute_route_directions(&stops, &DirectionConfig::default());
//! let record = &directions[&StopIdentifier::new("1")][0];
//! assert_eq!(record.neighbor_stop_id.as_str(), "2");
//! assert_eq!(record.compass.label, "N");
//! ```

pub mod direction;
pub mod identifiers;
pub mod models;
pub mod provider;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::direction::{
        compute_route_directions, find_closest_neighbor, CenterRelation, CompassSector,
        DirectionConfig, DirectionRecord, StopDirectionMap,
    };
    pub use crate::identifiers::*;
    pub use crate::models::{stop::*, types::*};
    pub use crate::provider::StopCatalog;
}

pub use prelude::*;
