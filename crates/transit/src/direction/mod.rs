//! Direction inference: which stop comes next on each line, and which way
//! that is.

pub mod center;
pub mod compass;
pub mod config;
pub mod engine;

pub use center::CenterRelation;
pub use compass::CompassSector;
pub use config::DirectionConfig;
pub use engine::{compute_route_directions, find_closest_neighbor, DirectionRecord, StopDirectionMap};
