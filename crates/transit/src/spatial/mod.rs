//! Spatial indexing and great-circle math.

pub mod index;
pub mod queries;

pub use queries::{angular_difference, bearing, distance_km, distance_m, normalize_bearing};
