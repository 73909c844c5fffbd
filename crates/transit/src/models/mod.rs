//! Transit data models and error types.

pub mod stop;
pub mod types;

// Re-exports for convenience
pub use stop::{DirectionKey, RouteMembership, Stop};
pub use types::{Result, RouteType, TransitError};
