//! Stop collections.

pub mod catalog;

pub use catalog::StopCatalog;
