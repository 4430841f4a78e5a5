//! Card catalog loaders
//!
//! CSV catalog parsing and the built-in standard catalog

pub mod catalog;
pub mod standard;

pub use catalog::{classify_ability, Catalog, CatalogLoader};
pub use standard::standard_catalog;
