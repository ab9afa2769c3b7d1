//! GeoJSON module
//!
//! Flattens nested, path-described JSON records into GeoJSON features.
//!
//! # Overview
//!
//! The builder:
//! 1. Walks `records_path` from the document root, flattening lists and
//!    remembering the ancestor objects passed on the way (the trail)
//! 2. Reads each record's geometry, dropping records without coordinates
//!    unless told to keep them
//! 3. Resolves the property specs against the record, its trail and any
//!    context aliases
//!
//! # Property specs
//!
//! ```text
//! area                                  bare path, output key "area"
//! ownerName=owner.name                  renamed
//! name=missing.path||owner.name         first non-null candidate wins
//! project=activityTemplate.project.name ancestor context from the trail
//! ```

mod builder;
mod property;
mod resolver;
mod types;

pub use builder::{build, GeoJsonBuilder};
pub use property::PropertySpec;
pub use resolver::{locate_records, LocatedRecord};
pub use types::{
    Feature, FeatureCollection, GeoJsonOptions, Geometry, PathIdOptions, FALLBACK_GEOMETRY_TYPE,
};
