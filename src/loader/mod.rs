//! YAML Loader module
//!
//! Parse job definitions from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `JobDefinition` - Declarative fetch / enrich / inject / build job
//! - `FetchDefinition`, `InjectDefinition`, `OutputDefinition` - Stage settings
//! - YAML parsing with validation

mod parser;
mod types;

pub use parser::{load_job, load_job_from_str, validate_job};
pub use types::{
    FetchDefinition, GeoJsonPreset, HttpDefinition, InjectDefinition, JobDefinition,
    OutputDefinition,
};
