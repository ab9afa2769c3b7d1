//! Engine types
//!
//! Run configuration, results and statistics for the pipeline.

use crate::geojson::FeatureCollection;
use crate::types::JsonValue;
use serde::Serialize;
use std::path::PathBuf;

/// Per-run settings layered over the job definition
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Resource the listing is scoped to (overrides the job's)
    pub resource_id: Option<JsonValue>,
    /// GeoJSON destination (overrides the job's)
    pub geojson_output: Option<PathBuf>,
    /// Raw payload destination (overrides the job's)
    pub raw_output: Option<PathBuf>,
}

impl RunConfig {
    /// Create a new run config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope the listing to a resource
    #[must_use]
    pub fn with_resource_id(mut self, id: JsonValue) -> Self {
        self.resource_id = Some(id);
        self
    }

    /// Write the feature collection here
    #[must_use]
    pub fn with_geojson_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.geojson_output = Some(path.into());
        self
    }

    /// Write the raw payload here
    #[must_use]
    pub fn with_raw_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.raw_output = Some(path.into());
        self
    }
}

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineStats {
    /// Listing pages fetched
    pub pages_fetched: u32,
    /// Rows returned by the listing
    pub rows_fetched: usize,
    /// Rows after detail enrichment (None when skipped)
    pub detail_rows: Option<usize>,
    /// Attachments made by injection
    pub injected: usize,
    /// Features in the collection
    pub features: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PipelineStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Everything a pipeline run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Fetched, enriched and injected payload (`{rows_key: [...]}`)
    pub payload: JsonValue,
    /// Built feature collection
    pub collection: FeatureCollection,
    /// Where the raw payload was written, if anywhere
    pub raw_location: Option<PathBuf>,
    /// Where the feature collection was written
    pub geojson_location: PathBuf,
    /// Run statistics
    pub stats: PipelineStats,
}
