//! Execution engine module
//!
//! Threads the stages of a job together.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Pipeline` - fetch, enrich, inject, build and save for one job
//! - `RunConfig` - per-run overrides (resource scope, output paths)
//! - `build_file` - offline GeoJSON build from a local JSON document
//!
//! All network work completes before anything is written, so a transport
//! failure leaves no output behind.

mod types;

pub use types::{PipelineOutput, PipelineStats, RunConfig};

use crate::details::DetailEnricher;
use crate::error::Result;
use crate::geojson::{FeatureCollection, GeoJsonBuilder, GeoJsonOptions};
use crate::http::Transport;
use crate::inject::Injector;
use crate::loader::JobDefinition;
use crate::output::{load_json, save_json};
use crate::pagination::{PageFetcher, RowSet};
use crate::types::JsonValue;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// One job run over a transport
pub struct Pipeline<'a, T: Transport + ?Sized> {
    transport: &'a T,
    job: &'a JobDefinition,
    config: RunConfig,
}

impl<'a, T: Transport + ?Sized> Pipeline<'a, T> {
    /// Create a pipeline for `job`
    pub fn new(transport: &'a T, job: &'a JobDefinition) -> Self {
        Self {
            transport,
            job,
            config: RunConfig::default(),
        }
    }

    /// Set run configuration
    #[must_use]
    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    /// Fetch, enrich and inject; returns the merged payload
    pub async fn collect(&self) -> Result<(JsonValue, PipelineStats)> {
        let job = self.job;
        let mut stats = PipelineStats::new();

        let pagination = job.fetch_pagination();
        let rows_key = pagination.rows_key.clone();
        let (payload, params) = job.fetch.request_parts(self.config.resource_id.as_ref());

        let fetched = PageFetcher::new(self.transport, pagination)
            .fetch_all(&job.fetch.endpoint, job.fetch.method, &payload, &params)
            .await?;
        stats.pages_fetched = fetched.total_pages;
        stats.rows_fetched = fetched.len();

        let mut rows = fetched.rows;
        if job.details.is_enabled() {
            rows = DetailEnricher::new(self.transport, job.details.clone())
                .with_rows_key(rows_key.clone())
                .enrich_rows(rows)
                .await?;
            stats.detail_rows = Some(rows.len());
        }

        let mut merged = RowSet {
            rows,
            total_pages: stats.pages_fetched,
        }
        .into_payload(&rows_key);

        if !job.inject.sources.is_empty() {
            stats.injected = Injector::new(self.transport, job.pagination.clone())
                .inject(&mut merged, &job.inject_target_path(), &job.inject.sources)
                .await?;
        }

        Ok((merged, stats))
    }

    /// Run every stage and write the outputs
    pub async fn run(&self) -> Result<PipelineOutput> {
        let start = Instant::now();
        info!("Running job '{}'", self.job.name);

        // Parse property specs before any request
        let builder = GeoJsonBuilder::new(self.job.geojson_options())?;

        let (payload, mut stats) = self.collect().await?;

        let raw_location = match self.raw_output() {
            Some(path) => Some(save_json(&payload, path).await?),
            None => None,
        };

        let collection = builder.build(&payload);
        stats.features = collection.len();
        let geojson_location = save_json(&collection, self.geojson_output()).await?;

        stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            "Job '{}' done: {} page(s), {} row(s), {} feature(s) in {}ms",
            self.job.name, stats.pages_fetched, stats.rows_fetched, stats.features, stats.duration_ms
        );

        Ok(PipelineOutput {
            payload,
            collection,
            raw_location,
            geojson_location,
            stats,
        })
    }

    fn raw_output(&self) -> Option<&Path> {
        self.config
            .raw_output
            .as_deref()
            .or(self.job.output.raw.as_deref())
    }

    fn geojson_output(&self) -> &Path {
        self.config
            .geojson_output
            .as_deref()
            .unwrap_or(self.job.output.geojson.as_path())
    }
}

/// Build a feature collection from a local JSON document and write it
pub async fn build_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &GeoJsonOptions,
) -> Result<(FeatureCollection, PathBuf)> {
    let builder = GeoJsonBuilder::new(options.clone())?;
    let document = load_json(input).await?;
    let collection = builder.build(&document);
    let location = save_json(&collection, output).await?;
    Ok((collection, location))
}
