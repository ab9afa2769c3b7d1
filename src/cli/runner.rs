//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::engine::{build_file, Pipeline, RunConfig};
use crate::error::{Error, Result, ResultExt};
use crate::geojson::GeoJsonOptions;
use crate::http::HttpClient;
use crate::loader::{load_job, JobDefinition};
use crate::output::save_json;
use crate::search::search_resources;
use crate::types::JsonValue;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run {
                resource_id,
                output,
            } => self.run_job(resource_id.as_deref(), output.as_deref()).await,
            Commands::Fetch {
                resource_id,
                output,
            } => self.fetch(resource_id.as_deref(), output).await,
            Commands::Build { input, output } => self.build(input, output.as_deref()).await,
            Commands::Search { keyword } => self.search(keyword.as_deref().unwrap_or("")).await,
            Commands::Validate => self.validate(),
        }
    }

    /// Load job definition
    fn load_job(&self) -> Result<JobDefinition> {
        let path = self
            .cli
            .job
            .as_ref()
            .ok_or_else(|| Error::config("Job file not specified (use -j flag)"))?;
        load_job(path)
    }

    /// Build the HTTP client for a job
    fn client(&self, job: &JobDefinition) -> Result<HttpClient> {
        HttpClient::with_config(job.client_config(self.cli.token.as_deref()))
            .with_context(|| format!("Failed to create HTTP client for job '{}'", job.name))
    }

    fn run_config(resource_id: Option<&str>) -> RunConfig {
        match resource_id {
            Some(id) => RunConfig::new().with_resource_id(parse_resource_id(id)),
            None => RunConfig::new(),
        }
    }

    /// Full pipeline
    async fn run_job(&self, resource_id: Option<&str>, output: Option<&Path>) -> Result<()> {
        let job = self.load_job()?;
        let client = self.client(&job)?;

        let mut config = Self::run_config(resource_id);
        if let Some(path) = output {
            config = config.with_geojson_output(path);
        }

        let result = Pipeline::new(&client, &job).with_config(config).run().await?;

        print_json(&json!({
            "type": "RESULT",
            "job": job.name,
            "geojson": result.geojson_location,
            "raw": result.raw_location,
            "stats": result.stats,
        }));
        Ok(())
    }

    /// Fetch and save the merged payload
    async fn fetch(&self, resource_id: Option<&str>, output: &Path) -> Result<()> {
        let job = self.load_job()?;
        let client = self.client(&job)?;

        let (payload, stats) = Pipeline::new(&client, &job)
            .with_config(Self::run_config(resource_id))
            .collect()
            .await?;
        let location = save_json(&payload, output).await?;

        print_json(&json!({
            "type": "RESULT",
            "job": job.name,
            "raw": location,
            "stats": stats,
        }));
        Ok(())
    }

    /// Offline GeoJSON build
    async fn build(&self, input: &Path, output: Option<&Path>) -> Result<()> {
        let job = match &self.cli.job {
            Some(_) => Some(self.load_job()?),
            None => None,
        };
        let options = job
            .as_ref()
            .map_or_else(GeoJsonOptions::default, JobDefinition::geojson_options);
        let output = match (output, &job) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(job)) => job.output.geojson.clone(),
            (None, None) => default_geojson_path(input),
        };

        let (collection, location) = build_file(input, &output, &options).await?;
        info!("Built {} feature(s) from {}", collection.len(), input.display());

        print_json(&json!({
            "type": "RESULT",
            "geojson": location,
            "features": collection.len(),
        }));
        Ok(())
    }

    /// Print matching resources as JSON lines
    async fn search(&self, keyword: &str) -> Result<()> {
        let job = self.load_job()?;
        let client = self.client(&job)?;

        let matches = search_resources(&client, &job.search, keyword).await?;
        if matches.is_empty() {
            info!("No resources match '{keyword}'");
        }
        for hit in &matches {
            print_json(hit);
        }
        Ok(())
    }

    /// Validate job definition
    fn validate(&self) -> Result<()> {
        let job = self.load_job()?;

        print_json(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Job '{}' v{} is valid with {} injection source(s)",
                    job.name,
                    job.version,
                    job.inject.sources.len()
                )
            }
        }));
        Ok(())
    }
}

fn print_json<V: Serialize + ?Sized>(value: &V) {
    println!("{}", serde_json::to_string(value).unwrap_or_default());
}

/// Numeric ids stay numbers in request bodies
fn parse_resource_id(raw: &str) -> JsonValue {
    match serde_json::from_str::<JsonValue>(raw.trim()) {
        Ok(value @ JsonValue::Number(_)) => value,
        _ => JsonValue::String(raw.to_string()),
    }
}

fn default_geojson_path(input: &Path) -> PathBuf {
    input.with_extension("geojson")
}
