//! YAML parser for job definitions
//!
//! Parses and validates job YAML files.

use crate::details::DetailMode;
use crate::error::{Error, Result};
use crate::geojson::PropertySpec;
use crate::loader::types::JobDefinition;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Load a job definition from a YAML file
pub fn load_job(path: impl AsRef<Path>) -> Result<JobDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!("Failed to read job file '{}': {}", path.display(), e))
        }
    })?;
    load_job_from_str(&content)
}

/// Load a job definition from a YAML string
pub fn load_job_from_str(yaml: &str) -> Result<JobDefinition> {
    let def: JobDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse job YAML: {e}")))?;

    validate_job(&def)?;
    Ok(def)
}

/// Validate a job definition
pub fn validate_job(def: &JobDefinition) -> Result<()> {
    if def.name.trim().is_empty() {
        return Err(Error::config("Job name cannot be empty"));
    }

    if def.base_url.is_empty() {
        return Err(Error::config("Job base_url cannot be empty"));
    }
    url::Url::parse(&def.base_url)
        .map_err(|e| Error::invalid_value("base_url", format!("'{}': {e}", def.base_url)))?;

    if def.fetch.endpoint.is_empty() {
        return Err(Error::missing_field("fetch.endpoint"));
    }

    if def.pagination.page_param.is_empty() {
        return Err(Error::invalid_value("pagination.page_param", "cannot be empty"));
    }

    validate_details(def)?;
    validate_inject(def)?;
    validate_geojson(def)?;

    if def.output.geojson.as_os_str().is_empty() {
        return Err(Error::missing_field("output.geojson"));
    }

    Ok(())
}

fn validate_details(def: &JobDefinition) -> Result<()> {
    let details = &def.details;
    if !details.is_enabled() {
        return Ok(());
    }

    if details.mode == DetailMode::Path {
        let templated = details
            .endpoint
            .as_deref()
            .is_some_and(|e| e.contains(&details.placeholder));
        if details.placeholder.is_empty() || !templated {
            return Err(Error::invalid_value(
                "details.endpoint",
                format!("path mode needs the '{}' placeholder", details.placeholder),
            ));
        }
    }

    if details.batch_size <= 0 || details.concurrency <= 0 {
        warn!(
            "details: non-positive batch_size/concurrency, using {} / {}",
            details.effective_batch_size(),
            details.effective_concurrency()
        );
    }

    Ok(())
}

fn validate_inject(def: &JobDefinition) -> Result<()> {
    for (index, source) in def.inject.sources.iter().enumerate() {
        if source.attach_as.is_empty() {
            return Err(Error::invalid_value(
                format!("inject.sources[{index}].attach_as"),
                "cannot be empty",
            ));
        }
        if source.source_key.is_empty() || source.target_key.is_empty() {
            return Err(Error::invalid_value(
                format!("inject.sources[{index}]"),
                "source_key and target_key cannot be empty",
            ));
        }
        if source.rows.is_none() && source.file.is_none() && source.endpoint.is_none() {
            warn!(
                "inject source '{}' has no rows, file or endpoint and will not attach anything",
                source.label()
            );
        }
    }
    Ok(())
}

fn validate_geojson(def: &JobDefinition) -> Result<()> {
    let options = def.geojson_options();

    if options.records_path.iter().any(String::is_empty) {
        return Err(Error::invalid_value(
            "geojson.records_path",
            "path keys cannot be empty",
        ));
    }
    if options.geometry_field.is_empty() {
        return Err(Error::missing_field("geojson.geometry_field"));
    }
    if options.id_output_key.is_empty() {
        return Err(Error::missing_field("geojson.id_output_key"));
    }

    PropertySpec::parse_all(&options.properties)?;
    Ok(())
}
