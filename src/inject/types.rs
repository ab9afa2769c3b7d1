//! Injection source definitions

use crate::pagination::PaginationOverrides;
use crate::types::{JsonObject, JsonValue, Method};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One auxiliary data source and how to match it onto target records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct InjectionSource {
    /// Label used in logs
    pub name: Option<String>,
    /// Pre-supplied rows; no request is made
    pub rows: Option<Vec<JsonValue>>,
    /// Local JSON file (object with a rows key, or a bare list)
    pub file: Option<PathBuf>,
    /// Paginated endpoint to fetch
    pub endpoint: Option<String>,
    /// Method for the endpoint
    pub method: Method,
    /// Base payload for the endpoint
    pub payload: JsonObject,
    /// Extra query params for the endpoint
    pub params: JsonObject,
    /// Filters merged into payload and params (nulls dropped)
    pub filters: JsonObject,
    /// Pagination settings overriding the job defaults
    pub pagination: PaginationOverrides,
    /// Dotted path of the match key in source rows
    pub source_key: String,
    /// Dotted path of the match key in target records
    pub target_key: String,
    /// Property set on matched target records
    pub attach_as: String,
}

impl Default for InjectionSource {
    fn default() -> Self {
        Self {
            name: None,
            rows: None,
            file: None,
            endpoint: None,
            method: Method::GET,
            payload: JsonObject::new(),
            params: JsonObject::new(),
            filters: JsonObject::new(),
            pagination: PaginationOverrides::default(),
            source_key: "id".to_string(),
            target_key: "id".to_string(),
            attach_as: "context".to_string(),
        }
    }
}

impl InjectionSource {
    /// Source backed by pre-supplied rows
    pub fn inline(rows: Vec<JsonValue>) -> Self {
        Self {
            rows: Some(rows),
            ..Default::default()
        }
    }

    /// Source backed by a local JSON file
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
            ..Default::default()
        }
    }

    /// Source fetched from a paginated endpoint
    pub fn from_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Default::default()
        }
    }

    /// Set the match keys
    #[must_use]
    pub fn matching(mut self, source_key: impl Into<String>, target_key: impl Into<String>) -> Self {
        self.source_key = source_key.into();
        self.target_key = target_key.into();
        self
    }

    /// Set the attachment property
    #[must_use]
    pub fn attach_as(mut self, attach_as: impl Into<String>) -> Self {
        self.attach_as = attach_as.into();
        self
    }

    /// Set the endpoint method
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Where the rows come from, in precedence order
    pub fn kind(&self) -> SourceRows<'_> {
        if let Some(rows) = &self.rows {
            SourceRows::Inline(rows)
        } else if let Some(path) = &self.file {
            SourceRows::File(path)
        } else if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.is_empty()) {
            SourceRows::Endpoint(endpoint)
        } else {
            SourceRows::None
        }
    }

    /// Name for log lines
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.endpoint.as_deref())
            .unwrap_or(&self.attach_as)
    }
}

/// Origin of a source's rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceRows<'a> {
    Inline(&'a [JsonValue]),
    File(&'a Path),
    Endpoint(&'a str),
    None,
}
