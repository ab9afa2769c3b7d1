//! Detail enrichment configuration

use crate::types::{JsonObject, Method};
use serde::{Deserialize, Serialize};

/// Batch size used when the configured one is zero or negative
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// Concurrency limit used when the configured one is zero or negative
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Placeholder replaced by the record id in path mode
pub const DEFAULT_ID_PLACEHOLDER: &str = "{id}";

/// How identifiers reach the detail endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailMode {
    /// Path mode if the endpoint contains the placeholder, else batch mode
    #[default]
    Auto,
    /// One request per identifier, id substituted into the endpoint
    Path,
    /// Chunks of identifiers per request
    Batch,
}

/// Detail lookup settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DetailConfig {
    /// Detail endpoint or endpoint template; enrichment is skipped when unset
    pub endpoint: Option<String>,
    /// Retrieval mode
    pub mode: DetailMode,
    /// Dotted path of the identifier in each listing row
    pub id_field: String,
    /// Placeholder substituted in path mode
    pub placeholder: String,
    /// HTTP method of detail requests
    pub method: Method,
    /// Query parameter carrying the ids for GET batches
    pub ids_param: String,
    /// Body key carrying the ids for non-GET batches (defaults to `ids_param`)
    pub ids_key: Option<String>,
    /// Extra body fields sent with non-GET batches
    pub payload: JsonObject,
    /// Send ids as a JSON list instead of a comma-separated string
    pub ids_as_list: bool,
    /// Identifiers per batch
    pub batch_size: i64,
    /// Maximum requests in flight
    pub concurrency: i64,
    /// Keep at most this many identifiers (ignored unless positive)
    pub max_ids: Option<i64>,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            mode: DetailMode::Auto,
            id_field: "id".to_string(),
            placeholder: DEFAULT_ID_PLACEHOLDER.to_string(),
            method: Method::GET,
            ids_param: "ids".to_string(),
            ids_key: None,
            payload: JsonObject::new(),
            ids_as_list: false,
            batch_size: DEFAULT_BATCH_SIZE as i64,
            concurrency: DEFAULT_CONCURRENCY as i64,
            max_ids: None,
        }
    }
}

impl DetailConfig {
    /// Set the detail endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the retrieval mode
    #[must_use]
    pub fn with_mode(mut self, mode: DetailMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the HTTP method
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the batch size
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: i64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the concurrency limit
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: i64) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Send ids as a JSON list
    #[must_use]
    pub fn with_ids_as_list(mut self, as_list: bool) -> Self {
        self.ids_as_list = as_list;
        self
    }

    /// Whether a detail endpoint is configured
    pub fn is_enabled(&self) -> bool {
        self.endpoint.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// Mode after resolving `Auto` against the endpoint template
    pub fn resolved_mode(&self) -> DetailMode {
        match self.mode {
            DetailMode::Auto => {
                let templated = self
                    .endpoint
                    .as_deref()
                    .is_some_and(|e| !self.placeholder.is_empty() && e.contains(&self.placeholder));
                if templated {
                    DetailMode::Path
                } else {
                    DetailMode::Batch
                }
            }
            mode => mode,
        }
    }

    /// Batch size, falling back to the default when not positive
    pub fn effective_batch_size(&self) -> usize {
        positive_or(self.batch_size, DEFAULT_BATCH_SIZE)
    }

    /// Concurrency limit, falling back to the default when not positive
    pub fn effective_concurrency(&self) -> usize {
        positive_or(self.concurrency, DEFAULT_CONCURRENCY)
    }

    /// Body key carrying the ids
    pub fn ids_body_key(&self) -> &str {
        self.ids_key.as_deref().unwrap_or(&self.ids_param)
    }
}

fn positive_or(value: i64, default: usize) -> usize {
    if value > 0 {
        usize::try_from(value).unwrap_or(default)
    } else {
        default
    }
}
