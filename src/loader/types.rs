//! Loader types
//!
//! Declarative job definition types for YAML parsing.

use crate::details::DetailConfig;
use crate::geojson::GeoJsonOptions;
use crate::http::{HttpClientConfig, RateLimiterConfig, TokenAuth};
use crate::inject::InjectionSource;
use crate::pagination::{apply_filters, PaginationConfig, PaginationOverrides};
use crate::search::SearchConfig;
use crate::types::{JsonObject, JsonValue, Method, StringMap};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Job Definition
// ============================================================================

/// Top-level job definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JobDefinition {
    /// Job name
    pub name: String,
    /// Job version
    #[serde(default = "default_version")]
    pub version: String,
    /// Base URL for all relative endpoints
    pub base_url: String,
    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpDefinition,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: StringMap,
    /// Default pagination conventions
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Listing fetch
    pub fetch: FetchDefinition,
    /// Detail enrichment (skipped without an endpoint)
    #[serde(default)]
    pub details: DetailConfig,
    /// Cross-source injection
    #[serde(default)]
    pub inject: InjectDefinition,
    /// Property preset applied before `geojson`
    #[serde(default)]
    pub preset: Option<GeoJsonPreset>,
    /// GeoJSON build options
    #[serde(default)]
    pub geojson: GeoJsonOptions,
    /// Output locations
    #[serde(default)]
    pub output: OutputDefinition,
    /// Resource search
    #[serde(default)]
    pub search: SearchConfig,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

impl JobDefinition {
    /// HTTP client config for this job, authenticating with `token` when given
    pub fn client_config(&self, token: Option<&str>) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.base_url.clone())
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .verify_tls(self.http.verify_tls);

        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        if let Some(rps) = self.http.rate_limit_rps {
            builder = builder.rate_limit(RateLimiterConfig::per_second(rps));
        }
        for (key, value) in &self.headers {
            builder = builder.header(key.clone(), value.clone());
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            builder = builder.auth(TokenAuth {
                header_name: self.http.auth_header.clone(),
                prefix: self.http.auth_prefix.clone(),
                token: token.to_string(),
            });
        }
        builder.build()
    }

    /// Pagination config of the listing fetch (job defaults plus fetch overrides)
    pub fn fetch_pagination(&self) -> PaginationConfig {
        self.pagination.with_overrides(&self.fetch.pagination)
    }

    /// GeoJSON options with the preset applied
    pub fn geojson_options(&self) -> GeoJsonOptions {
        let mut options = self.geojson.clone();
        if let Some(GeoJsonPreset::Plot) = self.preset {
            let preset = GeoJsonOptions::plot_defaults();
            if options.properties.is_empty() {
                options.properties = preset.properties;
            }
            if options.geometry_type.is_none() {
                options.geometry_type = preset.geometry_type;
            }
        }
        options
    }

    /// Records path injection targets (defaults to the rows key)
    pub fn inject_target_path(&self) -> Vec<String> {
        self.inject
            .target_path
            .clone()
            .unwrap_or_else(|| vec![self.pagination.rows_key.clone()])
    }
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpDefinition {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Rate limit (requests per second)
    #[serde(default)]
    pub rate_limit_rps: Option<u32>,
    /// User agent
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Verify TLS certificates
    #[serde(default = "default_true")]
    pub verify_tls: bool,
    /// Header carrying the token
    #[serde(default = "default_auth_header")]
    pub auth_header: String,
    /// Prefix placed before the token
    #[serde(default = "default_auth_prefix")]
    pub auth_prefix: String,
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            rate_limit_rps: None,
            user_agent: None,
            verify_tls: true,
            auth_header: default_auth_header(),
            auth_prefix: default_auth_prefix(),
        }
    }
}

fn default_timeout() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

fn default_auth_header() -> String {
    "Authorization".to_string()
}

fn default_auth_prefix() -> String {
    "Bearer".to_string()
}

// ============================================================================
// Fetch Definition
// ============================================================================

/// Listing fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FetchDefinition {
    /// Listing endpoint
    pub endpoint: String,
    /// HTTP method
    #[serde(default = "default_fetch_method")]
    pub method: Method,
    /// Base body payload
    #[serde(default)]
    pub payload: JsonObject,
    /// Extra query params
    #[serde(default)]
    pub params: JsonObject,
    /// Filters merged into payload and params (nulls dropped)
    #[serde(default)]
    pub filters: JsonObject,
    /// Payload field scoping the listing to one resource
    #[serde(default = "default_resource_field")]
    pub resource_field: String,
    /// Resource the listing is scoped to
    #[serde(default)]
    pub resource_id: Option<JsonValue>,
    /// Pagination overrides for this endpoint
    #[serde(default)]
    pub pagination: PaginationOverrides,
}

fn default_fetch_method() -> Method {
    Method::POST
}

fn default_resource_field() -> String {
    "resourceId".to_string()
}

impl FetchDefinition {
    /// Payload and params for the listing, scoped to `resource_id` if given
    /// (falling back to the configured one)
    pub fn request_parts(&self, resource_id: Option<&JsonValue>) -> (JsonObject, JsonObject) {
        let mut payload = self.payload.clone();
        let mut params = self.params.clone();

        if let Some(id) = resource_id.or(self.resource_id.as_ref()) {
            if !id.is_null() {
                payload.insert(self.resource_field.clone(), id.clone());
            }
        }
        apply_filters(&self.filters, &mut payload, &mut params);
        (payload, params)
    }
}

// ============================================================================
// Inject / Output Definitions
// ============================================================================

/// Injection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct InjectDefinition {
    /// Records path of the injection targets in the fetched payload
    pub target_path: Option<Vec<String>>,
    /// Sources applied in order
    pub sources: Vec<InjectionSource>,
}

/// Named GeoJSON property presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoJsonPreset {
    /// Plot fields plus `<field>_owner` owner fields, Polygon geometry
    Plot,
}

/// Output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OutputDefinition {
    /// Raw (fetched, enriched, injected) payload; not written when unset
    #[serde(default)]
    pub raw: Option<PathBuf>,
    /// Feature collection
    #[serde(default = "default_geojson_path")]
    pub geojson: PathBuf,
}

impl Default for OutputDefinition {
    fn default() -> Self {
        Self {
            raw: None,
            geojson: default_geojson_path(),
        }
    }
}

fn default_geojson_path() -> PathBuf {
    PathBuf::from("output/features.geojson")
}
