//! HTTP client with token auth and rate limiting
//!
//! Provides the concrete transport used by every stage:
//! - Endpoint joining against a base URL
//! - Token header attached to every request
//! - Optional rate limiting to avoid overwhelming the API
//! - JSON, form or empty bodies
//! - Non-2xx statuses surfaced as errors (never retried)

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::transport::Transport;
use crate::error::{Error, Result};
use crate::types::{JsonValue, Method, StringMap};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Token attached as a request header
#[derive(Clone)]
pub struct TokenAuth {
    /// Header name (default: Authorization)
    pub header_name: String,
    /// Prefix placed before the token, separated by a space (default: Bearer)
    pub prefix: String,
    /// The token itself
    pub token: String,
}

impl TokenAuth {
    /// Create a bearer token auth
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            header_name: "Authorization".to_string(),
            prefix: "Bearer".to_string(),
            token: token.into(),
        }
    }

    /// Header value, or None when the token is empty
    pub fn header_value(&self) -> Option<String> {
        if self.token.is_empty() {
            return None;
        }
        let prefix = self.prefix.trim();
        if prefix.is_empty() {
            Some(self.token.clone())
        } else {
            Some(format!("{prefix} {}", self.token))
        }
    }
}

impl std::fmt::Debug for TokenAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuth")
            .field("header_name", &self.header_name)
            .field("prefix", &self.prefix)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for relative endpoints
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// Token auth
    pub auth: Option<TokenAuth>,
    /// Verify TLS certificates
    pub verify_tls: bool,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(120),
            rate_limit: None,
            default_headers: HashMap::new(),
            auth: None,
            verify_tls: true,
            user_agent: format!("parcel-sync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set token auth
    pub fn auth(mut self, auth: TokenAuth) -> Self {
        self.config.auth = Some(auth);
        self
    }

    /// Enable or disable TLS certificate verification
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.config.verify_tls = verify;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: StringMap,
    /// Request headers
    pub headers: StringMap,
    /// Request body (JSON)
    pub body: Option<JsonValue>,
    /// Request body (form-encoded)
    pub form: Option<StringMap>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add all query parameters from a map
    #[must_use]
    pub fn query_map(mut self, params: StringMap) -> Self {
        self.query.extend(params);
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Set form body
    #[must_use]
    pub fn form(mut self, form: StringMap) -> Self {
        self.form = Some(form);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client with token auth and rate limiting
///
/// One instance is shared by every concurrent request of a run; the
/// underlying `reqwest::Client` pools connections internally.
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Make a GET request and parse the JSON response
    pub async fn get_json(&self, endpoint: &str) -> Result<JsonValue> {
        self.request_json(Method::GET, endpoint, RequestConfig::default())
            .await
    }

    /// Make a POST request with a JSON body and parse the JSON response
    pub async fn post_json(&self, endpoint: &str, body: JsonValue) -> Result<JsonValue> {
        self.request_json(Method::POST, endpoint, RequestConfig::default().json(body))
            .await
    }

    /// Send a request and return the raw response (2xx only)
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let full_url = self.build_url(endpoint);
        let timeout = config.timeout.unwrap_or(self.config.timeout);

        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self.client.request(method.into(), &full_url);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        for (key, value) in &config.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(value) = self.config.auth.as_ref().and_then(TokenAuth::header_value) {
            let name = self
                .config
                .auth
                .as_ref()
                .map_or("Authorization", |a| a.header_name.as_str());
            req = req.header(name, value);
        }

        if !config.query.is_empty() {
            req = req.query(&config.query);
        }
        if let Some(ref body) = config.body {
            req = req.json(body);
        } else if let Some(ref form) = config.form {
            req = req.form(form);
        }

        req = req.timeout(timeout);

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        debug!("{} {} -> {}", method, full_url, status.as_u16());
        Ok(response)
    }

    /// Make a request and parse the JSON response
    ///
    /// An empty 2xx body parses as JSON `null`.
    pub async fn request_json(
        &self,
        method: Method,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<JsonValue> {
        let response = self.send(method, endpoint, config).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| Error::decode(format!("Invalid JSON from {endpoint}: {e}")))
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Build full URL from an endpoint
    pub fn build_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = endpoint.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => endpoint.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<JsonValue> {
        self.request_json(method, endpoint, config).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .field("has_auth", &self.config.auth.is_some())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
