//! HTTP transport module
//!
//! Provides the HTTP client and the transport trait the pipeline stages use.
//!
//! # Features
//!
//! - **Token Auth**: Configurable header name and prefix
//! - **Rate Limiting**: Optional token bucket rate limiter using governor
//! - **Status Errors**: Non-2xx responses become `Error::HttpStatus`

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig, TokenAuth};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::Transport;
