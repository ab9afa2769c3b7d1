//! Transport abstraction
//!
//! Every stage talks to the remote API through this trait, so the fetch,
//! enrich and inject logic can run against any client that turns one
//! request into one parsed JSON document.

use super::client::RequestConfig;
use crate::error::Result;
use crate::types::{JsonValue, Method};
use async_trait::async_trait;

/// Issues one request and returns the parsed JSON body.
///
/// Implementations must return an error for non-2xx statuses and must be
/// safe to call concurrently from a single task.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `method endpoint` with the given query/body and parse the response
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<JsonValue>;
}
