//! Concurrent page fetcher

use super::types::{PageRequest, PaginationConfig, RowSet};
use crate::decode::RowDecoder;
use crate::error::Result;
use crate::fanout::join_ordered;
use crate::http::Transport;
use crate::types::{JsonObject, JsonValue, Method};
use tracing::{debug, info};

/// Fetches all pages of a listing endpoint over a shared transport
pub struct PageFetcher<'a, T: Transport + ?Sized> {
    transport: &'a T,
    config: PaginationConfig,
    decoder: RowDecoder,
}

impl<'a, T: Transport + ?Sized> PageFetcher<'a, T> {
    /// Create a fetcher with the given pagination conventions
    pub fn new(transport: &'a T, config: PaginationConfig) -> Self {
        let decoder = RowDecoder::new(config.rows_key.clone());
        Self {
            transport,
            config,
            decoder,
        }
    }

    /// The pagination config in use
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Fetch every page and concatenate the rows in page order.
    ///
    /// The first page is requested alone; its total-page field (default 1
    /// when absent, invalid or below 1) decides how many more pages are
    /// requested, all at once. Any failed page aborts the whole fetch.
    pub async fn fetch_all(
        &self,
        endpoint: &str,
        method: Method,
        base_payload: &JsonObject,
        extra_params: &JsonObject,
    ) -> Result<RowSet> {
        let first_page = self.config.first_page;

        let first_body = self
            .fetch_page(endpoint, method, base_payload, extra_params, first_page)
            .await?;

        let mut total_pages = RowDecoder::integer_field(&first_body, &self.config.total_pages_key)
            .filter(|n| *n >= 1)
            .map_or(1, |n| u32::try_from(n).unwrap_or(u32::MAX));
        if let Some(max) = self.config.max_pages {
            total_pages = total_pages.min(max).max(1);
        }

        let mut rows = self.decoder.page_rows(first_body);
        info!(
            "{} {}: {} page(s), {} row(s) on first page",
            method,
            endpoint,
            total_pages,
            rows.len()
        );

        if total_pages <= 1 {
            return Ok(RowSet {
                rows,
                total_pages: 1,
            });
        }

        let remaining = (1..i64::from(total_pages)).map(|offset| {
            self.fetch_page(
                endpoint,
                method,
                base_payload,
                extra_params,
                first_page + offset,
            )
        });
        let pages = join_ordered(remaining.collect(), None).await?;

        for body in pages {
            rows.extend(self.decoder.page_rows(body));
        }

        debug!("{}: fetched {} row(s) total", endpoint, rows.len());
        Ok(RowSet { rows, total_pages })
    }

    /// Fetch a single page and return its raw body
    pub async fn fetch_page(
        &self,
        endpoint: &str,
        method: Method,
        base_payload: &JsonObject,
        extra_params: &JsonObject,
        page: i64,
    ) -> Result<JsonValue> {
        let request = PageRequest::build(
            endpoint,
            method,
            base_payload,
            extra_params,
            page,
            &self.config,
        );
        debug!("Requesting page {} of {}", page, endpoint);
        self.transport
            .request(request.method, &request.endpoint, request.to_request_config())
            .await
    }
}
