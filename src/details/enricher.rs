//! Detail enricher

use super::types::{DetailConfig, DetailMode};
use crate::decode::RowDecoder;
use crate::error::{Error, Result};
use crate::fanout::join_ordered;
use crate::http::{RequestConfig, Transport};
use crate::path;
use crate::types::{value_to_string, JsonValue};
use std::collections::HashSet;
use tracing::{debug, info};

/// Collect record identifiers from rows.
///
/// Ids are read through a dotted path; rows without one (or with `null`)
/// are skipped. Duplicates keep their first position. A positive `max_ids`
/// truncates the list.
pub fn extract_record_ids(rows: &[JsonValue], id_field: &str, max_ids: Option<i64>) -> Vec<JsonValue> {
    let mut seen = HashSet::new();
    let mut ids: Vec<JsonValue> = rows
        .iter()
        .filter(|row| row.is_object())
        .filter_map(|row| path::get(row, id_field))
        .filter(|id| seen.insert(id.to_string()))
        .cloned()
        .collect();

    if let Some(max) = max_ids.filter(|m| *m > 0) {
        ids.truncate(usize::try_from(max).unwrap_or(usize::MAX));
    }
    ids
}

/// Fetches detail rows for a list of record identifiers
pub struct DetailEnricher<'a, T: Transport + ?Sized> {
    transport: &'a T,
    config: DetailConfig,
    decoder: RowDecoder,
}

impl<'a, T: Transport + ?Sized> DetailEnricher<'a, T> {
    /// Create an enricher; detail responses are decoded with the default rows key
    pub fn new(transport: &'a T, config: DetailConfig) -> Self {
        Self {
            transport,
            config,
            decoder: RowDecoder::default(),
        }
    }

    /// Use a different rows key when normalizing detail responses
    #[must_use]
    pub fn with_rows_key(mut self, rows_key: impl Into<String>) -> Self {
        self.decoder = RowDecoder::new(rows_key);
        self
    }

    /// The detail config in use
    pub fn config(&self) -> &DetailConfig {
        &self.config
    }

    /// Replace listing rows with their detail rows.
    ///
    /// Without a configured endpoint the rows are returned unchanged.
    pub async fn enrich_rows(&self, rows: Vec<JsonValue>) -> Result<Vec<JsonValue>> {
        if !self.config.is_enabled() {
            debug!("No detail endpoint configured, keeping {} listing row(s)", rows.len());
            return Ok(rows);
        }
        let ids = extract_record_ids(&rows, &self.config.id_field, self.config.max_ids);
        self.enrich(&ids).await
    }

    /// Fetch detail rows for `record_ids`, concatenated in submission order
    pub async fn enrich(&self, record_ids: &[JsonValue]) -> Result<Vec<JsonValue>> {
        let endpoint = self
            .config
            .endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::missing_field("details.endpoint"))?;

        if record_ids.is_empty() {
            debug!("No record ids, skipping detail requests");
            return Ok(Vec::new());
        }

        let limit = self.config.effective_concurrency();
        let responses = match self.config.resolved_mode() {
            DetailMode::Path => {
                if self.config.placeholder.is_empty() {
                    return Err(Error::invalid_value(
                        "details.placeholder",
                        "path mode needs a non-empty id placeholder",
                    ));
                }
                info!(
                    "Fetching details for {} id(s) one by one (concurrency {})",
                    record_ids.len(),
                    limit
                );
                let tasks = record_ids
                    .iter()
                    .map(|id| self.fetch_single(endpoint, id))
                    .collect();
                join_ordered(tasks, Some(limit)).await?
            }
            DetailMode::Batch | DetailMode::Auto => {
                let batch_size = self.config.effective_batch_size();
                let batches: Vec<&[JsonValue]> = record_ids.chunks(batch_size).collect();
                info!(
                    "Fetching details for {} id(s) in {} batch(es) of up to {} (concurrency {})",
                    record_ids.len(),
                    batches.len(),
                    batch_size,
                    limit
                );
                let tasks = batches
                    .into_iter()
                    .map(|batch| self.fetch_batch(endpoint, batch))
                    .collect();
                join_ordered(tasks, Some(limit)).await?
            }
        };

        let rows: Vec<JsonValue> = responses.into_iter().flatten().collect();
        debug!("Detail lookups produced {} row(s)", rows.len());
        Ok(rows)
    }

    async fn fetch_single(&self, template: &str, id: &JsonValue) -> Result<Vec<JsonValue>> {
        let endpoint = template.replace(&self.config.placeholder, &value_to_string(id));
        let body = self
            .transport
            .request(self.config.method, &endpoint, RequestConfig::new())
            .await?;
        Ok(self.decoder.detail_rows(body))
    }

    async fn fetch_batch(&self, endpoint: &str, ids: &[JsonValue]) -> Result<Vec<JsonValue>> {
        let csv = ids.iter().map(value_to_string).collect::<Vec<_>>().join(",");
        let method = self.config.method;

        let request = if method.is_read() {
            RequestConfig::new().query(self.config.ids_param.clone(), csv)
        } else {
            let mut body = self.config.payload.clone();
            let ids_value = if self.config.ids_as_list {
                JsonValue::Array(ids.to_vec())
            } else {
                JsonValue::String(csv)
            };
            body.insert(self.config.ids_body_key().to_string(), ids_value);
            RequestConfig::new().json(JsonValue::Object(body))
        };

        debug!("Requesting details for batch of {} id(s)", ids.len());
        let body = self.transport.request(method, endpoint, request).await?;
        Ok(self.decoder.detail_rows(body))
    }
}
