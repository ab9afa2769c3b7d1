//! Cross-source injector

use super::types::{InjectionSource, SourceRows};
use crate::decode::RowDecoder;
use crate::error::Result;
use crate::http::Transport;
use crate::output::load_json;
use crate::pagination::{apply_filters, PageFetcher, PaginationConfig};
use crate::path;
use crate::types::{JsonObject, JsonValue};
use std::collections::HashMap;
use tracing::{debug, info};

/// Collect the objects reached by walking `records_path` from `root`.
///
/// Lists met along the way are flattened; an empty path yields the root
/// object itself or the objects of a root list.
pub fn target_records_mut<'v>(root: &'v mut JsonValue, records_path: &[String]) -> Vec<&'v mut JsonObject> {
    let mut out = Vec::new();
    walk_mut(root, records_path, &mut out);
    out
}

fn walk_mut<'v>(node: &'v mut JsonValue, rest: &[String], out: &mut Vec<&'v mut JsonObject>) {
    match (node, rest.split_first()) {
        (JsonValue::Object(map), None) => out.push(map),
        (JsonValue::Array(items), None) => {
            out.extend(items.iter_mut().filter_map(JsonValue::as_object_mut));
        }
        (JsonValue::Object(map), Some((key, tail))) => {
            if let Some(child) = map.get_mut(key.as_str()) {
                walk_mut(child, tail, out);
            }
        }
        (JsonValue::Array(items), Some(_)) => {
            for item in items.iter_mut() {
                walk_mut(item, rest, out);
            }
        }
        _ => {}
    }
}

/// Index source rows by the value at `source_key`.
///
/// Rows whose key is missing or null are skipped; on duplicate keys the
/// last row wins.
pub fn build_lookup<'r>(rows: &'r [JsonValue], source_key: &str) -> HashMap<String, &'r JsonValue> {
    rows.iter()
        .filter(|row| row.is_object())
        .filter_map(|row| path::get(row, source_key).map(|key| (key.to_string(), row)))
        .collect()
}

/// Attach matching source rows onto `targets`, returning the match count
pub fn attach(targets: &mut [&mut JsonObject], source: &InjectionSource, rows: &[JsonValue]) -> usize {
    let lookup = build_lookup(rows, &source.source_key);
    if lookup.is_empty() {
        return 0;
    }

    let mut attached = 0;
    for target in targets.iter_mut() {
        let Some(matched) = path::get_in(&**target, &source.target_key)
            .and_then(|key| lookup.get(&key.to_string()))
            .map(|row| (*row).clone())
        else {
            continue;
        };
        target.insert(source.attach_as.clone(), matched);
        attached += 1;
    }
    attached
}

/// Fetches injection sources and attaches them onto target records
pub struct Injector<'a, T: Transport + ?Sized> {
    transport: &'a T,
    pagination: PaginationConfig,
}

impl<'a, T: Transport + ?Sized> Injector<'a, T> {
    /// Create an injector; endpoint sources inherit `pagination`
    pub fn new(transport: &'a T, pagination: PaginationConfig) -> Self {
        Self {
            transport,
            pagination,
        }
    }

    /// Apply every source, in order, to the records under `target_path`.
    ///
    /// Returns the total number of attachments made.
    pub async fn inject(
        &self,
        payload: &mut JsonValue,
        target_path: &[String],
        sources: &[InjectionSource],
    ) -> Result<usize> {
        let mut targets = target_records_mut(payload, target_path);
        debug!(
            "Injecting {} source(s) into {} target record(s)",
            sources.len(),
            targets.len()
        );

        let mut total = 0;
        for source in sources {
            let rows = self.source_rows(source).await?;
            let attached = attach(&mut targets, source, &rows);
            info!(
                "Source '{}': {} row(s), {} attached as '{}'",
                source.label(),
                rows.len(),
                attached,
                source.attach_as
            );
            total += attached;
        }
        Ok(total)
    }

    /// Obtain a source's rows (objects only)
    pub async fn source_rows(&self, source: &InjectionSource) -> Result<Vec<JsonValue>> {
        let config = self.pagination.with_overrides(&source.pagination);
        let rows = match source.kind() {
            SourceRows::Inline(rows) => rows.to_vec(),
            SourceRows::File(file) => {
                let document = load_json(file).await?;
                RowDecoder::new(config.rows_key.clone()).page_rows(document)
            }
            SourceRows::Endpoint(endpoint) => {
                let mut payload = source.payload.clone();
                let mut params = source.params.clone();
                apply_filters(&source.filters, &mut payload, &mut params);
                PageFetcher::new(self.transport, config)
                    .fetch_all(endpoint, source.method, &payload, &params)
                    .await?
                    .rows
            }
            SourceRows::None => Vec::new(),
        };
        Ok(rows.into_iter().filter(JsonValue::is_object).collect())
    }
}
