//! Resource lookup by keyword
//!
//! Lists the resources visible to the token and filters them by id or name.

use crate::decode::{RowDecoder, DEFAULT_ROWS_KEY};
use crate::error::Result;
use crate::http::{RequestConfig, Transport};
use crate::path;
use crate::types::{value_to_string, JsonValue, Method};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Resource listing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SearchConfig {
    /// Listing endpoint (GET, single page)
    pub endpoint: String,
    /// Key holding the listed rows
    pub rows_key: String,
    /// Id field of each resource
    pub id_field: String,
    /// Name field of each resource
    pub name_field: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "/v1/resources".to_string(),
            rows_key: DEFAULT_ROWS_KEY.to_string(),
            id_field: "id".to_string(),
            name_field: "name".to_string(),
        }
    }
}

/// One search hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceMatch {
    pub id: JsonValue,
    /// Upper-cased resource name
    pub name: String,
}

fn field_text(row: &JsonValue, field: &str) -> String {
    path::get(row, field).map(value_to_string).unwrap_or_default()
}

/// Keep rows whose id equals `keyword` or whose name contains it.
///
/// Matching is trimmed and case-insensitive; a blank keyword keeps every row.
pub fn filter_rows_by_keyword<'r>(
    rows: &'r [JsonValue],
    keyword: &str,
    id_field: &str,
    name_field: &str,
) -> Vec<&'r JsonValue> {
    let key = keyword.trim().to_lowercase();
    if key.is_empty() {
        return rows.iter().collect();
    }
    rows.iter()
        .filter(|row| {
            field_text(row, id_field).to_lowercase() == key
                || field_text(row, name_field).to_lowercase().contains(&key)
        })
        .collect()
}

/// Fetch the resource listing and filter it by `keyword`
pub async fn search_resources<T: Transport + ?Sized>(
    transport: &T,
    config: &SearchConfig,
    keyword: &str,
) -> Result<Vec<ResourceMatch>> {
    let body = transport
        .request(Method::GET, &config.endpoint, RequestConfig::new())
        .await?;
    let rows = RowDecoder::new(config.rows_key.clone()).page_rows(body);
    debug!("Resource listing returned {} row(s)", rows.len());

    Ok(
        filter_rows_by_keyword(&rows, keyword, &config.id_field, &config.name_field)
            .into_iter()
            .map(|row| ResourceMatch {
                id: path::get(row, &config.id_field)
                    .cloned()
                    .unwrap_or(JsonValue::Null),
                name: field_text(row, &config.name_field).to_uppercase(),
            })
            .collect(),
    )
}
