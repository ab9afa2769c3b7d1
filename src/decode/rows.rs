//! Row extraction from response bodies

use crate::types::JsonValue;

/// Key holding the row list when nothing else is configured
pub const DEFAULT_ROWS_KEY: &str = "rows";

/// Extracts row lists from response bodies
#[derive(Debug, Clone)]
pub struct RowDecoder {
    rows_key: String,
}

impl Default for RowDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS_KEY)
    }
}

impl RowDecoder {
    /// Create a decoder for the given rows key
    pub fn new(rows_key: impl Into<String>) -> Self {
        Self {
            rows_key: rows_key.into(),
        }
    }

    /// Rows of one listing page.
    ///
    /// An object yields its rows-key list; a bare list is used as-is;
    /// anything else yields no rows. Row values are kept untouched.
    pub fn page_rows(&self, body: JsonValue) -> Vec<JsonValue> {
        match body {
            JsonValue::Object(mut map) => match map.remove(&self.rows_key) {
                Some(JsonValue::Array(rows)) => rows,
                _ => Vec::new(),
            },
            JsonValue::Array(rows) => rows,
            _ => Vec::new(),
        }
    }

    /// Rows of one detail response, objects only.
    ///
    /// An object with a list under the rows key (or under `rows`) yields that
    /// list; an object without one is a single row; a list is used as-is;
    /// anything else yields zero rows.
    pub fn detail_rows(&self, body: JsonValue) -> Vec<JsonValue> {
        match body {
            JsonValue::Object(mut map) => {
                for key in [self.rows_key.as_str(), DEFAULT_ROWS_KEY] {
                    if matches!(map.get(key), Some(JsonValue::Array(_))) {
                        if let Some(JsonValue::Array(rows)) = map.remove(key) {
                            return only_objects(rows);
                        }
                    }
                }
                vec![JsonValue::Object(map)]
            }
            JsonValue::Array(rows) => only_objects(rows),
            _ => Vec::new(),
        }
    }

    /// Integer stored under `key`, accepting numbers and numeric strings
    pub fn integer_field(body: &JsonValue, key: &str) -> Option<i64> {
        match body.get(key)? {
            JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            JsonValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

fn only_objects(rows: Vec<JsonValue>) -> Vec<JsonValue> {
    rows.into_iter().filter(JsonValue::is_object).collect()
}
