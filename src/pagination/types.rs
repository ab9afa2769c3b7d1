//! Pagination types
//!
//! Configuration, per-page request construction and the fetched row set.

use crate::decode::DEFAULT_ROWS_KEY;
use crate::http::RequestConfig;
use crate::types::{object_to_params, JsonObject, JsonValue, Method, StringMap};
use serde::{Deserialize, Serialize};

/// Where the page number is placed in a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePlacement {
    /// In the JSON request body
    #[default]
    Body,
    /// In the query string
    Query,
}

/// Pagination conventions of a listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PaginationConfig {
    /// Key holding the row list in each page
    pub rows_key: String,
    /// Key holding the total page count in the first page
    pub total_pages_key: String,
    /// Name of the page number parameter
    pub page_param: String,
    /// Number of the first page (usually 0 or 1)
    pub first_page: i64,
    /// Where the page number travels for non-GET requests
    pub placement: PagePlacement,
    /// Upper bound on the number of pages fetched
    pub max_pages: Option<u32>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            rows_key: DEFAULT_ROWS_KEY.to_string(),
            total_pages_key: "totalPages".to_string(),
            page_param: "page".to_string(),
            first_page: 0,
            placement: PagePlacement::Body,
            max_pages: None,
        }
    }
}

impl PaginationConfig {
    /// Set the page number placement
    #[must_use]
    pub fn with_placement(mut self, placement: PagePlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Set the first page number
    #[must_use]
    pub fn with_first_page(mut self, first_page: i64) -> Self {
        self.first_page = first_page;
        self
    }

    /// Cap the number of pages fetched
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Effective placement for a method; GET always uses the query string
    pub fn placement_for(&self, method: Method) -> PagePlacement {
        if method.is_read() {
            PagePlacement::Query
        } else {
            self.placement
        }
    }

    /// Apply per-call overrides on top of this config
    #[must_use]
    pub fn with_overrides(&self, overrides: &PaginationOverrides) -> Self {
        Self {
            rows_key: overrides
                .rows_key
                .clone()
                .unwrap_or_else(|| self.rows_key.clone()),
            total_pages_key: overrides
                .total_pages_key
                .clone()
                .unwrap_or_else(|| self.total_pages_key.clone()),
            page_param: overrides
                .page_param
                .clone()
                .unwrap_or_else(|| self.page_param.clone()),
            first_page: overrides.first_page.unwrap_or(self.first_page),
            placement: overrides.placement.unwrap_or(self.placement),
            max_pages: overrides.max_pages.or(self.max_pages),
        }
    }
}

/// Optional per-call pagination settings; unset fields inherit the job defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PaginationOverrides {
    pub rows_key: Option<String>,
    pub total_pages_key: Option<String>,
    pub page_param: Option<String>,
    pub first_page: Option<i64>,
    pub placement: Option<PagePlacement>,
    pub max_pages: Option<u32>,
}

/// One page request, built fresh for every page
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Endpoint (relative or absolute)
    pub endpoint: String,
    /// HTTP method
    pub method: Method,
    /// JSON body (None for GET)
    pub body: Option<JsonObject>,
    /// Query parameters
    pub query: StringMap,
    /// Page number carried by this request
    pub page: i64,
}

impl PageRequest {
    /// Build the request for `page`.
    ///
    /// - GET: payload and params both go to the query string with the page.
    /// - Body placement: payload plus page as JSON, no query string.
    /// - Query placement: payload as JSON, params plus page in the query.
    pub fn build(
        endpoint: &str,
        method: Method,
        payload: &JsonObject,
        params: &JsonObject,
        page: i64,
        config: &PaginationConfig,
    ) -> Self {
        let page_value = JsonValue::from(page);

        let (body, query) = if method.is_read() {
            let mut query = params.clone();
            query.extend(payload.iter().map(|(k, v)| (k.clone(), v.clone())));
            query.insert(config.page_param.clone(), page_value);
            (None, query)
        } else {
            match config.placement_for(method) {
                PagePlacement::Body => {
                    let mut body = payload.clone();
                    body.insert(config.page_param.clone(), page_value);
                    (Some(body), JsonObject::new())
                }
                PagePlacement::Query => {
                    let mut query = params.clone();
                    query.insert(config.page_param.clone(), page_value);
                    (Some(payload.clone()), query)
                }
            }
        };

        Self {
            endpoint: endpoint.to_string(),
            method,
            body,
            query: object_to_params(&query),
            page,
        }
    }

    /// Convert into a transport request config
    pub fn to_request_config(&self) -> RequestConfig {
        let config = RequestConfig::new().query_map(self.query.clone());
        match &self.body {
            Some(body) => config.json(JsonValue::Object(body.clone())),
            None => config,
        }
    }
}

/// Rows of every page, in page order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    /// Concatenated rows
    pub rows: Vec<JsonValue>,
    /// Number of pages fetched
    pub total_pages: u32,
}

impl RowSet {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Wrap the rows as `{rows_key: [...]}`
    pub fn into_payload(self, rows_key: &str) -> JsonValue {
        let mut payload = JsonObject::new();
        payload.insert(rows_key.to_string(), JsonValue::Array(self.rows));
        JsonValue::Object(payload)
    }
}

/// Merge filter values into both the payload and the params.
///
/// Null filters are dropped. The page placement rule decides which of the
/// two maps actually travels with each request.
pub fn apply_filters(filters: &JsonObject, payload: &mut JsonObject, params: &mut JsonObject) {
    for (key, value) in filters.iter().filter(|(_, v)| !v.is_null()) {
        payload.insert(key.clone(), value.clone());
        params.insert(key.clone(), value.clone());
    }
}
