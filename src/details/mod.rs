//! Detail enrichment module
//!
//! Replaces listing rows with richer per-record detail rows.
//!
//! # Overview
//!
//! Record identifiers are extracted from the fetched rows (first occurrence
//! wins, optionally capped) and looked up either one request per identifier
//! (`Path` mode, identifier substituted into the endpoint template) or in
//! chunks (`Batch` mode, identifiers sent as a query parameter or body
//! field). All requests run together under a concurrency limit and the
//! normalized rows are concatenated in submission order.
//!
//! # Example
//!
//! ```rust,ignore
//! use parcel_sync::details::{DetailConfig, DetailEnricher};
//!
//! let config = DetailConfig::default().with_endpoint("/v1/plots/details");
//! let rows = DetailEnricher::new(&client, config).enrich_rows(rows).await?;
//! ```

mod enricher;
mod types;

pub use enricher::{extract_record_ids, DetailEnricher};
pub use types::{
    DetailConfig, DetailMode, DEFAULT_BATCH_SIZE, DEFAULT_CONCURRENCY, DEFAULT_ID_PLACEHOLDER,
};

#[cfg(test)]
mod tests;
