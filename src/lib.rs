// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Parcel Sync
//!
//! Configuration-driven retrieval of paginated parcel records, with detail
//! enrichment, cross-source injection and GeoJSON export.
//!
//! ## Features
//!
//! - **Concurrent Pagination**: First page tells the page count, the rest are fetched together
//! - **Detail Enrichment**: Per-id or batched detail lookups under a concurrency limit
//! - **Injection**: Attach matching rows from other sources to each record
//! - **Path Resolution**: Dotted paths, ancestor lookups and aliases flatten nested JSON
//! - **GeoJSON Output**: One feature per record, with declarative property specs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use parcel_sync::{load_job, HttpClient, Pipeline, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Load job from YAML
//!     let job = load_job("jobs/plots.yaml")?;
//!     let client = HttpClient::with_config(job.client_config(Some("token")))?;
//!
//!     // Fetch, enrich, inject, build and write
//!     let output = Pipeline::new(&client, &job).run().await?;
//!     println!("{} features", output.stats.features);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Pipeline                               │
//! │  fetch → enrich details → inject sources → build → save         │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   HTTP   │  Paginate │    Details    │  Inject   │   GeoJSON   │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Transport│ Page count│ Path mode     │ Inline    │ Resolver    │
//! │ Auth hdr │ Fan-out   │ Batch mode    │ File      │ Prop specs  │
//! │ Rate lim │ Ordering  │ Semaphore     │ Endpoint  │ Path ids    │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Dotted-path lookups into JSON values
pub mod path;

/// Ordered fan-out / fan-in of async tasks
pub mod fanout;

/// HTTP transport with auth header and rate limiting
pub mod http;

/// Row extraction from response envelopes
pub mod decode;

/// Page-count-driven concurrent pagination
pub mod pagination;

/// Detail enrichment
pub mod details;

/// Cross-source injection
pub mod inject;

/// Record resolution and GeoJSON building
pub mod geojson;

/// JSON file output
pub mod output;

/// Resource lookup by keyword
pub mod search;

/// YAML loader for job definitions
pub mod loader;

/// Pipeline execution
pub mod engine;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use engine::{Pipeline, PipelineOutput, RunConfig};
pub use geojson::{FeatureCollection, GeoJsonOptions};
pub use http::{HttpClient, HttpClientConfig, Transport};
pub use loader::{load_job, load_job_from_str, JobDefinition};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
