//! CLI module
//!
//! Command-line interface for running jobs.
//!
//! # Commands
//!
//! - `run` - Fetch, enrich, inject and write GeoJSON
//! - `fetch` - Save the merged payload without building features
//! - `build` - Offline GeoJSON build from a local JSON document
//! - `search` - List resources matching a keyword
//! - `validate` - Check a job definition

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
