//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fetch paginated parcel records and export them as GeoJSON
#[derive(Parser, Debug)]
#[command(name = "parcel-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Job definition file (YAML)
    #[arg(short, long, global = true)]
    pub job: Option<PathBuf>,

    /// API token sent in the job's auth header
    #[arg(short, long, global = true, env = "PARCEL_SYNC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch, enrich, inject and write the feature collection
    Run {
        /// Resource the listing is scoped to (overrides the job's)
        #[arg(long)]
        resource_id: Option<String>,

        /// GeoJSON destination (overrides the job's)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch, enrich and inject, then save the raw payload only
    Fetch {
        /// Resource the listing is scoped to (overrides the job's)
        #[arg(long)]
        resource_id: Option<String>,

        /// Raw payload destination
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Build GeoJSON from a local JSON document (no network)
    Build {
        /// Input JSON document
        #[arg(short, long)]
        input: PathBuf,

        /// GeoJSON destination (defaults to the job's, or input with .geojson)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List resources matching a keyword
    Search {
        /// Id or name fragment (empty lists everything)
        keyword: Option<String>,
    },

    /// Validate the job definition
    Validate,
}
