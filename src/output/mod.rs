//! Output module
//!
//! Reads and writes the JSON documents the pipeline consumes and produces.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Writing raw payloads and feature collections as pretty UTF-8 JSON
//! - Creating missing parent directories on write
//! - Loading local JSON documents (offline builds, injection source files)

mod writer;

pub use writer::{load_json, save_json, JsonWriter, JsonWriterConfig};
