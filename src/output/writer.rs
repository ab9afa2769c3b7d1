//! JSON file writer
//!
//! Provides utilities for persisting JSON values to disk.

use crate::error::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration for the JSON writer
#[derive(Debug, Clone)]
pub struct JsonWriterConfig {
    pretty: bool,
    create_dirs: bool,
}

impl Default for JsonWriterConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            create_dirs: true,
        }
    }
}

impl JsonWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent output (default on)
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Create missing parent directories (default on)
    #[must_use]
    pub fn with_create_dirs(mut self, create: bool) -> Self {
        self.create_dirs = create;
        self
    }

    /// Get pretty printing enabled
    #[must_use]
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

/// Writes serializable values as JSON files
#[derive(Debug, Clone, Default)]
pub struct JsonWriter {
    config: JsonWriterConfig,
}

impl JsonWriter {
    /// Create a writer
    pub fn new(config: JsonWriterConfig) -> Self {
        Self { config }
    }

    /// Serialize `value` to `path`, returning the written location
    pub async fn write<V: Serialize + ?Sized>(&self, value: &V, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();

        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };

        if self.config.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    Error::output(format!("Failed to create directory {}: {e}", parent.display()))
                })?;
            }
        }

        tokio::fs::write(path, &bytes)
            .await
            .map_err(|e| Error::output(format!("Failed to write {}: {e}", path.display())))?;

        info!("Wrote {} byte(s) to {}", bytes.len(), path.display());
        Ok(path.to_path_buf())
    }
}

/// Write `value` as pretty JSON, creating parent directories
pub async fn save_json<V: Serialize + ?Sized>(value: &V, path: impl AsRef<Path>) -> Result<PathBuf> {
    JsonWriter::default().write(value, path).await
}

/// Read a local JSON document
pub async fn load_json(path: impl AsRef<Path>) -> Result<serde_json::Value> {
    let path = path.as_ref();
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            })
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&text)?)
}
