//! Property specification parsing
//!
//! A spec is either a bare path (`owner.name`), whose output key is the path
//! itself, or `outputKey=path1||path2||...`, where the first candidate that
//! resolves to a non-null value wins.

use crate::error::{Error, Result};

/// One parsed property spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec {
    /// Property name in the output feature
    pub output_key: String,
    /// Candidate paths, tried in order
    pub candidates: Vec<String>,
}

impl PropertySpec {
    /// Parse a spec; blank specs yield `None`
    pub fn parse(spec: &str) -> Result<Option<Self>> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let (output_key, paths) = match trimmed.split_once('=') {
            Some((key, paths)) => {
                let key = key.trim();
                if key.is_empty() {
                    return Err(Error::property_spec(spec, "missing output key before '='"));
                }
                (Some(key), paths)
            }
            None => (None, trimmed),
        };

        let candidates: Vec<String> = paths
            .split("||")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        let Some(first) = candidates.first() else {
            return Err(Error::property_spec(spec, "no candidate path"));
        };

        Ok(Some(Self {
            output_key: output_key.map_or_else(|| first.clone(), str::to_string),
            candidates,
        }))
    }

    /// Parse a list of specs, dropping blank ones
    pub fn parse_all<S: AsRef<str>>(specs: &[S]) -> Result<Vec<Self>> {
        let mut parsed = Vec::with_capacity(specs.len());
        for spec in specs {
            if let Some(spec) = Self::parse(spec.as_ref())? {
                parsed.push(spec);
            }
        }
        Ok(parsed)
    }
}
