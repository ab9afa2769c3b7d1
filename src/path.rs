//! Dotted path resolution over JSON values
//!
//! Paths are plain dot-separated keys (`owner.name`, `activityTemplate.project.id`).
//! A leading `$.` is accepted and ignored. Numeric segments index into arrays.
//! Resolution never fails loudly: a missing key, a type mismatch or a JSON
//! `null` all resolve to `None`.

use crate::types::{JsonObject, JsonValue};

/// Split a path into its segments, ignoring a leading `$.`
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    path.split('.').filter(|s| !s.is_empty())
}

/// Whether the path has more than one segment
pub fn is_dotted(path: &str) -> bool {
    path.strip_prefix("$.").unwrap_or(path).contains('.')
}

/// Resolve a dotted path against any JSON value
pub fn get<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut current = value;
    let mut walked = false;
    for part in segments(path) {
        walked = true;
        current = step(current, part)?;
    }
    if !walked || current.is_null() {
        return None;
    }
    Some(current)
}

/// Resolve a dotted path against an object
pub fn get_in<'a>(object: &'a JsonObject, path: &str) -> Option<&'a JsonValue> {
    let mut parts = segments(path);
    let first = parts.next()?;
    let mut current = object.get(first)?;
    for part in parts {
        current = step(current, part)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Look up `key` literally (no splitting on dots)
pub fn get_literal<'a>(object: &'a JsonObject, key: &str) -> Option<&'a JsonValue> {
    object.get(key).filter(|v| !v.is_null())
}

fn step<'a>(current: &'a JsonValue, part: &str) -> Option<&'a JsonValue> {
    match current {
        JsonValue::Object(map) => map.get(part),
        JsonValue::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}
