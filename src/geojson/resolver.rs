//! Record location and value resolution

use crate::path;
use crate::types::{JsonObject, JsonValue, StringMap};

/// A feature-bearing record and the ancestors passed on the way to it
#[derive(Debug, Clone)]
pub struct LocatedRecord<'a> {
    /// The record itself
    pub record: &'a JsonObject,
    /// `(path key, ancestor object)`, outermost first; the record's own key is excluded
    pub trail: Vec<(&'a str, &'a JsonObject)>,
}

/// Walk `records_path` from `root` and collect every record at its end.
///
/// Each step looks the key up in the current object(s); a list found there
/// is flattened. Objects met at intermediate steps are recorded in the
/// trail under the key that reached them. An empty path yields the root
/// object, or the objects of a root list.
pub fn locate_records<'a>(root: &'a JsonValue, records_path: &'a [String]) -> Vec<LocatedRecord<'a>> {
    let mut out = Vec::new();
    let mut trail = Vec::new();
    walk(root, records_path, &mut trail, &mut out);
    out
}

fn walk<'a>(
    node: &'a JsonValue,
    rest: &'a [String],
    trail: &mut Vec<(&'a str, &'a JsonObject)>,
    out: &mut Vec<LocatedRecord<'a>>,
) {
    if rest.is_empty() {
        for record in objects(node) {
            out.push(LocatedRecord {
                record,
                trail: trail.clone(),
            });
        }
        return;
    }

    match node {
        JsonValue::Object(map) => walk_object(map, rest, trail, out),
        JsonValue::Array(items) => {
            for item in items {
                walk(item, rest, trail, out);
            }
        }
        _ => {}
    }
}

fn walk_object<'a>(
    object: &'a JsonObject,
    rest: &'a [String],
    trail: &mut Vec<(&'a str, &'a JsonObject)>,
    out: &mut Vec<LocatedRecord<'a>>,
) {
    let Some((key, tail)) = rest.split_first() else {
        return;
    };
    let Some(child) = object.get(key.as_str()) else {
        return;
    };
    if tail.is_empty() {
        walk(child, tail, trail, out);
        return;
    }
    for ancestor in objects(child) {
        trail.push((key.as_str(), ancestor));
        walk_object(ancestor, tail, trail, out);
        trail.pop();
    }
}

/// The object itself, or the objects of a list
fn objects(value: &JsonValue) -> Vec<&JsonObject> {
    match value {
        JsonValue::Object(map) => vec![map],
        JsonValue::Array(items) => items.iter().filter_map(JsonValue::as_object).collect(),
        _ => Vec::new(),
    }
}

impl<'a> LocatedRecord<'a> {
    /// A record without ancestors
    pub fn bare(record: &'a JsonObject) -> Self {
        Self {
            record,
            trail: Vec::new(),
        }
    }

    /// Nearest ancestor reached through `key`
    pub fn ancestor(&self, key: &str) -> Option<&'a JsonObject> {
        self.trail
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, object)| *object)
    }

    /// Object named by a context prefix: a trail key, or an alias for a record field
    fn context(&self, name: &str, aliases: &StringMap) -> Option<&'a JsonObject> {
        if let Some(ancestor) = self.ancestor(name) {
            return Some(ancestor);
        }
        let target = aliases.get(name)?;
        path::get_in(self.record, target)
            .and_then(JsonValue::as_object)
            .or_else(|| self.ancestor(target))
    }

    /// Resolve one candidate path; `null` counts as unresolved.
    ///
    /// Tried in order: a context prefix (trail key or alias) with the
    /// remainder resolved against that object; the dotted path on the
    /// record; the dotted path on each ancestor, nearest first; the whole
    /// candidate as a literal key on the record, then on each ancestor.
    pub fn resolve(&self, candidate: &str, aliases: &StringMap) -> Option<&'a JsonValue> {
        let stripped = candidate.strip_prefix("$.").unwrap_or(candidate);

        if let Some((head, remainder)) = stripped.split_once('.') {
            if let Some(found) = self
                .context(head, aliases)
                .and_then(|object| path::get_in(object, remainder))
            {
                return Some(found);
            }
        }

        if let Some(found) = path::get_in(self.record, stripped) {
            return Some(found);
        }

        let ancestors = || self.trail.iter().rev().map(|(_, object)| *object);

        if let Some(found) = ancestors().find_map(|object| path::get_in(object, stripped)) {
            return Some(found);
        }

        path::get_literal(self.record, stripped)
            .or_else(|| ancestors().find_map(|object| path::get_literal(object, stripped)))
    }

    /// First candidate that resolves
    pub fn resolve_first<S: AsRef<str>>(&self, candidates: &[S], aliases: &StringMap) -> Option<&'a JsonValue> {
        candidates
            .iter()
            .find_map(|candidate| self.resolve(candidate.as_ref(), aliases))
    }
}
