//! Cross-source injection module
//!
//! Attaches auxiliary records (activities, surveys, ...) onto target rows by
//! matching key values.
//!
//! # Overview
//!
//! Each [`InjectionSource`] yields rows from inline data, a local JSON file
//! or a paginated endpoint. A lookup is built from the source key path and
//! every target record whose target key matches gets the source record set
//! under `attach_as`. Unmatched targets are untouched, an empty source is a
//! no-op and re-running overwrites the previous attachment with the same
//! value. Sources apply in order, so later ones win on a shared `attach_as`.

mod injector;
mod types;

pub use injector::{attach, build_lookup, target_records_mut, Injector};
pub use types::{InjectionSource, SourceRows};

#[cfg(test)]
mod tests;
