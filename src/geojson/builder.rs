//! Feature collection builder

use super::property::PropertySpec;
use super::resolver::{locate_records, LocatedRecord};
use super::types::{Feature, FeatureCollection, GeoJsonOptions, Geometry, FALLBACK_GEOMETRY_TYPE};
use crate::error::Result;
use crate::path;
use crate::types::{JsonObject, JsonValue};
use tracing::{debug, info};

/// Build a feature collection from `source` with `options`
pub fn build(source: &JsonValue, options: &GeoJsonOptions) -> Result<FeatureCollection> {
    Ok(GeoJsonBuilder::new(options.clone())?.build(source))
}

/// Turns nested JSON records into GeoJSON features
#[derive(Debug, Clone)]
pub struct GeoJsonBuilder {
    options: GeoJsonOptions,
    specs: Vec<PropertySpec>,
}

impl GeoJsonBuilder {
    /// Create a builder, parsing the property specs up front
    pub fn new(options: GeoJsonOptions) -> Result<Self> {
        let specs = PropertySpec::parse_all(&options.properties)?;
        Ok(Self { options, specs })
    }

    /// The build options
    pub fn options(&self) -> &GeoJsonOptions {
        &self.options
    }

    /// Build the collection; feature order follows record order
    pub fn build(&self, source: &JsonValue) -> FeatureCollection {
        let records = locate_records(source, &self.options.records_path);
        let total = records.len();

        let features: Vec<Feature> = records
            .iter()
            .filter_map(|located| self.feature(located))
            .collect();

        info!(
            "Built {} feature(s) from {} record(s), {} skipped",
            features.len(),
            total,
            total - features.len()
        );
        FeatureCollection::new(features)
    }

    /// Feature for one record, or `None` when it is skipped for lack of coordinates
    pub fn feature(&self, located: &LocatedRecord<'_>) -> Option<Feature> {
        let geometry = match self.geometry(located.record) {
            Some(geometry) => geometry,
            None if self.options.skip_empty_coordinates => {
                debug!("Skipping record without coordinates");
                return None;
            }
            None => Geometry::empty(),
        };
        Some(Feature::new(geometry, self.properties(located)))
    }

    /// Geometry of a record with non-empty coordinates
    fn geometry(&self, record: &JsonObject) -> Option<Geometry> {
        let field = &self.options.geometry_field;
        let geometry = path::get_in(record, field)
            .or_else(|| path::get_literal(record, field))?
            .as_object()?;

        let coordinates = geometry
            .get(&self.options.coordinates_field)
            .filter(|c| !is_empty(c))?;

        let kind = self
            .options
            .geometry_type
            .as_deref()
            .or_else(|| geometry.get("type").and_then(JsonValue::as_str))
            .unwrap_or(FALLBACK_GEOMETRY_TYPE);

        Some(Geometry::new(kind, coordinates.clone()))
    }

    fn properties(&self, located: &LocatedRecord<'_>) -> JsonObject {
        let options = &self.options;
        let aliases = &options.aliases;
        let mut properties = JsonObject::new();

        // The record's own id only; ancestors never lend theirs
        let id = path::get_in(located.record, &options.id_field)
            .or_else(|| path::get_literal(located.record, &options.id_field))
            .cloned()
            .unwrap_or(JsonValue::Null);
        properties.insert(options.id_output_key.clone(), id);

        if options.include_all_properties {
            for (key, value) in located.record {
                if *key != options.geometry_field && *key != options.id_output_key {
                    properties.insert(key.clone(), value.clone());
                }
            }
        } else {
            for spec in &self.specs {
                if spec.output_key == options.id_output_key {
                    continue;
                }
                let value = located
                    .resolve_first(&spec.candidates, aliases)
                    .cloned()
                    .unwrap_or(JsonValue::Null);
                properties.insert(spec.output_key.clone(), value);
            }
        }

        if options.path_ids.enabled {
            let id_field = options.path_ids.id_field.as_deref().unwrap_or(&options.id_field);
            for (key, ancestor) in &located.trail {
                let name = options.path_ids.name_for(key);
                if name == options.id_output_key {
                    continue;
                }
                let value = path::get_in(ancestor, id_field)
                    .cloned()
                    .unwrap_or(JsonValue::Null);
                properties.insert(name, value);
            }
        }

        properties
    }
}

/// Coordinates count as empty when null, an empty list, object or string
fn is_empty(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(map) => map.is_empty(),
        JsonValue::String(s) => s.is_empty(),
        _ => false,
    }
}
