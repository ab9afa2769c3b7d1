//! GeoJSON output types and build options

use crate::decode::DEFAULT_ROWS_KEY;
use crate::types::{JsonObject, JsonValue, StringMap};
use serde::{Deserialize, Serialize};

/// Geometry type used when neither the record nor the options name one
pub const FALLBACK_GEOMETRY_TYPE: &str = "GeometryCollection";

// ============================================================================
// Output
// ============================================================================

/// A feature geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: JsonValue,
}

impl Geometry {
    pub fn new(kind: impl Into<String>, coordinates: JsonValue) -> Self {
        Self {
            kind: kind.into(),
            coordinates,
        }
    }

    /// Placeholder geometry for records kept without coordinates
    pub fn empty() -> Self {
        Self::new(FALLBACK_GEOMETRY_TYPE, JsonValue::Array(Vec::new()))
    }
}

/// A single feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: JsonObject,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: JsonObject) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry,
            properties,
        }
    }
}

/// An ordered feature collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

// ============================================================================
// Options
// ============================================================================

/// Properties copied from every ancestor in the trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PathIdOptions {
    /// Emit one id property per trail entry
    pub enabled: bool,
    /// Appended to the trail key to name the property (`activityTemplate` -> `activityTemplateID`)
    pub suffix: String,
    /// Explicit property names per trail key
    pub names: StringMap,
    /// Id field read from each ancestor (defaults to the record id field)
    pub id_field: Option<String>,
}

impl Default for PathIdOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            suffix: "ID".to_string(),
            names: StringMap::new(),
            id_field: None,
        }
    }
}

impl PathIdOptions {
    /// Property name for a trail key
    pub fn name_for(&self, key: &str) -> String {
        self.names
            .get(key)
            .cloned()
            .unwrap_or_else(|| format!("{key}{}", self.suffix))
    }
}

/// How records become features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GeoJsonOptions {
    /// Keys leading from the document root to the feature-bearing records
    pub records_path: Vec<String>,
    /// Property specs (`path` or `outputKey=path1||path2`)
    pub properties: Vec<String>,
    /// Field (dotted path allowed) holding the geometry object
    pub geometry_field: String,
    /// Coordinates field inside the geometry object
    pub coordinates_field: String,
    /// Geometry type forced on every feature
    pub geometry_type: Option<String>,
    /// Dotted path of the record identifier
    pub id_field: String,
    /// Property receiving the identifier
    pub id_output_key: String,
    /// Copy every record field except the geometry field
    pub include_all_properties: bool,
    /// Drop records without coordinates
    pub skip_empty_coordinates: bool,
    /// Context aliases (`survey` -> `landSurvey`)
    pub aliases: StringMap,
    /// Ancestor id properties
    pub path_ids: PathIdOptions,
}

impl Default for GeoJsonOptions {
    fn default() -> Self {
        Self {
            records_path: vec![DEFAULT_ROWS_KEY.to_string()],
            properties: Vec::new(),
            geometry_field: "polygon".to_string(),
            coordinates_field: "coordinates".to_string(),
            geometry_type: None,
            id_field: "id".to_string(),
            id_output_key: "plotID".to_string(),
            include_all_properties: false,
            skip_empty_coordinates: true,
            aliases: StringMap::new(),
            path_ids: PathIdOptions::default(),
        }
    }
}

impl GeoJsonOptions {
    /// The classic plot export: polygon geometry, plot fields and owner fields
    pub fn plot_defaults() -> Self {
        let plot_fields = [
            "area",
            "status",
            "plotName",
            "plotLabels",
            "plotNote",
            "plotVillage",
            "plotDistrict",
            "plotAdditionalData",
            "externalId",
        ];
        let owner_fields = [
            "firstName",
            "lastName",
            "email",
            "phoneNumber",
            "country",
            "username",
            "gdprAccepted",
            "status",
        ];

        let properties = plot_fields
            .iter()
            .map(|f| (*f).to_string())
            .chain(owner_fields.iter().map(|f| format!("{f}_owner=owner.{f}")))
            .collect();

        Self {
            properties,
            geometry_type: Some("Polygon".to_string()),
            ..Default::default()
        }
    }

    /// Set the records path
    #[must_use]
    pub fn with_records_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.records_path = path.into_iter().map(Into::into).collect();
        self
    }

    /// Set the property specs
    #[must_use]
    pub fn with_properties<I, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = specs.into_iter().map(Into::into).collect();
        self
    }

    /// Copy every record field
    #[must_use]
    pub fn with_include_all(mut self, include_all: bool) -> Self {
        self.include_all_properties = include_all;
        self
    }

    /// Drop or keep records without coordinates
    #[must_use]
    pub fn with_skip_empty(mut self, skip: bool) -> Self {
        self.skip_empty_coordinates = skip;
        self
    }

    /// Add a context alias
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), target.into());
        self
    }
}
