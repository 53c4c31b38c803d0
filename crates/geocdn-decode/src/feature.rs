//! GeoJSON feature-collection model.
//!
//! A collection wraps the parsed JSON document untouched: any valid JSON
//! parses, and the typed accessors read through it without ever failing.
//! Members with an unexpected type read as absent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A decoded GeoJSON feature collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureCollection {
    document: Value,
}

impl FeatureCollection {
    /// The GeoJSON `type` member, normally `"FeatureCollection"`.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.document.get("type")?.as_str()
    }

    /// Features in document order.
    ///
    /// Yields nothing when `features` is missing, `null` or not an array.
    /// Elements are yielded as-is, including `null` and non-objects.
    pub fn features(&self) -> impl Iterator<Item = Feature<'_>> {
        self.document
            .get("features")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(Feature)
    }

    /// Number of features in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.document
            .get("features")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Whether the collection has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Any top-level member by name (`bbox`, `crs`, `name`, ...).
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Value> {
        self.document.get(name)
    }

    /// The underlying JSON document.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.document
    }

    /// Unwrap into the underlying JSON document.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.document
    }
}

impl From<Value> for FeatureCollection {
    fn from(document: Value) -> Self {
        Self { document }
    }
}

/// A single feature: a geometry plus named properties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feature<'a>(&'a Value);

impl<'a> Feature<'a> {
    /// The GeoJSON `type` member, normally `"Feature"`.
    #[must_use]
    pub fn kind(&self) -> Option<&'a str> {
        self.0.get("type")?.as_str()
    }

    /// Feature identifier, string or number.
    #[must_use]
    pub fn id(&self) -> Option<&'a Value> {
        self.0.get("id")
    }

    /// Geometry object, kept opaque. `None` for a missing or `null` geometry.
    #[must_use]
    pub fn geometry(&self) -> Option<&'a Value> {
        self.0.get("geometry").filter(|g| !g.is_null())
    }

    /// Property map, if `properties` is an object.
    #[must_use]
    pub fn properties(&self) -> Option<&'a Map<String, Value>> {
        self.0.get("properties")?.as_object()
    }

    /// Look up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&'a Value> {
        self.properties()?.get(name)
    }

    /// The underlying JSON element.
    #[must_use]
    pub fn as_value(&self) -> &'a Value {
        self.0
    }
}
