//! Catalog metadata describing what the CDN holds.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};

/// The CDN catalog, loaded from `metadata/catalog.json`.
///
/// Immutable once loaded. It only describes what is *listable*; the loader
/// will still attempt identifiers that are absent from it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Catalog {
    /// Timestamp of the last CDN update, as published.
    pub last_updated: String,
    /// Files available per category name.
    pub data_categories: BTreeMap<String, CategoryFiles>,
}

/// File identifiers available in one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryFiles {
    /// File identifiers, in publication order.
    #[serde(default)]
    pub files: Vec<String>,
}

impl Catalog {
    /// Parse a catalog document.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(|e| Error::InvalidData {
            context: "catalog",
            detail: e.to_string(),
        })
    }

    /// Ordered file identifiers for a category.
    pub fn files(&self, category: &str) -> Result<&[String]> {
        self.data_categories
            .get(category)
            .map(|c| c.files.as_slice())
            .ok_or_else(|| Error::UnknownCategory {
                category: category.to_string(),
            })
    }

    /// Category names present in the catalog.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.data_categories.keys().map(String::as_str)
    }
}
