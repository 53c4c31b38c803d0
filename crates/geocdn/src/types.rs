//! Dataset categories and logical path construction.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Extension shared by every dataset on the CDN, before any compression suffix.
pub const GEOJSON_EXTENSION: &str = ".geojson";

/// A dataset category on the CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Per-country datasets (`countries/<code>.geojson`).
    Countries,
    /// Per-barrier-type datasets (`types/<name>.geojson`).
    Types,
    /// Per-region datasets (`regions/<name>.geojson`).
    Regions,
}

impl Category {
    /// All categories.
    pub const ALL: [Category; 3] = [Category::Types, Category::Countries, Category::Regions];

    /// The directory name of this category, which is also its catalog key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Countries => "countries",
            Category::Types => "types",
            Category::Regions => "regions",
        }
    }

    /// Build the logical path for an identifier in this category.
    ///
    /// The identifier is lower-cased, so `"FR"` and `"fr"` share a path.
    #[must_use]
    pub fn logical_path(self, identifier: &str) -> String {
        format!(
            "{}/{}{GEOJSON_EXTENSION}",
            self.as_str(),
            identifier.to_lowercase()
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::UnknownCategory {
                category: s.to_string(),
            })
    }
}
