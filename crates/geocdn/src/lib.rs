//! Async client for loading GeoJSON datasets from the carto data CDN.
//!
//! The CDN is a static, versioned file tree served over plain HTTP:
//!
//! - `metadata/catalog.json` lists the available files per category
//! - `data/<category>/<name>.geojson[.gz]` holds each dataset
//!
//! [`DataLoader`] resolves logical dataset names to those paths, fetches
//! them (gzip first, plain JSON as a fallback), decodes them into
//! [`FeatureCollection`]s and memoizes the result per logical path.
//!
//! # Design principles
//!
//! - **Runtime-agnostic**: Returns `impl Future`, works with any executor
//! - **Injectable seams**: Network access goes through [`Transport`], storage through [`Cache`]
//! - **Best-effort compression**: A failed `.gz` load falls back exactly once to the plain file
//!
//! # Example
//!
//! ```ignore
//! use geocdn::DataLoader;
//!
//! let loader = DataLoader::new();
//! if loader.initialize().await {
//!     println!("{:?}", loader.list_available_files("countries")?);
//! }
//! let france = loader.load_country("FR").await?;
//! println!("{} barriers", france.len());
//! ```

pub mod cache;
mod catalog;
mod error;
mod loader;
mod transport;
pub mod types;

pub use cache::{Cache, MemoryCache};
pub use catalog::{Catalog, CategoryFiles};
pub use error::{Error, Result};
pub use loader::{DEFAULT_BASE_URL, DataLoader};
pub use transport::{FetchFuture, HttpTransport, Transport};
pub use types::Category;

// Re-export decode types for convenience.
pub use geocdn_decode::{
    DecodeError, Encoding, Feature, FeatureCollection, compress, decode_feature_collection,
    parse_feature_collection,
};
