//! Dataset loader for the carto data CDN.
//!
//! This module provides the main `DataLoader` type: it owns the catalog
//! metadata and the dataset cache, resolves logical names to CDN paths and
//! applies the compressed-to-plain fallback.

use std::sync::{Arc, PoisonError, RwLock};

use geocdn_decode::{Encoding, FeatureCollection};

use crate::cache::{Cache, MemoryCache};
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::transport::{HttpTransport, Transport};
use crate::types::Category;

/// Base URL of the public carto data CDN.
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/Gilles-Segura/carto-data-cdn/main";

/// Catalog location relative to the base URL.
const CATALOG_PATH: &str = "metadata/catalog.json";

/// Dataset root relative to the base URL.
const DATA_PATH: &str = "data";

/// Loads datasets from the CDN and memoizes them by logical path.
///
/// The loader is designed to be shared: every method takes `&self`, so it
/// can sit behind an `Arc` and serve concurrent callers. Concurrent loads
/// of the same uncached path are not coalesced; each performs its own fetch
/// and the last one to finish overwrites the cache entry.
///
/// # Example
///
/// ```ignore
/// let loader = DataLoader::new();
/// loader.initialize().await;
/// let seuils = loader.load_barrier_type("Seuil").await?;
/// ```
pub struct DataLoader<T: Transport = HttpTransport, C: Cache = MemoryCache> {
    transport: T,
    cache: C,
    catalog: RwLock<Option<Arc<Catalog>>>,
    base_url: String,
}

impl DataLoader {
    /// Create a loader for the public CDN with an HTTP transport and an
    /// in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(HttpTransport::new())
    }
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> DataLoader<T, MemoryCache> {
    /// Create a loader with a custom transport and an in-memory cache.
    #[must_use]
    pub fn with_transport(transport: T) -> Self {
        Self::with_transport_and_cache(transport, MemoryCache::new())
    }
}

impl<T: Transport, C: Cache> DataLoader<T, C> {
    /// Create a loader with a custom transport and cache.
    #[must_use]
    pub fn with_transport_and_cache(transport: T, cache: C) -> Self {
        Self {
            transport,
            cache,
            catalog: RwLock::new(None),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a custom base URL, e.g. a mirror or a local test server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// The base URL all resources are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The dataset cache.
    #[must_use]
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Fetch and parse the catalog without storing it.
    pub async fn fetch_catalog(&self) -> Result<Catalog> {
        let url = format!("{}/{CATALOG_PATH}", self.base_url);
        tracing::debug!(%url, "fetching catalog");
        let data = self.transport.fetch(&url).await?;
        Catalog::from_slice(&data)
    }

    /// Load the catalog, replacing any previously loaded one.
    ///
    /// Returns `false` if the catalog could not be fetched or parsed. The
    /// failure is logged and is not fatal: datasets can still be loaded
    /// directly. A failed call keeps whatever catalog was loaded before.
    pub async fn initialize(&self) -> bool {
        match self.fetch_catalog().await {
            Ok(catalog) => {
                tracing::info!(
                    last_updated = %catalog.last_updated,
                    categories = catalog.data_categories.len(),
                    "catalog initialized"
                );
                *self.catalog.write().unwrap_or_else(PoisonError::into_inner) =
                    Some(Arc::new(catalog));
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to initialize catalog");
                false
            }
        }
    }

    /// The loaded catalog, if `initialize` has succeeded.
    #[must_use]
    pub fn catalog(&self) -> Option<Arc<Catalog>> {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Timestamp of the last CDN update, if the catalog is loaded.
    #[must_use]
    pub fn last_updated(&self) -> Option<String> {
        self.catalog().map(|c| c.last_updated.clone())
    }

    /// Discard the loaded catalog. Catalog operations fail until the next
    /// successful `initialize`.
    pub fn reset_catalog(&self) {
        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// List the file identifiers the catalog advertises for a category.
    pub fn list_available_files(&self, category: &str) -> Result<Vec<String>> {
        let catalog = self.catalog().ok_or(Error::NotInitialized)?;
        Ok(catalog.files(category)?.to_vec())
    }

    /// Load a dataset by logical path, preferring the gzip variant.
    pub async fn load(&self, path: &str) -> Result<Arc<FeatureCollection>> {
        self.load_geojson(path, true).await
    }

    /// Load a dataset by logical path (e.g. `countries/france.geojson`).
    ///
    /// A cached entry for `path` is returned as-is, whichever variant
    /// produced it. Otherwise the `.gz` variant is tried first when
    /// `use_compressed` is set; if fetching or decoding it fails, the plain
    /// variant is tried exactly once and its outcome is returned.
    pub async fn load_geojson(
        &self,
        path: &str,
        use_compressed: bool,
    ) -> Result<Arc<FeatureCollection>> {
        if let Some(data) = self.cache.get(path) {
            tracing::debug!(path, "cache hit");
            return Ok(data);
        }

        let encoding = if use_compressed {
            Encoding::Gzip
        } else {
            Encoding::Identity
        };

        let collection = match self.fetch_and_decode(path, encoding).await {
            Ok(collection) => collection,
            Err(e) if encoding == Encoding::Gzip => {
                tracing::warn!(
                    path,
                    error = %e,
                    "compressed load failed, falling back to uncompressed"
                );
                // Another caller may have stored the path while the gzip attempt ran.
                if let Some(data) = self.cache.get(path) {
                    tracing::debug!(path, "cache hit");
                    return Ok(data);
                }
                self.fetch_and_decode(path, Encoding::Identity).await?
            }
            Err(e) => return Err(e),
        };

        let collection = Arc::new(collection);
        self.cache.put(path, Arc::clone(&collection));
        tracing::debug!(path, features = collection.len(), "cached");

        Ok(collection)
    }

    /// Load the dataset for `name` within a category.
    pub async fn load_category(
        &self,
        category: Category,
        name: &str,
    ) -> Result<Arc<FeatureCollection>> {
        self.load(&category.logical_path(name)).await
    }

    /// Load a country dataset (`countries/<code>.geojson`).
    pub async fn load_country(&self, code: &str) -> Result<Arc<FeatureCollection>> {
        self.load_category(Category::Countries, code).await
    }

    /// Load a barrier-type dataset (`types/<name>.geojson`).
    pub async fn load_barrier_type(&self, name: &str) -> Result<Arc<FeatureCollection>> {
        self.load_category(Category::Types, name).await
    }

    /// Load a region dataset (`regions/<name>.geojson`).
    pub async fn load_region(&self, name: &str) -> Result<Arc<FeatureCollection>> {
        self.load_category(Category::Regions, name).await
    }

    /// Whether a logical path is cached.
    #[must_use]
    pub fn is_cached(&self, path: &str) -> bool {
        self.cache.contains(path)
    }

    /// Number of cached datasets.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached dataset.
    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::info!("cache cleared");
    }

    /// Fetch one encoding variant of a dataset and decode it.
    async fn fetch_and_decode(&self, path: &str, encoding: Encoding) -> Result<FeatureCollection> {
        let url = format!("{}/{DATA_PATH}/{path}{}", self.base_url, encoding.suffix());
        tracing::debug!(%url, "fetching");

        let data = self.transport.fetch(&url).await?;
        Ok(geocdn_decode::decode_feature_collection(&data, encoding)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::FetchFuture;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const BASE: &str = "https://cdn.test";

    const FRANCE: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","geometry":{"type":"Point","coordinates":[2.35,48.85]},"properties":{"name":"Seuil de Bercy"}},
        {"type":"Feature","geometry":{"type":"Point","coordinates":[4.83,45.76]},"properties":{"name":"Barrage de Lyon"}}
    ]}"#;

    const CATALOG: &str = r#"{
        "last_updated": "2025-03-14T09:26:53",
        "data_categories": {"countries": {"files": ["france.geojson"]}}
    }"#;

    /// In-memory transport that records every requested URL.
    #[derive(Default)]
    struct MockTransport {
        responses: HashMap<String, Vec<u8>>,
        requests: Arc<Mutex<Vec<String>>>,
        /// Runs on every fetch, before the response is produced.
        on_fetch: Option<Box<dyn Fn(&str) + Send + Sync>>,
    }

    impl MockTransport {
        fn serve(mut self, path: &str, data: impl Into<Vec<u8>>) -> Self {
            self.responses.insert(format!("{BASE}/{path}"), data.into());
            self
        }

        fn serve_gzip(self, path: &str, doc: &str) -> Self {
            let gz = geocdn_decode::compress(doc.as_bytes()).unwrap();
            self.serve(path, gz)
        }
    }

    impl Transport for MockTransport {
        fn fetch(&self, url: &str) -> FetchFuture<'_> {
            self.requests.lock().unwrap().push(url.to_string());
            if let Some(on_fetch) = &self.on_fetch {
                on_fetch(url);
            }
            let result = self.responses.get(url).cloned().ok_or(Error::HttpStatus {
                url: url.to_string(),
                status: 404,
            });
            Box::pin(async move { result })
        }
    }

    fn loader(transport: MockTransport) -> (DataLoader<MockTransport>, Arc<Mutex<Vec<String>>>) {
        let requests = Arc::clone(&transport.requests);
        (DataLoader::with_transport(transport).with_base_url(BASE), requests)
    }

    fn request_count(requests: &Mutex<Vec<String>>) -> usize {
        requests.lock().unwrap().len()
    }

    #[tokio::test]
    async fn test_load_compressed() {
        let (loader, requests) =
            loader(MockTransport::default().serve_gzip("data/countries/france.geojson.gz", FRANCE));

        let fc = loader.load("countries/france.geojson").await.unwrap();

        assert_eq!(fc.len(), 2);
        assert_eq!(
            *requests.lock().unwrap(),
            [format!("{BASE}/data/countries/france.geojson.gz")]
        );
    }

    #[tokio::test]
    async fn test_load_twice_fetches_once() {
        let (loader, requests) =
            loader(MockTransport::default().serve_gzip("data/types/seuil.geojson.gz", FRANCE));

        let first = loader.load("types/seuil.geojson").await.unwrap();
        let second = loader.load("types/seuil.geojson").await.unwrap();

        assert_eq!(request_count(&requests), 1);
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_country_code_case_shares_entry() {
        let (loader, requests) = loader(
            MockTransport::default().serve_gzip("data/countries/fr.geojson.gz", FRANCE),
        );

        loader.load_country("FR").await.unwrap();
        loader.load_country("fr").await.unwrap();

        assert_eq!(request_count(&requests), 1);
        assert_eq!(loader.cache_len(), 1);
        assert!(loader.is_cached("countries/fr.geojson"));
    }

    #[tokio::test]
    async fn test_fallback_to_uncompressed_on_404() {
        let (loader, requests) =
            loader(MockTransport::default().serve("data/regions/bretagne.geojson", FRANCE));

        let fc = loader.load_region("Bretagne").await.unwrap();

        assert_eq!(fc.len(), 2);
        assert_eq!(
            *requests.lock().unwrap(),
            [
                format!("{BASE}/data/regions/bretagne.geojson.gz"),
                format!("{BASE}/data/regions/bretagne.geojson"),
            ]
        );
        assert!(loader.is_cached("regions/bretagne.geojson"));
    }

    #[tokio::test]
    async fn test_fallback_on_corrupt_gzip() {
        let (loader, _) = loader(
            MockTransport::default()
                .serve("data/types/seuil.geojson.gz", b"\x1f\x8b garbage".to_vec())
                .serve("data/types/seuil.geojson", FRANCE),
        );

        let fc = loader.load_barrier_type("seuil").await.unwrap();
        assert_eq!(fc.len(), 2);
    }

    #[tokio::test]
    async fn test_no_double_fallback() {
        let (loader, requests) = loader(MockTransport::default());

        let err = loader.load("countries/atlantis.geojson").await.unwrap_err();

        // The surfaced error is the fallback's, after exactly two attempts.
        assert!(matches!(
            &err,
            Error::HttpStatus { url, status: 404 } if url == &format!("{BASE}/data/countries/atlantis.geojson")
        ));
        assert_eq!(request_count(&requests), 2);
        assert_eq!(loader.cache_len(), 0);
    }

    #[tokio::test]
    async fn test_fallback_rechecks_cache() {
        let cache = MemoryCache::new();
        let shared = cache.clone();

        // Simulate a concurrent load finishing while the gzip fetch is in flight.
        let transport = MockTransport {
            on_fetch: Some(Box::new(move |url: &str| {
                if url.ends_with(".gz") {
                    shared.put(
                        "types/seuil.geojson",
                        Arc::new(FeatureCollection::from(serde_json::json!({"features": [{}]}))),
                    );
                }
            })),
            ..MockTransport::default()
        };
        let requests = Arc::clone(&transport.requests);
        let loader = DataLoader::with_transport_and_cache(transport, cache).with_base_url(BASE);

        let fc = loader.load_barrier_type("Seuil").await.unwrap();

        assert_eq!(fc.len(), 1);
        assert_eq!(
            *requests.lock().unwrap(),
            [format!("{BASE}/data/types/seuil.geojson.gz")]
        );
    }

    #[tokio::test]
    async fn test_uncompressed_failure_does_not_fall_back() {
        let (loader, requests) = loader(
            MockTransport::default().serve("data/countries/france.geojson", "not json"),
        );

        let err = loader
            .load_geojson("countries/france.geojson", false)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Decode(geocdn_decode::DecodeError::Parse { .. })));
        assert_eq!(request_count(&requests), 1);
    }

    #[tokio::test]
    async fn test_cache_ignores_variant() {
        let (loader, requests) = loader(
            MockTransport::default().serve_gzip("data/countries/france.geojson.gz", FRANCE),
        );

        loader.load_geojson("countries/france.geojson", true).await.unwrap();
        loader.load_geojson("countries/france.geojson", false).await.unwrap();

        assert_eq!(request_count(&requests), 1);
    }

    #[tokio::test]
    async fn test_clear_cache_refetches() {
        let (loader, requests) = loader(
            MockTransport::default().serve_gzip("data/countries/france.geojson.gz", FRANCE),
        );

        loader.load_country("france").await.unwrap();
        loader.clear_cache();
        assert_eq!(loader.cache_len(), 0);

        loader.load_country("france").await.unwrap();
        assert_eq!(request_count(&requests), 2);
    }

    #[tokio::test]
    async fn test_list_before_initialize() {
        let (loader, _) = loader(MockTransport::default());
        assert!(matches!(
            loader.list_available_files("countries"),
            Err(Error::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_initialize_failure_is_not_fatal() {
        let (loader, _) = loader(
            MockTransport::default().serve_gzip("data/countries/france.geojson.gz", FRANCE),
        );

        assert!(!loader.initialize().await);
        assert!(loader.catalog().is_none());

        // Direct loads still work without a catalog.
        assert_eq!(loader.load_country("France").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_initialize_rejects_malformed_catalog() {
        let (loader, _) =
            loader(MockTransport::default().serve("metadata/catalog.json", "{\"oops\": 1}"));

        assert!(!loader.initialize().await);
        assert!(matches!(
            loader.list_available_files("countries"),
            Err(Error::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_unknown_category() {
        let (loader, _) = loader(MockTransport::default().serve("metadata/catalog.json", CATALOG));
        assert!(loader.initialize().await);

        let before = loader.catalog().unwrap();
        assert!(matches!(
            loader.list_available_files("nonexistent"),
            Err(Error::UnknownCategory { category }) if category == "nonexistent"
        ));
        assert_eq!(*loader.catalog().unwrap(), *before);
        assert_eq!(loader.cache_len(), 0);
    }

    #[tokio::test]
    async fn test_reset_catalog() {
        let (loader, _) = loader(MockTransport::default().serve("metadata/catalog.json", CATALOG));
        assert!(loader.initialize().await);
        assert_eq!(loader.last_updated().as_deref(), Some("2025-03-14T09:26:53"));

        loader.reset_catalog();
        assert!(loader.last_updated().is_none());
        assert!(matches!(
            loader.list_available_files("countries"),
            Err(Error::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let (loader, requests) = loader(
            MockTransport::default()
                .serve("metadata/catalog.json", CATALOG)
                .serve_gzip(
                    "data/countries/france.geojson.gz",
                    r#"{"features":[{"properties":{"id":1}},{"properties":{"id":2}}]}"#,
                ),
        );

        assert!(loader.initialize().await);
        assert_eq!(
            loader.list_available_files("countries").unwrap(),
            ["france.geojson"]
        );

        let fc = loader.load_country("France").await.unwrap();

        assert_eq!(fc.len(), 2);
        assert!(loader.is_cached("countries/france.geojson"));
        assert_eq!(
            requests.lock().unwrap().last().map(String::as_str),
            Some("https://cdn.test/data/countries/france.geojson.gz")
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let loader = DataLoader::with_transport(MockTransport::default())
            .with_base_url("https://mirror.test/cdn/");
        assert_eq!(loader.base_url(), "https://mirror.test/cdn");
    }

    #[test]
    fn test_loader_default() {
        let loader = DataLoader::new();
        assert!(loader.base_url().starts_with("https://"));
        assert!(loader.cache().is_empty());
    }
}
