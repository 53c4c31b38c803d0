//! Cache abstractions for storing decoded datasets.
//!
//! This module provides a `Cache` trait and an in-memory implementation,
//! keyed by logical path (the path before any compression suffix).
//!
//! Entries never expire and are never evicted; [`Cache::clear`] is the
//! only way to invalidate them.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use geocdn_decode::FeatureCollection;

/// A cache for storing decoded feature collections.
///
/// Implementations must tolerate concurrent readers and writers. Two
/// writers racing on the same key is allowed; the last write wins.
pub trait Cache: Send + Sync {
    /// Get a collection from the cache.
    fn get(&self, path: &str) -> Option<Arc<FeatureCollection>>;

    /// Store a collection, replacing any previous entry for the path.
    fn put(&self, path: &str, data: Arc<FeatureCollection>);

    /// Check if a path is cached without retrieving it.
    fn contains(&self, path: &str) -> bool;

    /// Number of cached entries.
    fn len(&self) -> usize;

    /// Check if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all cached data.
    fn clear(&self);
}

/// An unbounded in-memory cache.
///
/// This cache stores data in a `HashMap` protected by a `RwLock`. Clones
/// share the same underlying map.
#[derive(Debug, Default, Clone)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, Arc<FeatureCollection>>>>,
}

impl MemoryCache {
    /// Create a new, empty memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// A poisoned lock only means another thread panicked mid-insert; the map
// itself is still consistent.
impl Cache for MemoryCache {
    fn get(&self, path: &str) -> Option<Arc<FeatureCollection>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(path).cloned()
    }

    fn put(&self, path: &str, data: Arc<FeatureCollection>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(path.to_string(), data);
    }

    fn contains(&self, path: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.contains_key(path)
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
