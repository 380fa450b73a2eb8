//! Result caching for slice and tag metrics.
//!
//! Entries are keyed by the JSON serialisation of a metric key, so two keys
//! are the same entry exactly when they serialise identically. The cache is
//! unbounded unless configured with a maximum, in which case the least
//! recently used entry is evicted.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;

use crate::config::MetricCacheConfig;
use crate::error::DashboardResult;

/// Thread-safe cache of metric results keyed by serialised metric keys.
///
/// # Example
///
/// ```ignore
/// use evalboard_state::{cache_key, MetricCache, MetricCacheConfig};
///
/// let cache = MetricCache::new(MetricCacheConfig::unbounded());
/// let key = cache_key(&metric_key)?;
/// cache.put(key.clone(), result);
/// assert!(cache.get(&key).is_some());
/// ```
pub struct MetricCache<V> {
    inner: Mutex<LruCache<String, V>>,
    capacity: Option<usize>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<V: Clone> MetricCache<V> {
    /// Creates a cache with the given configuration.
    ///
    /// A bound of 0 is treated as 1.
    pub fn new(config: MetricCacheConfig) -> Self {
        let inner = match config.max_entries {
            Some(max) => LruCache::new(NonZeroUsize::new(max).unwrap_or(NonZeroUsize::MIN)),
            None => LruCache::unbounded(),
        };
        Self {
            inner: Mutex::new(inner),
            capacity: config.max_entries.map(|max| max.max(1)),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Gets a cached result, promoting it to most-recently-used.
    ///
    /// Counts a hit or a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let found = self.inner.lock().get(key).cloned();
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Stores a result.
    pub fn put(&self, key: String, value: V) {
        self.inner.lock().put(key, value);
    }

    /// Checks if a key is cached without affecting LRU order or counters.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().contains(key)
    }

    /// Returns the number of cached results.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears every entry. Counters are kept.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<V> std::fmt::Debug for MetricCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricCache")
            .field("entries", &self.inner.lock().len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// Statistics about the cache state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached results.
    pub entries: usize,
    /// Maximum number of results (None = unbounded).
    pub capacity: Option<usize>,
    /// Lookups served from the cache.
    pub hits: usize,
    /// Lookups that missed.
    pub misses: usize,
}

impl CacheStats {
    /// Returns the hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Serialises a metric key into its cache identity.
pub fn cache_key<K: Serialize>(key: &K) -> DashboardResult<String> {
    Ok(serde_json::to_string(key)?)
}
