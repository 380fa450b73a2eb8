//! Slice and tag metric fetching with per-key caching.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;

use crate::api::{GroupMetric, MetricKey, MetricRequest, TagMetricKey, TagMetricRequest};
use crate::backend::DashboardBackend;
use crate::cache::{cache_key, CacheStats, MetricCache};
use crate::config::MetricCacheConfig;
use crate::error::{DashboardError, DashboardResult};

/// Fetches slice and tag metrics, serving repeated keys from cache.
///
/// Each call splits its keys into cached and missing ones. Missing keys are
/// de-duplicated and fetched in a single backend call (no call at all when
/// everything is cached), written back into the cache, and the results are
/// returned in the order the keys were requested.
///
/// Backend errors propagate and leave the cache untouched.
pub struct MetricFetcher {
    backend: Arc<dyn DashboardBackend>,
    slices: MetricCache<GroupMetric>,
    tags: MetricCache<GroupMetric>,
}

impl MetricFetcher {
    /// Creates a fetcher with the given cache configuration for both caches.
    pub fn new(backend: Arc<dyn DashboardBackend>, config: MetricCacheConfig) -> Self {
        Self {
            backend,
            slices: MetricCache::new(config.clone()),
            tags: MetricCache::new(config),
        }
    }

    /// Metrics for slice/model/metric keys.
    ///
    /// `data_ids` restricts the rows of a backend call but is not part of the
    /// cache key: a key cached under one tag restriction is served unchanged
    /// under another. Callers that change the restriction and need fresh
    /// values must use a new fetcher.
    pub async fn get_metrics_for_slices(
        &self,
        keys: &[MetricKey],
        data_ids: Option<&[String]>,
    ) -> DashboardResult<Vec<GroupMetric>> {
        let data_ids = data_ids.map(<[String]>::to_vec);
        resolve(&self.slices, keys, |missing| async move {
            let request = MetricRequest {
                metric_keys: missing,
                data_ids,
            };
            self.backend.slice_metrics(&request).await
        })
        .await
    }

    /// Metrics for tag/model/metric keys.
    pub async fn get_metrics_for_tags(
        &self,
        keys: &[TagMetricKey],
    ) -> DashboardResult<Vec<GroupMetric>> {
        resolve(&self.tags, keys, |missing| async move {
            let request = TagMetricRequest {
                metric_keys: missing,
            };
            self.backend.tag_metrics(&request).await
        })
        .await
    }

    /// Slice cache statistics.
    pub fn slice_cache_stats(&self) -> CacheStats {
        self.slices.stats()
    }

    /// Tag cache statistics.
    pub fn tag_cache_stats(&self) -> CacheStats {
        self.tags.stats()
    }
}

impl std::fmt::Debug for MetricFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricFetcher")
            .field("slices", &self.slices)
            .field("tags", &self.tags)
            .finish()
    }
}

async fn resolve<K, F, Fut>(
    cache: &MetricCache<GroupMetric>,
    keys: &[K],
    fetch: F,
) -> DashboardResult<Vec<GroupMetric>>
where
    K: Serialize + Clone,
    F: FnOnce(Vec<K>) -> Fut,
    Fut: Future<Output = DashboardResult<Vec<GroupMetric>>>,
{
    let identities = keys.iter().map(cache_key).collect::<DashboardResult<Vec<_>>>()?;

    let mut resolved: HashMap<&str, GroupMetric> = HashMap::new();
    let mut missing: Vec<(&str, K)> = Vec::new();
    for (identity, key) in identities.iter().zip(keys) {
        let identity = identity.as_str();
        if resolved.contains_key(identity) || missing.iter().any(|(m, _)| *m == identity) {
            continue;
        }
        match cache.get(identity) {
            Some(metric) => {
                resolved.insert(identity, metric);
            }
            None => missing.push((identity, key.clone())),
        }
    }

    tracing::debug!(
        requested = keys.len(),
        cached = resolved.len(),
        missing = missing.len(),
        "resolving metric keys"
    );

    if !missing.is_empty() {
        let expected = missing.len();
        let (missing_identities, missing_keys): (Vec<&str>, Vec<K>) = missing.into_iter().unzip();
        let fetched = fetch(missing_keys).await?;
        if fetched.len() != expected {
            return Err(DashboardError::Protocol(format!(
                "expected {} metric results, got {}",
                expected,
                fetched.len()
            )));
        }
        for (identity, metric) in missing_identities.into_iter().zip(fetched) {
            cache.put(identity.to_string(), metric.clone());
            resolved.insert(identity, metric);
        }
    }

    identities
        .iter()
        .map(|identity| {
            resolved.get(identity.as_str()).cloned().ok_or_else(|| {
                DashboardError::Protocol(format!("no metric resolved for {}", identity))
            })
        })
        .collect()
}
