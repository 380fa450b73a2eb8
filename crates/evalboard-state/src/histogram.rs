//! Histogram request orchestration.
//!
//! Histograms are fetched in two phases. [`HistogramOrchestrator::get_buckets`]
//! returns bucket boundaries and unfiltered sizes; it is fast and only
//! depends on the columns. [`HistogramOrchestrator::get_counts`] fills in
//! filtered sizes and, when a model and metric are selected, bucket metrics.
//!
//! Every `get_counts` call takes a new generation. A result is written into
//! the shared bucket state only if its generation is still the latest one
//! issued, so a superseded request that resolves late is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use evalboard_filter::{Column, FilterPredicateGroup};
use parking_lot::RwLock;

use crate::api::{ColumnRequest, HistogramBucket, HistogramRequest};
use crate::backend::DashboardBackend;
use crate::error::{DashboardError, DashboardResult};
use crate::store::Snapshot;

/// Global metric range used to normalise colour scales across histograms.
///
/// Starts at the `[+inf, -inf]` sentinel and is filled once, by the first
/// successful population of bucket metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRange {
    /// Smallest bucket metric seen.
    pub min: f64,
    /// Largest bucket metric seen.
    pub max: f64,
}

impl MetricRange {
    /// The uninitialised sentinel.
    pub const UNSET: MetricRange = MetricRange {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// Returns true while the range still holds the sentinel.
    pub fn is_unset(&self) -> bool {
        self.min == f64::INFINITY && self.max == f64::NEG_INFINITY
    }

    /// Range of every defined metric in `histograms`, or `None` if no bucket
    /// carries a metric.
    pub fn of(histograms: &[Vec<HistogramBucket>]) -> Option<Self> {
        let mut range = Self::UNSET;
        for metric in histograms
            .iter()
            .flatten()
            .filter_map(|b| b.metric)
            .filter(|m| !m.is_nan())
        {
            range.min = range.min.min(metric);
            range.max = range.max.max(metric);
        }
        (!range.is_unset()).then_some(range)
    }
}

impl Default for MetricRange {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Filter, tag restriction, model and metric for a counts request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramQuery {
    /// Composed filter (None = all rows).
    pub filter_predicates: Option<FilterPredicateGroup>,
    /// Restriction to explicit data ids.
    pub data_ids: Option<Vec<String>>,
    /// Selected model.
    pub model: Option<String>,
    /// Selected metric.
    pub metric: Option<String>,
}

impl HistogramQuery {
    /// Query for the current selection state.
    pub fn from_snapshot(snapshot: &Snapshot, model: Option<&str>, metric: Option<&str>) -> Self {
        Self {
            filter_predicates: snapshot.composed.clone(),
            data_ids: snapshot.data_ids.clone(),
            model: model.map(str::to_string),
            metric: metric.map(str::to_string),
        }
    }

    fn wants_metrics(&self) -> bool {
        self.model.is_some() && self.metric.is_some()
    }
}

#[derive(Debug, Default)]
struct Current {
    generation: u64,
    columns: Vec<Column>,
    histograms: Option<Vec<Vec<HistogramBucket>>>,
}

/// Orchestrates histogram requests for one consuming view.
pub struct HistogramOrchestrator {
    backend: Arc<dyn DashboardBackend>,
    issued: AtomicU64,
    current: RwLock<Current>,
    metric_range: Arc<RwLock<MetricRange>>,
}

impl HistogramOrchestrator {
    /// Creates an orchestrator with its own metric range.
    pub fn new(backend: Arc<dyn DashboardBackend>) -> Self {
        Self::with_metric_range(backend, Arc::new(RwLock::new(MetricRange::UNSET)))
    }

    /// Creates an orchestrator sharing a metric range with other views.
    pub fn with_metric_range(
        backend: Arc<dyn DashboardBackend>,
        metric_range: Arc<RwLock<MetricRange>>,
    ) -> Self {
        Self {
            backend,
            issued: AtomicU64::new(0),
            current: RwLock::new(Current::default()),
            metric_range,
        }
    }

    /// Bucket skeletons for columns visible under `model`: columns not tied
    /// to a model, plus the columns of `model` itself.
    pub async fn get_buckets(
        &self,
        columns: &[Column],
        model: Option<&str>,
    ) -> DashboardResult<(Vec<Column>, Vec<Vec<HistogramBucket>>)> {
        let visible: Vec<Column> = columns
            .iter()
            .filter(|c| c.model().is_none() || c.model() == model)
            .cloned()
            .collect();

        let mut histograms = self.backend.histogram_buckets(&visible).await?;
        if histograms.len() != visible.len() {
            return Err(DashboardError::Protocol(format!(
                "expected buckets for {} columns, got {}",
                visible.len(),
                histograms.len()
            )));
        }
        for bucket in histograms.iter_mut().flatten() {
            bucket.filtered_size = bucket.size;
        }
        Ok((visible, histograms))
    }

    /// Fills filtered sizes and metrics into copies of `buckets`.
    ///
    /// Supersedes every earlier call. On failure the previous state
    /// (`buckets`) is returned unchanged. When superseded, the latest shared
    /// state is returned instead of this call's result if it covers the same
    /// `columns`, and `buckets` otherwise, so the result always stays
    /// aligned with `columns`.
    pub async fn get_counts(
        &self,
        columns: &[Column],
        buckets: &[Vec<HistogramBucket>],
        query: &HistogramQuery,
    ) -> Vec<Vec<HistogramBucket>> {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        match self.populate(columns, buckets, query).await {
            Ok(histograms) => self.commit(generation, columns, histograms, buckets),
            Err(err) => {
                tracing::warn!(generation, error = %err, "histogram refresh failed");
                buckets.to_vec()
            }
        }
    }

    /// Discards the result of any request still in flight.
    pub fn cancel(&self) {
        self.issued.fetch_add(1, Ordering::SeqCst);
    }

    /// Latest committed histograms.
    pub fn histograms(&self) -> Option<Vec<Vec<HistogramBucket>>> {
        self.current.read().histograms.clone()
    }

    /// Generation of the most recently issued request.
    pub fn latest_generation(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Current metric range.
    pub fn metric_range(&self) -> MetricRange {
        *self.metric_range.read()
    }

    /// Resets the metric range to its sentinel and forgets committed state.
    pub fn reset(&self) {
        *self.metric_range.write() = MetricRange::UNSET;
        *self.current.write() = Current::default();
    }

    async fn populate(
        &self,
        columns: &[Column],
        buckets: &[Vec<HistogramBucket>],
        query: &HistogramQuery,
    ) -> DashboardResult<Vec<Vec<HistogramBucket>>> {
        let request = HistogramRequest {
            column_requests: columns
                .iter()
                .zip(buckets)
                .map(|(column, buckets)| ColumnRequest {
                    column: column.clone(),
                    buckets: buckets.clone(),
                })
                .collect(),
            filter_predicates: query.filter_predicates.clone(),
            model: query.model.clone(),
            metric: query.metric.clone(),
            data_ids: query.data_ids.clone(),
        };

        let mut histograms = buckets.to_vec();

        let counts = self.backend.histogram_counts(&request).await?;
        check_shape(&histograms, &counts, "counts")?;
        for (column, counts) in histograms.iter_mut().zip(counts) {
            for (bucket, count) in column.iter_mut().zip(counts) {
                bucket.filtered_size = count;
            }
        }

        if query.wants_metrics() {
            let metrics = self.backend.histogram_metrics(&request).await?;
            check_shape(&histograms, &metrics, "metrics")?;
            for (column, metrics) in histograms.iter_mut().zip(metrics) {
                for (bucket, metric) in column.iter_mut().zip(metrics) {
                    bucket.metric = metric;
                }
            }
        }

        Ok(histograms)
    }

    fn commit(
        &self,
        generation: u64,
        columns: &[Column],
        histograms: Vec<Vec<HistogramBucket>>,
        previous: &[Vec<HistogramBucket>],
    ) -> Vec<Vec<HistogramBucket>> {
        let mut current = self.current.write();
        if generation != self.issued.load(Ordering::SeqCst) {
            tracing::debug!(generation, "discarding superseded histogram result");
            return match &current.histograms {
                Some(committed) if current.columns == columns => committed.clone(),
                _ => previous.to_vec(),
            };
        }

        {
            let mut range = self.metric_range.write();
            if range.is_unset() {
                if let Some(found) = MetricRange::of(&histograms) {
                    tracing::debug!(min = found.min, max = found.max, "metric range set");
                    *range = found;
                }
            }
        }

        current.generation = generation;
        current.columns = columns.to_vec();
        current.histograms = Some(histograms.clone());
        histograms
    }
}

impl std::fmt::Debug for HistogramOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistogramOrchestrator")
            .field("issued", &self.issued.load(Ordering::SeqCst))
            .field("committed", &self.current.read().generation)
            .field("metric_range", &self.metric_range())
            .finish()
    }
}

fn check_shape<T>(
    histograms: &[Vec<HistogramBucket>],
    response: &[Vec<T>],
    what: &str,
) -> DashboardResult<()> {
    let matches = histograms.len() == response.len()
        && histograms.iter().zip(response).all(|(h, r)| h.len() == r.len());
    if matches {
        Ok(())
    } else {
        Err(DashboardError::Protocol(format!(
            "histogram {} do not match the requested buckets",
            what
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(metric: Option<f64>) -> HistogramBucket {
        HistogramBucket {
            metric,
            ..HistogramBucket::new("a", 1)
        }
    }

    #[test]
    fn test_metric_range_sentinel() {
        assert!(MetricRange::UNSET.is_unset());
        assert!(MetricRange::default().is_unset());
        assert!(!MetricRange { min: 0.0, max: 1.0 }.is_unset());
    }

    #[test]
    fn test_metric_range_of() {
        let histograms = vec![
            vec![bucket(Some(0.4)), bucket(None)],
            vec![bucket(Some(0.9)), bucket(Some(0.1)), bucket(Some(f64::NAN))],
        ];
        let range = MetricRange::of(&histograms).unwrap();
        assert_eq!(range.min, 0.1);
        assert_eq!(range.max, 0.9);
    }

    #[test]
    fn test_metric_range_of_without_metrics() {
        assert!(MetricRange::of(&[vec![bucket(None)]]).is_none());
        assert!(MetricRange::of(&[]).is_none());
    }

    #[test]
    fn test_query_wants_metrics() {
        let mut query = HistogramQuery {
            model: Some("m".to_string()),
            ..Default::default()
        };
        assert!(!query.wants_metrics());
        query.metric = Some("accuracy".to_string());
        assert!(query.wants_metrics());
    }

    #[test]
    fn test_check_shape() {
        let histograms = vec![vec![bucket(None), bucket(None)]];
        assert!(check_shape(&histograms, &[vec![1u64, 2]], "counts").is_ok());
        assert!(check_shape(&histograms, &[vec![1u64]], "counts").is_err());
        assert!(check_shape::<u64>(&histograms, &[], "counts").is_err());
    }
}
