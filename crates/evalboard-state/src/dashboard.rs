//! The dashboard core: state, backend and request orchestration together.

use std::sync::Arc;

use evalboard_filter::{Column, SliceId, TagId};

use crate::api::{GroupMetric, HistogramBucket, MetricKey, TableRequest, TagMetricKey};
use crate::backend::DashboardBackend;
use crate::config::DashboardConfig;
use crate::error::DashboardResult;
use crate::histogram::{HistogramOrchestrator, HistogramQuery, MetricRange};
use crate::metrics::MetricFetcher;
use crate::store::SelectionStore;
use crate::table::{fetch_table, Row, TablePage};

/// Histograms of the visible columns for the current selection state.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnHistograms {
    /// Columns visible under the selected model.
    pub columns: Vec<Column>,
    /// Populated buckets, aligned with `columns`.
    pub histograms: Vec<Vec<HistogramBucket>>,
}

/// Entry point tying the selection store to a backend.
///
/// # Example
///
/// ```ignore
/// use evalboard_state::{Dashboard, DashboardConfig, HttpBackend};
///
/// let dashboard = Dashboard::new(Arc::new(backend), DashboardConfig::from_env()?);
/// dashboard.load_catalog().await?;
///
/// dashboard.store().toggle_slice(3, false);
/// let histograms = dashboard.refresh_histograms(&columns, Some("gpt2"), Some("accuracy")).await?;
/// ```
pub struct Dashboard {
    backend: Arc<dyn DashboardBackend>,
    config: DashboardConfig,
    store: SelectionStore,
    histograms: HistogramOrchestrator,
    metrics: MetricFetcher,
}

impl Dashboard {
    /// Creates a dashboard over `backend`.
    pub fn new(backend: Arc<dyn DashboardBackend>, config: DashboardConfig) -> Self {
        let histograms = HistogramOrchestrator::new(Arc::clone(&backend));
        let metrics = MetricFetcher::new(Arc::clone(&backend), config.metric_cache.clone());
        Self {
            backend,
            config,
            store: SelectionStore::new(),
            histograms,
            metrics,
        }
    }

    /// The selection store.
    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// The histogram orchestrator.
    pub fn histograms(&self) -> &HistogramOrchestrator {
        &self.histograms
    }

    /// The metric fetcher.
    pub fn metrics(&self) -> &MetricFetcher {
        &self.metrics
    }

    /// The configuration.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Current global metric range.
    pub fn metric_range(&self) -> MetricRange {
        self.histograms.metric_range()
    }

    /// Loads slices and tags into the store. Failures are fatal to the page
    /// and propagate.
    pub async fn load_catalog(&self) -> DashboardResult<()> {
        let slices = self.backend.slices().await?;
        let tags = self.backend.tags().await?;
        tracing::debug!(slices = slices.len(), tags = tags.len(), "loaded catalog");
        self.store.set_slices(slices);
        self.store.set_tags(tags);
        Ok(())
    }

    /// Runs one "filter changed" cycle: bucket boundaries, then counts and
    /// metrics under the current selection state.
    ///
    /// Bucket-boundary failures propagate; count failures fall back to the
    /// unfiltered skeletons.
    pub async fn refresh_histograms(
        &self,
        columns: &[Column],
        model: Option<&str>,
        metric: Option<&str>,
    ) -> DashboardResult<ColumnHistograms> {
        let (columns, skeletons) = self.histograms.get_buckets(columns, model).await?;
        let query = HistogramQuery::from_snapshot(&self.store.snapshot(), model, metric);
        let histograms = self.histograms.get_counts(&columns, &skeletons, &query).await;
        Ok(ColumnHistograms {
            columns,
            histograms,
        })
    }

    /// Metrics of the given slices for one model and metric, in `slice_ids`
    /// order. Ids are resolved against the project slices first and the
    /// comparison slices second; ids missing from both are skipped.
    pub async fn slice_metrics(
        &self,
        slice_ids: &[SliceId],
        model: &str,
        metric: &str,
    ) -> DashboardResult<Vec<(SliceId, GroupMetric)>> {
        let catalog = self.store.catalog();
        let keys: Vec<MetricKey> = slice_ids
            .iter()
            .filter_map(|id| {
                catalog
                    .slices
                    .iter()
                    .find(|s| s.id == *id)
                    .or_else(|| catalog.comparison_slices.iter().find(|s| s.id == *id))
            })
            .map(|slice| MetricKey {
                slice: slice.clone(),
                model: model.to_string(),
                metric: metric.to_string(),
            })
            .collect();

        let snapshot = self.store.snapshot();
        let results = self
            .metrics
            .get_metrics_for_slices(&keys, snapshot.data_ids.as_deref())
            .await?;
        Ok(keys.iter().map(|k| k.slice.id).zip(results).collect())
    }

    /// Metrics of the given tags for one model and metric, in `tag_ids`
    /// order. Ids missing from the catalog are skipped.
    pub async fn tag_metrics(
        &self,
        tag_ids: &[TagId],
        model: &str,
        metric: &str,
    ) -> DashboardResult<Vec<(TagId, GroupMetric)>> {
        let catalog = self.store.catalog();
        let keys: Vec<TagMetricKey> = tag_ids
            .iter()
            .filter_map(|id| catalog.tags.iter().find(|t| t.id == *id))
            .map(|tag| TagMetricKey {
                tag: tag.clone(),
                model: model.to_string(),
                metric: metric.to_string(),
            })
            .collect();

        let results = self.metrics.get_metrics_for_tags(&keys).await?;
        Ok(keys.iter().map(|k| k.tag.id).zip(results).collect())
    }

    /// One page of table rows under the current selection state.
    pub async fn table_page(&self, columns: &[Column], page: &TablePage) -> DashboardResult<Vec<Row>> {
        let request = TableRequest::for_page(columns.to_vec(), &self.store.snapshot(), page);
        fetch_table(self.backend.as_ref(), &request).await
    }

    /// The first table page using the configured page size.
    pub fn first_page(&self) -> TablePage {
        TablePage::first(self.config.table_page_size)
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("histograms", &self.histograms)
            .finish()
    }
}
