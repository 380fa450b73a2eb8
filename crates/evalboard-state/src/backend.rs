//! The backend seam.
//!
//! Any REST client that wants to drive the dashboard core implements
//! [`DashboardBackend`]. The crate ships [`HttpBackend`](crate::HttpBackend)
//! behind the `http` feature; tests implement the trait with in-memory mocks.

use async_trait::async_trait;
use evalboard_filter::{Column, Slice, Tag};

use crate::api::{
    GroupMetric, HistogramBucket, HistogramRequest, Metric, MetricRequest, TableRequest,
    TagMetricRequest,
};
use crate::error::DashboardResult;

/// Operations the dashboard core needs from the backend, all scoped to one
/// project.
#[async_trait]
pub trait DashboardBackend: Send + Sync {
    /// Columns of the project.
    async fn columns(&self) -> DashboardResult<Vec<Column>>;

    /// Saved slices.
    async fn slices(&self) -> DashboardResult<Vec<Slice>>;

    /// Saved tags.
    async fn tags(&self) -> DashboardResult<Vec<Tag>>;

    /// Model names.
    async fn models(&self) -> DashboardResult<Vec<String>>;

    /// Available metrics.
    async fn metrics(&self) -> DashboardResult<Vec<Metric>>;

    /// Bucket boundaries and unfiltered sizes, one list per column.
    async fn histogram_buckets(&self, columns: &[Column])
        -> DashboardResult<Vec<Vec<HistogramBucket>>>;

    /// Filtered counts, one list per column aligned with the request buckets.
    async fn histogram_counts(&self, request: &HistogramRequest) -> DashboardResult<Vec<Vec<u64>>>;

    /// Bucket metrics, one list per column aligned with the request buckets.
    async fn histogram_metrics(
        &self,
        request: &HistogramRequest,
    ) -> DashboardResult<Vec<Vec<Option<f64>>>>;

    /// Slice metrics, aligned with the request keys.
    async fn slice_metrics(&self, request: &MetricRequest) -> DashboardResult<Vec<GroupMetric>>;

    /// Tag metrics, aligned with the request keys.
    async fn tag_metrics(&self, request: &TagMetricRequest) -> DashboardResult<Vec<GroupMetric>>;

    /// A page of table rows, as a JSON-encoded string.
    async fn table(&self, request: &TableRequest) -> DashboardResult<String>;
}
