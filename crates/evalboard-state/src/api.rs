//! Wire types exchanged with the backend.
//!
//! Request bodies embed [`FilterPredicateGroup`] verbatim; an absent filter
//! is serialised as `null`, never as an empty group.

use evalboard_filter::{Column, FilterPredicateGroup, FilterValue, Slice, Tag};
use serde::{Deserialize, Serialize};

/// A metric the backend can aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metric {
    /// Metric id.
    pub id: i64,
    /// Metric name.
    pub name: String,
}

/// One histogram bucket of a column.
///
/// `size` counts every row in the bucket; `filtered_size` counts the rows
/// that also match the current composed filter and tag selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBucket {
    /// Bucket value, or lower bound for ranged columns.
    pub bucket: FilterValue,
    /// Upper bound for ranged columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_end: Option<FilterValue>,
    /// Unfiltered row count.
    #[serde(default)]
    pub size: u64,
    /// Row count under the current filter.
    #[serde(default)]
    pub filtered_size: u64,
    /// Aggregate metric of the filtered rows in the bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<f64>,
}

impl HistogramBucket {
    /// Creates a bucket skeleton whose filtered size equals its size.
    pub fn new(bucket: impl Into<FilterValue>, size: u64) -> Self {
        Self {
            bucket: bucket.into(),
            bucket_end: None,
            size,
            filtered_size: size,
            metric: None,
        }
    }

    /// Sets the upper bound of a ranged bucket.
    pub fn with_end(mut self, end: impl Into<FilterValue>) -> Self {
        self.bucket_end = Some(end.into());
        self
    }
}

/// Buckets of one column sent along with a counts or metrics request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRequest {
    /// Column being bucketed.
    pub column: Column,
    /// Bucket skeletons of the column.
    pub buckets: Vec<HistogramBucket>,
}

/// Body of the histogram counts and metrics endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramRequest {
    /// Columns and their bucket skeletons.
    pub column_requests: Vec<ColumnRequest>,
    /// Composed filter (None = all rows).
    pub filter_predicates: Option<FilterPredicateGroup>,
    /// Selected model.
    pub model: Option<String>,
    /// Selected metric.
    pub metric: Option<String>,
    /// Restriction to explicit data ids from selected tags.
    pub data_ids: Option<Vec<String>>,
}

/// Aggregate metric of one slice or tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMetric {
    /// Metric value; None when the metric is undefined for the group.
    pub metric: Option<f64>,
    /// Number of rows in the group.
    pub size: u64,
}

/// Identity of a slice metric: slice, model and metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricKey {
    /// Slice being measured.
    pub slice: Slice,
    /// Model name.
    pub model: String,
    /// Metric name.
    pub metric: String,
}

/// Identity of a tag metric: tag, model and metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagMetricKey {
    /// Tag being measured.
    pub tag: Tag,
    /// Model name.
    pub model: String,
    /// Metric name.
    pub metric: String,
}

/// Body of the slice metrics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRequest {
    /// Keys to compute.
    pub metric_keys: Vec<MetricKey>,
    /// Restriction to explicit data ids from selected tags.
    pub data_ids: Option<Vec<String>>,
}

/// Body of the tag metrics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagMetricRequest {
    /// Keys to compute.
    pub metric_keys: Vec<TagMetricKey>,
}

/// Body of the table endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRequest {
    /// Columns to return.
    pub columns: Vec<Column>,
    /// Composed filter (None = all rows).
    pub filter_predicates: Option<FilterPredicateGroup>,
    /// Sort column (None = backend order) and ascending flag.
    pub sort: (Option<Column>, bool),
    /// First row to return.
    pub offset: usize,
    /// Number of rows to return.
    pub limit: usize,
    /// Restriction to explicit data ids from selected tags.
    pub data_ids: Option<Vec<String>>,
}
