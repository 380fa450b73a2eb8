//! Chart parameters: one fixed shape per chart type.
//!
//! Each shape binds its channels to a semantic dimension and lists the
//! slices, models and metrics the chart includes. A channel typed
//! [`SlicesOrModels`] is expected to name one of the two free dimensions of
//! its chart; that is left to the caller and not validated here.

use std::fmt;

use evalboard_filter::SliceId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::chart::ChartType;
use crate::error::{ChartError, ChartResult};

/// Backend identifier of a metric.
pub type MetricId = i64;

/// Two-way dimension for channels that range over slices or models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlicesOrModels {
    /// One mark per slice.
    Slices,
    /// One mark per model.
    Models,
}

/// Three-way dimension for channels that may also range over metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlicesMetricsOrModels {
    /// One mark per slice.
    Slices,
    /// One mark per metric.
    Metrics,
    /// One mark per model.
    Models,
}

impl SlicesMetricsOrModels {
    /// Every dimension, in display order.
    pub const ALL: [SlicesMetricsOrModels; 3] = [
        SlicesMetricsOrModels::Slices,
        SlicesMetricsOrModels::Metrics,
        SlicesMetricsOrModels::Models,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SlicesMetricsOrModels::Slices => "SLICES",
            SlicesMetricsOrModels::Metrics => "METRICS",
            SlicesMetricsOrModels::Models => "MODELS",
        }
    }

    /// Lower-case name used as a default axis title.
    pub fn label(&self) -> &'static str {
        match self {
            SlicesMetricsOrModels::Slices => "slices",
            SlicesMetricsOrModels::Metrics => "metrics",
            SlicesMetricsOrModels::Models => "models",
        }
    }
}

impl From<SlicesOrModels> for SlicesMetricsOrModels {
    fn from(value: SlicesOrModels) -> Self {
        match value {
            SlicesOrModels::Slices => SlicesMetricsOrModels::Slices,
            SlicesOrModels::Models => SlicesMetricsOrModels::Models,
        }
    }
}

impl fmt::Display for SlicesMetricsOrModels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of bar and line charts: x and color channels over one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XcParameters {
    /// Dimension along the x axis.
    pub x_channel: SlicesOrModels,
    /// Dimension mapped to color.
    pub color_channel: SlicesOrModels,
    /// Included slices.
    #[serde(default)]
    pub slices: Vec<SliceId>,
    /// Included models.
    #[serde(default)]
    pub models: Vec<String>,
    /// Plotted metric.
    #[serde(default)]
    pub metric: Option<MetricId>,
}

/// Parameters of table charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableParameters {
    /// Dimension along the columns.
    pub x_channel: SlicesMetricsOrModels,
    /// Dimension along the rows.
    pub y_channel: SlicesMetricsOrModels,
    /// Dimension held fixed.
    pub fixed_channel: SlicesMetricsOrModels,
    /// Included slices.
    #[serde(default)]
    pub slices: Vec<SliceId>,
    /// Included models.
    #[serde(default)]
    pub models: Vec<String>,
    /// Included metrics.
    #[serde(default)]
    pub metrics: Vec<MetricId>,
}

/// Parameters of beeswarm charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeeswarmParameters {
    /// Dimension along the y axis.
    pub y_channel: SlicesMetricsOrModels,
    /// Dimension mapped to color.
    pub color_channel: SlicesMetricsOrModels,
    /// Dimension held fixed.
    pub fixed_channel: SlicesMetricsOrModels,
    /// Included slices.
    #[serde(default)]
    pub slices: Vec<SliceId>,
    /// Included models.
    #[serde(default)]
    pub models: Vec<String>,
    /// Included metrics.
    #[serde(default)]
    pub metrics: Vec<MetricId>,
}

/// Parameters of radar charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarParameters {
    /// Dimension spread around the axes.
    pub axis_channel: SlicesMetricsOrModels,
    /// Dimension drawn as one polygon per value.
    pub layer_channel: SlicesMetricsOrModels,
    /// Dimension held fixed.
    pub fixed_channel: SlicesMetricsOrModels,
    /// Included slices.
    #[serde(default)]
    pub slices: Vec<SliceId>,
    /// Included models.
    #[serde(default)]
    pub models: Vec<String>,
    /// Included metrics.
    #[serde(default)]
    pub metrics: Vec<MetricId>,
}

/// Parameters of heatmap charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapParameters {
    /// Dimension along the x axis.
    pub x_channel: SlicesOrModels,
    /// Dimension along the y axis.
    pub y_channel: SlicesOrModels,
    /// Included slices.
    #[serde(default)]
    pub slices: Vec<SliceId>,
    /// Included models.
    #[serde(default)]
    pub models: Vec<String>,
    /// Metric mapped to color.
    #[serde(default)]
    pub metric: Option<MetricId>,
}

/// Parameters of a chart, keyed by chart type.
///
/// Serialises as the bare parameter object; the chart type travels next to
/// it, so decoding goes through [`ChartParameters::from_value`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartParameters {
    /// Grouped bar chart.
    Bar(XcParameters),
    /// Line chart.
    Line(XcParameters),
    /// Metric table.
    Table(TableParameters),
    /// Beeswarm plot.
    Beeswarm(BeeswarmParameters),
    /// Radar chart.
    Radar(RadarParameters),
    /// Heatmap.
    Heatmap(HeatmapParameters),
}

impl ChartParameters {
    /// Chart type these parameters belong to.
    pub fn chart_type(&self) -> ChartType {
        match self {
            ChartParameters::Bar(_) => ChartType::Bar,
            ChartParameters::Line(_) => ChartType::Line,
            ChartParameters::Table(_) => ChartType::Table,
            ChartParameters::Beeswarm(_) => ChartType::Beeswarm,
            ChartParameters::Radar(_) => ChartType::Radar,
            ChartParameters::Heatmap(_) => ChartType::Heatmap,
        }
    }

    /// Decodes the parameter object of a `chart_type` chart.
    pub fn from_value(chart_type: ChartType, value: serde_json::Value) -> ChartResult<Self> {
        Ok(match chart_type {
            ChartType::Bar => ChartParameters::Bar(decode(chart_type, value)?),
            ChartType::Line => ChartParameters::Line(decode(chart_type, value)?),
            ChartType::Table => ChartParameters::Table(decode(chart_type, value)?),
            ChartType::Beeswarm => ChartParameters::Beeswarm(decode(chart_type, value)?),
            ChartType::Radar => ChartParameters::Radar(decode(chart_type, value)?),
            ChartType::Heatmap => ChartParameters::Heatmap(decode(chart_type, value)?),
        })
    }

    /// Decodes a JSON-encoded parameter object.
    pub fn from_json(chart_type: ChartType, json: &str) -> ChartResult<Self> {
        let value = serde_json::from_str(json).map_err(|source| ChartError::InvalidParameters {
            chart_type: chart_type.to_string(),
            source,
        })?;
        Self::from_value(chart_type, value)
    }

    /// Included slices.
    pub fn slices(&self) -> &[SliceId] {
        match self {
            ChartParameters::Bar(p) | ChartParameters::Line(p) => &p.slices,
            ChartParameters::Table(p) => &p.slices,
            ChartParameters::Beeswarm(p) => &p.slices,
            ChartParameters::Radar(p) => &p.slices,
            ChartParameters::Heatmap(p) => &p.slices,
        }
    }

    /// Included models.
    pub fn models(&self) -> &[String] {
        match self {
            ChartParameters::Bar(p) | ChartParameters::Line(p) => &p.models,
            ChartParameters::Table(p) => &p.models,
            ChartParameters::Beeswarm(p) => &p.models,
            ChartParameters::Radar(p) => &p.models,
            ChartParameters::Heatmap(p) => &p.models,
        }
    }

    /// Included metrics. Single-metric charts return at most one.
    pub fn metrics(&self) -> Vec<MetricId> {
        match self {
            ChartParameters::Bar(p) | ChartParameters::Line(p) => p.metric.into_iter().collect(),
            ChartParameters::Heatmap(p) => p.metric.into_iter().collect(),
            ChartParameters::Table(p) => p.metrics.clone(),
            ChartParameters::Beeswarm(p) => p.metrics.clone(),
            ChartParameters::Radar(p) => p.metrics.clone(),
        }
    }
}

fn decode<T: DeserializeOwned>(chart_type: ChartType, value: serde_json::Value) -> ChartResult<T> {
    serde_json::from_value(value).map_err(|source| ChartError::InvalidParameters {
        chart_type: chart_type.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_xc_parameters_wire_format() {
        let params = XcParameters {
            x_channel: SlicesOrModels::Slices,
            color_channel: SlicesOrModels::Models,
            slices: vec![1, 2],
            models: vec!["gpt2".to_string()],
            metric: Some(3),
        };
        let value = serde_json::to_value(ChartParameters::Bar(params)).unwrap();
        assert_eq!(
            value,
            json!({
                "xChannel": "SLICES",
                "colorChannel": "MODELS",
                "slices": [1, 2],
                "models": ["gpt2"],
                "metric": 3
            })
        );
    }

    #[test]
    fn test_from_value_uses_chart_type() {
        let value = json!({"xChannel": "MODELS", "colorChannel": "SLICES"});
        let bar = ChartParameters::from_value(ChartType::Bar, value.clone()).unwrap();
        let line = ChartParameters::from_value(ChartType::Line, value).unwrap();
        assert_eq!(bar.chart_type(), ChartType::Bar);
        assert_eq!(line.chart_type(), ChartType::Line);
        assert!(bar.slices().is_empty());
        assert!(bar.metrics().is_empty());
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        let err = ChartParameters::from_json(ChartType::Radar, r#"{"xChannel": "SLICES"}"#)
            .unwrap_err();
        assert!(matches!(err, ChartError::InvalidParameters { ref chart_type, .. } if chart_type == "RADAR"));

        let err = ChartParameters::from_json(ChartType::Heatmap, "not json").unwrap_err();
        assert!(matches!(err, ChartError::InvalidParameters { .. }));
    }

    #[test]
    fn test_two_way_channel_rejects_metrics() {
        let value = json!({"xChannel": "METRICS", "yChannel": "SLICES"});
        assert!(ChartParameters::from_value(ChartType::Heatmap, value).is_err());
    }

    #[test]
    fn test_accessors() {
        let params = ChartParameters::Radar(RadarParameters {
            axis_channel: SlicesMetricsOrModels::Metrics,
            layer_channel: SlicesMetricsOrModels::Models,
            fixed_channel: SlicesMetricsOrModels::Slices,
            slices: vec![7],
            models: vec!["a".to_string(), "b".to_string()],
            metrics: vec![1, 2, 3],
        });
        assert_eq!(params.slices(), &[7]);
        assert_eq!(params.models().len(), 2);
        assert_eq!(params.metrics(), vec![1, 2, 3]);
    }

    #[test]
    fn test_dimension_conversion() {
        assert_eq!(
            SlicesMetricsOrModels::from(SlicesOrModels::Models),
            SlicesMetricsOrModels::Models
        );
        assert_eq!(SlicesMetricsOrModels::Metrics.to_string(), "METRICS");
        assert_eq!(SlicesMetricsOrModels::Slices.label(), "slices");
    }
}
