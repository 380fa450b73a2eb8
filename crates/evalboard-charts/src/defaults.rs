//! Default parameters for newly created charts.

use evalboard_filter::SliceId;

use crate::chart::ChartType;
use crate::parameters::{
    BeeswarmParameters, ChartParameters, HeatmapParameters, MetricId, RadarParameters,
    SlicesMetricsOrModels, SlicesOrModels, TableParameters, XcParameters,
};

/// Slices, models and metrics available in the project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartContext {
    /// Slice ids.
    pub slices: Vec<SliceId>,
    /// Model names.
    pub models: Vec<String>,
    /// Metric ids.
    pub metrics: Vec<MetricId>,
}

impl ChartContext {
    /// Creates a context.
    pub fn new(slices: Vec<SliceId>, models: Vec<String>, metrics: Vec<MetricId>) -> Self {
        Self {
            slices,
            models,
            metrics,
        }
    }

    fn first_metric(&self) -> Option<MetricId> {
        self.metrics.first().copied()
    }

    /// Everything, except the fixed dimension which keeps only its first
    /// entry.
    fn fixed(
        &self,
        fixed: SlicesMetricsOrModels,
    ) -> (Vec<SliceId>, Vec<String>, Vec<MetricId>) {
        let mut slices = self.slices.clone();
        let mut models = self.models.clone();
        let mut metrics = self.metrics.clone();
        match fixed {
            SlicesMetricsOrModels::Slices => slices.truncate(1),
            SlicesMetricsOrModels::Models => models.truncate(1),
            SlicesMetricsOrModels::Metrics => metrics.truncate(1),
        }
        (slices, models, metrics)
    }
}

/// Parameters for a new `chart_type` chart over `context`.
///
/// Slices run along x and models along color where the chart has those
/// channels, the fixed dimension starts at its first entry, and radar
/// charts spread metrics around their axes.
pub fn default_parameters(chart_type: ChartType, context: &ChartContext) -> ChartParameters {
    let xc = || XcParameters {
        x_channel: SlicesOrModels::Slices,
        color_channel: SlicesOrModels::Models,
        slices: context.slices.clone(),
        models: context.models.clone(),
        metric: context.first_metric(),
    };

    match chart_type {
        ChartType::Bar => ChartParameters::Bar(xc()),
        ChartType::Line => ChartParameters::Line(xc()),
        ChartType::Table => {
            let fixed_channel = SlicesMetricsOrModels::Metrics;
            let (slices, models, metrics) = context.fixed(fixed_channel);
            ChartParameters::Table(TableParameters {
                x_channel: SlicesMetricsOrModels::Slices,
                y_channel: SlicesMetricsOrModels::Models,
                fixed_channel,
                slices,
                models,
                metrics,
            })
        }
        ChartType::Beeswarm => {
            let fixed_channel = SlicesMetricsOrModels::Metrics;
            let (slices, models, metrics) = context.fixed(fixed_channel);
            ChartParameters::Beeswarm(BeeswarmParameters {
                y_channel: SlicesMetricsOrModels::Models,
                color_channel: SlicesMetricsOrModels::Slices,
                fixed_channel,
                slices,
                models,
                metrics,
            })
        }
        ChartType::Radar => {
            let fixed_channel = SlicesMetricsOrModels::Slices;
            let (slices, models, metrics) = context.fixed(fixed_channel);
            ChartParameters::Radar(RadarParameters {
                axis_channel: SlicesMetricsOrModels::Metrics,
                layer_channel: SlicesMetricsOrModels::Models,
                fixed_channel,
                slices,
                models,
                metrics,
            })
        }
        ChartType::Heatmap => ChartParameters::Heatmap(HeatmapParameters {
            x_channel: SlicesOrModels::Slices,
            y_channel: SlicesOrModels::Models,
            slices: context.slices.clone(),
            models: context.models.clone(),
            metric: context.first_metric(),
        }),
    }
}
