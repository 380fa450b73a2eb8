//! Channels each chart type exposes and the dimensions they accept.

use std::fmt;

use crate::chart::ChartType;
use crate::parameters::{ChartParameters, SlicesMetricsOrModels};

/// A visual binding point of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
    /// Mark color.
    Color,
    /// Dimension held at a single value.
    Fixed,
    /// Radar axes.
    Axis,
    /// Radar polygons.
    Layer,
}

impl Channel {
    /// Parameter field name of the channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::X => "xChannel",
            Channel::Y => "yChannel",
            Channel::Color => "colorChannel",
            Channel::Fixed => "fixedChannel",
            Channel::Axis => "axisChannel",
            Channel::Layer => "layerChannel",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A channel together with the dimensions it may be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSpec {
    /// The channel.
    pub channel: Channel,
    /// Accepted dimensions.
    pub dimensions: &'static [SlicesMetricsOrModels],
}

impl ChannelSpec {
    /// Returns true if the channel accepts `dimension`.
    pub fn accepts(&self, dimension: SlicesMetricsOrModels) -> bool {
        self.dimensions.contains(&dimension)
    }
}

const SLICES_OR_MODELS: &[SlicesMetricsOrModels] =
    &[SlicesMetricsOrModels::Slices, SlicesMetricsOrModels::Models];

const ANY_DIMENSION: &[SlicesMetricsOrModels] = &SlicesMetricsOrModels::ALL;

const XC_CHANNELS: &[ChannelSpec] = &[
    ChannelSpec {
        channel: Channel::X,
        dimensions: SLICES_OR_MODELS,
    },
    ChannelSpec {
        channel: Channel::Color,
        dimensions: SLICES_OR_MODELS,
    },
];

const TABLE_CHANNELS: &[ChannelSpec] = &[
    ChannelSpec {
        channel: Channel::X,
        dimensions: ANY_DIMENSION,
    },
    ChannelSpec {
        channel: Channel::Y,
        dimensions: ANY_DIMENSION,
    },
    ChannelSpec {
        channel: Channel::Fixed,
        dimensions: ANY_DIMENSION,
    },
];

const BEESWARM_CHANNELS: &[ChannelSpec] = &[
    ChannelSpec {
        channel: Channel::Y,
        dimensions: ANY_DIMENSION,
    },
    ChannelSpec {
        channel: Channel::Color,
        dimensions: ANY_DIMENSION,
    },
    ChannelSpec {
        channel: Channel::Fixed,
        dimensions: ANY_DIMENSION,
    },
];

const RADAR_CHANNELS: &[ChannelSpec] = &[
    ChannelSpec {
        channel: Channel::Axis,
        dimensions: ANY_DIMENSION,
    },
    ChannelSpec {
        channel: Channel::Layer,
        dimensions: ANY_DIMENSION,
    },
    ChannelSpec {
        channel: Channel::Fixed,
        dimensions: ANY_DIMENSION,
    },
];

const HEATMAP_CHANNELS: &[ChannelSpec] = &[
    ChannelSpec {
        channel: Channel::X,
        dimensions: SLICES_OR_MODELS,
    },
    ChannelSpec {
        channel: Channel::Y,
        dimensions: SLICES_OR_MODELS,
    },
];

/// Channels of `chart_type`, in parameter order.
pub fn channels(chart_type: ChartType) -> &'static [ChannelSpec] {
    match chart_type {
        ChartType::Bar | ChartType::Line => XC_CHANNELS,
        ChartType::Table => TABLE_CHANNELS,
        ChartType::Beeswarm => BEESWARM_CHANNELS,
        ChartType::Radar => RADAR_CHANNELS,
        ChartType::Heatmap => HEATMAP_CHANNELS,
    }
}

/// Channel-to-dimension bindings of `parameters`, in [`channels`] order.
pub fn bindings(parameters: &ChartParameters) -> Vec<(Channel, SlicesMetricsOrModels)> {
    match parameters {
        ChartParameters::Bar(p) | ChartParameters::Line(p) => vec![
            (Channel::X, p.x_channel.into()),
            (Channel::Color, p.color_channel.into()),
        ],
        ChartParameters::Table(p) => vec![
            (Channel::X, p.x_channel),
            (Channel::Y, p.y_channel),
            (Channel::Fixed, p.fixed_channel),
        ],
        ChartParameters::Beeswarm(p) => vec![
            (Channel::Y, p.y_channel),
            (Channel::Color, p.color_channel),
            (Channel::Fixed, p.fixed_channel),
        ],
        ChartParameters::Radar(p) => vec![
            (Channel::Axis, p.axis_channel),
            (Channel::Layer, p.layer_channel),
            (Channel::Fixed, p.fixed_channel),
        ],
        ChartParameters::Heatmap(p) => vec![
            (Channel::X, p.x_channel.into()),
            (Channel::Y, p.y_channel.into()),
        ],
    }
}

/// Dimension bound to `channel`, if the chart has that channel.
pub fn binding(parameters: &ChartParameters, channel: Channel) -> Option<SlicesMetricsOrModels> {
    bindings(parameters)
        .into_iter()
        .find(|(c, _)| *c == channel)
        .map(|(_, dimension)| dimension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{RadarParameters, SlicesOrModels, XcParameters};

    #[test]
    fn test_channel_table() {
        let bar = channels(ChartType::Bar);
        assert_eq!(bar.len(), 2);
        assert!(bar[0].accepts(SlicesMetricsOrModels::Slices));
        assert!(!bar[0].accepts(SlicesMetricsOrModels::Metrics));

        let radar: Vec<Channel> = channels(ChartType::Radar).iter().map(|c| c.channel).collect();
        assert_eq!(radar, vec![Channel::Axis, Channel::Layer, Channel::Fixed]);
        assert!(channels(ChartType::Radar)[0].accepts(SlicesMetricsOrModels::Metrics));

        let heatmap = channels(ChartType::Heatmap);
        assert!(heatmap.iter().all(|c| !c.accepts(SlicesMetricsOrModels::Metrics)));
    }

    #[test]
    fn test_bindings_follow_channel_order() {
        for chart_type in ChartType::ALL {
            let params = crate::defaults::default_parameters(
                chart_type,
                &crate::defaults::ChartContext::default(),
            );
            let bound: Vec<Channel> = bindings(&params).into_iter().map(|(c, _)| c).collect();
            let declared: Vec<Channel> = channels(chart_type).iter().map(|c| c.channel).collect();
            assert_eq!(bound, declared, "{}", chart_type);
        }
    }

    #[test]
    fn test_binding_lookup() {
        let params = ChartParameters::Line(XcParameters {
            x_channel: SlicesOrModels::Models,
            color_channel: SlicesOrModels::Slices,
            slices: vec![],
            models: vec![],
            metric: None,
        });
        assert_eq!(
            binding(&params, Channel::X),
            Some(SlicesMetricsOrModels::Models)
        );
        assert_eq!(binding(&params, Channel::Axis), None);

        let radar = ChartParameters::Radar(RadarParameters {
            axis_channel: SlicesMetricsOrModels::Metrics,
            layer_channel: SlicesMetricsOrModels::Slices,
            fixed_channel: SlicesMetricsOrModels::Models,
            slices: vec![],
            models: vec![],
            metrics: vec![],
        });
        assert_eq!(
            binding(&radar, Channel::Layer),
            Some(SlicesMetricsOrModels::Slices)
        );
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(Channel::Fixed.to_string(), "fixedChannel");
        assert_eq!(Channel::Axis.as_str(), "axisChannel");
    }
}
