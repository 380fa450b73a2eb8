//! # evalboard-charts
//!
//! Chart definitions and Vega-Lite spec builders for the evalboard
//! evaluation dashboard.
//!
//! This crate provides:
//! - **Chart parameters**: one fixed parameter shape per chart type, binding
//!   channels to the slices, models or metrics dimension
//! - **Channel mapping**: the closed table of channels per chart type and
//!   the dimensions each accepts
//! - **Defaults**: parameters for a new chart from what the project offers
//! - **Spec builders**: declarative Vega-Lite JSON for bar, line, beeswarm,
//!   heatmap and radar charts, in a full and a preview variant
//!
//! ## Usage
//!
//! ```rust
//! use evalboard_charts::{
//!     bindings, build_spec, default_parameters, Channel, ChartContext, ChartLabels, ChartRow,
//!     ChartType, SlicesMetricsOrModels, SpecOptions,
//! };
//!
//! let context = ChartContext::new(vec![1], vec!["gpt2".to_string(), "bert".to_string()], vec![3, 4]);
//! let parameters = default_parameters(ChartType::Radar, &context);
//! assert_eq!(
//!     bindings(&parameters)[0],
//!     (Channel::Axis, SlicesMetricsOrModels::Metrics)
//! );
//!
//! let rows = vec![
//!     ChartRow::new("accuracy", 0.9, "gpt2"),
//!     ChartRow::new("f1", 0.7, "gpt2"),
//! ];
//! let labels = ChartLabels::for_parameters(&parameters, Some("value"));
//! let preview = build_spec(&parameters, &rows, &labels, &SpecOptions::preview()).unwrap();
//! assert_eq!(preview.mark_type(), Some("line"));
//! ```
//!
//! ## Chart Types
//!
//! | Type | Channels | Spec |
//! |------|----------|------|
//! | `BAR`, `LINE` | x, color | grouped bars / lines with points |
//! | `TABLE` | x, y, fixed | none, rows are rendered directly |
//! | `BEESWARM` | y, color, fixed | circles positioned by metric |
//! | `RADAR` | axis, layer, fixed | closed polygons |
//! | `HEATMAP` | x, y | colored cells |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod channel;
mod chart;
mod defaults;
mod error;
mod parameters;
mod spec;

pub use channel::{binding, bindings, channels, Channel, ChannelSpec};
pub use chart::{Chart, ChartType, WireChart};
pub use defaults::{default_parameters, ChartContext};
pub use error::{ChartError, ChartResult};
pub use parameters::{
    BeeswarmParameters, ChartParameters, HeatmapParameters, MetricId, RadarParameters,
    SlicesMetricsOrModels, SlicesOrModels, TableParameters, XcParameters,
};
pub use spec::{
    build_spec, ChartLabels, ChartRow, SpecOptions, VisualizationSpec, CLICK_PARAM, HOVER_PARAM,
};
