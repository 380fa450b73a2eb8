//! Vega-Lite spec builders.
//!
//! Builders are pure: they receive already materialised rows shaped as
//! `{x_value, y_value, color_value, size, ...}` and only decide titles,
//! scales, interactive selections and tooltips. Every chart type has one
//! builder; [`SpecOptions::preview`] switches it to the reduced chrome used
//! for embedded previews (no legends, no axis titles, smaller marks) without
//! changing the data contract.
//!
//! Builders never fail. A missing label becomes an empty title.
//!
//! ## Example
//!
//! ```rust
//! use evalboard_charts::{
//!     build_spec, default_parameters, ChartContext, ChartLabels, ChartRow, ChartType, SpecOptions,
//! };
//!
//! let context = ChartContext::new(vec![1, 2], vec!["gpt2".to_string()], vec![7]);
//! let parameters = default_parameters(ChartType::Bar, &context);
//! let rows = vec![
//!     ChartRow::new("short", 0.81, "gpt2").with_size(120),
//!     ChartRow::new("long", 0.64, "gpt2").with_size(80),
//! ];
//!
//! let spec = build_spec(&parameters, &rows, &ChartLabels::default(), &SpecOptions::default())
//!     .expect("bar charts have a spec");
//! assert_eq!(spec.mark_type(), Some("bar"));
//! assert_eq!(spec.as_value()["data"]["values"][0]["x_value"], "short");
//! ```

mod bar;
mod beeswarm;
mod heatmap;
mod radar;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::channel::{binding, Channel};
use crate::parameters::ChartParameters;

const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Name of the hover selection parameter.
pub const HOVER_PARAM: &str = "hover";
/// Name of the click selection parameter.
pub const CLICK_PARAM: &str = "click";

/// One materialised data row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    /// Value on the x channel.
    pub x_value: Value,
    /// Value on the y channel.
    pub y_value: Value,
    /// Value on the color channel.
    pub color_value: Value,
    /// Number of instances behind the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Extra fields carried through to the spec data.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChartRow {
    /// Creates a row.
    pub fn new(
        x_value: impl Into<Value>,
        y_value: impl Into<Value>,
        color_value: impl Into<Value>,
    ) -> Self {
        Self {
            x_value: x_value.into(),
            y_value: y_value.into(),
            color_value: color_value.into(),
            size: None,
            extra: Map::new(),
        }
    }

    /// Sets the instance count.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Adds an extra field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// Titles of the x, y and color encodings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartLabels {
    /// Title of the x encoding.
    pub x: Option<String>,
    /// Title of the y encoding.
    pub y: Option<String>,
    /// Title of the color encoding.
    pub color: Option<String>,
}

impl ChartLabels {
    /// Creates labels from all three titles.
    pub fn new(x: impl Into<String>, y: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            x: Some(x.into()),
            y: Some(y.into()),
            color: Some(color.into()),
        }
    }

    /// Labels named after the dimensions bound in `parameters`, with
    /// `metric` naming the quantitative encoding.
    pub fn for_parameters(parameters: &ChartParameters, metric: Option<&str>) -> Self {
        let dimension = |channel| binding(parameters, channel).map(|d| d.label().to_string());
        let metric = metric.map(str::to_string);
        match parameters {
            ChartParameters::Bar(_) | ChartParameters::Line(_) => Self {
                x: dimension(Channel::X),
                y: metric,
                color: dimension(Channel::Color),
            },
            ChartParameters::Beeswarm(_) => Self {
                x: metric,
                y: dimension(Channel::Y),
                color: dimension(Channel::Color),
            },
            ChartParameters::Heatmap(_) => Self {
                x: dimension(Channel::X),
                y: dimension(Channel::Y),
                color: metric,
            },
            ChartParameters::Radar(_) => Self {
                x: dimension(Channel::Axis),
                y: metric,
                color: dimension(Channel::Layer),
            },
            ChartParameters::Table(_) => Self {
                x: dimension(Channel::X),
                y: dimension(Channel::Y),
                color: None,
            },
        }
    }

    fn x_title(&self) -> &str {
        self.x.as_deref().unwrap_or_default()
    }

    fn y_title(&self) -> &str {
        self.y.as_deref().unwrap_or_default()
    }

    fn color_title(&self) -> &str {
        self.color.as_deref().unwrap_or_default()
    }
}

/// Presentation variant of a spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecOptions {
    /// Reduced chrome for embedded previews.
    pub preview: bool,
    /// Width in pixels (None = fill the container).
    pub width: Option<u32>,
    /// Height in pixels (None = chart default).
    pub height: Option<u32>,
}

impl SpecOptions {
    /// Options for an embedded preview.
    pub fn preview() -> Self {
        Self {
            preview: true,
            ..Self::default()
        }
    }

    /// Sets a fixed size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    fn height_or(&self, default: u32) -> u32 {
        self.height
            .unwrap_or(if self.preview { default / 2 } else { default })
    }

    fn point_size(&self) -> u32 {
        if self.preview {
            30
        } else {
            60
        }
    }
}

/// A declarative Vega-Lite specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisualizationSpec(Value);

impl VisualizationSpec {
    /// The spec as JSON.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the spec into JSON.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Mark type of the spec, or of its first layer.
    pub fn mark_type(&self) -> Option<&str> {
        let spec = match self.0.get("layer") {
            Some(Value::Array(layers)) => layers.first()?,
            _ => &self.0,
        };
        match spec.get("mark")? {
            Value::String(mark) => Some(mark),
            mark => mark.get("type")?.as_str(),
        }
    }

    /// Names of the selection parameters.
    pub fn param_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_params(&self.0, &mut names);
        names
    }
}

fn collect_params<'a>(spec: &'a Value, names: &mut Vec<&'a str>) {
    if let Some(Value::Array(params)) = spec.get("params") {
        names.extend(params.iter().filter_map(|p| p.get("name")?.as_str()));
    }
    if let Some(Value::Array(layers)) = spec.get("layer") {
        for layer in layers {
            collect_params(layer, names);
        }
    }
}

impl fmt::Display for VisualizationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds the spec for `parameters` over `rows`.
///
/// Returns `None` for table charts, which render rows directly.
pub fn build_spec(
    parameters: &ChartParameters,
    rows: &[ChartRow],
    labels: &ChartLabels,
    options: &SpecOptions,
) -> Option<VisualizationSpec> {
    let chart_type = parameters.chart_type();
    tracing::debug!(
        chart_type = %chart_type,
        rows = rows.len(),
        preview = options.preview,
        "building chart spec"
    );

    let body = match parameters {
        ChartParameters::Bar(_) => bar::bar(labels, options),
        ChartParameters::Line(_) => bar::line(labels, options),
        ChartParameters::Beeswarm(_) => beeswarm::beeswarm(labels, options),
        ChartParameters::Heatmap(_) => heatmap::heatmap(labels, options),
        ChartParameters::Radar(_) => radar::radar(labels, options),
        ChartParameters::Table(_) => return None,
    };

    Some(VisualizationSpec(envelope(
        chart_type.as_str(),
        rows,
        options,
        body,
    )))
}

/// Wraps a builder body with schema, data and size.
fn envelope(description: &str, rows: &[ChartRow], options: &SpecOptions, body: Value) -> Value {
    let mut spec = Map::new();
    spec.insert("$schema".to_string(), json!(SCHEMA));
    spec.insert("description".to_string(), json!(description));
    spec.insert("data".to_string(), json!({ "values": rows }));
    spec.insert(
        "width".to_string(),
        options.width.map_or_else(|| json!("container"), |w| json!(w)),
    );
    if let Value::Object(body) = body {
        spec.extend(body);
    }
    if options.preview {
        spec.insert("config".to_string(), json!({ "view": { "stroke": null } }));
    }
    Value::Object(spec)
}

/// Axis title, hidden in previews.
fn axis_title(title: &str, options: &SpecOptions) -> Value {
    if options.preview {
        Value::Null
    } else {
        json!(title)
    }
}

/// Legend definition, hidden in previews.
fn legend(title: &str, options: &SpecOptions) -> Value {
    if options.preview {
        Value::Null
    } else {
        json!({ "title": title })
    }
}

/// Hover and click point selections.
fn selection_params() -> Value {
    json!([
        {
            "name": HOVER_PARAM,
            "select": { "type": "point", "on": "mouseover", "clear": "mouseout" }
        },
        {
            "name": CLICK_PARAM,
            "select": { "type": "point", "on": "click" }
        }
    ])
}

/// Full opacity for clicked marks, dimmed otherwise.
fn highlight_opacity() -> Value {
    json!({ "condition": { "param": CLICK_PARAM, "value": 1 }, "value": 0.3 })
}

/// Outline for clicked and hovered marks.
fn highlight_stroke() -> Value {
    json!({
        "condition": [
            { "param": CLICK_PARAM, "empty": false, "value": 2 },
            { "param": HOVER_PARAM, "empty": false, "value": 1 }
        ],
        "value": 0
    })
}

/// Tooltip field list.
fn tooltip(fields: &[(&str, &str, &str)]) -> Value {
    Value::Array(
        fields
            .iter()
            .map(|(field, title, kind)| json!({ "field": field, "title": title, "type": kind }))
            .collect(),
    )
}
