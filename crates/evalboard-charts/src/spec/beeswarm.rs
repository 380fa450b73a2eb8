//! Beeswarm plot: one point per value, positioned by metric.
//!
//! Rows carry the metric in `x_value` and the category in `y_value`. Points
//! sharing a category and value are stacked apart by their row number so
//! they stay visible.

use serde_json::{json, Value};

use super::{
    axis_title, highlight_opacity, highlight_stroke, legend, selection_params, tooltip,
    ChartLabels, SpecOptions,
};

pub(super) fn beeswarm(labels: &ChartLabels, options: &SpecOptions) -> Value {
    json!({
        "height": options.height_or(300),
        "params": selection_params(),
        "transform": [
            {
                "window": [{ "op": "row_number", "as": "swarm_offset" }],
                "groupby": ["y_value", "x_value"]
            }
        ],
        "mark": { "type": "circle", "cursor": "pointer", "stroke": "black" },
        "encoding": {
            "x": {
                "field": "x_value",
                "type": "quantitative",
                "scale": { "zero": false },
                "title": axis_title(labels.x_title(), options)
            },
            "y": {
                "field": "y_value",
                "type": "nominal",
                "title": axis_title(labels.y_title(), options)
            },
            "yOffset": { "field": "swarm_offset", "type": "quantitative" },
            "color": {
                "field": "color_value",
                "type": "nominal",
                "legend": legend(labels.color_title(), options)
            },
            "size": {
                "field": "size",
                "type": "quantitative",
                "legend": null,
                "scale": { "range": [options.point_size() / 2, options.point_size() * 4] }
            },
            "fillOpacity": highlight_opacity(),
            "strokeWidth": highlight_stroke(),
            "tooltip": tooltip(&[
                ("y_value", labels.y_title(), "nominal"),
                ("color_value", labels.color_title(), "nominal"),
                ("x_value", labels.x_title(), "quantitative"),
                ("size", "size", "quantitative"),
            ])
        }
    })
}
