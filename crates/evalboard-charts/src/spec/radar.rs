//! Radar chart drawn in Cartesian coordinates.
//!
//! Rows carry the axis in `x_value`, the value in `y_value` and the layer
//! in `color_value`. Axes are spread evenly around the circle in order of
//! first appearance; each layer is one closed polygon.

use serde_json::{json, Value};

use super::{legend, tooltip, ChartLabels, SpecOptions, CLICK_PARAM, HOVER_PARAM};

pub(super) fn radar(labels: &ChartLabels, options: &SpecOptions) -> Value {
    let position = json!({
        "x": { "field": "radar_x", "type": "quantitative", "axis": null },
        "y": { "field": "radar_y", "type": "quantitative", "axis": null }
    });

    let mut layer = vec![
        json!({
            "mark": { "type": "line", "interpolate": "linear-closed" },
            "encoding": {
                "x": position["x"],
                "y": position["y"],
                "order": { "field": "axis_index", "type": "quantitative" },
                "color": {
                    "field": "color_value",
                    "type": "nominal",
                    "legend": legend(labels.color_title(), options)
                },
                "opacity": {
                    "condition": { "param": CLICK_PARAM, "value": 1 },
                    "value": 0.3
                }
            }
        }),
        json!({
            "params": [
                {
                    "name": HOVER_PARAM,
                    "select": { "type": "point", "on": "mouseover", "clear": "mouseout" }
                },
                {
                    "name": CLICK_PARAM,
                    "select": { "type": "point", "fields": ["color_value"] }
                }
            ],
            "mark": { "type": "point", "filled": true, "cursor": "pointer" },
            "encoding": {
                "x": position["x"],
                "y": position["y"],
                "color": { "field": "color_value", "type": "nominal", "legend": null },
                "size": {
                    "condition": {
                        "param": HOVER_PARAM,
                        "empty": false,
                        "value": options.point_size() * 2
                    },
                    "value": options.point_size()
                },
                "tooltip": tooltip(&[
                    ("x_value", labels.x_title(), "nominal"),
                    ("color_value", labels.color_title(), "nominal"),
                    ("y_value", labels.y_title(), "quantitative"),
                    ("size", "size", "quantitative"),
                ])
            }
        }),
    ];

    if !options.preview {
        layer.push(json!({
            "transform": [{ "filter": "datum.axis_rank == 1" }],
            "mark": { "type": "text", "dy": -8 },
            "encoding": {
                "x": { "field": "label_x", "type": "quantitative" },
                "y": { "field": "label_y", "type": "quantitative" },
                "text": { "field": "x_value" }
            }
        }));
    }

    json!({
        "height": options.height_or(300),
        "transform": [
            {
                "window": [{ "op": "row_number", "as": "row" }]
            },
            {
                "joinaggregate": [{ "op": "min", "field": "row", "as": "axis_first_row" }],
                "groupby": ["x_value"]
            },
            {
                "window": [{ "op": "dense_rank", "as": "axis_index" }],
                "sort": [{ "field": "axis_first_row" }]
            },
            {
                "window": [{ "op": "row_number", "as": "axis_rank" }],
                "groupby": ["x_value"]
            },
            {
                "joinaggregate": [
                    { "op": "distinct", "field": "x_value", "as": "axis_count" },
                    { "op": "max", "field": "y_value", "as": "radius" }
                ]
            },
            {
                "calculate": "2 * PI * (datum.axis_index - 1) / datum.axis_count",
                "as": "angle"
            },
            { "calculate": "datum.y_value * sin(datum.angle)", "as": "radar_x" },
            { "calculate": "-datum.y_value * cos(datum.angle)", "as": "radar_y" },
            { "calculate": "datum.radius * 1.1 * sin(datum.angle)", "as": "label_x" },
            { "calculate": "-datum.radius * 1.1 * cos(datum.angle)", "as": "label_y" }
        ],
        "layer": layer
    })
}
