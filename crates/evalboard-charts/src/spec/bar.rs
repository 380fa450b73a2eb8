//! Bar and line charts: one metric over an x dimension, split by color.

use serde_json::{json, Value};

use super::{
    axis_title, highlight_opacity, highlight_stroke, legend, selection_params, tooltip,
    ChartLabels, SpecOptions, CLICK_PARAM,
};

pub(super) fn bar(labels: &ChartLabels, options: &SpecOptions) -> Value {
    json!({
        "height": options.height_or(300),
        "params": selection_params(),
        "mark": { "type": "bar", "cursor": "pointer", "stroke": "black" },
        "encoding": {
            "x": {
                "field": "x_value",
                "type": "nominal",
                "sort": null,
                "title": axis_title(labels.x_title(), options),
                "axis": { "labelAngle": 0 }
            },
            "xOffset": { "field": "color_value" },
            "y": {
                "field": "y_value",
                "type": "quantitative",
                "title": axis_title(labels.y_title(), options)
            },
            "color": {
                "field": "color_value",
                "type": "nominal",
                "legend": legend(labels.color_title(), options)
            },
            "fillOpacity": highlight_opacity(),
            "strokeWidth": highlight_stroke(),
            "tooltip": xc_tooltip(labels)
        }
    })
}

pub(super) fn line(labels: &ChartLabels, options: &SpecOptions) -> Value {
    json!({
        "height": options.height_or(300),
        "params": [
            {
                "name": super::HOVER_PARAM,
                "select": {
                    "type": "point",
                    "fields": ["color_value"],
                    "on": "mouseover",
                    "clear": "mouseout"
                }
            },
            {
                "name": CLICK_PARAM,
                "select": { "type": "point", "fields": ["color_value"] },
                "bind": "legend"
            }
        ],
        "mark": {
            "type": "line",
            "cursor": "pointer",
            "point": { "size": options.point_size() }
        },
        "encoding": {
            "x": {
                "field": "x_value",
                "type": "nominal",
                "sort": null,
                "title": axis_title(labels.x_title(), options),
                "axis": { "labelAngle": 0 }
            },
            "y": {
                "field": "y_value",
                "type": "quantitative",
                "title": axis_title(labels.y_title(), options)
            },
            "color": {
                "field": "color_value",
                "type": "nominal",
                "legend": legend(labels.color_title(), options)
            },
            "opacity": highlight_opacity(),
            "size": {
                "condition": { "param": super::HOVER_PARAM, "empty": false, "value": 4 },
                "value": 2
            },
            "tooltip": xc_tooltip(labels)
        }
    })
}

fn xc_tooltip(labels: &ChartLabels) -> Value {
    tooltip(&[
        ("x_value", labels.x_title(), "nominal"),
        ("color_value", labels.color_title(), "nominal"),
        ("y_value", labels.y_title(), "quantitative"),
        ("size", "size", "quantitative"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> ChartLabels {
        ChartLabels::new("slices", "accuracy", "models")
    }

    #[test]
    fn test_bar_encodings() {
        let spec = bar(&labels(), &SpecOptions::default());
        assert_eq!(spec["mark"]["type"], "bar");
        assert_eq!(spec["encoding"]["x"]["field"], "x_value");
        assert_eq!(spec["encoding"]["x"]["title"], "slices");
        assert_eq!(spec["encoding"]["y"]["title"], "accuracy");
        assert_eq!(spec["encoding"]["color"]["legend"]["title"], "models");
        assert_eq!(spec["encoding"]["xOffset"]["field"], "color_value");
        assert_eq!(spec["encoding"]["tooltip"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_bar_preview_hides_chrome() {
        let spec = bar(&labels(), &SpecOptions::preview());
        assert!(spec["encoding"]["x"]["title"].is_null());
        assert!(spec["encoding"]["y"]["title"].is_null());
        assert!(spec["encoding"]["color"]["legend"].is_null());
        assert_eq!(spec["height"], 150);
        // Same data contract and interactions.
        assert_eq!(spec["encoding"]["y"]["field"], "y_value");
        assert_eq!(spec["params"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_labels_become_empty_titles() {
        let spec = bar(&ChartLabels::default(), &SpecOptions::default());
        assert_eq!(spec["encoding"]["x"]["title"], "");
        assert_eq!(spec["encoding"]["color"]["legend"]["title"], "");
        assert_eq!(spec["encoding"]["tooltip"][0]["title"], "");
    }

    #[test]
    fn test_line_highlights_series() {
        let spec = line(&labels(), &SpecOptions::default());
        assert_eq!(spec["mark"]["type"], "line");
        assert_eq!(spec["mark"]["point"]["size"], 60);
        assert_eq!(spec["params"][0]["select"]["fields"][0], "color_value");
        assert_eq!(spec["encoding"]["size"]["condition"]["param"], "hover");

        let preview = line(&labels(), &SpecOptions::preview());
        assert_eq!(preview["mark"]["point"]["size"], 30);
    }
}
