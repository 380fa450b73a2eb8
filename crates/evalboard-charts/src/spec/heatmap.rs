//! Heatmap: one cell per x/y pair, colored by metric.

use serde_json::{json, Value};

use super::{
    axis_title, highlight_stroke, legend, selection_params, tooltip, ChartLabels, SpecOptions,
};

pub(super) fn heatmap(labels: &ChartLabels, options: &SpecOptions) -> Value {
    let cell_text = if options.preview {
        Value::Null
    } else {
        json!({
            "mark": { "type": "text", "baseline": "middle" },
            "encoding": {
                "text": { "field": "color_value", "type": "quantitative", "format": ".2f" },
                "color": { "value": "black" }
            }
        })
    };

    let cells = json!({
        "params": selection_params(),
        "mark": { "type": "rect", "cursor": "pointer", "stroke": "white" },
        "encoding": {
            "color": {
                "field": "color_value",
                "type": "quantitative",
                "scale": { "scheme": "purples" },
                "legend": legend(labels.color_title(), options)
            },
            "strokeWidth": highlight_stroke(),
            "tooltip": tooltip(&[
                ("x_value", labels.x_title(), "nominal"),
                ("y_value", labels.y_title(), "nominal"),
                ("color_value", labels.color_title(), "quantitative"),
                ("size", "size", "quantitative"),
            ])
        }
    });

    let layer: Vec<Value> = [cells, cell_text]
        .into_iter()
        .filter(|l| !l.is_null())
        .collect();

    json!({
        "height": options.height_or(300),
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
                "type": "nominal",
                "sort": null,
                "title": axis_title(labels.y_title(), options)
            }
        },
        "layer": layer
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heatmap_layers() {
        let labels = ChartLabels::new("slices", "models", "accuracy");
        let spec = heatmap(&labels, &SpecOptions::default());
        let layers = spec["layer"].as_array().unwrap();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0]["mark"]["type"], "rect");
        assert_eq!(layers[0]["encoding"]["color"]["type"], "quantitative");
        assert_eq!(layers[0]["encoding"]["color"]["legend"]["title"], "accuracy");
        assert_eq!(layers[1]["mark"]["type"], "text");
        assert_eq!(spec["encoding"]["y"]["title"], "models");
    }

    #[test]
    fn test_heatmap_preview_drops_cell_text() {
        let spec = heatmap(&ChartLabels::default(), &SpecOptions::preview());
        let layers = spec["layer"].as_array().unwrap();
        assert_eq!(layers.len(), 1);
        assert!(layers[0]["encoding"]["color"]["legend"].is_null());
        assert!(spec["encoding"]["x"]["title"].is_null());
    }
}
