//! Integration tests for chart decoding and spec building.

use evalboard_charts::{
    bindings, build_spec, channels, default_parameters, Chart, ChartContext, ChartError,
    ChartLabels, ChartParameters, ChartRow, ChartType, SlicesOrModels, SpecOptions, WireChart,
    XcParameters, CLICK_PARAM, HOVER_PARAM,
};
use serde_json::json;

fn context() -> ChartContext {
    ChartContext::new(
        vec![1, 2, 3],
        vec!["gpt2".to_string(), "bert".to_string()],
        vec![10, 11, 12],
    )
}

fn rows() -> Vec<ChartRow> {
    vec![
        ChartRow::new("short", 0.82, "gpt2").with_size(40),
        ChartRow::new("short", 0.78, "bert").with_size(40),
        ChartRow::new("long", 0.61, "gpt2").with_size(25),
        ChartRow::new("long", 0.66, "bert").with_size(25),
    ]
}

fn spec_types() -> impl Iterator<Item = ChartType> {
    ChartType::ALL
        .into_iter()
        .filter(|t| *t != ChartType::Table)
}

#[test]
fn test_stored_chart_to_spec() {
    let wire = WireChart {
        id: 12,
        name: "accuracy per slice".to_string(),
        chart_type: "BAR".to_string(),
        parameters: json!({
            "xChannel": "SLICES",
            "colorChannel": "MODELS",
            "slices": [1, 2],
            "models": ["gpt2", "bert"],
            "metric": 10
        })
        .to_string(),
    };
    let chart = Chart::from_wire(&wire).unwrap();
    assert_eq!(chart.chart_type(), ChartType::Bar);

    let labels = ChartLabels::for_parameters(&chart.parameters, Some("accuracy"));
    let spec = build_spec(&chart.parameters, &rows(), &labels, &SpecOptions::default()).unwrap();
    let value = spec.as_value();

    assert_eq!(value["mark"]["type"], "bar");
    assert_eq!(value["encoding"]["x"]["title"], "slices");
    assert_eq!(value["encoding"]["y"]["title"], "accuracy");
    assert_eq!(value["encoding"]["color"]["legend"]["title"], "models");
    assert_eq!(value["data"]["values"][2]["x_value"], "long");
    assert_eq!(value["data"]["values"][2]["size"], 25);
}

#[test]
fn test_wire_errors() {
    let unknown = WireChart {
        id: 1,
        name: "pie".to_string(),
        chart_type: "PIE".to_string(),
        parameters: "{}".to_string(),
    };
    assert!(matches!(
        Chart::from_wire(&unknown),
        Err(ChartError::UnknownChartType(ref t)) if t == "PIE"
    ));

    let malformed = WireChart {
        chart_type: "LINE".to_string(),
        parameters: r#"{"xChannel": "METRICS", "colorChannel": "MODELS"}"#.to_string(),
        ..unknown
    };
    assert!(matches!(
        Chart::from_wire(&malformed),
        Err(ChartError::InvalidParameters { .. })
    ));
}

#[test]
fn test_default_parameters_bind_declared_channels() {
    for chart_type in ChartType::ALL {
        let params = default_parameters(chart_type, &context());
        let declared = channels(chart_type);
        let bound = bindings(&params);
        assert_eq!(bound.len(), declared.len());
        for ((channel, dimension), spec) in bound.iter().zip(declared) {
            assert_eq!(*channel, spec.channel);
            assert!(spec.accepts(*dimension), "{} {}", chart_type, channel);
        }
    }
}

#[test]
fn test_every_spec_is_interactive() {
    for chart_type in spec_types() {
        let params = default_parameters(chart_type, &context());
        let spec = build_spec(&params, &rows(), &ChartLabels::default(), &SpecOptions::default())
            .unwrap();
        let names = spec.param_names();
        assert!(names.contains(&HOVER_PARAM), "{}", chart_type);
        assert!(names.contains(&CLICK_PARAM), "{}", chart_type);
    }
}

#[test]
fn test_preview_keeps_data_contract() {
    for chart_type in spec_types() {
        let params = default_parameters(chart_type, &context());
        let labels = ChartLabels::for_parameters(&params, Some("accuracy"));
        let full = build_spec(&params, &rows(), &labels, &SpecOptions::default()).unwrap();
        let preview = build_spec(&params, &rows(), &labels, &SpecOptions::preview()).unwrap();

        assert_eq!(
            full.as_value()["data"],
            preview.as_value()["data"],
            "{}",
            chart_type
        );
        assert_eq!(full.mark_type(), preview.mark_type(), "{}", chart_type);
        assert_ne!(full, preview, "{}", chart_type);
    }
}

#[test]
fn test_preview_hides_legends() {
    let params = default_parameters(ChartType::Line, &context());
    let labels = ChartLabels::for_parameters(&params, Some("accuracy"));
    let preview = build_spec(&params, &rows(), &labels, &SpecOptions::preview()).unwrap();
    let value = preview.as_value();

    assert!(value["encoding"]["color"]["legend"].is_null());
    assert!(value["encoding"]["x"]["title"].is_null());
    assert_eq!(value["config"]["view"]["stroke"], serde_json::Value::Null);
}

#[test]
fn test_partial_parameters_still_build() {
    let params = ChartParameters::Bar(XcParameters {
        x_channel: SlicesOrModels::Models,
        color_channel: SlicesOrModels::Models,
        slices: vec![],
        models: vec![],
        metric: None,
    });
    let labels = ChartLabels::for_parameters(&params, None);
    let spec = build_spec(&params, &[], &labels, &SpecOptions::default()).unwrap();
    assert_eq!(spec.as_value()["encoding"]["y"]["title"], "");
    assert_eq!(spec.as_value()["data"]["values"], json!([]));
}

#[test]
fn test_table_charts_have_no_spec() {
    let params = default_parameters(ChartType::Table, &context());
    assert!(build_spec(&params, &rows(), &ChartLabels::default(), &SpecOptions::preview()).is_none());
}
