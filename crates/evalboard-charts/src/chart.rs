//! Chart definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::parameters::ChartParameters;

/// Kind of chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChartType {
    /// Grouped bar chart.
    Bar,
    /// Line chart.
    Line,
    /// Metric table, rendered without a visualization spec.
    Table,
    /// Beeswarm plot.
    Beeswarm,
    /// Radar chart.
    Radar,
    /// Heatmap.
    Heatmap,
}

impl ChartType {
    /// Every chart type.
    pub const ALL: [ChartType; 6] = [
        ChartType::Bar,
        ChartType::Line,
        ChartType::Table,
        ChartType::Beeswarm,
        ChartType::Radar,
        ChartType::Heatmap,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "BAR",
            ChartType::Line => "LINE",
            ChartType::Table => "TABLE",
            ChartType::Beeswarm => "BEESWARM",
            ChartType::Radar => "RADAR",
            ChartType::Heatmap => "HEATMAP",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChartError::UnknownChartType(s.to_string()))
    }
}

/// A saved chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// Chart id.
    pub id: i64,
    /// Chart name.
    pub name: String,
    /// Parameters; they also determine the chart type.
    pub parameters: ChartParameters,
}

/// A chart as stored by the backend, with its parameters as a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireChart {
    /// Chart id.
    pub id: i64,
    /// Chart name.
    pub name: String,
    /// Chart type name.
    #[serde(rename = "type")]
    pub chart_type: String,
    /// JSON-encoded parameter object.
    pub parameters: String,
}

impl Chart {
    /// Creates a chart.
    pub fn new(id: i64, name: impl Into<String>, parameters: ChartParameters) -> Self {
        Self {
            id,
            name: name.into(),
            parameters,
        }
    }

    /// Chart type.
    pub fn chart_type(&self) -> ChartType {
        self.parameters.chart_type()
    }

    /// Decodes a stored chart.
    pub fn from_wire(wire: &WireChart) -> ChartResult<Self> {
        let chart_type: ChartType = wire.chart_type.parse()?;
        let parameters = ChartParameters::from_json(chart_type, &wire.parameters)?;
        Ok(Self::new(wire.id, wire.name.clone(), parameters))
    }

    /// Decodes a stored chart from its JSON document.
    pub fn from_wire_json(json: &str) -> ChartResult<Self> {
        let wire: WireChart = serde_json::from_str(json)?;
        Self::from_wire(&wire)
    }

    /// Encodes the chart for storage.
    pub fn to_wire(&self) -> ChartResult<WireChart> {
        Ok(WireChart {
            id: self.id,
            name: self.name.clone(),
            chart_type: self.chart_type().to_string(),
            parameters: serde_json::to_string(&self.parameters)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{HeatmapParameters, SlicesOrModels};

    #[test]
    fn test_chart_type_from_str() {
        assert_eq!("BAR".parse::<ChartType>().unwrap(), ChartType::Bar);
        assert_eq!("heatmap".parse::<ChartType>().unwrap(), ChartType::Heatmap);
        assert!(matches!(
            "PIE".parse::<ChartType>(),
            Err(ChartError::UnknownChartType(_))
        ));
    }

    #[test]
    fn test_chart_type_serde() {
        let json = serde_json::to_string(&ChartType::Beeswarm).unwrap();
        assert_eq!(json, "\"BEESWARM\"");
    }

    #[test]
    fn test_from_wire() {
        let wire = WireChart {
            id: 4,
            name: "accuracy by slice".to_string(),
            chart_type: "HEATMAP".to_string(),
            parameters: r#"{"xChannel":"SLICES","yChannel":"MODELS","slices":[1],"models":["m"],"metric":2}"#
                .to_string(),
        };
        let chart = Chart::from_wire(&wire).unwrap();
        assert_eq!(chart.chart_type(), ChartType::Heatmap);
        assert_eq!(chart.parameters.slices(), &[1]);
        assert_eq!(chart.to_wire().unwrap().chart_type, "HEATMAP");
    }

    #[test]
    fn test_from_wire_json() {
        let json = r#"{"id": 1, "name": "c", "type": "PIE", "parameters": "{}"}"#;
        assert!(matches!(
            Chart::from_wire_json(json),
            Err(ChartError::UnknownChartType(_))
        ));
        assert!(matches!(Chart::from_wire_json("{"), Err(ChartError::Decode(_))));
    }

    #[test]
    fn test_to_wire_keeps_parameters() {
        let chart = Chart::new(
            9,
            "heat",
            ChartParameters::Heatmap(HeatmapParameters {
                x_channel: SlicesOrModels::Models,
                y_channel: SlicesOrModels::Slices,
                slices: vec![],
                models: vec![],
                metric: None,
            }),
        );
        let wire = chart.to_wire().unwrap();
        assert_eq!(Chart::from_wire(&wire).unwrap(), chart);
    }
}
