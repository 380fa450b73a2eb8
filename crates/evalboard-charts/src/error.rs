//! Error types for chart decoding.

use thiserror::Error;

/// Errors that can occur while reading a chart definition.
///
/// Spec building itself never fails; these only cover charts arriving from
/// storage or the backend.
#[derive(Error, Debug)]
pub enum ChartError {
    /// The chart type is not one of the known types.
    #[error("unknown chart type: {0}")]
    UnknownChartType(String),

    /// The parameters do not match the shape of the chart type.
    #[error("invalid parameters for {chart_type} chart: {source}")]
    InvalidParameters {
        /// Chart type whose parameters failed to decode.
        chart_type: String,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },

    /// The chart document itself is malformed.
    #[error("invalid chart: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for chart operations.
pub type ChartResult<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChartError::UnknownChartType("PIE".to_string());
        assert_eq!(err.to_string(), "unknown chart type: PIE");
    }

    #[test]
    fn test_invalid_parameters_display() {
        let source = serde_json::from_str::<u32>("x").unwrap_err();
        let err = ChartError::InvalidParameters {
            chart_type: "BAR".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid parameters for BAR chart"));
    }
}
