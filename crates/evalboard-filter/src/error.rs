//! Error types for the filter model.

use thiserror::Error;

/// Errors that can occur when reading filter model values from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Unknown comparison operation symbol.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// Unknown join symbol.
    #[error("unknown join: {0}")]
    UnknownJoin(String),

    /// Unknown column type name.
    #[error("unknown column type: {0}")]
    UnknownColumnType(String),

    /// Unknown data type name.
    #[error("unknown data type: {0}")]
    UnknownDataType(String),
}

/// Result type for filter model operations.
pub type FilterResult<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FilterError::UnknownOperation("~".to_string()).to_string(),
            "unknown operation: ~"
        );
        assert_eq!(
            FilterError::UnknownJoin("^".to_string()).to_string(),
            "unknown join: ^"
        );
        assert_eq!(
            FilterError::UnknownColumnType("WEIGHT".to_string()).to_string(),
            "unknown column type: WEIGHT"
        );
    }
}
