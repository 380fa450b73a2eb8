//! Column descriptors for dashboard data fields.

use std::str::FromStr;

use crate::error::FilterError;

/// The role a column plays in a project's dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ColumnType {
    /// Instance identifier.
    Id,
    /// Raw input data.
    Data,
    /// Ground-truth label.
    Label,
    /// Model output.
    Output,
    /// Derived feature, either metadata or per-model.
    Feature,
    /// Embedding vector.
    Embedding,
}

impl ColumnType {
    /// Returns the wire name of this column type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Id => "ID",
            ColumnType::Data => "DATA",
            ColumnType::Label => "LABEL",
            ColumnType::Output => "OUTPUT",
            ColumnType::Feature => "FEATURE",
            ColumnType::Embedding => "EMBEDDING",
        }
    }
}

impl FromStr for ColumnType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ID" => Ok(ColumnType::Id),
            "DATA" => Ok(ColumnType::Data),
            "LABEL" => Ok(ColumnType::Label),
            "OUTPUT" => Ok(ColumnType::Output),
            "FEATURE" => Ok(ColumnType::Feature),
            "EMBEDDING" => Ok(ColumnType::Embedding),
            other => Err(FilterError::UnknownColumnType(other.to_string())),
        }
    }
}

/// The kind of values a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum DataType {
    /// Categorical values.
    Nominal,
    /// Numeric values.
    Continuous,
    /// True/false values.
    Boolean,
    /// Timestamps.
    Datetime,
    /// Embedding vectors.
    Embedding,
    /// Anything else.
    Other,
}

impl DataType {
    /// Returns the wire name of this data type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Nominal => "NOMINAL",
            DataType::Continuous => "CONTINUOUS",
            DataType::Boolean => "BOOLEAN",
            DataType::Datetime => "DATETIME",
            DataType::Embedding => "EMBEDDING",
            DataType::Other => "OTHER",
        }
    }

    /// Returns true if histograms over this type use numeric bucket ranges.
    pub fn is_ranged(&self) -> bool {
        matches!(self, DataType::Continuous | DataType::Datetime)
    }
}

impl FromStr for DataType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NOMINAL" => Ok(DataType::Nominal),
            "CONTINUOUS" => Ok(DataType::Continuous),
            "BOOLEAN" => Ok(DataType::Boolean),
            "DATETIME" => Ok(DataType::Datetime),
            "EMBEDDING" => Ok(DataType::Embedding),
            "OTHER" => Ok(DataType::Other),
            other => Err(FilterError::UnknownDataType(other.to_string())),
        }
    }
}

/// Identifies a data field of a project.
///
/// `model` is set for per-model output and feature columns and absent for
/// columns shared by every model (ids, labels, metadata). An empty model
/// string is treated the same as an absent one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Column {
    /// Backend column id.
    pub id: String,
    /// Column name.
    pub name: String,
    /// Role of the column.
    pub column_type: ColumnType,
    /// Kind of values held by the column.
    pub data_type: DataType,
    /// Model the column belongs to, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub model: Option<String>,
}

impl Column {
    /// Creates a column not tied to any model.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        column_type: ColumnType,
        data_type: DataType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            column_type,
            data_type,
            model: None,
        }
    }

    /// Ties the column to a model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Returns the model name, treating an empty string as absent.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref().filter(|m| !m.is_empty())
    }

    /// Returns true if the column holds per-model values.
    pub fn is_model_column(&self) -> bool {
        self.model().is_some()
    }

    /// Name shown to users: `"<model> <name>"` for model columns.
    pub fn display_name(&self) -> String {
        match self.model() {
            Some(model) => format!("{} {}", model, self.name),
            None => self.name.clone(),
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
