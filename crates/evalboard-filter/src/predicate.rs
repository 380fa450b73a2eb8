//! Predicate tree types for dashboard filters.

use std::fmt;
use std::str::FromStr;

use crate::column::Column;
use crate::error::FilterError;

// =============================================================================
// Operations and joins
// =============================================================================

/// Comparison operation of a leaf predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    /// Exact match: `==`
    #[cfg_attr(feature = "serde", serde(rename = "=="))]
    Equal,
    /// Not equal: `!=`
    #[cfg_attr(feature = "serde", serde(rename = "!="))]
    Different,
    /// Greater than: `>`
    #[cfg_attr(feature = "serde", serde(rename = ">"))]
    Greater,
    /// Greater than or equal: `>=`
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    GreaterOrEqual,
    /// Less than: `<`
    #[cfg_attr(feature = "serde", serde(rename = "<"))]
    Less,
    /// Less than or equal: `<=`
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    LessOrEqual,
    /// SQL-style pattern match: `LIKE`
    #[cfg_attr(feature = "serde", serde(rename = "LIKE"))]
    Like,
    /// Case-insensitive pattern match: `ILIKE`
    #[cfg_attr(feature = "serde", serde(rename = "ILIKE"))]
    ILike,
    /// Negated pattern match: `NOT LIKE`
    #[cfg_attr(feature = "serde", serde(rename = "NOT LIKE"))]
    NotLike,
    /// Negated case-insensitive pattern match: `NOT ILIKE`
    #[cfg_attr(feature = "serde", serde(rename = "NOT ILIKE"))]
    NotILike,
    /// Regular expression match: `REGEX`
    #[cfg_attr(feature = "serde", serde(rename = "REGEX"))]
    Regex,
}

impl Operation {
    /// Returns the wire symbol of this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Equal => "==",
            Operation::Different => "!=",
            Operation::Greater => ">",
            Operation::GreaterOrEqual => ">=",
            Operation::Less => "<",
            Operation::LessOrEqual => "<=",
            Operation::Like => "LIKE",
            Operation::ILike => "ILIKE",
            Operation::NotLike => "NOT LIKE",
            Operation::NotILike => "NOT ILIKE",
            Operation::Regex => "REGEX",
        }
    }

    /// Returns true for the text-matching operations.
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            Operation::Like
                | Operation::ILike
                | Operation::NotLike
                | Operation::NotILike
                | Operation::Regex
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "==" => Ok(Operation::Equal),
            "!=" => Ok(Operation::Different),
            ">" => Ok(Operation::Greater),
            ">=" => Ok(Operation::GreaterOrEqual),
            "<" => Ok(Operation::Less),
            "<=" => Ok(Operation::LessOrEqual),
            "LIKE" => Ok(Operation::Like),
            "ILIKE" => Ok(Operation::ILike),
            "NOT LIKE" => Ok(Operation::NotLike),
            "NOT ILIKE" => Ok(Operation::NotILike),
            "REGEX" => Ok(Operation::Regex),
            other => Err(FilterError::UnknownOperation(other.to_string())),
        }
    }
}

/// How an element combines with the elements preceding it in its list.
///
/// The join belongs to the edge between an element and its predecessor, so
/// the first element of a list always carries [`Join::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Join {
    /// No join, first element of a list.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = ""))]
    None,
    /// Conjunction: `&`
    #[cfg_attr(feature = "serde", serde(rename = "&"))]
    And,
    /// Disjunction: `|`
    #[cfg_attr(feature = "serde", serde(rename = "|"))]
    Or,
}

impl Join {
    /// Returns the wire symbol of this join.
    pub fn as_str(&self) -> &'static str {
        match self {
            Join::None => "",
            Join::And => "&",
            Join::Or => "|",
        }
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Join::None => Ok(()),
            Join::And => write!(f, "AND"),
            Join::Or => write!(f, "OR"),
        }
    }
}

impl FromStr for Join {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Join::None),
            "&" | "AND" => Ok(Join::And),
            "|" | "OR" => Ok(Join::Or),
            other => Err(FilterError::UnknownJoin(other.to_string())),
        }
    }
}

// =============================================================================
// Values
// =============================================================================

/// Right-hand side of a predicate comparison.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FilterValue {
    /// Boolean value.
    Boolean(bool),
    /// Numeric value.
    Number(f64),
    /// Text value.
    String(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Boolean(b) => write!(f, "{}", b),
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Boolean(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value as f64)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Number(f64::from(value))
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

// =============================================================================
// Predicates and groups
// =============================================================================

/// A leaf boolean test on one column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterPredicate {
    /// Column being tested.
    pub column: Column,
    /// Comparison operation.
    pub operation: Operation,
    /// Value compared against.
    pub value: FilterValue,
    /// Join with the preceding sibling.
    #[cfg_attr(feature = "serde", serde(default))]
    pub join: Join,
}

impl FilterPredicate {
    /// Creates a predicate with [`Join::None`].
    pub fn new(column: Column, operation: Operation, value: impl Into<FilterValue>) -> Self {
        Self {
            column,
            operation,
            value: value.into(),
            join: Join::None,
        }
    }

    /// Sets the join with the preceding sibling.
    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.operation, self.value)
    }
}

/// A boolean expression node holding an ordered list of predicates and
/// nested groups.
///
/// An empty group means "no filter" and is never sent to the backend; use
/// [`FilterPredicateGroup::non_empty`] to collapse it to `None`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterPredicateGroup {
    /// Ordered child nodes.
    pub predicates: Vec<PredicateNode>,
    /// Join with the preceding sibling.
    #[cfg_attr(feature = "serde", serde(default))]
    pub join: Join,
}

impl FilterPredicateGroup {
    /// Creates a group from child nodes with [`Join::None`].
    pub fn new(predicates: Vec<PredicateNode>) -> Self {
        Self {
            predicates,
            join: Join::None,
        }
    }

    /// Creates an empty group.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets the join with the preceding sibling.
    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    /// Appends a child node.
    pub fn push(&mut self, node: impl Into<PredicateNode>) {
        self.predicates.push(node.into());
    }

    /// Returns true if the group holds no children.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Collapses an empty group to `None`.
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Nesting depth; a group of leaves has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .predicates
            .iter()
            .map(|node| match node {
                PredicateNode::Predicate(_) => 0,
                PredicateNode::Group(group) => group.depth(),
            })
            .max()
            .unwrap_or(0)
    }

    /// Number of leaf predicates anywhere in the tree.
    pub fn leaf_count(&self) -> usize {
        self.predicates
            .iter()
            .map(|node| match node {
                PredicateNode::Predicate(_) => 1,
                PredicateNode::Group(group) => group.leaf_count(),
            })
            .sum()
    }

    /// Every column referenced in the tree, in depth-first order.
    pub fn columns(&self) -> Vec<&Column> {
        let mut columns = Vec::new();
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a Column>) {
        for node in &self.predicates {
            match node {
                PredicateNode::Predicate(p) => out.push(&p.column),
                PredicateNode::Group(g) => g.collect_columns(out),
            }
        }
    }
}

impl fmt::Display for FilterPredicateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.predicates.iter().enumerate() {
            if i > 0 {
                let join = match node.join() {
                    Join::Or => Join::Or,
                    _ => Join::And,
                };
                write!(f, " {} ", join)?;
            }
            match node {
                PredicateNode::Predicate(p) => write!(f, "{}", p)?,
                PredicateNode::Group(g) if g.len() > 1 => write!(f, "({})", g)?,
                PredicateNode::Group(g) => write!(f, "{}", g)?,
            }
        }
        Ok(())
    }
}

/// One element of a predicate group: a leaf or a nested group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PredicateNode {
    /// Nested group.
    Group(FilterPredicateGroup),
    /// Leaf predicate.
    Predicate(FilterPredicate),
}

impl PredicateNode {
    /// Join with the preceding sibling.
    pub fn join(&self) -> Join {
        match self {
            PredicateNode::Predicate(p) => p.join,
            PredicateNode::Group(g) => g.join,
        }
    }

    /// Replaces the join with the preceding sibling.
    pub fn set_join(&mut self, join: Join) {
        match self {
            PredicateNode::Predicate(p) => p.join = join,
            PredicateNode::Group(g) => g.join = join,
        }
    }

    /// Returns the leaf predicate if this node is one.
    pub fn as_predicate(&self) -> Option<&FilterPredicate> {
        match self {
            PredicateNode::Predicate(p) => Some(p),
            PredicateNode::Group(_) => None,
        }
    }

    /// Returns the nested group if this node is one.
    pub fn as_group(&self) -> Option<&FilterPredicateGroup> {
        match self {
            PredicateNode::Group(g) => Some(g),
            PredicateNode::Predicate(_) => None,
        }
    }
}

impl From<FilterPredicate> for PredicateNode {
    fn from(predicate: FilterPredicate) -> Self {
        PredicateNode::Predicate(predicate)
    }
}

impl From<FilterPredicateGroup> for PredicateNode {
    fn from(group: FilterPredicateGroup) -> Self {
        PredicateNode::Group(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnType, DataType};

    fn label() -> Column {
        Column::new("1", "label", ColumnType::Label, DataType::Nominal)
    }

    fn length() -> Column {
        Column::new("2", "length", ColumnType::Feature, DataType::Continuous)
    }

    #[test]
    fn test_operation_round_trip_symbols() {
        for op in [
            Operation::Equal,
            Operation::Different,
            Operation::Greater,
            Operation::GreaterOrEqual,
            Operation::Less,
            Operation::LessOrEqual,
            Operation::Like,
            Operation::ILike,
            Operation::NotLike,
            Operation::NotILike,
            Operation::Regex,
        ] {
            assert_eq!(op.as_str().parse::<Operation>(), Ok(op));
        }
        assert!("~=".parse::<Operation>().is_err());
        assert!(Operation::Regex.is_pattern());
        assert!(!Operation::Less.is_pattern());
    }

    #[test]
    fn test_join_from_str() {
        assert_eq!("".parse::<Join>(), Ok(Join::None));
        assert_eq!("&".parse::<Join>(), Ok(Join::And));
        assert_eq!("OR".parse::<Join>(), Ok(Join::Or));
        assert_eq!(
            "^".parse::<Join>(),
            Err(FilterError::UnknownJoin("^".to_string()))
        );
    }

    #[test]
    fn test_predicate_display() {
        let p = FilterPredicate::new(label(), Operation::Equal, "cat");
        assert_eq!(p.to_string(), "label == \"cat\"");

        let p = FilterPredicate::new(length(), Operation::Greater, 5);
        assert_eq!(p.to_string(), "length > 5");
    }

    #[test]
    fn test_group_display_nested() {
        let inner = FilterPredicateGroup::new(vec![
            FilterPredicate::new(length(), Operation::Greater, 5).into(),
            FilterPredicate::new(length(), Operation::Less, 2)
                .with_join(Join::Or)
                .into(),
        ])
        .with_join(Join::And);

        let group = FilterPredicateGroup::new(vec![
            FilterPredicate::new(label(), Operation::Equal, "x").into(),
            inner.into(),
        ]);

        assert_eq!(
            group.to_string(),
            "label == \"x\" AND (length > 5 OR length < 2)"
        );
    }

    #[test]
    fn test_group_metrics() {
        let inner = FilterPredicateGroup::new(vec![
            FilterPredicate::new(length(), Operation::Greater, 5).into(),
            FilterPredicate::new(label(), Operation::Equal, true)
                .with_join(Join::Or)
                .into(),
        ]);
        let group = FilterPredicateGroup::new(vec![
            FilterPredicate::new(label(), Operation::Equal, "x").into(),
            inner.with_join(Join::And).into(),
        ]);

        assert_eq!(group.len(), 2);
        assert_eq!(group.depth(), 2);
        assert_eq!(group.leaf_count(), 3);
        let names: Vec<&str> = group.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["label", "length", "label"]);
    }

    #[test]
    fn test_empty_group_collapses() {
        assert!(FilterPredicateGroup::empty().non_empty().is_none());
        assert_eq!(FilterPredicateGroup::empty().depth(), 1);

        let mut group = FilterPredicateGroup::empty();
        group.push(FilterPredicate::new(label(), Operation::Equal, "x"));
        assert!(group.non_empty().is_some());
    }

    #[test]
    fn test_node_join_accessors() {
        let mut node: PredicateNode = FilterPredicate::new(label(), Operation::Equal, "x").into();
        assert_eq!(node.join(), Join::None);
        node.set_join(Join::And);
        assert_eq!(node.join(), Join::And);
        assert!(node.as_predicate().is_some());
        assert!(node.as_group().is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_wire_format() {
        let group = FilterPredicateGroup::new(vec![
            FilterPredicate::new(label(), Operation::Equal, "x").into(),
            FilterPredicate::new(length(), Operation::GreaterOrEqual, 3)
                .with_join(Join::Or)
                .into(),
        ]);
        let json = serde_json::to_value(&group).unwrap();

        assert_eq!(json["join"], "");
        assert_eq!(json["predicates"][0]["operation"], "==");
        assert_eq!(json["predicates"][0]["value"], "x");
        assert_eq!(json["predicates"][1]["join"], "|");
        assert_eq!(json["predicates"][1]["value"], 3.0);
        assert_eq!(json["predicates"][1]["column"]["columnType"], "FEATURE");

        let back: FilterPredicateGroup = serde_json::from_value(json).unwrap();
        assert_eq!(back, group);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_nested_group_deserializes_as_group() {
        let json = r#"{
            "predicates": [
                {"predicates": [], "join": ""},
                {"column": {"id": "1", "name": "label", "columnType": "LABEL", "dataType": "NOMINAL"},
                 "operation": "!=", "value": false, "join": "&"}
            ],
            "join": ""
        }"#;
        let group: FilterPredicateGroup = serde_json::from_str(json).unwrap();
        assert!(group.predicates[0].as_group().is_some());
        let leaf = group.predicates[1].as_predicate().unwrap();
        assert_eq!(leaf.value, FilterValue::Boolean(false));
        assert_eq!(leaf.join, Join::And);
    }
}
