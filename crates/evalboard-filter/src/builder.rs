//! Fluent construction of predicate groups.

use crate::column::Column;
use crate::predicate::{FilterPredicate, FilterPredicateGroup, FilterValue, Join, Operation};

/// Fluent builder for [`FilterPredicateGroup`].
///
/// The first element added always receives [`Join::None`], whichever method
/// added it, so a built group never carries a meaningful join at position 0.
///
/// # Example
///
/// ```rust
/// use evalboard_filter::{Column, ColumnType, DataType, Operation, PredicateGroupBuilder};
///
/// let length = Column::new("2", "length", ColumnType::Feature, DataType::Continuous);
/// let group = PredicateGroupBuilder::new()
///     .where_(length.clone(), Operation::Greater, 10)
///     .or(length, Operation::Less, 2)
///     .build();
///
/// assert_eq!(group.to_string(), "length > 10 OR length < 2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PredicateGroupBuilder {
    group: FilterPredicateGroup,
}

impl PredicateGroupBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the first predicate.
    pub fn where_(self, column: Column, operation: Operation, value: impl Into<FilterValue>) -> Self {
        self.push(column, operation, value.into(), Join::None)
    }

    /// Adds a predicate conjunctively.
    pub fn and(self, column: Column, operation: Operation, value: impl Into<FilterValue>) -> Self {
        self.push(column, operation, value.into(), Join::And)
    }

    /// Adds a predicate disjunctively.
    pub fn or(self, column: Column, operation: Operation, value: impl Into<FilterValue>) -> Self {
        self.push(column, operation, value.into(), Join::Or)
    }

    /// Adds a nested group conjunctively.
    pub fn and_group(self, group: FilterPredicateGroup) -> Self {
        self.push_group(group, Join::And)
    }

    /// Adds a nested group disjunctively.
    pub fn or_group(self, group: FilterPredicateGroup) -> Self {
        self.push_group(group, Join::Or)
    }

    /// Builds the group.
    pub fn build(self) -> FilterPredicateGroup {
        self.group
    }

    fn push(mut self, column: Column, operation: Operation, value: FilterValue, join: Join) -> Self {
        let join = self.join_for_next(join);
        self.group.push(FilterPredicate {
            column,
            operation,
            value,
            join,
        });
        self
    }

    fn push_group(mut self, group: FilterPredicateGroup, join: Join) -> Self {
        let join = self.join_for_next(join);
        self.group.push(group.with_join(join));
        self
    }

    fn join_for_next(&self, join: Join) -> Join {
        if self.group.is_empty() {
            Join::None
        } else if join == Join::None {
            Join::And
        } else {
            join
        }
    }
}
