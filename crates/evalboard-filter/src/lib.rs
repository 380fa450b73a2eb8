//! # evalboard-filter
//!
//! Filter predicate trees for the evalboard evaluation dashboard.
//!
//! This crate provides:
//! - **Predicate model**: columns, comparison predicates and nested
//!   AND/OR predicate groups, serialised exactly as the backend expects
//! - **Slices and tags**: named predicate groups and explicit data-id sets
//! - **Selections**: the user's current metadata filters, selected slices
//!   and selected tags, with pure transition functions
//! - **Composition**: merging every selection source into one predicate
//!   group sent to the backend
//!
//! ## Joins
//!
//! A predicate group is an ordered list. The `join` of element `i > 0`
//! combines it with the accumulated result of elements `0..i`; the join of
//! element 0 is never evaluated and is conventionally [`Join::None`].
//!
//! | Join | Wire | Meaning |
//! |------|------|---------|
//! | `None` | `""` | first element |
//! | `And` | `"&"` | conjunction with the preceding elements |
//! | `Or` | `"\|"` | disjunction with the preceding elements |
//!
//! ## Usage
//!
//! ```rust
//! use evalboard_filter::{
//!     compose, Column, ColumnType, DataType, Operation, PredicateGroupBuilder, Selections, Slice,
//! };
//!
//! let label = Column::new("label", "label", ColumnType::Label, DataType::Nominal);
//! let slice = Slice::new(
//!     1,
//!     "positives",
//!     PredicateGroupBuilder::new()
//!         .where_(label, Operation::Equal, "positive")
//!         .build(),
//! );
//!
//! let selections = Selections::default().toggle_slice(1, false);
//! let composed = compose(&selections, &[slice], &[]).unwrap();
//! assert_eq!(composed.to_string(), "label == \"positive\"");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod builder;
mod column;
mod compose;
mod error;
mod predicate;
mod selection;
mod slice;

pub use builder::PredicateGroupBuilder;
pub use column::{Column, ColumnType, DataType};
pub use compose::{compose, selected_data_ids};
pub use error::{FilterError, FilterResult};
pub use predicate::{FilterPredicate, FilterPredicateGroup, FilterValue, Join, Operation, PredicateNode};
pub use selection::Selections;
pub use slice::{Slice, SliceId, Tag, TagId};
