//! Composition of every selection source into one predicate group.

use crate::predicate::{FilterPredicateGroup, Join, PredicateNode};
use crate::selection::Selections;
use crate::slice::{Slice, Tag};

/// Merges the selected slices and metadata filters into one predicate group.
///
/// Selected slice ids are resolved against `all_slices` first and
/// `comparison_slices` second; ids that resolve to nothing contribute
/// nothing. Slice contributions come first in selection order, followed by
/// every non-empty metadata filter in insertion order.
///
/// A contribution holding a single element is placed as that element; a
/// contribution with several elements is nested as a group, which keeps any
/// OR-logic inside one slice intact. The first element of the result has
/// [`Join::None`]; every later element is ANDed.
///
/// Empty nested groups are dropped at any depth, so no empty group reaches
/// the backend. Sources are deep-copied; the slices passed in are never
/// modified.
/// Returns `None` when nothing contributes, meaning "match all rows".
pub fn compose(
    selections: &Selections,
    all_slices: &[Slice],
    comparison_slices: &[Slice],
) -> Option<FilterPredicateGroup> {
    let slice_groups = selections.slices().iter().filter_map(|id| {
        let slice = all_slices
            .iter()
            .find(|s| s.id == *id)
            .or_else(|| comparison_slices.iter().find(|s| s.id == *id));
        if slice.is_none() {
            tracing::debug!(slice = id, "skipping unknown slice in selection");
        }
        slice.map(|s| &s.filter_predicates)
    });
    let metadata_groups = selections.metadata().map(|(_, group)| group);

    let mut composed = FilterPredicateGroup::empty();
    for group in slice_groups.chain(metadata_groups) {
        let Some(mut node) = contribution(group) else {
            continue;
        };
        node.set_join(if composed.is_empty() {
            Join::None
        } else {
            Join::And
        });
        composed.push(node);
    }

    composed.non_empty()
}

fn contribution(group: &FilterPredicateGroup) -> Option<PredicateNode> {
    let group = prune(group);
    match group.len() {
        0 => None,
        1 => group.predicates.into_iter().next(),
        _ => Some(PredicateNode::Group(group)),
    }
}

/// Copy of `group` without empty nested groups, at any depth. The first
/// surviving element takes [`Join::None`].
fn prune(group: &FilterPredicateGroup) -> FilterPredicateGroup {
    let mut pruned = FilterPredicateGroup::empty().with_join(group.join);
    for node in &group.predicates {
        let node = match node {
            PredicateNode::Group(inner) => {
                let inner = prune(inner);
                if inner.is_empty() {
                    continue;
                }
                PredicateNode::Group(inner)
            }
            leaf => leaf.clone(),
        };
        pruned.push(node);
    }
    if let Some(first) = pruned.predicates.first_mut() {
        first.set_join(Join::None);
    }
    pruned
}

/// Data ids covered by the selected tags, in first-seen order without
/// duplicates.
///
/// Returns `None` when no tag is selected. Selected ids with no matching tag
/// are skipped, so a selection of only stale tags yields `Some(vec![])`.
pub fn selected_data_ids(selections: &Selections, tags: &[Tag]) -> Option<Vec<String>> {
    if selections.tags().is_empty() {
        return None;
    }

    let mut ids: Vec<String> = Vec::new();
    for tag_id in selections.tags() {
        let Some(tag) = tags.iter().find(|t| t.id == *tag_id) else {
            tracing::debug!(tag = tag_id, "skipping unknown tag in selection");
            continue;
        };
        for data_id in &tag.data_ids {
            if !ids.contains(data_id) {
                ids.push(data_id.clone());
            }
        }
    }
    Some(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{Column, ColumnType, DataType};
    use crate::predicate::{FilterPredicate, Operation};

    fn label() -> Column {
        Column::new("1", "label", ColumnType::Label, DataType::Nominal)
    }

    fn single(value: &str) -> FilterPredicateGroup {
        FilterPredicateGroup::new(vec![
            FilterPredicate::new(label(), Operation::Equal, value).into()
        ])
    }

    #[test]
    fn test_empty_selection_composes_to_none() {
        assert!(compose(&Selections::new(), &[], &[]).is_none());
    }

    #[test]
    fn test_comparison_slices_are_fallback() {
        let primary = Slice::new(1, "primary", single("a"));
        let shadowed = Slice::new(1, "shadowed", single("z"));
        let extra = Slice::new(2, "extra", single("b"));

        let selections = Selections::new().with_slices([1, 2]);
        let composed = compose(&selections, &[primary], &[shadowed, extra]).unwrap();
        assert_eq!(composed.to_string(), "label == \"a\" AND label == \"b\"");
    }

    #[test]
    fn test_empty_slice_contributes_nothing() {
        let empty = Slice::new(1, "empty", FilterPredicateGroup::empty());
        let selections = Selections::new().toggle_slice(1, false);
        assert!(compose(&selections, &[empty], &[]).is_none());
    }

    #[test]
    fn test_empty_nested_groups_are_dropped() {
        let hollow = FilterPredicateGroup::new(vec![PredicateNode::Group(
            FilterPredicateGroup::new(vec![FilterPredicateGroup::empty().into()]),
        )]);
        let selections = Selections::new().toggle_slice(1, false);
        assert!(compose(&selections, &[Slice::new(1, "hollow", hollow)], &[]).is_none());

        let mut partly = FilterPredicateGroup::new(vec![FilterPredicateGroup::empty().into()]);
        partly.push(FilterPredicate::new(label(), Operation::Equal, "a").with_join(Join::Or));
        let composed = compose(&selections, &[Slice::new(1, "partly", partly)], &[]).unwrap();
        assert_eq!(composed.len(), 1);
        let leaf = composed.predicates[0].as_predicate().unwrap();
        assert_eq!(leaf.join, Join::None);
        assert_eq!(composed.to_string(), "label == \"a\"");
    }

    #[test]
    fn test_selected_data_ids() {
        let tags = vec![Tag::new(1, "a", ["x", "y"]), Tag::new(2, "b", ["y", "z"])];

        assert_eq!(selected_data_ids(&Selections::new(), &tags), None);

        let selections = Selections::new().toggle_tag(2).toggle_tag(1);
        assert_eq!(
            selected_data_ids(&selections, &tags),
            Some(vec!["y".to_string(), "z".to_string(), "x".to_string()])
        );

        let stale = Selections::new().toggle_tag(99);
        assert_eq!(selected_data_ids(&stale, &tags), Some(vec![]));
    }
}
