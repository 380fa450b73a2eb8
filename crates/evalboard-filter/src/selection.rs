//! The user's current selection sources and their transitions.
//!
//! Every transition takes the current value by reference and returns a new,
//! fully-formed [`Selections`]; nothing is edited in place, so a holder of
//! the old value never observes a partial update.

use crate::predicate::FilterPredicateGroup;
use crate::slice::{SliceId, TagId};

/// Current selections: freeform metadata filters, selected slices and
/// selected tags.
///
/// `slices` never holds duplicate ids. Metadata keeps insertion order;
/// replacing an existing key keeps its position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selections {
    metadata: Vec<(String, FilterPredicateGroup)>,
    slices: Vec<SliceId>,
    tags: Vec<TagId>,
}

impl Selections {
    /// Creates empty selections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata filters in insertion order.
    pub fn metadata(&self) -> impl Iterator<Item = (&str, &FilterPredicateGroup)> {
        self.metadata.iter().map(|(k, g)| (k.as_str(), g))
    }

    /// Metadata filter stored under `key`.
    pub fn metadata_filter(&self, key: &str) -> Option<&FilterPredicateGroup> {
        self.metadata.iter().find(|(k, _)| k == key).map(|(_, g)| g)
    }

    /// Selected slice ids in selection order.
    pub fn slices(&self) -> &[SliceId] {
        &self.slices
    }

    /// Selected tag ids in selection order.
    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    /// Returns true if no source holds a selection.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty() && self.tags.is_empty() && self.metadata.is_empty()
    }

    /// Toggles a slice.
    ///
    /// Without `extend`, the selection becomes `[id]`, or `[]` when `id` was
    /// already the sole selected slice. With `extend`, `id` is removed if
    /// present and appended otherwise; other slices keep their order.
    pub fn toggle_slice(&self, id: SliceId, extend: bool) -> Self {
        let slices = if extend {
            toggled(&self.slices, id)
        } else if self.slices.as_slice() == [id] {
            Vec::new()
        } else {
            vec![id]
        };
        tracing::debug!(slice = id, extend, selected = ?slices, "toggled slice");
        Self {
            slices,
            ..self.clone()
        }
    }

    /// Toggles a tag. Tags are always multi-select.
    pub fn toggle_tag(&self, id: TagId) -> Self {
        let tags = toggled(&self.tags, id);
        tracing::debug!(tag = id, selected = ?tags, "toggled tag");
        Self {
            tags,
            ..self.clone()
        }
    }

    /// Replaces the metadata filter stored under `key`.
    pub fn set_metadata(&self, key: impl Into<String>, group: FilterPredicateGroup) -> Self {
        let key = key.into();
        let mut metadata = self.metadata.clone();
        match metadata.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = group,
            None => metadata.push((key, group)),
        }
        Self {
            metadata,
            ..self.clone()
        }
    }

    /// Removes the metadata filter stored under `key`.
    pub fn remove_metadata(&self, key: &str) -> Self {
        Self {
            metadata: self
                .metadata
                .iter()
                .filter(|(k, _)| k != key)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    /// Replaces the selected slices, dropping duplicate ids.
    pub fn with_slices(&self, ids: impl IntoIterator<Item = SliceId>) -> Self {
        let mut slices = Vec::new();
        for id in ids {
            if !slices.contains(&id) {
                slices.push(id);
            }
        }
        Self {
            slices,
            ..self.clone()
        }
    }

    /// Clears every selection source.
    pub fn clear(&self) -> Self {
        Self::default()
    }
}

fn toggled(ids: &[i64], id: i64) -> Vec<i64> {
    if ids.contains(&id) {
        ids.iter().copied().filter(|&x| x != id).collect()
    } else {
        let mut ids = ids.to_vec();
        ids.push(id);
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{Column, ColumnType, DataType};
    use crate::predicate::{FilterPredicate, Operation};

    fn group(value: &str) -> FilterPredicateGroup {
        FilterPredicateGroup::new(vec![FilterPredicate::new(
            Column::new("1", "label", ColumnType::Label, DataType::Nominal),
            Operation::Equal,
            value,
        )
        .into()])
    }

    #[test]
    fn test_single_select_replaces() {
        let s = Selections::new().toggle_slice(1, false).toggle_slice(2, false);
        assert_eq!(s.slices(), &[2]);
    }

    #[test]
    fn test_single_select_reclick_deselects() {
        let s = Selections::new().toggle_slice(7, false);
        assert_eq!(s.slices(), &[7]);
        let s = s.toggle_slice(7, false);
        assert!(s.slices().is_empty());
        let s = s.toggle_slice(7, false);
        assert_eq!(s.slices(), &[7]);
    }

    #[test]
    fn test_single_select_from_multi_replaces() {
        let s = Selections::new()
            .toggle_slice(1, true)
            .toggle_slice(2, true)
            .toggle_slice(2, false);
        assert_eq!(s.slices(), &[2]);
    }

    #[test]
    fn test_extend_mode() {
        let s = Selections::new()
            .toggle_slice(1, true)
            .toggle_slice(2, true)
            .toggle_slice(3, true)
            .toggle_slice(2, true);
        assert_eq!(s.slices(), &[1, 3]);
    }

    #[test]
    fn test_toggle_tag() {
        let s = Selections::new().toggle_tag(4).toggle_tag(5).toggle_tag(4);
        assert_eq!(s.tags(), &[5]);
    }

    #[test]
    fn test_transitions_leave_original_untouched() {
        let original = Selections::new().toggle_slice(1, false).toggle_tag(2);
        let next = original.toggle_slice(3, true).toggle_tag(2);
        assert_eq!(original.slices(), &[1]);
        assert_eq!(original.tags(), &[2]);
        assert_eq!(next.slices(), &[1, 3]);
        assert!(next.tags().is_empty());
    }

    #[test]
    fn test_metadata_replace_keeps_position() {
        let s = Selections::new()
            .set_metadata("a", group("1"))
            .set_metadata("b", group("2"))
            .set_metadata("a", group("3"));

        let keys: Vec<&str> = s.metadata().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(s.metadata_filter("a"), Some(&group("3")));
    }

    #[test]
    fn test_remove_metadata() {
        let s = Selections::new()
            .set_metadata("a", group("1"))
            .remove_metadata("a");
        assert!(s.metadata_filter("a").is_none());
        assert!(s.is_empty());
    }

    #[test]
    fn test_with_slices_dedupes() {
        let s = Selections::new().with_slices([3, 1, 3, 2, 1]);
        assert_eq!(s.slices(), &[3, 1, 2]);
    }

    #[test]
    fn test_clear() {
        let s = Selections::new()
            .toggle_slice(1, false)
            .toggle_tag(1)
            .set_metadata("a", group("x"))
            .clear();
        assert!(s.is_empty());
    }
}
