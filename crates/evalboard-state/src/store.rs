//! Process-wide selection state with subscriptions.
//!
//! The store owns the user's [`Selections`] and the catalog of known slices
//! and tags. Every mutation builds one new immutable [`Snapshot`], including
//! the composed filter and the tag data ids derived from it, and swaps it in
//! under a single write lock. Readers only ever see whole snapshots.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use evalboard_filter::{
    compose, selected_data_ids, FilterPredicateGroup, Selections, Slice, SliceId, Tag, TagId,
};
use parking_lot::RwLock;

/// Identifier returned by [`SelectionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(&Snapshot) + Send + Sync>;

/// Known slices and tags.
#[derive(Debug, Clone, Default)]
pub struct SliceCatalog {
    /// Slices of the project.
    pub slices: Vec<Slice>,
    /// Extra slices defined by the model-comparison view.
    pub comparison_slices: Vec<Slice>,
    /// Tags of the project.
    pub tags: Vec<Tag>,
}

/// One consistent view of the selection state and its derived values.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Incremented on every mutation.
    pub version: u64,
    /// Current selections.
    pub selections: Selections,
    /// Composed filter (None = match all rows).
    pub composed: Option<FilterPredicateGroup>,
    /// Data ids of the selected tags (None = no tag selected).
    pub data_ids: Option<Vec<String>>,
}

struct Inner {
    catalog: Arc<SliceCatalog>,
    snapshot: Arc<Snapshot>,
}

/// Single-writer, many-reader selection state.
///
/// # Example
///
/// ```rust
/// use evalboard_state::SelectionStore;
///
/// let store = SelectionStore::new();
/// let id = store.subscribe(|snapshot| println!("version {}", snapshot.version));
///
/// store.toggle_tag(3);
/// assert_eq!(store.snapshot().selections.tags(), &[3]);
/// assert!(store.unsubscribe(id));
/// ```
pub struct SelectionStore {
    inner: RwLock<Inner>,
    subscribers: RwLock<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStore {
    /// Creates a store with empty selections and an empty catalog.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                catalog: Arc::new(SliceCatalog::default()),
                snapshot: Arc::new(Snapshot::default()),
            }),
            subscribers: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.inner.read().snapshot)
    }

    /// Current catalog.
    pub fn catalog(&self) -> Arc<SliceCatalog> {
        Arc::clone(&self.inner.read().catalog)
    }

    /// Registers a callback invoked with every new snapshot.
    pub fn subscribe(&self, callback: impl Fn(&Snapshot) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().push((id, Arc::new(callback)));
        id
    }

    /// Removes a callback. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    /// Toggles a slice; see [`Selections::toggle_slice`].
    pub fn toggle_slice(&self, id: SliceId, extend: bool) -> Arc<Snapshot> {
        self.update(|selections, _| Some(selections.toggle_slice(id, extend)))
    }

    /// Toggles a tag.
    pub fn toggle_tag(&self, id: TagId) -> Arc<Snapshot> {
        self.update(|selections, _| Some(selections.toggle_tag(id)))
    }

    /// Replaces the metadata filter stored under `key`.
    pub fn set_metadata(&self, key: impl Into<String>, group: FilterPredicateGroup) -> Arc<Snapshot> {
        let key = key.into();
        self.update(move |selections, _| Some(selections.set_metadata(key, group)))
    }

    /// Removes the metadata filter stored under `key`.
    pub fn remove_metadata(&self, key: &str) -> Arc<Snapshot> {
        self.update(|selections, _| Some(selections.remove_metadata(key)))
    }

    /// Replaces the selected slices.
    pub fn set_selected_slices(&self, ids: Vec<SliceId>) -> Arc<Snapshot> {
        self.update(move |selections, _| Some(selections.with_slices(ids)))
    }

    /// Clears every selection source.
    pub fn clear_selections(&self) -> Arc<Snapshot> {
        self.update(|selections, _| Some(selections.clear()))
    }

    /// Replaces the project's slices.
    pub fn set_slices(&self, slices: Vec<Slice>) -> Arc<Snapshot> {
        self.update(move |_, catalog| {
            catalog.slices = slices;
            None
        })
    }

    /// Replaces the comparison view's slices.
    pub fn set_comparison_slices(&self, slices: Vec<Slice>) -> Arc<Snapshot> {
        self.update(move |_, catalog| {
            catalog.comparison_slices = slices;
            None
        })
    }

    /// Replaces the project's tags.
    pub fn set_tags(&self, tags: Vec<Tag>) -> Arc<Snapshot> {
        self.update(move |_, catalog| {
            catalog.tags = tags;
            None
        })
    }

    /// Applies one mutation. `f` returns new selections, or `None` when only
    /// the catalog changed.
    fn update(
        &self,
        f: impl FnOnce(&Selections, &mut SliceCatalog) -> Option<Selections>,
    ) -> Arc<Snapshot> {
        let snapshot = {
            let mut inner = self.inner.write();
            let mut catalog = (*inner.catalog).clone();
            let selections = f(&inner.snapshot.selections, &mut catalog)
                .unwrap_or_else(|| inner.snapshot.selections.clone());

            let snapshot = Arc::new(derive(inner.snapshot.version + 1, selections, &catalog));
            inner.catalog = Arc::new(catalog);
            inner.snapshot = Arc::clone(&snapshot);
            snapshot
        };

        tracing::debug!(
            version = snapshot.version,
            slices = ?snapshot.selections.slices(),
            tags = ?snapshot.selections.tags(),
            filtered = snapshot.composed.is_some(),
            "selection state updated"
        );

        let subscribers: Vec<Subscriber> = self
            .subscribers
            .read()
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();
        for subscriber in subscribers {
            subscriber(&snapshot);
        }
        snapshot
    }
}

impl std::fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionStore")
            .field("snapshot", &self.snapshot())
            .field("subscribers", &self.subscribers.read().len())
            .finish()
    }
}

fn derive(version: u64, selections: Selections, catalog: &SliceCatalog) -> Snapshot {
    let composed = compose(&selections, &catalog.slices, &catalog.comparison_slices);
    let data_ids = selected_data_ids(&selections, &catalog.tags);
    Snapshot {
        version,
        selections,
        composed,
        data_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evalboard_filter::{Column, ColumnType, DataType, Operation, PredicateGroupBuilder};
    use std::sync::Mutex;

    fn slice(id: SliceId, value: &str) -> Slice {
        let label = Column::new("1", "label", ColumnType::Label, DataType::Nominal);
        Slice::new(
            id,
            format!("slice {}", id),
            PredicateGroupBuilder::new()
                .where_(label, Operation::Equal, value)
                .build(),
        )
    }

    #[test]
    fn test_initial_snapshot_is_empty() {
        let store = SelectionStore::new();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.version, 0);
        assert!(snapshot.selections.is_empty());
        assert!(snapshot.composed.is_none());
        assert!(snapshot.data_ids.is_none());
    }

    #[test]
    fn test_mutations_recompute_composed() {
        let store = SelectionStore::new();
        store.set_slices(vec![slice(1, "a")]);

        let snapshot = store.toggle_slice(1, false);
        assert_eq!(snapshot.composed.as_ref().unwrap().to_string(), "label == \"a\"");

        let snapshot = store.toggle_slice(1, false);
        assert!(snapshot.composed.is_none());
    }

    #[test]
    fn test_catalog_change_recomputes_composed() {
        let store = SelectionStore::new();
        let snapshot = store.toggle_slice(2, false);
        assert!(snapshot.composed.is_none());

        let snapshot = store.set_slices(vec![slice(2, "b")]);
        assert!(snapshot.composed.is_some());
        assert_eq!(snapshot.selections.slices(), &[2]);

        // Deleting the slice keeps the stale selection but drops its filter.
        let snapshot = store.set_slices(vec![]);
        assert_eq!(snapshot.selections.slices(), &[2]);
        assert!(snapshot.composed.is_none());
    }

    #[test]
    fn test_comparison_slices_resolve() {
        let store = SelectionStore::new();
        store.set_comparison_slices(vec![slice(-1, "cmp")]);
        let snapshot = store.toggle_slice(-1, false);
        assert!(snapshot.composed.is_some());
    }

    #[test]
    fn test_tags_derive_data_ids() {
        let store = SelectionStore::new();
        store.set_tags(vec![Tag::new(1, "hard", ["x", "y"])]);
        let snapshot = store.toggle_tag(1);
        assert_eq!(
            snapshot.data_ids,
            Some(vec!["x".to_string(), "y".to_string()])
        );
        assert!(snapshot.composed.is_none());
    }

    #[test]
    fn test_subscribers_receive_each_snapshot() {
        let store = SelectionStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = store.subscribe(move |s| sink.lock().unwrap().push(s.version));

        store.toggle_tag(1);
        store.set_metadata("m", FilterPredicateGroup::empty());
        assert!(store.unsubscribe(id));
        store.toggle_tag(1);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn test_old_snapshots_are_not_mutated() {
        let store = SelectionStore::new();
        let before = store.toggle_slice(1, true);
        let after = store.toggle_slice(2, true);
        assert_eq!(before.selections.slices(), &[1]);
        assert_eq!(after.selections.slices(), &[1, 2]);
    }

    #[test]
    fn test_subscriber_may_read_store() {
        let store = Arc::new(SelectionStore::new());
        let reader = Arc::clone(&store);
        let observed = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&observed);
        store.subscribe(move |s| {
            // The store is fully updated before subscribers run.
            *sink.lock().unwrap() = Some(reader.snapshot().version == s.version);
        });
        store.toggle_tag(5);
        assert_eq!(*observed.lock().unwrap(), Some(true));
    }
}
