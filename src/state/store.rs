//! Entry store - the current entry sequence plus update bookkeeping.

use crate::model::LogEntry;
use crate::view_state::AncestryIndex;
use std::sync::Arc;
use tracing::debug;

/// Holds the latest entry sequence pushed by the host.
///
/// The sequence is shared (`Arc`) with whoever produced it; the store never
/// mutates it. `last_updated_index` is the smallest index that may differ
/// from what was last laid out, so row measurements before it stay valid.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Arc<Vec<LogEntry>>,
    ancestry: AncestryIndex,
    last_updated_index: usize,
}

impl EntryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the sequence. Entries before `first_changed_index` are
    /// assumed identical to the previous sequence.
    ///
    /// An index past the end of `entries` is clamped to its length.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use runlog::model::{EntryId, EntryKind, LogEntry};
    /// # use runlog::state::EntryStore;
    /// let e = |id: &str| LogEntry::new(EntryId::new(id).unwrap(), 0, EntryKind::Log);
    /// let mut store = EntryStore::new();
    /// store.set_entries(Arc::new(vec![e("a"), e("b")]), 99);
    /// assert_eq!(store.last_updated_index(), 2);
    /// ```
    pub fn set_entries(&mut self, entries: Arc<Vec<LogEntry>>, first_changed_index: usize) {
        let first_changed = first_changed_index.min(entries.len());
        self.ancestry.update_from(&entries, first_changed);
        debug!(
            len = entries.len(),
            first_changed, "store replaced entries"
        );
        self.entries = entries;
        self.last_updated_index = first_changed;
    }

    /// Current sequence.
    pub fn entries(&self) -> &Arc<Vec<LogEntry>> {
        &self.entries
    }

    /// Parent links for the current sequence.
    pub fn ancestry(&self) -> &AncestryIndex {
        &self.ancestry
    }

    /// Smallest entry index changed by the last update.
    pub fn last_updated_index(&self) -> usize {
        self.last_updated_index
    }

    /// Mark everything as changed (after a toggle every row may move).
    pub fn reset_last_updated_index(&mut self) {
        self.last_updated_index = 0;
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries have arrived yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryId, EntryKind};

    fn entry(id: &str, level: usize) -> LogEntry {
        LogEntry::new(EntryId::new(id).unwrap(), level, EntryKind::Element)
    }

    #[test]
    fn new_store_is_empty() {
        let store = EntryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.last_updated_index(), 0);
    }

    #[test]
    fn set_entries_records_first_changed() {
        let mut store = EntryStore::new();
        store.set_entries(Arc::new(vec![entry("a", 0)]), 0);
        store.set_entries(Arc::new(vec![entry("a", 0), entry("b", 1)]), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.last_updated_index(), 1);
        assert_eq!(store.ancestry().parent(1), Some(0));
    }

    #[test]
    fn reset_sets_zero() {
        let mut store = EntryStore::new();
        store.set_entries(Arc::new(vec![entry("a", 0), entry("b", 0)]), 2);
        store.reset_last_updated_index();
        assert_eq!(store.last_updated_index(), 0);
    }

    #[test]
    fn shared_sequence_is_not_copied() {
        let entries = Arc::new(vec![entry("a", 0)]);
        let mut store = EntryStore::new();
        store.set_entries(Arc::clone(&entries), 0);
        assert!(Arc::ptr_eq(store.entries(), &entries));
    }
}
