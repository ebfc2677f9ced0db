//! Set of entry ids whose children are displayed.

use crate::model::EntryId;
use std::collections::HashSet;

/// Ids of expanded entries.
///
/// Mutated only by user actions and by the host's "newly expanded" hints;
/// persists across entry updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedSet(HashSet<EntryId>);

impl ExpandedSet {
    /// Empty set: everything collapsed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is expanded.
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Flip membership of `id`. Returns the new membership.
    pub fn toggle(&mut self, id: &EntryId) -> bool {
        if self.0.remove(id.as_str()) {
            false
        } else {
            self.0.insert(id.clone());
            true
        }
    }

    /// Union in `ids` (idempotent).
    pub fn extend<'a>(&mut self, ids: impl IntoIterator<Item = &'a EntryId>) {
        self.0.extend(ids.into_iter().cloned());
    }

    /// Number of expanded ids.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing is expanded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate expanded ids in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &EntryId> {
        self.0.iter()
    }
}

impl FromIterator<EntryId> for ExpandedSet {
    fn from_iter<T: IntoIterator<Item = EntryId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> EntryId {
        EntryId::new(s).unwrap()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut set = ExpandedSet::new();
        assert!(set.toggle(&id("A")));
        assert!(set.contains("A"));
        assert!(!set.toggle(&id("A")));
        assert!(set.is_empty());
    }

    #[test]
    fn extend_is_idempotent_union() {
        let mut set: ExpandedSet = [id("A")].into_iter().collect();
        let more = [id("A"), id("B")];
        set.extend(&more);
        set.extend(&more);
        assert_eq!(set.len(), 2);
        assert!(set.contains("B"));
    }
}
