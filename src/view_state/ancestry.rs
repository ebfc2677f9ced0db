//! Parent back-references for the flat entry sequence.
//!
//! The parent of entry `i` is the nearest preceding entry whose level is
//! strictly smaller. Links are cached and rebuilt only from the first
//! changed index, because entries before that index are unchanged and so
//! are their parents.
//!
//! # Complexity
//!
//! - `update_from`: O(changed suffix + depth of the entry before it)
//! - `parent`: O(1)
//! - `ancestors`: O(depth), lazily iterated

use crate::model::LogEntry;

/// Cached parent links, one per entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestryIndex {
    parents: Vec<Option<usize>>,
}

impl AncestryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index for `entries` from scratch.
    ///
    /// # Examples
    ///
    /// ```
    /// # use runlog::model::{EntryId, EntryKind, LogEntry};
    /// # use runlog::view_state::ancestry::AncestryIndex;
    /// let e = |id: &str, level| LogEntry::new(EntryId::new(id).unwrap(), level, EntryKind::Element);
    /// let entries = vec![e("a", 0), e("b", 1), e("c", 2), e("d", 1)];
    /// let index = AncestryIndex::build(&entries);
    /// assert_eq!(index.parent(2), Some(1));
    /// assert_eq!(index.parent(3), Some(0));
    /// assert_eq!(index.ancestors(2).collect::<Vec<_>>(), vec![1, 0]);
    /// ```
    pub fn build(entries: &[LogEntry]) -> Self {
        let mut index = Self::new();
        index.update_from(entries, 0);
        index
    }

    /// Recompute links for `entries[first_changed..]`.
    ///
    /// Links before `first_changed` are kept; `first_changed` is clamped to
    /// the cached length, so passing a too-large value never skips work.
    pub fn update_from(&mut self, entries: &[LogEntry], first_changed: usize) {
        let keep = first_changed.min(self.parents.len()).min(entries.len());
        self.parents.truncate(keep);

        // Open scopes at position `keep`: the entry before it plus its ancestors.
        let mut stack: Vec<usize> = match keep.checked_sub(1) {
            Some(last) => {
                let mut chain: Vec<usize> = self.ancestors(last).collect();
                chain.reverse();
                chain.push(last);
                chain
            }
            None => Vec::new(),
        };

        for (i, entry) in entries.iter().enumerate().skip(keep) {
            while let Some(&top) = stack.last() {
                if entries[top].level() >= entry.level() {
                    stack.pop();
                } else {
                    break;
                }
            }
            self.parents.push(stack.last().copied());
            stack.push(i);
        }
    }

    /// Parent of entry `index`, or `None` for roots and unknown indices.
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    /// Ancestors of `index`, nearest first. Unknown indices have none.
    pub fn ancestors(&self, index: usize) -> Ancestors<'_> {
        Ancestors {
            index: self,
            next: self.parent(index),
        }
    }

    /// Number of entries covered.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// True when no entries are covered.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Iterator over ancestor indices, nearest first.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    index: &'a AncestryIndex,
    next: Option<usize>,
}

impl Iterator for Ancestors<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        self.next = self.index.parent(current);
        Some(current)
    }
}
