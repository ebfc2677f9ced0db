//! Filtered view builder.
//!
//! Pure functions combining the entry sequence, the expanded set and the
//! filter text into the ordered list of rows to display.
//!
//! Without a filter an entry is shown iff every ancestor is expanded. A
//! collapsed entry hides its whole subtree, whatever the descendants'
//! own expand state.
//!
//! With a filter the shown set is `matches ∪ ancestors(matches)`. Ancestors
//! of matches are forced open for this one view; the expanded set itself is
//! not touched.

use crate::model::LogEntry;
use crate::state::ExpandedSet;
use crate::view_state::ancestry::AncestryIndex;
use std::sync::Arc;
use tracing::debug;

/// One displayed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    /// Index into the full entry sequence.
    pub source_index: usize,
    /// Whether the entry has any children at all (drives the expand marker).
    pub has_children: bool,
    /// Effective display state: expanded by the user, or forced open by the filter.
    pub expanded: bool,
}

/// Result of a filtered-view computation.
///
/// Holds a shared handle on the entry sequence it was computed from so rows
/// can be resolved without borrowing the store.
#[derive(Debug, Clone, Default)]
pub struct FilteredEntries {
    entries: Arc<Vec<LogEntry>>,
    rows: Vec<VisibleRow>,
}

impl FilteredEntries {
    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row metadata.
    pub fn rows(&self) -> &[VisibleRow] {
        &self.rows
    }

    /// Row metadata and entry at `row`.
    pub fn get(&self, row: usize) -> Option<(&VisibleRow, &LogEntry)> {
        let visible = self.rows.get(row)?;
        let entry = self.entries.get(visible.source_index)?;
        Some((visible, entry))
    }

    /// Entry at `row`.
    pub fn entry(&self, row: usize) -> Option<&LogEntry> {
        self.get(row).map(|(_, entry)| entry)
    }

    /// Visible entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&VisibleRow, &LogEntry)> {
        self.rows
            .iter()
            .filter_map(|row| self.entries.get(row.source_index).map(|e| (row, e)))
    }

    /// The full entry sequence the rows index into.
    pub fn entries(&self) -> &Arc<Vec<LogEntry>> {
        &self.entries
    }

    /// Ids of visible entries in display order.
    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|(_, e)| e.id().as_str()).collect()
    }

    /// First row whose source index is `>= source_index`, or `len()` if none.
    ///
    /// Rows are sorted by source index, so this is a binary search.
    pub fn first_row_at_or_after(&self, source_index: usize) -> usize {
        self.rows
            .partition_point(|row| row.source_index < source_index)
    }
}

fn has_children(entries: &[LogEntry], index: usize) -> bool {
    // Descendants are contiguous, so the first child (if any) follows directly.
    entries
        .get(index + 1)
        .is_some_and(|next| next.level() > entries[index].level())
}

/// Keep only entries whose ancestors are all expanded.
///
/// # Examples
///
/// ```
/// # use std::sync::Arc;
/// # use runlog::model::{EntryId, EntryKind, LogEntry};
/// # use runlog::state::ExpandedSet;
/// # use runlog::view_state::filter::leave_only_expanded_entries;
/// let e = |id: &str, level| LogEntry::new(EntryId::new(id).unwrap(), level, EntryKind::Element);
/// let entries = Arc::new(vec![e("A", 0), e("B", 1), e("C", 1)]);
///
/// let view = leave_only_expanded_entries(&entries, &ExpandedSet::new());
/// assert_eq!(view.ids(), vec!["A"]);
///
/// let expanded: ExpandedSet = [EntryId::new("A").unwrap()].into_iter().collect();
/// let view = leave_only_expanded_entries(&entries, &expanded);
/// assert_eq!(view.ids(), vec!["A", "B", "C"]);
/// ```
pub fn leave_only_expanded_entries(
    entries: &Arc<Vec<LogEntry>>,
    expanded: &ExpandedSet,
) -> FilteredEntries {
    let mut rows = Vec::new();
    // Level of the collapsed entry whose subtree is being skipped.
    let mut hidden_below: Option<usize> = None;

    for (i, entry) in entries.iter().enumerate() {
        if let Some(level) = hidden_below {
            if entry.level() > level {
                continue;
            }
            hidden_below = None;
        }

        let is_expanded = expanded.contains(entry.id().as_str());
        rows.push(VisibleRow {
            source_index: i,
            has_children: has_children(entries, i),
            expanded: is_expanded,
        });
        if !is_expanded {
            hidden_below = Some(entry.level());
        }
    }

    FilteredEntries {
        entries: Arc::clone(entries),
        rows,
    }
}

/// Keep only entries that match `filter` plus their ancestors.
///
/// `ancestry` should cover `entries`; indices it does not know about are
/// treated as roots (visible if they match).
///
/// # Examples
///
/// ```
/// # use std::sync::Arc;
/// # use runlog::model::{EntryId, EntryKind, LogEntry};
/// # use runlog::state::ExpandedSet;
/// # use runlog::view_state::ancestry::AncestryIndex;
/// # use runlog::view_state::filter::leave_only_filtered_expanded_entries;
/// let e = |id: &str, level| {
///     LogEntry::new(EntryId::new(id).unwrap(), level, EntryKind::Element).with_field("name", id)
/// };
/// let entries = Arc::new(vec![e("A", 0), e("B", 1), e("C", 1)]);
/// let ancestry = AncestryIndex::build(&entries);
///
/// let view = leave_only_filtered_expanded_entries(&entries, &ancestry, &ExpandedSet::new(), "C");
/// assert_eq!(view.ids(), vec!["A", "C"]);
/// ```
pub fn leave_only_filtered_expanded_entries(
    entries: &Arc<Vec<LogEntry>>,
    ancestry: &AncestryIndex,
    expanded: &ExpandedSet,
    filter: &str,
) -> FilteredEntries {
    let mut must_show = vec![false; entries.len()];
    let mut forced_open = vec![false; entries.len()];

    for (i, entry) in entries.iter().enumerate() {
        if !entry.matches(filter) {
            continue;
        }
        must_show[i] = true;
        for ancestor in ancestry.ancestors(i) {
            if ancestor >= entries.len() {
                break;
            }
            let already_shown = must_show[ancestor];
            must_show[ancestor] = true;
            if forced_open[ancestor] {
                // Chain above is already marked.
                break;
            }
            forced_open[ancestor] = true;
            if already_shown {
                // A match whose own ancestors were marked when it was visited.
                break;
            }
        }
    }

    let rows = must_show
        .iter()
        .enumerate()
        .filter(|(_, show)| **show)
        .map(|(i, _)| VisibleRow {
            source_index: i,
            has_children: has_children(entries, i),
            expanded: forced_open[i] || expanded.contains(entries[i].id().as_str()),
        })
        .collect();

    FilteredEntries {
        entries: Arc::clone(entries),
        rows,
    }
}

/// Compute the visible rows for the current state.
///
/// Dispatches on whether `filter` is empty.
pub fn build_filtered_view(
    entries: &Arc<Vec<LogEntry>>,
    ancestry: &AncestryIndex,
    expanded: &ExpandedSet,
    filter: &str,
) -> FilteredEntries {
    let view = if filter.is_empty() {
        leave_only_expanded_entries(entries, expanded)
    } else {
        leave_only_filtered_expanded_entries(entries, ancestry, expanded, filter)
    };
    debug!(
        total = entries.len(),
        visible = view.len(),
        filtered = !filter.is_empty(),
        "Recomputed filtered view"
    );
    view
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
