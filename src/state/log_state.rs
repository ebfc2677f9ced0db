//! LogState - the view model a UI instance renders from.
//!
//! Owns the entry store, the [`ViewState`] value, run metadata and the
//! derived filtered view. Every mutation recomputes the filtered view
//! synchronously and invalidates row measurements from the first row that
//! could have changed.

use crate::host::{EntriesUpdate, HostHandler};
use crate::model::{EntryId, LogEntry, RunIdsAndLabel, RunInfo};
use crate::state::store::EntryStore;
use crate::state::view_state::{ActiveIndex, ViewSettings, ViewState};
use crate::state::ExpandedSet;
use crate::view_state::types::{LineHeight, LineOffset};
use crate::view_state::visible_range::VisibleRange;
use crate::view_state::{build_filtered_view, FilteredEntries, RowLayout};
use std::sync::Arc;
use tracing::{debug, info};

/// View model for one UI instance.
#[derive(Debug, Clone, Default)]
pub struct LogState {
    store: EntryStore,
    view: ViewState,
    run_info: RunInfo,
    run_ids_and_label: RunIdsAndLabel,
    filtered: FilteredEntries,
    layout: RowLayout,
}

impl LogState {
    /// Empty state with default view settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty state starting from an existing view state (e.g. settings from config).
    pub fn with_view(view: ViewState) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    // ===== Host-driven updates =====

    /// Replace the entry sequence and union `newly_expanded` into the
    /// expanded set. Entries before `first_changed_index` are unchanged.
    pub fn set_entries(
        &mut self,
        entries: Arc<Vec<LogEntry>>,
        newly_expanded: &[EntryId],
        first_changed_index: usize,
    ) {
        self.store.set_entries(entries, first_changed_index);
        if !newly_expanded.is_empty() {
            self.view = std::mem::take(&mut self.view).with_expanded(newly_expanded);
        }
        self.recompute();
    }

    /// Replace the run info. No derived state depends on it.
    pub fn set_run_info(&mut self, run_info: RunInfo) {
        self.run_info = run_info;
    }

    /// Replace the run ids. No derived state depends on them.
    pub fn set_run_ids_and_label(&mut self, run_ids_and_label: RunIdsAndLabel) {
        self.run_ids_and_label = run_ids_and_label;
    }

    // ===== User actions =====

    /// Expand or collapse `id`. Every row may move, so the whole layout
    /// is re-measured.
    pub fn toggle_entry(&mut self, id: &EntryId) {
        self.view = std::mem::take(&mut self.view).toggle_entry(id);
        self.store.reset_last_updated_index();
        debug!(%id, expanded = self.view.expanded().contains(id.as_str()), "toggle entry");
        self.recompute();
    }

    /// Replace the filter text.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        let filter = filter.into();
        if filter == self.view.filter() {
            return;
        }
        info!(filter = %filter, "filter changed");
        self.view = std::mem::take(&mut self.view).with_filter(filter);
        self.recompute();
    }

    /// Replace the selection.
    pub fn set_active_index(&mut self, active_index: ActiveIndex) {
        self.view = std::mem::take(&mut self.view).with_active_index(active_index);
    }

    /// Replace the view settings.
    pub fn set_view_settings(&mut self, view_settings: ViewSettings) {
        self.view = std::mem::take(&mut self.view).with_view_settings(view_settings);
    }

    /// Expand every entry that has children.
    pub fn expand_all(&mut self) {
        let entries = Arc::clone(self.store.entries());
        let expanded: ExpandedSet = entries
            .iter()
            .enumerate()
            .filter(|(i, e)| entries.get(i + 1).is_some_and(|next| next.level() > e.level()))
            .map(|(_, e)| e.id().clone())
            .collect();
        self.replace_expanded(expanded);
    }

    /// Collapse everything.
    pub fn collapse_all(&mut self) {
        self.replace_expanded(ExpandedSet::new());
    }

    fn replace_expanded(&mut self, expanded: ExpandedSet) {
        self.view = std::mem::take(&mut self.view).with_expanded_set(expanded);
        self.store.reset_last_updated_index();
        self.recompute();
    }

    // ===== Accessors =====

    /// Current entry sequence.
    pub fn entries(&self) -> &Arc<Vec<LogEntry>> {
        self.store.entries()
    }

    /// Rows to display.
    pub fn filtered_entries(&self) -> &FilteredEntries {
        &self.filtered
    }

    /// View state value.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Current filter text.
    pub fn filter(&self) -> &str {
        self.view.filter()
    }

    /// Expanded ids.
    pub fn expanded(&self) -> &ExpandedSet {
        self.view.expanded()
    }

    /// Current selection.
    pub fn active_index(&self) -> ActiveIndex {
        self.view.active_index()
    }

    /// Current settings.
    pub fn view_settings(&self) -> &ViewSettings {
        self.view.view_settings()
    }

    /// Run info.
    pub fn run_info(&self) -> &RunInfo {
        &self.run_info
    }

    /// Run ids.
    pub fn run_ids_and_label(&self) -> &RunIdsAndLabel {
        &self.run_ids_and_label
    }

    /// Smallest entry index changed by the last update (0 after a toggle).
    pub fn last_updated_index(&self) -> usize {
        self.store.last_updated_index()
    }

    /// Entry behind the selected row, if the selection is a row that exists.
    pub fn active_entry(&self) -> Option<&LogEntry> {
        match self.view.active_index() {
            ActiveIndex::Entry(row) => self.filtered.entry(row),
            _ => None,
        }
    }

    // ===== Layout =====

    /// Height of `row` in the filtered view.
    pub fn row_height(&mut self, row: usize) -> Option<LineHeight> {
        self.layout.row_height(&self.filtered, row)
    }

    /// Top line offset of `row` in the filtered view.
    pub fn row_offset(&mut self, row: usize) -> Option<LineOffset> {
        self.layout.offset_of(&self.filtered, row)
    }

    /// Total height of the filtered view.
    pub fn total_height(&mut self) -> usize {
        self.layout.total_height(&self.filtered)
    }

    /// Rows intersecting the viewport.
    pub fn visible_range(&mut self, scroll: LineOffset, viewport_height: u16) -> VisibleRange {
        self.layout
            .visible_range(&self.filtered, scroll, viewport_height)
    }

    /// Number of rows whose height is currently cached.
    pub fn measured_rows(&self) -> usize {
        self.layout.measured_len()
    }

    fn recompute(&mut self) {
        let next = build_filtered_view(
            self.store.entries(),
            self.store.ancestry(),
            self.view.expanded(),
            self.view.filter(),
        );

        // Rows before both the changed entries and the first differing row keep their layout.
        let changed_row = next.first_row_at_or_after(self.store.last_updated_index());
        let diverged_row = self
            .filtered
            .rows()
            .iter()
            .zip(next.rows())
            .position(|(old, new)| old != new)
            .unwrap_or_else(|| self.filtered.len().min(next.len()));
        let reset_row = changed_row.min(diverged_row);
        self.layout.reset_after_index(reset_row);
        debug!(rows = next.len(), reset_row, "layout invalidated");

        self.filtered = next;
    }
}

impl HostHandler for LogState {
    fn on_entries(&mut self, update: EntriesUpdate) {
        self.set_entries(
            update.entries,
            &update.newly_expanded,
            update.first_changed_index,
        );
    }

    fn on_run_info(&mut self, run_info: RunInfo) {
        self.set_run_info(run_info);
    }

    fn on_run_ids_and_label(&mut self, run_ids_and_label: RunIdsAndLabel) {
        self.set_run_ids_and_label(run_ids_and_label);
    }
}

#[cfg(test)]
#[path = "log_state_tests.rs"]
mod tests;
