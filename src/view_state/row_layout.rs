//! Row measurement cache for a virtualized list.
//!
//! Row heights are measured lazily, front to back, the first time a query
//! needs them. `reset_after_index` drops measurements from a row onward so
//! an update only re-measures the suffix it could have changed.

use crate::view_state::filter::FilteredEntries;
use crate::view_state::height::entry_height;
use crate::view_state::height_index::HeightIndex;
use crate::view_state::types::{LineHeight, LineOffset};
use crate::view_state::visible_range::VisibleRange;

/// Default initial capacity of the backing height index.
const INITIAL_CAPACITY: usize = 256;

/// Cached cumulative heights for the rows of a [`FilteredEntries`].
#[derive(Debug, Clone)]
pub struct RowLayout {
    index: HeightIndex,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl RowLayout {
    /// Create a layout with nothing measured.
    pub fn new() -> Self {
        Self {
            index: HeightIndex::new(INITIAL_CAPACITY),
        }
    }

    /// Forget measurements for `row` and every row after it.
    pub fn reset_after_index(&mut self, row: usize) {
        self.index.truncate(row);
    }

    /// Number of rows currently measured.
    pub fn measured_len(&self) -> usize {
        self.index.len()
    }

    /// Height of `row`, or `None` past the end of the view.
    pub fn row_height(&mut self, view: &FilteredEntries, row: usize) -> Option<LineHeight> {
        self.measure_through(view, row);
        if row < self.index.len() {
            LineHeight::new(self.index.height(row) as u16).ok()
        } else {
            None
        }
    }

    /// Top offset of `row`, or `None` past the end of the view.
    pub fn offset_of(&mut self, view: &FilteredEntries, row: usize) -> Option<LineOffset> {
        self.measure_through(view, row);
        if row >= self.index.len() {
            return None;
        }
        let above = match row.checked_sub(1) {
            Some(prev) => self.index.prefix_sum(prev),
            None => 0,
        };
        Some(LineOffset::new(above))
    }

    /// Total height of every row in the view.
    pub fn total_height(&mut self, view: &FilteredEntries) -> usize {
        self.measure_through(view, view.len().saturating_sub(1));
        self.index.total()
    }

    /// Row covering vertical offset `y`, or `None` below the last row.
    pub fn row_at_offset(&mut self, view: &FilteredEntries, y: usize) -> Option<usize> {
        self.sync_len(view);
        while self.index.total() <= y && self.index.len() < view.len() {
            self.measure_next(view);
        }
        self.index.lower_bound(y)
    }

    /// Rows that intersect `[scroll, scroll + viewport_height)`.
    pub fn visible_range(
        &mut self,
        view: &FilteredEntries,
        scroll: LineOffset,
        viewport_height: u16,
    ) -> VisibleRange {
        let Some(start) = self.row_at_offset(view, scroll.get()) else {
            return VisibleRange::new(view.len(), view.len(), scroll, viewport_height);
        };
        if viewport_height == 0 {
            return VisibleRange::new(start, start, scroll, viewport_height);
        }
        let bottom = scroll.get() + viewport_height as usize - 1;
        let end = self
            .row_at_offset(view, bottom)
            .map(|row| row + 1)
            .unwrap_or(view.len());
        VisibleRange::new(start, end, scroll, viewport_height)
    }

    /// Drop measurements for rows that no longer exist.
    fn sync_len(&mut self, view: &FilteredEntries) {
        if self.index.len() > view.len() {
            self.index.truncate(view.len());
        }
    }

    fn measure_through(&mut self, view: &FilteredEntries, row: usize) {
        self.sync_len(view);
        let target = (row + 1).min(view.len());
        while self.index.len() < target {
            self.measure_next(view);
        }
    }

    fn measure_next(&mut self, view: &FilteredEntries) {
        let row = self.index.len();
        let height = view
            .entry(row)
            .map(entry_height)
            .unwrap_or(LineHeight::ONE);
        self.index.push(height.get() as usize);
    }
}
