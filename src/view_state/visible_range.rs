//! Visible range calculation result

use super::types::LineOffset;

/// Range of rows visible in the current viewport.
///
/// Computed via binary search on cumulative Y offsets.
/// Indices are into the filtered view's rows.
///
/// # Invariants
/// - `start_row <= end_row`
/// - All rows in range have some portion visible in viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRange {
    /// Index of first visible row (inclusive).
    pub start_row: usize,
    /// Index of last visible row (exclusive).
    pub end_row: usize,
    /// Scroll offset the range was computed for.
    pub scroll_offset: LineOffset,
    /// Viewport height in lines.
    pub viewport_height: u16,
}

impl VisibleRange {
    /// Create new visible range.
    ///
    /// # Panics
    /// In debug builds, panics if start_row > end_row.
    pub fn new(
        start_row: usize,
        end_row: usize,
        scroll_offset: LineOffset,
        viewport_height: u16,
    ) -> Self {
        debug_assert!(
            start_row <= end_row,
            "start_row {start_row} > end_row {end_row}"
        );
        Self {
            start_row,
            end_row,
            scroll_offset,
            viewport_height,
        }
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.end_row - self.start_row
    }

    /// Check if range is empty.
    pub fn is_empty(&self) -> bool {
        self.start_row == self.end_row
    }

    /// Iterate over visible row indices.
    pub fn rows(&self) -> std::ops::Range<usize> {
        self.start_row..self.end_row
    }

    /// Check if a specific row is visible.
    pub fn contains(&self, row: usize) -> bool {
        self.rows().contains(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_range_with_given_values() {
        let range = VisibleRange::new(5, 10, LineOffset::new(100), 24);
        assert_eq!(range.start_row, 5);
        assert_eq!(range.end_row, 10);
        assert_eq!(range.scroll_offset, LineOffset::new(100));
        assert_eq!(range.len(), 5);
        assert!(range.contains(5));
        assert!(!range.contains(10));
    }

    #[test]
    fn default_is_empty() {
        let range = VisibleRange::default();
        assert!(range.is_empty());
        assert_eq!(range.rows().count(), 0);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn new_panics_when_start_greater_than_end() {
        VisibleRange::new(10, 5, LineOffset::new(0), 24);
    }
}
