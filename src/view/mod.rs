//! Rendering: ratatui widgets over [`LogState`] and text output helpers.
//!
//! The view is drawn into an off-screen [`Buffer`]; the binary prints the
//! buffer as text (or a JSON snapshot) instead of driving a live terminal.

pub mod details;
pub mod entry_list;
pub mod snapshot;
pub mod styles;
pub mod text;

pub use details::DetailsPanel;
pub use entry_list::EntryList;
pub use snapshot::ViewSnapshot;
pub use styles::{ColorConfig, LogStyles};

use crate::state::{ActiveIndex, LogState};
use crate::view_state::types::{LineOffset, ViewportDimensions};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::Widget,
};

/// Height of the details pane when something is selected.
pub const DETAILS_HEIGHT: u16 = 10;

/// Draw the log view into a fresh buffer of `viewport` size.
///
/// `scroll` is the line offset of the list. The details pane is shown
/// below the list whenever a selection exists.
pub fn render_log(
    state: &mut LogState,
    viewport: ViewportDimensions,
    scroll: LineOffset,
    styles: &LogStyles,
) -> Buffer {
    let area = Rect::new(0, 0, viewport.width, viewport.height);
    let mut buf = Buffer::empty(area);

    let show_details = state.active_index() != ActiveIndex::None
        && viewport.height > DETAILS_HEIGHT + 3;
    let (list_area, details_area) = if show_details {
        let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(DETAILS_HEIGHT)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    // Borders take one line above and below the rows.
    let rows_height = list_area.height.saturating_sub(2);
    let range = state.visible_range(scroll, rows_height);
    let skip_lines = state
        .row_offset(range.start_row)
        .map_or(0, |top| scroll.get().saturating_sub(top.get()));
    let active_row = match state.active_index() {
        ActiveIndex::Entry(row) => Some(row),
        _ => None,
    };

    EntryList::new(state.filtered_entries(), range, styles)
        .skip_lines(skip_lines)
        .active_row(active_row)
        .filter(state.filter())
        .render(list_area, &mut buf);

    if let Some(details_area) = details_area {
        DetailsPanel::new(state, styles).render(details_area, &mut buf);
    }
    buf
}

/// Buffer contents as text, one line per row, trailing blanks trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        lines.push(line.trim_end().to_string());
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryId, EntryKind, LogEntry};
    use std::sync::Arc;

    fn entry(id: &str, level: usize, kind: EntryKind) -> LogEntry {
        LogEntry::new(EntryId::new(id).unwrap(), level, kind)
    }

    fn state_with_rows(n: usize) -> LogState {
        let entries = (0..n)
            .map(|i| {
                LogEntry::new(EntryId::root(i), 0, EntryKind::Log)
                    .with_field("message", format!("message {i}"))
            })
            .collect();
        let mut state = LogState::new();
        state.set_entries(Arc::new(entries), &[], 0);
        state
    }

    /// Two tasks; the first holds an element with a two-line log.
    fn tree_state() -> LogState {
        let entries = vec![
            entry("0", 0, EntryKind::Task)
                .with_field("name", "Checkout")
                .with_field("status", "PASS"),
            entry("0-0", 1, EntryKind::Element).with_field("name", "Open browser"),
            entry("0-0-0", 2, EntryKind::Log)
                .with_field("message", "browser ready\nheadless: true"),
            entry("1", 0, EntryKind::Task)
                .with_field("name", "Login")
                .with_field("status", "FAIL"),
            entry("1-0", 1, EntryKind::Log).with_field("message", "timeout after 5s"),
        ];
        let mut state = LogState::new();
        state.set_entries(Arc::new(entries), &[], 0);
        state
    }

    fn render(state: &mut LogState, width: u16, height: u16, scroll: usize) -> String {
        let buf = render_log(
            state,
            ViewportDimensions::new(width, height),
            LineOffset::new(scroll),
            &LogStyles::default(),
        );
        buffer_to_string(&buf)
    }

    #[test]
    fn renders_only_rows_that_fit() {
        let mut state = state_with_rows(50);
        let out = render(&mut state, 40, 7, 0);
        assert!(out.contains("message 0"));
        assert!(out.contains("message 4"));
        assert!(!out.contains("message 5"));
        assert!(state.measured_rows() < 50, "rows beyond the viewport stay unmeasured");
    }

    #[test]
    fn scroll_moves_the_window() {
        let mut state = state_with_rows(50);
        let out = render(&mut state, 40, 5, 10);
        assert!(out.contains("message 10"), "{out}");
        assert!(!out.contains("message 9\n"), "{out}");
    }

    #[test]
    fn collapsed_tree() {
        let mut state = tree_state();
        let output = render(&mut state, 40, 6, 0);
        insta::assert_snapshot!("collapsed_tree", output);
    }

    #[test]
    fn expanded_tree() {
        let mut state = tree_state();
        state.expand_all();
        let output = render(&mut state, 40, 8, 0);
        insta::assert_snapshot!("expanded_tree", output);
    }

    #[test]
    fn filtered_tree_opens_ancestors() {
        let mut state = tree_state();
        state.set_filter("browser");
        let output = render(&mut state, 40, 8, 0);
        insta::assert_snapshot!("filtered_tree", output);
        assert!(state.expanded().is_empty(), "filter does not touch the expanded set");
    }

    #[test]
    fn scroll_starts_inside_multi_line_row() {
        let mut state = tree_state();
        state.expand_all();
        // Line 3 is the second line of the two-line log row.
        let output = render(&mut state, 40, 5, 3);
        insta::assert_snapshot!("scrolled_into_row", output);
    }

    #[test]
    fn selection_opens_details_pane() {
        let mut state = state_with_rows(3);
        state.set_active_index(ActiveIndex::Entry(1));
        let output = render(&mut state, 60, 20, 0);
        insta::assert_snapshot!("selection_with_details", output);
    }

    #[test]
    fn details_pane_needs_room() {
        let mut state = state_with_rows(3);
        state.set_active_index(ActiveIndex::Entry(1));
        let out = render(&mut state, 60, 13, 0);
        assert!(!out.contains("Entry"), "{out}");
    }

    #[test]
    fn buffer_to_string_trims_trailing_space() {
        let area = Rect::new(0, 0, 5, 3);
        let mut buf = Buffer::empty(area);
        buf.set_string(0, 0, "ab", ratatui::style::Style::default());
        assert_eq!(buffer_to_string(&buf), "ab");
    }
}
