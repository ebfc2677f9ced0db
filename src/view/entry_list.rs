//! Entry list widget - the virtualized tree of log entries.
//!
//! Renders only the rows of a [`VisibleRange`]. Each row takes exactly
//! [`entry_height`] lines so the widget agrees with the row layout used to
//! compute the range.

use crate::model::{EntryKind, EntryStatus, LogEntry};
use crate::view::styles::LogStyles;
use crate::view::text::{first_line, truncate_to_width};
use crate::view_state::filter::{FilteredEntries, VisibleRow};
use crate::view_state::height::entry_height;
use crate::view_state::visible_range::VisibleRange;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Columns of indentation per nesting level.
const INDENT: usize = 2;

/// Header line shown under a traceback row.
const TRACEBACK_HEADER: &str = "Traceback (most recent call last):";

/// The log tree widget.
pub struct EntryList<'a> {
    view: &'a FilteredEntries,
    range: VisibleRange,
    skip_lines: usize,
    active_row: Option<usize>,
    filter: &'a str,
    styles: &'a LogStyles,
}

impl<'a> EntryList<'a> {
    /// Widget over `range` of `view`.
    pub fn new(view: &'a FilteredEntries, range: VisibleRange, styles: &'a LogStyles) -> Self {
        Self {
            view,
            range,
            skip_lines: 0,
            active_row: None,
            filter: "",
            styles,
        }
    }

    /// Lines of the first row that are scrolled above the viewport.
    pub fn skip_lines(mut self, skip_lines: usize) -> Self {
        self.skip_lines = skip_lines;
        self
    }

    /// Highlight a row.
    pub fn active_row(mut self, row: Option<usize>) -> Self {
        self.active_row = row;
        self
    }

    /// Filter text shown in the title.
    pub fn filter(mut self, filter: &'a str) -> Self {
        self.filter = filter;
        self
    }

    fn title(&self) -> String {
        let total = self.view.entries().len();
        if self.filter.is_empty() {
            format!(" Log ({}/{}) ", self.view.len(), total)
        } else {
            format!(
                " Log ({}/{}) filter: {:?} ",
                self.view.len(),
                total,
                self.filter
            )
        }
    }
}

impl Widget for EntryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().title(self.title()).borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width as usize;
        let lines: Vec<Line<'static>> = self
            .range
            .rows()
            .filter_map(|row| self.view.get(row).map(|(meta, entry)| (row, meta, entry)))
            .flat_map(|(row, meta, entry)| {
                let selected = self.active_row == Some(row);
                row_lines(meta, entry, width, self.styles, selected)
            })
            .skip(self.skip_lines)
            .take(inner.height as usize)
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Lines for one row; always `entry_height(entry)` of them.
pub fn row_lines(
    meta: &VisibleRow,
    entry: &LogEntry,
    width: usize,
    styles: &LogStyles,
    selected: bool,
) -> Vec<Line<'static>> {
    let height = entry_height(entry).get() as usize;
    let indent = " ".repeat(entry.level() * INDENT);
    let marker = match (meta.has_children, meta.expanded) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) => "  ",
    };

    let status = entry.status();
    let mut head = format!("{indent}{marker}{} ", entry.kind().label());
    let badge = match status {
        EntryStatus::Unset => String::new(),
        other => format!("[{other}] "),
    };
    let used = unicode_width::UnicodeWidthStr::width(head.as_str())
        + unicode_width::UnicodeWidthStr::width(badge.as_str());
    let title = truncate_to_width(first_line(entry.title()), width.saturating_sub(used));

    let row_style = if selected {
        styles.selected()
    } else {
        Style::default()
    };
    head = truncate_to_width(&head, width);

    let mut lines = Vec::with_capacity(height);
    lines.push(
        Line::from(vec![
            Span::styled(head, styles.muted()),
            Span::styled(badge, styles.status(status)),
            Span::raw(title),
        ])
        .style(row_style),
    );

    let continuation = format!("{indent}    ");
    if entry.kind() == EntryKind::Traceback && lines.len() < height {
        lines.push(continuation_line(&continuation, TRACEBACK_HEADER, width, styles, row_style));
    }
    let message = entry.str_field("message").unwrap_or("");
    for extra in message.lines().skip(1) {
        if lines.len() >= height {
            break;
        }
        lines.push(continuation_line(&continuation, extra, width, styles, row_style));
    }
    while lines.len() < height {
        lines.push(Line::default().style(row_style));
    }
    lines
}

fn continuation_line(
    prefix: &str,
    text: &str,
    width: usize,
    styles: &LogStyles,
    row_style: Style,
) -> Line<'static> {
    let text = truncate_to_width(&format!("{prefix}{text}"), width);
    Line::from(Span::styled(text, styles.muted())).style(row_style)
}
