//! Details pane: the selected entry, the run information or the terminal output.

use crate::model::{EntryKind, LogEntry, RunIdsAndLabel, RunInfo};
use crate::state::{ActiveIndex, LogState};
use crate::view::styles::LogStyles;
use crate::view::text::truncate_to_width;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use serde_json::Value;

/// Details for the current [`ActiveIndex`].
pub struct DetailsPanel<'a> {
    state: &'a LogState,
    styles: &'a LogStyles,
}

impl<'a> DetailsPanel<'a> {
    /// Panel over `state`.
    pub fn new(state: &'a LogState, styles: &'a LogStyles) -> Self {
        Self { state, styles }
    }
}

impl Widget for DetailsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, body) = match self.state.active_index() {
            ActiveIndex::None => (" Details ", vec![("".to_string(), "Nothing selected".to_string())]),
            ActiveIndex::Entry(_) => match self.state.active_entry() {
                Some(entry) => (" Entry ", entry_fields(entry)),
                None => (" Entry ", vec![("".to_string(), "Entry not visible".to_string())]),
            },
            ActiveIndex::Information => (
                " Run information ",
                run_fields(self.state.run_info(), self.state.run_ids_and_label()),
            ),
            ActiveIndex::Terminal => (" Terminal ", terminal_lines(self.state.entries())),
        };

        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width as usize;
        let lines: Vec<Line<'static>> = body
            .into_iter()
            .map(|(key, value)| {
                if key.is_empty() {
                    Line::from(truncate_to_width(&value, width))
                } else {
                    let key = format!("{key}: ");
                    let rest = width.saturating_sub(unicode_width::UnicodeWidthStr::width(key.as_str()));
                    Line::from(vec![
                        Span::styled(key, self.styles.heading()),
                        Span::styled(truncate_to_width(&value, rest), Style::default()),
                    ])
                }
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Key/value rows describing one entry. Payload keys come in map order.
pub fn entry_fields(entry: &LogEntry) -> Vec<(String, String)> {
    let mut fields = vec![
        ("id".to_string(), entry.id().to_string()),
        ("kind".to_string(), entry.kind().label().to_string()),
        ("level".to_string(), entry.level().to_string()),
        ("status".to_string(), entry.status().to_string()),
    ];
    fields.extend(
        entry
            .payload()
            .iter()
            .filter(|(key, value)| key.as_str() != "status" && !value.is_null())
            .map(|(key, value)| (key.clone(), display_value(value))),
    );
    fields
}

/// Key/value rows for the run information panel.
pub fn run_fields(info: &RunInfo, ids: &RunIdsAndLabel) -> Vec<(String, String)> {
    let mut fields = vec![
        ("description".to_string(), info.description.clone()),
        ("status".to_string(), info.status.to_string()),
        ("time".to_string(), info.time.clone()),
    ];
    if let Some(finish) = info.finish_time_delta_in_seconds {
        fields.push(("duration".to_string(), format!("{finish:.2}s")));
    }
    if info.first_part > 1 {
        fields.push(("first part".to_string(), info.first_part.to_string()));
    }
    for (run_id, label) in &ids.all_run_ids_to_label {
        let current = ids.current_run_id.as_deref() == Some(run_id.as_str());
        let marker = if current { " (current)" } else { "" };
        fields.push(("run".to_string(), format!("{label}{marker}")));
    }
    fields
}

/// Log messages in output order, one row per message line.
pub fn terminal_lines(entries: &[LogEntry]) -> Vec<(String, String)> {
    entries
        .iter()
        .filter(|e| e.kind() == EntryKind::Log)
        .filter_map(|e| e.str_field("message"))
        .flat_map(str::lines)
        .map(|line| (String::new(), line.to_string()))
        .collect()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.replace('\n', " ⏎ "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryId, EntryStatus};
    use crate::view::buffer_to_string;
    use std::sync::Arc;

    fn render(state: &LogState) -> String {
        let area = Rect::new(0, 0, 50, 10);
        let mut buf = Buffer::empty(area);
        let styles = LogStyles::default();
        DetailsPanel::new(state, &styles).render(area, &mut buf);
        buffer_to_string(&buf)
    }

    fn state() -> LogState {
        let mut state = LogState::new();
        let entries = Arc::new(vec![
            LogEntry::new(EntryId::new("0").unwrap(), 0, EntryKind::Element)
                .with_field("name", "Open browser")
                .with_field("status", "PASS")
                .with_field("lineno", 12),
            LogEntry::new(EntryId::new("1").unwrap(), 0, EntryKind::Log)
                .with_field("message", "started\nready"),
        ]);
        state.set_entries(entries, &[], 0);
        state
    }

    #[test]
    fn nothing_selected() {
        let output = render(&LogState::new());
        insta::assert_snapshot!("details_nothing_selected", output);
    }

    #[test]
    fn entry_details_list_payload() {
        let mut state = state();
        state.set_active_index(ActiveIndex::Entry(0));
        let output = render(&state);
        insta::assert_snapshot!("details_entry", output);
    }

    #[test]
    fn stale_selection_is_reported() {
        let mut state = state();
        state.set_active_index(ActiveIndex::Entry(5));
        let output = render(&state);
        insta::assert_snapshot!("details_stale_entry", output);
    }

    #[test]
    fn information_shows_run_info() {
        let mut state = state();
        state.set_run_info(RunInfo {
            description: "Nightly".to_string(),
            status: EntryStatus::Fail,
            finish_time_delta_in_seconds: Some(3.5),
            ..RunInfo::default()
        });
        let mut ids = RunIdsAndLabel::default();
        ids.all_run_ids_to_label
            .insert("r1".to_string(), "r1".to_string());
        ids.current_run_id = Some("r1".to_string());
        state.set_run_ids_and_label(ids);
        state.set_active_index(ActiveIndex::Information);

        let output = render(&state);
        insta::assert_snapshot!("details_run_information", output);
    }

    #[test]
    fn terminal_shows_log_lines() {
        let mut state = state();
        state.set_active_index(ActiveIndex::Terminal);
        let output = render(&state);
        insta::assert_snapshot!("details_terminal", output);
    }

    #[test]
    fn entry_fields_skip_nulls() {
        let entry = LogEntry::new(EntryId::new("x").unwrap(), 0, EntryKind::Log)
            .with_field("message", Value::Null);
        let fields = entry_fields(&entry);
        assert!(fields.iter().all(|(k, _)| k != "message"));
    }
}
