//! Serializable snapshot of what the view currently shows.

use crate::model::{EntryKind, EntryStatus, RunIdsAndLabel, RunInfo};
use crate::state::LogState;
use serde::Serialize;

/// One visible row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSnapshot {
    /// Entry id.
    pub id: String,
    /// Index into the full sequence.
    pub source_index: usize,
    /// Nesting depth.
    pub level: usize,
    /// Entry kind.
    pub kind: EntryKind,
    /// Entry status.
    pub status: EntryStatus,
    /// Display title.
    pub title: String,
    /// Whether the entry has children.
    pub has_children: bool,
    /// Effective expanded state.
    pub expanded: bool,
}

/// Visible rows plus run metadata, as emitted by `runlog --json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    /// Filter text in effect.
    pub filter: String,
    /// Total entries in the log.
    pub total_entries: usize,
    /// Visible rows in display order.
    pub rows: Vec<RowSnapshot>,
    /// Run information.
    pub run_info: RunInfo,
    /// Run ids.
    pub run_ids_and_label: RunIdsAndLabel,
}

impl ViewSnapshot {
    /// Capture `state`.
    pub fn capture(state: &LogState) -> Self {
        let rows = state
            .filtered_entries()
            .iter()
            .map(|(row, entry)| RowSnapshot {
                id: entry.id().to_string(),
                source_index: row.source_index,
                level: entry.level(),
                kind: entry.kind(),
                status: entry.status(),
                title: entry.title().to_string(),
                has_children: row.has_children,
                expanded: row.expanded,
            })
            .collect();
        Self {
            filter: state.filter().to_string(),
            total_entries: state.entries().len(),
            rows,
            run_info: state.run_info().clone(),
            run_ids_and_label: state.run_ids_and_label().clone(),
        }
    }
}
