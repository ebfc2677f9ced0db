//! Metadata about the run(s) whose log is being viewed.
//!
//! These types are passthrough: the view model stores and exposes them but
//! never interprets their contents.

use crate::model::EntryStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of the current run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInfo {
    /// Human readable description (the run name).
    pub description: String,
    /// Initial time of the run as reported by the producer.
    pub time: String,
    /// Run status; `Unset` while running.
    pub status: EntryStatus,
    /// Seconds from start until the run finished, once known.
    pub finish_time_delta_in_seconds: Option<f64>,
    /// Which part of a split log this view started from.
    pub first_part: u32,
}

impl Default for RunInfo {
    fn default() -> Self {
        Self {
            description: "Wait for run to start".to_string(),
            time: String::new(),
            status: EntryStatus::Unset,
            finish_time_delta_in_seconds: None,
            first_part: 0,
        }
    }
}

/// Known run ids with their display labels, plus the one being shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunIdsAndLabel {
    /// Every run id seen so far mapped to a label.
    pub all_run_ids_to_label: BTreeMap<String, String>,
    /// Run id currently displayed.
    pub current_run_id: Option<String>,
}
