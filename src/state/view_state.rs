//! User-facing view state: filter, expanded set, selection and settings.
//!
//! [`ViewState`] is a value. Every operation consumes it and returns the
//! updated value, so a caller holding an older copy never observes a
//! change.

use crate::model::EntryId;
use crate::state::ExpandedSet;
use serde::{Deserialize, Serialize};

/// What the details pane shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveIndex {
    /// Nothing selected.
    #[default]
    None,
    /// A row of the filtered view.
    Entry(usize),
    /// The run information panel.
    Information,
    /// The terminal output panel.
    Terminal,
}

impl std::str::FromStr for ActiveIndex {
    type Err = String;

    /// Parses `none`, `info`, `terminal` or a row number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "info" | "information" => Ok(Self::Information),
            "terminal" => Ok(Self::Terminal),
            row => row
                .parse::<usize>()
                .map(Self::Entry)
                .map_err(|_| format!("expected a row number, 'info', 'terminal' or 'none', got '{row}'")),
        }
    }
}

/// Display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Color theme name.
    pub theme: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
        }
    }
}

/// Filter text, expanded ids, active selection and view settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    filter: String,
    expanded: ExpandedSet,
    active_index: ActiveIndex,
    view_settings: ViewSettings,
}

impl ViewState {
    /// Initial state: no filter, nothing expanded, nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current filter text.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Expanded ids.
    pub fn expanded(&self) -> &ExpandedSet {
        &self.expanded
    }

    /// Current selection.
    pub fn active_index(&self) -> ActiveIndex {
        self.active_index
    }

    /// Current settings.
    pub fn view_settings(&self) -> &ViewSettings {
        &self.view_settings
    }

    /// Flip the expanded membership of `id`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use runlog::model::EntryId;
    /// # use runlog::state::ViewState;
    /// let id = EntryId::new("0").unwrap();
    /// let before = ViewState::new();
    /// let after = before.clone().toggle_entry(&id);
    /// assert!(after.expanded().contains("0"));
    /// assert!(!before.expanded().contains("0"));
    /// ```
    pub fn toggle_entry(mut self, id: &EntryId) -> Self {
        self.expanded.toggle(id);
        self
    }

    /// Replace the filter text.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Replace the selection.
    pub fn with_active_index(mut self, active_index: ActiveIndex) -> Self {
        self.active_index = active_index;
        self
    }

    /// Replace the settings.
    pub fn with_view_settings(mut self, view_settings: ViewSettings) -> Self {
        self.view_settings = view_settings;
        self
    }

    /// Union `ids` into the expanded set.
    pub fn with_expanded<'a>(mut self, ids: impl IntoIterator<Item = &'a EntryId>) -> Self {
        self.expanded.extend(ids);
        self
    }

    /// Replace the expanded set wholesale.
    pub fn with_expanded_set(mut self, expanded: ExpandedSet) -> Self {
        self.expanded = expanded;
        self
    }
}
