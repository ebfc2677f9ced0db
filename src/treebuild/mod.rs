//! Tree builder - turns decoded messages into the flat entry sequence.
//!
//! Start messages (`ST`, `SE`, `STB`, `YR`, ...) open a scope: they append an
//! entry and push it on the scope stack. End messages pop the scope and
//! write the final status into its payload. Everything else is either a
//! leaf entry at the current depth or an amendment to an existing entry.
//!
//! The builder tracks the smallest entry index touched since the last
//! [`TreeBuilder::take_update`], which becomes the update's
//! `first_changed_index`.
//!
//! Ids are hierarchical ordinal paths (`"0"`, `"0-2"`, `"0-2-1"`), which are
//! unique and stable across appends.

use crate::decoder::{DecodedMessage, MessageType};
use crate::model::{EntryId, EntryKind, EntryStatus, LogEntry, RunIdsAndLabel, RunInfo};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Builder behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Hint tasks as expanded when they start.
    pub expand_tasks: bool,
    /// Hint failed scopes, and every scope above them, as expanded.
    pub expand_failures: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            expand_tasks: true,
            expand_failures: true,
        }
    }
}

/// Changes accumulated since the previous [`TreeBuilder::take_update`].
#[derive(Debug, Clone, PartialEq)]
pub struct EntriesUpdate {
    /// The whole current sequence.
    pub entries: Arc<Vec<LogEntry>>,
    /// Ids to add to the expanded set.
    pub newly_expanded: Vec<EntryId>,
    /// Smallest index that differs from the previous update.
    pub first_changed_index: usize,
}

/// An open scope on the stack.
#[derive(Debug, Clone, Copy)]
struct Scope {
    index: usize,
    kind: EntryKind,
    /// Ordinal for the next child id.
    next_child: usize,
}

/// Incremental builder of the entry sequence and run metadata.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    options: BuildOptions,
    entries: Vec<LogEntry>,
    stack: Vec<Scope>,
    next_root: usize,
    last_frame: Option<usize>,
    first_changed: Option<usize>,
    newly_expanded: Vec<EntryId>,
    all_expanded_hints: Vec<EntryId>,
    hinted: HashSet<EntryId>,
    run_info: RunInfo,
    run_info_dirty: bool,
    run_ids: RunIdsAndLabel,
    run_ids_dirty: bool,
}

impl TreeBuilder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::with_options(BuildOptions::default())
    }

    /// Create a builder with explicit options.
    pub fn with_options(options: BuildOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Entries built so far.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Current run info.
    pub fn run_info(&self) -> &RunInfo {
        &self.run_info
    }

    /// Current run ids.
    pub fn run_ids_and_label(&self) -> &RunIdsAndLabel {
        &self.run_ids
    }

    /// Depth of the open scope stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Apply one decoded message.
    pub fn apply(&mut self, msg: &DecodedMessage) {
        trace!(message_type = %msg.message_type, "apply");
        match msg.message_type {
            MessageType::Version | MessageType::Info | MessageType::Memo => {}
            MessageType::Id => self.on_id(msg),
            MessageType::Time => {
                if let Some(time) = msg.str_field("initial_time") {
                    self.run_info.time = time.to_string();
                    self.run_info_dirty = true;
                }
            }
            MessageType::StartRun | MessageType::RestartRun => {
                if let Some(name) = msg.str_field("name") {
                    self.run_info.description = name.to_string();
                }
                self.run_info.status = EntryStatus::Unset;
                self.run_info.finish_time_delta_in_seconds = None;
                self.run_info_dirty = true;
            }
            MessageType::EndRun => {
                self.run_info.status = msg
                    .str_field("status")
                    .map(EntryStatus::parse)
                    .unwrap_or_default();
                self.run_info.finish_time_delta_in_seconds =
                    msg.f64_field("time_delta_in_seconds");
                self.run_info_dirty = true;
            }
            MessageType::StartTask | MessageType::RestartTask => {
                let index = self.open_scope(EntryKind::Task, msg.fields.clone());
                if self.options.expand_tasks {
                    let id = self.entries[index].id().clone();
                    self.hint_expanded(id);
                }
            }
            MessageType::StartElement | MessageType::RestartElement => {
                self.open_scope(EntryKind::Element, msg.fields.clone());
            }
            MessageType::YieldResume
            | MessageType::RestartYieldResume
            | MessageType::YieldFromResume => {
                let mut payload = msg.fields.clone();
                payload
                    .entry("type")
                    .or_insert_with(|| Value::String("YIELD_RESUME".to_string()));
                self.open_scope(EntryKind::Element, payload);
            }
            MessageType::StartTraceback | MessageType::RestartTraceback => {
                self.open_scope(EntryKind::Traceback, msg.fields.clone());
            }
            MessageType::EndTask => self.close_scope(msg, Some(EntryKind::Task)),
            MessageType::EndElement => self.close_scope(msg, Some(EntryKind::Element)),
            MessageType::EndTraceback => {
                self.close_scope(msg, Some(EntryKind::Traceback));
                self.last_frame = None;
            }
            MessageType::Log | MessageType::LogHtml => {
                let mut payload = msg.fields.clone();
                if msg.message_type == MessageType::LogHtml {
                    payload.insert("html".to_string(), Value::Bool(true));
                }
                self.push_leaf(EntryKind::Log, payload);
            }
            MessageType::Assign => {
                self.push_leaf(EntryKind::Assign, msg.fields.clone());
            }
            MessageType::YieldSuspend | MessageType::YieldFromSuspend => {
                self.push_leaf(EntryKind::Yield, msg.fields.clone());
                // The generator frame is left until it is resumed.
                self.stack.pop();
            }
            MessageType::TracebackEntry => {
                let mut payload = msg.fields.clone();
                if let Some(method) = payload.get("method").cloned() {
                    payload.insert("name".to_string(), method);
                }
                let index = self.push_leaf(EntryKind::TracebackFrame, payload);
                self.last_frame = Some(index);
            }
            MessageType::ElementArgument => {
                let target = self.stack.last().map(|s| s.index);
                self.append_to(target, "arguments", Value::Object(msg.fields.clone()));
            }
            MessageType::Tag => {
                let target = self.stack.last().map(|s| s.index);
                let tag = msg.fields.get("tag").cloned().unwrap_or(Value::Null);
                self.append_to(target, "tags", tag);
            }
            MessageType::TracebackVariable => {
                self.append_to(self.last_frame, "variables", Value::Object(msg.fields.clone()));
            }
            MessageType::StartTime => {
                if let (Some(scope), Some(delta)) =
                    (self.stack.last().copied(), msg.fields.get("start_time_delta"))
                {
                    let delta = delta.clone();
                    self.amend(scope.index, |payload| {
                        payload.insert("start_time_delta".to_string(), delta);
                    });
                }
            }
        }
    }

    /// Take the entries update accumulated since the last call, if any.
    pub fn take_update(&mut self) -> Option<EntriesUpdate> {
        if self.first_changed.is_none() && self.newly_expanded.is_empty() {
            return None;
        }
        let first_changed_index = self.first_changed.take().unwrap_or(self.entries.len());
        let update = EntriesUpdate {
            entries: Arc::new(self.entries.clone()),
            newly_expanded: std::mem::take(&mut self.newly_expanded),
            first_changed_index,
        };
        debug!(
            entries = update.entries.len(),
            first_changed_index,
            newly_expanded = update.newly_expanded.len(),
            "entries update"
        );
        Some(update)
    }

    /// Run info, if it changed since the last call.
    pub fn take_run_info(&mut self) -> Option<RunInfo> {
        std::mem::take(&mut self.run_info_dirty).then(|| self.run_info.clone())
    }

    /// Run ids, if they changed since the last call.
    pub fn take_run_ids_and_label(&mut self) -> Option<RunIdsAndLabel> {
        std::mem::take(&mut self.run_ids_dirty).then(|| self.run_ids.clone())
    }

    /// Full-state update for a subscriber that joins late.
    pub fn snapshot(&self) -> EntriesUpdate {
        EntriesUpdate {
            entries: Arc::new(self.entries.clone()),
            newly_expanded: self.all_expanded_hints.clone(),
            first_changed_index: 0,
        }
    }

    fn on_id(&mut self, msg: &DecodedMessage) {
        let Some(id) = msg.str_field("id") else {
            return;
        };
        let part = msg
            .i64_field("part")
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(1);
        if self.run_ids.current_run_id.is_none() {
            self.run_info.first_part = part;
            self.run_info_dirty = true;
        }
        let label = if part > 1 {
            format!("{id} (part {part})")
        } else {
            id.to_string()
        };
        self.run_ids
            .all_run_ids_to_label
            .insert(id.to_string(), label);
        self.run_ids.current_run_id = Some(id.to_string());
        self.run_ids_dirty = true;
    }

    fn next_id(&mut self) -> EntryId {
        match self.stack.last_mut() {
            Some(scope) => {
                let ordinal = scope.next_child;
                scope.next_child += 1;
                self.entries[scope.index].id().child(ordinal)
            }
            None => {
                let ordinal = self.next_root;
                self.next_root += 1;
                EntryId::root(ordinal)
            }
        }
    }

    fn push_leaf(&mut self, kind: EntryKind, payload: Map<String, Value>) -> usize {
        let id = self.next_id();
        let index = self.entries.len();
        let mut entry = LogEntry::new(id, self.stack.len(), kind);
        *entry.payload_mut() = payload;
        self.entries.push(entry);
        self.mark_changed(index);
        index
    }

    fn open_scope(&mut self, kind: EntryKind, payload: Map<String, Value>) -> usize {
        let index = self.push_leaf(kind, payload);
        self.stack.push(Scope {
            index,
            kind,
            next_child: 0,
        });
        index
    }

    /// Pop scopes until one of `kind` closes (or the top one when `kind` is `None`).
    fn close_scope(&mut self, msg: &DecodedMessage, kind: Option<EntryKind>) {
        if let Some(kind) = kind {
            if !self.stack.iter().any(|s| s.kind == kind) {
                debug!(?kind, "end message without open scope");
                return;
            }
        }
        let failure_chain: Vec<usize> = self.stack.iter().map(|s| s.index).collect();
        while let Some(scope) = self.stack.pop() {
            if kind.map_or(true, |k| k == scope.kind) {
                self.finish(scope.index, msg, &failure_chain);
                return;
            }
        }
    }

    fn finish(&mut self, index: usize, msg: &DecodedMessage, chain: &[usize]) {
        let status = msg.str_field("status").map(str::to_string);
        let message = msg.str_field("message").map(str::to_string);
        let end_delta = msg.fields.get("time_delta_in_seconds").cloned();
        self.amend(index, |payload| {
            if let Some(status) = &status {
                payload.insert("status".to_string(), Value::String(status.clone()));
            }
            if let Some(message) = message {
                payload.insert("end_message".to_string(), Value::String(message));
            }
            if let Some(delta) = end_delta {
                payload.insert("end_time_delta_in_seconds".to_string(), delta);
            }
        });

        let failed = status.as_deref().map(EntryStatus::parse).is_some_and(EntryStatus::is_failure);
        if failed && self.options.expand_failures {
            let upto = chain.iter().position(|&i| i == index).map_or(chain.len(), |p| p + 1);
            for &i in &chain[..upto] {
                let id = self.entries[i].id().clone();
                self.hint_expanded(id);
            }
        }
    }

    fn append_to(&mut self, target: Option<usize>, key: &str, value: Value) {
        let Some(index) = target else {
            debug!(key, "amendment without target entry");
            return;
        };
        self.amend(index, |payload| {
            let slot = payload.entry(key).or_insert_with(|| json!([]));
            if let Value::Array(items) = slot {
                items.push(value);
            }
        });
    }

    fn amend(&mut self, index: usize, f: impl FnOnce(&mut Map<String, Value>)) {
        if let Some(entry) = self.entries.get_mut(index) {
            f(entry.payload_mut());
            self.mark_changed(index);
        }
    }

    fn hint_expanded(&mut self, id: EntryId) {
        if self.hinted.insert(id.clone()) {
            self.all_expanded_hints.push(id.clone());
            self.newly_expanded.push(id);
        }
    }

    fn mark_changed(&mut self, index: usize) {
        self.first_changed = Some(self.first_changed.map_or(index, |f| f.min(index)));
    }
}

#[cfg(test)]
#[path = "treebuild_tests.rs"]
mod tests;
