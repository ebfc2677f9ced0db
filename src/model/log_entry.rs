//! Log entry types representing one node of the run-log tree.
//!
//! Entries arrive as a flat, ordered sequence. Hierarchy is carried by
//! `level`: the parent of an entry is the nearest preceding entry with a
//! strictly smaller level.

use crate::model::EntryId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ===== EntryKind =====

/// Discriminator for what an entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A task (top-level unit of work inside a run).
    Task,
    /// A tracked element: method call, loop, branch, generator, ...
    Element,
    /// A log message.
    Log,
    /// An exception traceback header.
    Traceback,
    /// One frame of a traceback.
    TracebackFrame,
    /// A variable assignment.
    Assign,
    /// A generator suspending with a value.
    Yield,
    /// Anything the producer could not classify.
    Other,
}

impl EntryKind {
    /// Short label used by list rendering.
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Task => "TASK",
            EntryKind::Element => "ELEM",
            EntryKind::Log => "LOG",
            EntryKind::Traceback => "EXC",
            EntryKind::TracebackFrame => "FRAME",
            EntryKind::Assign => "ASSIGN",
            EntryKind::Yield => "YIELD",
            EntryKind::Other => "?",
        }
    }
}

// ===== EntryStatus =====

/// Outcome recorded on a scope when it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    /// Not finished, or the producer did not say.
    #[default]
    Unset,
    /// Finished successfully.
    Pass,
    /// Finished with an assertion-style failure.
    Fail,
    /// Finished with an unexpected error.
    Error,
    /// Informational.
    Info,
    /// Warning.
    Warn,
}

impl EntryStatus {
    /// Parse a status string from the producer. Unknown values map to `Unset`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PASS" => EntryStatus::Pass,
            "FAIL" => EntryStatus::Fail,
            "ERROR" => EntryStatus::Error,
            "INFO" => EntryStatus::Info,
            "WARN" | "WARNING" => EntryStatus::Warn,
            _ => EntryStatus::Unset,
        }
    }

    /// Whether this status denotes a failure worth surfacing.
    pub fn is_failure(self) -> bool {
        matches!(self, EntryStatus::Fail | EntryStatus::Error)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryStatus::Unset => "UNSET",
            EntryStatus::Pass => "PASS",
            EntryStatus::Fail => "FAIL",
            EntryStatus::Error => "ERROR",
            EntryStatus::Info => "INFO",
            EntryStatus::Warn => "WARN",
        };
        f.write_str(s)
    }
}

// ===== LogEntry =====

/// One entry of the run log.
///
/// The payload is arbitrary JSON data supplied by the producer. The view
/// model only interprets it for filtering (substring search over string
/// values) and for a handful of display accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    id: EntryId,
    level: usize,
    kind: EntryKind,
    #[serde(default)]
    payload: Map<String, Value>,
}

impl LogEntry {
    /// Create an entry with an empty payload.
    pub fn new(id: EntryId, level: usize, kind: EntryKind) -> Self {
        Self {
            id,
            level,
            kind,
            payload: Map::new(),
        }
    }

    /// Builder-style payload field setter.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    // ===== Accessors =====

    /// Unique id of this entry.
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    /// Nesting depth; roots are at level 0.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Kind discriminator.
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Raw payload.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Mutable payload, used by the tree builder when late messages
    /// (arguments, tags, traceback variables) amend an existing entry.
    pub fn payload_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.payload
    }

    /// String payload field, if present and a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }

    /// Status recorded in the payload (`Unset` when absent).
    pub fn status(&self) -> EntryStatus {
        self.str_field("status")
            .map(EntryStatus::parse)
            .unwrap_or_default()
    }

    /// Primary text for display: name for scopes, message for logs.
    pub fn title(&self) -> &str {
        self.str_field("name")
            .or_else(|| self.str_field("message"))
            .or_else(|| self.str_field("target"))
            .unwrap_or("")
    }

    // ===== Filtering =====

    /// Whether any payload value contains `needle` (case-sensitive substring).
    ///
    /// Strings are searched recursively through arrays and objects; numbers
    /// and booleans are matched against their textual form. Keys are not searched.
    pub fn matches(&self, needle: &str) -> bool {
        self.payload.values().any(|v| value_contains(v, needle))
    }
}

fn value_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::Bool(b) => (if *b { "true" } else { "false" }).contains(needle),
        Value::Array(items) => items.iter().any(|v| value_contains(v, needle)),
        Value::Object(map) => map.values().any(|v| value_contains(v, needle)),
        Value::Null => false,
    }
}
