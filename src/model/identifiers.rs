//! Core identifier newtypes with smart constructors.
//!
//! Identifiers validate non-empty strings at construction time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a log entry within a run.
///
/// Ids are opaque to the view model; the tree builder happens to produce
/// dash-separated paths such as `"0-3-1"`, but nothing relies on that shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryId(String);

impl EntryId {
    /// Smart constructor: validates non-empty id.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidEntryId> {
        let raw = raw.into();
        if raw.is_empty() {
            Err(InvalidEntryId::Empty)
        } else {
            Ok(Self(raw))
        }
    }

    /// Id of the `ordinal`-th root entry.
    pub fn root(ordinal: usize) -> Self {
        Self(ordinal.to_string())
    }

    /// Id of the `ordinal`-th child of `self`, e.g. `"0-2"` -> `"0-2-1"`.
    pub fn child(&self, ordinal: usize) -> Self {
        Self(format!("{}-{ordinal}", self.0))
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntryId {
    type Error = InvalidEntryId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

impl std::borrow::Borrow<str> for EntryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ===== Error Types =====

/// Rejected entry id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidEntryId {
    /// The id was the empty string.
    #[error("Entry ID cannot be empty")]
    Empty,
}

// ===== Tests =====
