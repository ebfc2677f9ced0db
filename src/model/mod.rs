//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod identifiers;
pub mod log_entry;
pub mod run_info;

// Re-export for convenience
pub use error::{AppError, DecodeError, InputError};
pub use identifiers::{EntryId, InvalidEntryId};
pub use log_entry::{EntryKind, EntryStatus, LogEntry};
pub use run_info::{RunIdsAndLabel, RunInfo};
