//! Row height estimation.
//!
//! Heights are keyed only on entry content so they can be cached per row
//! and invalidated by index alone.

use crate::model::{EntryKind, LogEntry};
use crate::view_state::types::LineHeight;

/// Extra lines a multi-line message may contribute before being clipped.
pub const MAX_EXTRA_MESSAGE_LINES: u16 = 4;

/// Estimated display height of `entry` in terminal lines.
///
/// - Every entry takes one line.
/// - A multi-line `message` adds one line per extra line, up to
///   [`MAX_EXTRA_MESSAGE_LINES`].
/// - Tracebacks add a header line for the exception message.
///
/// # Examples
///
/// ```
/// # use runlog::model::{EntryId, EntryKind, LogEntry};
/// # use runlog::view_state::height::entry_height;
/// let log = LogEntry::new(EntryId::new("0").unwrap(), 0, EntryKind::Log)
///     .with_field("message", "first\nsecond");
/// assert_eq!(entry_height(&log).get(), 2);
/// ```
pub fn entry_height(entry: &LogEntry) -> LineHeight {
    let extra_message_lines = entry
        .str_field("message")
        .map(|m| m.lines().count().saturating_sub(1))
        .unwrap_or(0)
        .min(MAX_EXTRA_MESSAGE_LINES as usize) as u16;

    let header = match entry.kind() {
        EntryKind::Traceback => 1,
        _ => 0,
    };

    LineHeight::new(1 + extra_message_lines + header).unwrap_or(LineHeight::ONE)
}
