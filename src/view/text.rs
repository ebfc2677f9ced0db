//! Display-width aware text helpers.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ellipsis appended to clipped text.
const ELLIPSIS: char = '…';

/// Clip `text` so it occupies at most `width` terminal columns.
///
/// Wide characters (CJK, emoji) count as two columns. Clipped text ends in
/// `…`.
///
/// # Examples
///
/// ```
/// use runlog::view::text::truncate_to_width;
///
/// assert_eq!(truncate_to_width("hello", 10), "hello");
/// assert_eq!(truncate_to_width("hello world", 6), "hello…");
/// assert_eq!(truncate_to_width("日本語", 4), "日…");
/// ```
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    out
}

/// First line of `text`, or the empty string.
pub fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}
