//! Character-offset helpers.
//!
//! Model offsets and display limits count Unicode scalar values, not bytes.

/// The first `max_chars` characters of `text`
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Slice `text` by character offsets
///
/// Offsets past the end are clamped and `start >= end` yields an empty string.
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let byte_at = |n: usize| {
        text.char_indices()
            .nth(n)
            .map(|(i, _)| i)
            .unwrap_or(text.len())
    };
    let from = byte_at(start);
    let to = byte_at(end);
    &text[from..to]
}
