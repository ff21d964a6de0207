//! String utilities for the domain layer.

/// Marker appended to truncated previews.
pub const ELLIPSIS: &str = "...";

/// Build a preview of at most `max_chars` characters, appending [`ELLIPSIS`]
/// when the text was cut.
///
/// Counts Unicode scalar values rather than bytes, so multibyte lyrics are
/// never split inside a character.
pub fn preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}{}", &s[..end], ELLIPSIS),
        None => s.to_string(),
    }
}

/// Return the first `max_chars` characters of `s` without any marker.
pub fn head(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}
