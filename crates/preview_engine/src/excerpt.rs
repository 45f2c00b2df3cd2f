pub const ELLIPSIS: char = '\u{2026}';
pub const PERMALINK_MARKER: char = '\u{b6}';

/// Shortens `text` to at most `max_chars` characters plus an ellipsis.
///
/// The cut lands on the last whitespace inside the limit so no word is split;
/// a single word longer than the limit is cut hard.
pub fn truncate_at_word(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };
    let head = &text[..cut];
    let at_boundary = text[cut..].starts_with(char::is_whitespace);
    let kept = if at_boundary {
        head.trim_end()
    } else {
        match head.rfind(char::is_whitespace) {
            Some(idx) => head[..idx].trim_end(),
            None => head,
        }
    };
    format!("{kept}{ELLIPSIS}")
}

/// Heading text without the trailing permalink anchor the site generator appends.
pub fn strip_permalink(text: &str, marker: char) -> String {
    let trimmed = text.trim();
    trimmed
        .strip_suffix(marker)
        .unwrap_or(trimmed)
        .trim_end()
        .to_string()
}

/// Collapses runs of whitespace (including newlines from the page source) into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
