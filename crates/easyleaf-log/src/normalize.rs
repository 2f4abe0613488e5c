//! Input cleanup applied before any rule sees the log.

use std::borrow::Cow;

/// Converts Windows `\r\n` line endings to `\n`.
///
/// Borrows the input when there is nothing to convert.
pub fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if input.contains("\r\n") {
        Cow::Owned(input.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(input)
    }
}

/// Returns true for zero-width and bidi formatting characters that show up in
/// logs copied out of a browser but never render.
pub fn is_invisible(c: char) -> bool {
    matches!(
        c,
        // zero-width space, non-joiner, joiner, LRM, RLM
        '\u{200B}'..='\u{200F}'
            // line and paragraph separators
            | '\u{2028}'
            | '\u{2029}'
            // LRE, RLE, PDF, LRO, RLO
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'
            // byte-order mark
            | '\u{FEFF}'
    )
}

/// Removes every character for which [`is_invisible`] holds.
pub fn strip_invisible(input: &str) -> Cow<'_, str> {
    if input.chars().any(is_invisible) {
        Cow::Owned(input.chars().filter(|c| !is_invisible(*c)).collect())
    } else {
        Cow::Borrowed(input)
    }
}

/// Full cleanup used by multi-result parsing.
pub fn normalize_all(input: &str) -> Cow<'_, str> {
    match normalize_line_endings(input) {
        Cow::Borrowed(text) => strip_invisible(text),
        Cow::Owned(text) => Cow::Owned(strip_invisible(&text).into_owned()),
    }
}

/// Byte offset reached by moving `chars` characters forward from `from`,
/// clamped to the end of `text`. `from` must be a char boundary.
pub(crate) fn advance_chars(text: &str, from: usize, chars: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| from + offset)
}
