//! Character-aware text helpers

use std::borrow::Cow;

const ELLIPSIS: &str = "...";

pub struct TextUtils;

impl TextUtils {
    /// Number of Unicode scalar values in `text`.
    pub fn char_len(text: &str) -> usize {
        text.chars().count()
    }

    /// First `n` characters of `text`.
    pub fn take_chars(text: &str, n: usize) -> &str {
        match text.char_indices().nth(n) {
            Some((pos, _)) => &text[..pos],
            None => text,
        }
    }

    /// Truncate to at most `max_len` characters, ending with `...` when cut.
    pub fn truncate_with_ellipsis(text: &str, max_len: usize) -> Cow<'_, str> {
        if Self::char_len(text) <= max_len {
            Cow::Borrowed(text)
        } else if max_len <= ELLIPSIS.len() {
            Cow::Borrowed(&ELLIPSIS[..max_len])
        } else {
            let mut result = String::with_capacity(max_len * 4);
            result.push_str(Self::take_chars(text, max_len - ELLIPSIS.len()));
            result.push_str(ELLIPSIS);
            Cow::Owned(result)
        }
    }
}
