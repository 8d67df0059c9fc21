//! Text normalization applied before texts are sent for embedding

use std::borrow::Cow;

/// Collapse newlines and whitespace runs to single spaces and trim the ends.
///
/// Returns the input untouched when `strip_newlines` is false.
pub fn normalize(text: &str, strip_newlines: bool) -> Cow<'_, str> {
    if !strip_newlines {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    Cow::Owned(out)
}

/// Normalize every text in order
pub fn normalize_all(texts: &[String], strip_newlines: bool) -> Vec<String> {
    texts
        .iter()
        .map(|t| normalize(t, strip_newlines).into_owned())
        .collect()
}
