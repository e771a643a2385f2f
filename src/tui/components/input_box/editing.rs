//! Byte-offset navigation over UTF-8 text.
//!
//! All positions are byte offsets that lie on char boundaries.

/// Offset of the char that ends at `pos`, or 0 at the start.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .chars()
        .next_back()
        .map_or(0, |c| pos - c.len_utf8())
}

/// Offset just past the char that starts at `pos`, or `text.len()` at the end.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Start of the word before `pos`, skipping any separators first
/// (readline `backward-word`).
pub(super) fn prev_word_boundary(text: &str, pos: usize) -> usize {
    let before = &text[..pos];
    let word_end = before
        .char_indices()
        .rev()
        .find(|&(_, c)| is_word_char(c))
        .map_or(0, |(i, c)| i + c.len_utf8());
    before[..word_end]
        .char_indices()
        .rev()
        .find(|&(_, c)| !is_word_char(c))
        .map_or(0, |(i, c)| i + c.len_utf8())
}

/// End of the word after `pos`, skipping any separators first
/// (readline `forward-word`).
pub(super) fn next_word_boundary(text: &str, pos: usize) -> usize {
    let after = &text[pos..];
    let word_start = after
        .char_indices()
        .find(|&(_, c)| is_word_char(c))
        .map_or(after.len(), |(i, _)| i);
    after[word_start..]
        .char_indices()
        .find(|&(_, c)| !is_word_char(c))
        .map_or(text.len(), |(i, _)| pos + word_start + i)
}
