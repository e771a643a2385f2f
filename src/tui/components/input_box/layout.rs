//! Wrapping and cursor geometry for the input box.
//!
//! The draft wraps inside a bordered block and grows up to
//! [`MAX_VISIBLE_LINES`]; past that the view scrolls to keep the cursor visible.

use ratatui::layout::Rect;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
pub(super) const MAX_VISIBLE_LINES: u16 = 4;
/// Offset from area edge to content (border width)
const BORDER_OFFSET: u16 = 1;

pub(super) fn inner_width(outer_width: u16) -> u16 {
    outer_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

pub(super) fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Wrapped lines of `text`, with an empty trailing line when `text` ends in
/// a newline (textwrap drops it, but the cursor can sit there).
pub(super) fn wrapped_lines(text: &str, width: u16) -> Vec<String> {
    if width == 0 || text.is_empty() {
        return vec![String::new()];
    }
    let mut lines: Vec<String> = textwrap::wrap(text, wrap_options(width))
        .into_iter()
        .map(|line| line.into_owned())
        .collect();
    if lines.is_empty() || (text.ends_with('\n') && lines.last().is_some_and(|l| !l.is_empty())) {
        lines.push(String::new());
    }
    lines
}

pub(super) fn line_count(text: &str, width: u16) -> u16 {
    u16::try_from(wrapped_lines(text, width).len()).unwrap_or(u16::MAX)
}

/// Cursor position within the wrapped text as (line, column).
///
/// The column counts chars since the start of the last wrapped segment,
/// including trailing spaces that textwrap trims.
pub(super) fn cursor_line_col(text: &str, pos: usize, width: u16) -> (u16, u16) {
    if width == 0 {
        return (0, 0);
    }
    let before = &text[..pos];
    let line = line_count(before, width).saturating_sub(1);

    let logical_start = before.rfind('\n').map_or(0, |i| i + 1);
    let logical = &before[logical_start..];
    let last_segment = textwrap::wrap(logical, wrap_options(width))
        .last()
        .map_or(0, |seg| seg.trim_end_matches(' ').chars().count());
    let trailing_spaces = logical.len() - logical.trim_end_matches(' ').len();
    let column = u16::try_from(last_segment + trailing_spaces).unwrap_or(u16::MAX);
    (line, column)
}

/// Tracks the byte cursor and the first visible wrapped line.
#[derive(Debug, Default)]
pub(super) struct CursorState {
    pub pos: usize,
    pub scroll_offset: u16,
}

impl CursorState {
    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Scroll so the cursor's line stays within the visible window.
    pub fn follow(&mut self, text: &str, outer_width: u16) {
        let width = inner_width(outer_width);
        if line_count(text, width) <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }
        let (line, _) = cursor_line_col(text, self.pos, width);
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = line + 1 - MAX_VISIBLE_LINES;
        }
    }

    /// Terminal cell for the cursor inside `area`.
    pub fn screen_pos(&self, text: &str, area: Rect) -> (u16, u16) {
        let (line, col) = cursor_line_col(text, self.pos, inner_width(area.width));
        let row = line.saturating_sub(self.scroll_offset);
        (
            area.x + BORDER_OFFSET + 1 + col,
            area.y + BORDER_OFFSET + row,
        )
    }
}
