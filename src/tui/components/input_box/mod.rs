//! # InputBox Component
//!
//! Single text field where the user composes the next chat message.
//!
//! ## Responsibilities
//!
//! - Capture text input
//! - Handle editing (backspace, delete, cursor and word movement, paste)
//! - Emit a submission request on Enter
//! - Show a placeholder while empty
//!
//! ## State Management
//!
//! The buffer is local editing state; the authoritative draft lives in
//! `App::draft` and is kept in sync through `InputEvent::ContentChanged`.
//! Submitting does not clear the buffer. The parent calls [`InputBox::clear`]
//! only once the reducer has actually produced a frame to transmit, so a
//! submission blocked by a closed connection keeps the text.

mod editing;
mod layout;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use editing::{next_char_boundary, next_word_boundary, prev_char_boundary, prev_word_boundary};
use layout::{CursorState, MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width, line_count, wrapped_lines};

pub const PLACEHOLDER: &str = "Type a message...";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed; the parent decides whether anything is sent
    Submit,
    /// Buffer text changed
    ContentChanged,
    /// Only the cursor moved
    CursorMoved,
}

/// Text input component.
///
/// # State
///
/// - `buffer`: Current text being typed
/// - `cursor`: Byte cursor and internal scroll offset (see `CursorState`)
#[derive(Debug, Default)]
pub struct InputBox {
    pub buffer: String,
    cursor: CursorState,
}

impl InputBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the buffer after a successful send.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor.reset();
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor.pos
    }

    /// Required height for the current buffer at `outer_width`, in
    /// `[1 + VERTICAL_OVERHEAD, MAX_VISIBLE_LINES + VERTICAL_OVERHEAD]`.
    pub fn calculate_height(&self, outer_width: u16) -> u16 {
        let lines = line_count(&self.buffer, inner_width(outer_width));
        lines.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn visible_text(&self, outer_width: u16) -> String {
        let lines = wrapped_lines(&self.buffer, inner_width(outer_width));
        let start = (self.cursor.scroll_offset as usize).min(lines.len());
        let end = (start + MAX_VISIBLE_LINES as usize).min(lines.len());
        lines[start..end].join("\n")
    }

    fn insert(&mut self, text: &str) -> Option<InputEvent> {
        if text.is_empty() {
            return None;
        }
        self.buffer.insert_str(self.cursor.pos, text);
        self.cursor.pos += text.len();
        Some(InputEvent::ContentChanged)
    }

    fn move_to(&mut self, pos: usize) -> Option<InputEvent> {
        (pos != self.cursor.pos).then(|| {
            self.cursor.pos = pos;
            InputEvent::CursorMoved
        })
    }

    fn delete_range(&mut self, start: usize, end: usize) -> Option<InputEvent> {
        if start == end {
            return None;
        }
        self.buffer.drain(start..end);
        self.cursor.pos = start;
        Some(InputEvent::ContentChanged)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.follow(&self.buffer, area.width);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .padding(Padding::horizontal(1));

        let input = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER)
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        } else {
            Paragraph::new(self.visible_text(area.width))
        };
        frame.render_widget(input.block(block), area);

        frame.set_cursor_position(self.cursor.screen_pos(&self.buffer, area));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let pos = self.cursor.pos;
        match event {
            TuiEvent::InputChar(c) => self.insert(&c.to_string()),
            TuiEvent::Paste(text) => self.insert(text),
            TuiEvent::Backspace => {
                let prev = prev_char_boundary(&self.buffer, pos);
                self.delete_range(prev, pos)
            }
            TuiEvent::DeleteWordBack => {
                let prev = prev_word_boundary(&self.buffer, pos);
                self.delete_range(prev, pos)
            }
            TuiEvent::Delete => {
                let next = next_char_boundary(&self.buffer, pos);
                self.buffer.drain(pos..next).next().map(|_| InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => self.move_to(prev_char_boundary(&self.buffer, pos)),
            TuiEvent::CursorRight => self.move_to(next_char_boundary(&self.buffer, pos)),
            TuiEvent::WordLeft => self.move_to(prev_word_boundary(&self.buffer, pos)),
            TuiEvent::WordRight => self.move_to(next_word_boundary(&self.buffer, pos)),
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..pos].rfind('\n').map_or(0, |i| i + 1);
                self.move_to(line_start)
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[pos..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| pos + i);
                self.move_to(line_end)
            }
            TuiEvent::Submit => Some(InputEvent::Submit),
            _ => None,
        }
    }
}
