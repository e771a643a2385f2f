//! # TitleBar Component
//!
//! Top line showing the application title and the connection indicator.
//!
//! ## Conditional Formatting
//!
//! 1. **Connected**: `Chat Application ● online`, green dot
//! 2. **Disconnected**: `Chat Application ● offline`, red dot
//! 3. **Unseen content**: `| ↓ New` is appended when history extends below the view
//!
//! TitleBar is purely presentational: every field is a prop.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub const TITLE: &str = "Chat Application";
pub const STATUS_DOT: &str = "●";

pub struct TitleBar<'a> {
    pub connected: bool,
    pub endpoint: &'a str,
    pub has_unseen_content: bool,
}

impl<'a> TitleBar<'a> {
    pub fn new(connected: bool, endpoint: &'a str, has_unseen_content: bool) -> Self {
        Self {
            connected,
            endpoint,
            has_unseen_content,
        }
    }

    fn status(&self) -> (&'static str, Color) {
        if self.connected {
            ("online", Color::Green)
        } else {
            ("offline", Color::Red)
        }
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (label, color) = self.status();
        let mut spans = vec![
            Span::styled(TITLE, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(STATUS_DOT, Style::default().fg(color)),
            Span::raw(" "),
            Span::styled(label, Style::default().fg(color)),
            Span::styled(
                format!(" | {}", self.endpoint),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if self.has_unseen_content {
            spans.push(Span::raw(" | ↓ New"));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
