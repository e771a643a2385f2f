//! # SendButton Component
//!
//! Clickable `[ Send ]` label next to the input box.
//!
//! The button is enabled only while the connection is open. When disabled it
//! renders dimmed and [`SendButton::hit`] never reports a click, so the
//! parent cannot submit through it. The area from the last render is kept
//! for mouse hit testing between frames.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::Component;

pub const LABEL: &str = "[ Send ]";
/// Label plus the bordered block around it
pub const WIDTH: u16 = LABEL.len() as u16 + 2;

#[derive(Debug, Default)]
pub struct SendButton {
    /// Prop: mirrors `App::connected`
    pub enabled: bool,
    area: Rect,
}

impl SendButton {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when an enabled button was drawn at the given terminal cell.
    pub fn hit(&self, column: u16, row: u16) -> bool {
        self.enabled && self.area.contains(Position::new(column, row))
    }

    fn style(&self) -> Style {
        if self.enabled {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        }
    }
}

impl Component for SendButton {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.area = area;
        let style = self.style();
        let button = Paragraph::new(LABEL)
            .alignment(Alignment::Center)
            .style(style)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(style),
            );
        frame.render_widget(button, area);
    }
}
