use chrono::{DateTime, Utc};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::core::message::DisplayMessage;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
pub(crate) const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
pub(crate) const VERTICAL_OVERHEAD: u16 = 2;

/// A stateless component that renders one chat entry.
///
/// # Design
///
/// `Message` is a **transient component**: it's created fresh each frame with the
/// data it needs to render. The text and formatted time are resolved once in
/// [`new`](Self::new) so that the height calculation and the draw agree.
///
/// The bubble is a rounded bordered block holding the text; the time sits on
/// the bottom border, right-aligned and dimmed.
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) predicts rendered height using
/// `textwrap` with options that match Ratatui's `Paragraph` wrapping, so the
/// parent `MessageList` can size its scroll canvas without rendering.
pub struct Message {
    pub text: String,
    pub time: String,
}

impl Message {
    pub fn new(message: &DisplayMessage, time_format: &str, now: DateTime<Utc>) -> Self {
        Self {
            text: message.display_text(),
            time: message.display_time(time_format, now),
        }
    }

    /// Height required for `text` at the given outer width.
    pub fn calculate_height(text: &str, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            return 1;
        }

        let content = text.trim();
        if content.is_empty() {
            return 1 + VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options).len();
        u16::try_from(lines)
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }

    pub fn height(&self, width: u16) -> u16 {
        Self::calculate_height(&self.text, width)
    }
}

impl Widget for Message {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let border_style = Style::default().fg(Color::Gray).add_modifier(Modifier::DIM);
        let time_style = Style::default().fg(Color::DarkGray);

        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_bottom(Line::styled(self.time, time_style).alignment(Alignment::Right))
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.text.trim().to_string())
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}
