//! # MessageList Component
//!
//! Scrollable view of the whole chat history.
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the `MessageStore` (props).
//!
//! Every message is laid out and drawn on every frame. There is no windowing:
//! the store never shrinks, so the canvas simply grows. Scrolling is handled
//! by `tui-scrollview`.
//!
//! Canvas rows are `u16`. Once the history is taller than `u16::MAX` rows,
//! the canvas keeps the newest messages that fit.

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::store::MessageStore;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

pub const EMPTY_HINT: &str = "No messages yet";

/// Scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    /// Heights from the last render, one per message on the canvas
    pub heights: Vec<u16>,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// True when history extends below the visible area
    pub has_unseen_content: bool,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            heights: Vec::new(),
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
            has_unseen_content: false,
        }
    }

    fn max_offset(&self) -> u16 {
        total_height(&self.heights).saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

fn total_height(heights: &[u16]) -> u16 {
    heights.iter().fold(0u16, |total, &h| total.saturating_add(h))
}

/// Index of the oldest message whose suffix still fits a `u16`-tall canvas.
fn first_on_canvas(heights: &[u16]) -> usize {
    let mut total: u32 = 0;
    for (i, &h) in heights.iter().enumerate().rev() {
        total += u32::from(h);
        if total > u32::from(u16::MAX) {
            return i + 1;
        }
    }
    0
}

pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a MessageStore,
    pub time_format: &'a str,
    pub now: DateTime<Utc>,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a MessageStore,
        time_format: &'a str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            state,
            messages,
            time_format,
            now,
        }
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.viewport_height = area.height;

        if self.messages.is_empty() {
            self.state.heights.clear();
            self.state.has_unseen_content = false;
            let hint = Paragraph::new(EMPTY_HINT)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC));
            frame.render_widget(hint, area);
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        let mut components: Vec<Message> = self
            .messages
            .iter()
            .map(|m| Message::new(m, self.time_format, self.now))
            .collect();
        let mut heights: Vec<u16> = components.iter().map(|c| c.height(content_width)).collect();

        let first = first_on_canvas(&heights);
        if first > 0 {
            log::trace!("History exceeds canvas, skipping {} oldest messages", first);
            components.drain(..first);
            heights.drain(..first);
        }
        self.state.heights = heights;
        let canvas_height = total_height(&self.state.heights);

        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for (component, &height) in components.into_iter().zip(&self.state.heights) {
            scroll_view.render_widget(component, Rect::new(0, y_offset, content_width, height));
            y_offset = y_offset.saturating_add(height);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        let offset = self.state.scroll_state.offset().y;
        self.state.has_unseen_content = offset < self.state.max_offset();
    }
}

/// Scrolling lives on the persistent state; `MessageList` is rebuilt each frame.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
                self.scroll_state.scroll_to_bottom();
            }
            _ => {}
        }
        None
    }
}
