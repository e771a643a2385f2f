use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::send_button;
use crate::tui::components::{MessageList, TitleBar};

/// Screen regions for one frame.
pub struct ScreenLayout {
    pub title: Rect,
    pub messages: Rect,
    pub input: Rect,
    pub button: Rect,
}

impl ScreenLayout {
    /// Title line on top, history in the middle, input row at the bottom
    /// (input box growing with the draft, send button on its right).
    pub fn new(area: Rect, tui: &TuiState) -> Self {
        use Constraint::{Length, Min};
        let input_width = area.width.saturating_sub(send_button::WIDTH);
        let input_height = tui.input_box.calculate_height(input_width);

        let [title, messages, input_row] =
            Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(area);
        let [input, button] =
            Layout::horizontal([Min(0), Length(send_button::WIDTH)]).areas(input_row);

        Self {
            title,
            messages,
            input,
            button,
        }
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, now: DateTime<Utc>) {
    let layout = ScreenLayout::new(frame.area(), tui);

    // History first so the title bar sees a fresh unseen-content flag
    MessageList::new(&mut tui.message_list, &app.messages, &tui.time_format, now)
        .render(frame, layout.messages);

    TitleBar::new(
        app.connected,
        &app.endpoint,
        tui.message_list.has_unseen_content,
    )
    .render(frame, layout.title);

    tui.input_box.render(frame, layout.input);

    tui.send_button.enabled = app.connected;
    tui.send_button.render(frame, layout.button);
}
