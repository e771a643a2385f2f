//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the chat screen,
//! and translates keyboard and mouse events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! One synchronous loop on the main thread:
//!
//! 1. Draw when something changed.
//! 2. Poll the terminal (short timeout) and drain every pending input event.
//! 3. Drain actions posted by the connection's listeners.
//!
//! Every action goes through `core::update`; an `Effect::Transmit` is handed
//! to the `ConnectionManager` and only then is the input box cleared.
//!
//! The connection is mounted before the first frame and dropped when the loop
//! exits, which removes its listeners and closes the socket.

mod component;
mod components;
mod event;
mod ui;

use std::io::stdout;
use std::sync::mpsc;
use std::time::Duration;

use chrono::Utc;
use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info};

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::transport::{ConnectionManager, Transport, WsTransport};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState, SendButton};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// TUI-specific presentation state (not part of core chat logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub send_button: SendButton,
    pub time_format: String,
}

impl TuiState {
    pub fn new(time_format: String) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            send_button: SendButton::new(),
            time_format,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol is ignored by terminals that don't support it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock, // blinking resets on every draw()
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Result of feeding one action through the reducer.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

/// Run one action through `update` and perform the resulting effect.
fn dispatch<T: Transport>(
    app: &mut App,
    tui: &mut TuiState,
    connection: &mut ConnectionManager<T>,
    action: Action,
) -> Step {
    match update(app, action) {
        Effect::None => Step::Continue,
        Effect::Transmit(payload) => {
            connection.send(payload);
            tui.input_box.clear();
            Step::Continue
        }
        Effect::Quit => Step::Quit,
    }
}

/// Route one terminal event to the component that owns it.
fn handle_terminal_event<T: Transport>(
    app: &mut App,
    tui: &mut TuiState,
    connection: &mut ConnectionManager<T>,
    event: TuiEvent,
) -> Step {
    match event {
        TuiEvent::Quit | TuiEvent::ForceQuit => dispatch(app, tui, connection, Action::Quit),
        TuiEvent::Resize => Step::Continue,
        TuiEvent::MouseClick(column, row) => {
            if tui.send_button.hit(column, row) {
                debug!("Send button clicked");
                dispatch(app, tui, connection, Action::Submit)
            } else {
                Step::Continue
            }
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(&event);
            Step::Continue
        }
        _ => match tui.input_box.handle_event(&event) {
            Some(InputEvent::ContentChanged) => {
                let draft = tui.input_box.buffer.clone();
                dispatch(app, tui, connection, Action::UpdateDraft(draft))
            }
            Some(InputEvent::Submit) => dispatch(app, tui, connection, Action::Submit),
            Some(InputEvent::CursorMoved) | None => Step::Continue,
        },
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut app = App::new(config.endpoint.clone());
    let mut tui = TuiState::new(config.time_format.clone());

    // Channel for actions posted by transport listeners
    let (tx, rx) = mpsc::channel();
    let mut connection = ConnectionManager::mount(WsTransport::new(&config.endpoint), tx);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let mut needs_redraw = true; // Force first frame

    'main: loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, Utc::now()))?;
            needs_redraw = false;
        }

        // Process first event + drain ALL pending events before next draw
        let first_event = poll_event_timeout(POLL_TIMEOUT);
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_terminal_event(&mut app, &mut tui, &mut connection, event) == Step::Quit {
                break 'main;
            }
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, &mut tui, &mut connection, action) == Step::Quit {
                break 'main;
            }
        }
    }

    info!("Shutting down");
    drop(connection);
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeProbe, FakeTransport, test_app};
    use crate::transport::TransportEvent;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    struct Harness {
        app: App,
        tui: TuiState,
        connection: ConnectionManager<FakeTransport>,
        probe: FakeProbe,
        rx: mpsc::Receiver<Action>,
    }

    impl Harness {
        fn new() -> Self {
            let (transport, probe) = FakeTransport::new();
            let (tx, rx) = mpsc::channel();
            Self {
                app: test_app(),
                tui: TuiState::new("%H:%M".to_string()),
                connection: ConnectionManager::mount(transport, tx),
                probe,
                rx,
            }
        }

        fn pump(&mut self) {
            while let Ok(action) = self.rx.try_recv() {
                dispatch(&mut self.app, &mut self.tui, &mut self.connection, action);
            }
        }

        fn key(&mut self, event: TuiEvent) -> Step {
            handle_terminal_event(&mut self.app, &mut self.tui, &mut self.connection, event)
        }

        fn type_text(&mut self, text: &str) {
            for c in text.chars() {
                self.key(TuiEvent::InputChar(c));
            }
        }

        fn open(&mut self) {
            self.probe.emit(TransportEvent::Open);
            self.pump();
        }
    }

    #[test]
    fn typing_keeps_app_draft_in_sync() {
        let mut h = Harness::new();
        h.type_text("hey");
        assert_eq!(h.app.draft, "hey");
        h.key(TuiEvent::Backspace);
        assert_eq!(h.app.draft, "he");
    }

    #[test]
    fn enter_sends_envelope_and_clears_input() {
        let mut h = Harness::new();
        h.open();
        h.type_text("hello");

        assert_eq!(h.key(TuiEvent::Submit), Step::Continue);
        assert_eq!(
            h.probe.sent(),
            vec![r#"{"action":"sendMessage","message":"hello"}"#.to_string()]
        );
        assert!(h.tui.input_box.buffer.is_empty());
        assert!(h.app.draft.is_empty());
    }

    #[test]
    fn submit_while_offline_keeps_draft() {
        let mut h = Harness::new();
        h.type_text("hello");
        h.key(TuiEvent::Submit);

        assert!(h.probe.sent().is_empty());
        assert_eq!(h.tui.input_box.buffer, "hello");
        assert_eq!(h.app.draft, "hello");
    }

    #[test]
    fn blank_draft_is_not_sent() {
        let mut h = Harness::new();
        h.open();
        h.type_text("   ");
        h.key(TuiEvent::Submit);
        assert!(h.probe.sent().is_empty());
        assert_eq!(h.tui.input_box.buffer, "   ");
    }

    fn draw(h: &mut Harness, terminal: &mut Terminal<TestBackend>) {
        terminal
            .draw(|f| ui::draw_ui(f, &h.app, &mut h.tui, Utc::now()))
            .unwrap();
    }

    #[test]
    fn send_button_click_submits_only_when_enabled() {
        let mut h = Harness::new();
        h.type_text("hi");
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let button = ui::ScreenLayout::new(Rect::new(0, 0, 60, 12), &h.tui).button;

        // Offline: the button is drawn but inert
        draw(&mut h, &mut terminal);
        h.key(TuiEvent::MouseClick(button.x + 1, button.y + 1));
        assert!(h.probe.sent().is_empty());

        h.open();
        draw(&mut h, &mut terminal);
        h.key(TuiEvent::MouseClick(button.x + 1, button.y + 1));
        assert_eq!(h.probe.sent().len(), 1);
        assert!(h.tui.input_box.buffer.is_empty());
    }

    #[test]
    fn click_outside_button_does_nothing() {
        let mut h = Harness::new();
        h.open();
        h.type_text("hi");
        assert_eq!(h.key(TuiEvent::MouseClick(0, 0)), Step::Continue);
        assert!(h.probe.sent().is_empty());
    }

    #[test]
    fn inbound_messages_are_appended() {
        let mut h = Harness::new();
        h.open();
        h.probe
            .emit(TransportEvent::Message(r#"{"message":{"text":"yo"}}"#.to_string()));
        h.pump();
        assert_eq!(h.app.messages.len(), 1);
        assert!(h.app.connected);
    }

    #[test]
    fn close_event_disables_sending() {
        let mut h = Harness::new();
        h.open();
        h.probe.emit(TransportEvent::Close {
            code: Some(1000),
            reason: String::new(),
        });
        h.pump();
        assert!(!h.app.connected);

        h.type_text("late");
        h.key(TuiEvent::Submit);
        assert!(h.probe.sent().is_empty());
    }

    #[test]
    fn quit_keys_stop_the_loop() {
        let mut h = Harness::new();
        assert_eq!(h.key(TuiEvent::Quit), Step::Quit);
        assert_eq!(h.key(TuiEvent::ForceQuit), Step::Quit);
    }

    #[test]
    fn scroll_events_go_to_message_list() {
        let mut h = Harness::new();
        h.key(TuiEvent::ScrollUp);
        assert!(!h.tui.message_list.stick_to_bottom);
        h.key(TuiEvent::ScrollToBottom);
        assert!(h.tui.message_list.stick_to_bottom);
        assert!(h.app.draft.is_empty());
    }
}
