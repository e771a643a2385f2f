//! # Actions
//!
//! Everything that can happen in the chat becomes an `Action`.
//! Socket opened? That's `Action::Connected`.
//! User presses Enter? That's `Action::Submit`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an `Effect` describing any I/O the caller must perform.
//! No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};

use crate::core::envelope::OutboundEnvelope;
use crate::core::message::Inbound;
use crate::core::state::App;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Socket `open` event.
    Connected,
    /// Socket `message` event. `received_at` stamps fallback messages.
    Received {
        payload: String,
        received_at: DateTime<Utc>,
    },
    /// Socket `close` event.
    Disconnected { code: Option<u16>, reason: String },
    /// Socket `error` event. Logged only.
    TransportFailed(String),
    /// Draft replaced by the input box.
    UpdateDraft(String),
    /// Enter or send-button activation.
    Submit,
    Quit,
}

/// I/O requested by `update()`, performed by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Serialized envelope to hand to the connection.
    Transmit(String),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Connected => {
            info!("Connected to {}", app.endpoint);
            app.connected = true;
            Effect::None
        }
        Action::Received {
            payload,
            received_at,
        } => {
            debug!("Message from server: {}", payload);
            let message = Inbound::decode(&payload).into_display(received_at);
            app.messages.append(message);
            Effect::None
        }
        Action::Disconnected { code, reason } => {
            info!(
                "Disconnected from {} (code={:?}, reason={:?})",
                app.endpoint, code, reason
            );
            app.connected = false;
            Effect::None
        }
        Action::TransportFailed(message) => {
            error!("WebSocket error: {}", message);
            Effect::None
        }
        Action::UpdateDraft(text) => {
            app.draft = text;
            Effect::None
        }
        Action::Submit => {
            if !app.can_send() {
                debug!(
                    "Submit ignored (connected={}, draft_len={})",
                    app.connected,
                    app.draft.len()
                );
                return Effect::None;
            }
            let envelope = OutboundEnvelope::send_message(app.draft.clone());
            match envelope.to_json() {
                Ok(json) => {
                    app.draft.clear();
                    Effect::Transmit(json)
                }
                Err(e) => {
                    warn!("Failed to serialize outbound envelope: {}", e);
                    Effect::None
                }
            }
        }
        Action::Quit => Effect::Quit,
    }
}
