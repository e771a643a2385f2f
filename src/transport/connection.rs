//! # Connection Manager
//!
//! Scoped owner of exactly one transport.
//!
//! `mount()` registers one listener per lifecycle event, each translating its
//! event into a core [`Action`] posted to the event loop's channel, and then
//! starts the connection. Dropping the manager removes those four listeners
//! and closes the socket, exactly once, on every exit path.
//!
//! There is no global socket handle: two managers never share state.

use std::sync::mpsc::Sender;

use chrono::Utc;
use log::{debug, warn};

use super::{EventKind, Listener, ListenerId, Transport, TransportEvent};
use crate::core::action::Action;

pub struct ConnectionManager<T: Transport> {
    transport: T,
    listener_ids: Vec<ListenerId>,
}

impl<T: Transport> ConnectionManager<T> {
    /// Attach lifecycle listeners to `transport`, then connect it.
    pub fn mount(mut transport: T, sink: Sender<Action>) -> Self {
        let listener_ids = EventKind::ALL
            .into_iter()
            .map(|kind| transport.add_listener(kind, forward_to(sink.clone())))
            .collect();
        transport.connect();
        Self {
            transport,
            listener_ids,
        }
    }

    /// Transmit a serialized envelope. Failures are logged and dropped.
    pub fn send(&mut self, payload: String) {
        if let Err(e) = self.transport.send(payload) {
            warn!("Dropped outbound message: {}", e);
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> Drop for ConnectionManager<T> {
    fn drop(&mut self) {
        for id in self.listener_ids.drain(..) {
            if !self.transport.remove_listener(id) {
                warn!("Listener {:?} was already removed", id);
            }
        }
        self.transport.close();
        debug!("Connection torn down");
    }
}

/// Map a transport event onto the reducer's vocabulary.
pub fn event_to_action(event: &TransportEvent) -> Action {
    match event {
        TransportEvent::Open => Action::Connected,
        TransportEvent::Message(payload) => Action::Received {
            payload: payload.clone(),
            received_at: Utc::now(),
        },
        TransportEvent::Close { code, reason } => Action::Disconnected {
            code: *code,
            reason: reason.clone(),
        },
        TransportEvent::Error(message) => Action::TransportFailed(message.clone()),
    }
}

fn forward_to(sink: Sender<Action>) -> Listener {
    Box::new(move |event| {
        if sink.send(event_to_action(event)).is_err() {
            warn!("Failed to forward {:?}: receiver dropped", event.kind());
        }
    })
}
