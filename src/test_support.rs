//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::state::App;
use crate::transport::{
    EventKind, Listener, ListenerId, ListenerRegistry, Transport, TransportError, TransportEvent,
};

/// Counters recorded by [`FakeTransport`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FakeStats {
    pub adds: usize,
    pub removes: usize,
    pub failed_removes: usize,
    /// Listeners currently registered.
    pub active: usize,
    pub connects: usize,
    /// Listeners that were registered when `connect()` ran.
    pub listeners_at_connect: usize,
    pub closes: usize,
    pub send_attempts: usize,
}

#[derive(Default)]
struct FakeState {
    registry: ListenerRegistry,
    stats: FakeStats,
    open: bool,
    sent: Vec<String>,
}

/// In-memory transport that records calls and emits synthetic events.
pub struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

/// Test-side handle onto a [`FakeTransport`] that outlives it.
#[derive(Clone)]
pub struct FakeProbe {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> (Self, FakeProbe) {
        let state = Arc::new(Mutex::new(FakeState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            FakeProbe { state },
        )
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }
}

impl Transport for FakeTransport {
    fn add_listener(&mut self, kind: EventKind, listener: Listener) -> ListenerId {
        let mut state = self.lock();
        state.stats.adds += 1;
        let id = state.registry.add(kind, listener);
        state.stats.active = state.registry.len();
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let mut state = self.lock();
        let removed = state.registry.remove(id);
        if removed {
            state.stats.removes += 1;
        } else {
            state.stats.failed_removes += 1;
        }
        state.stats.active = state.registry.len();
        removed
    }

    fn connect(&mut self) {
        let mut state = self.lock();
        state.stats.connects += 1;
        state.stats.listeners_at_connect = state.registry.len();
    }

    fn send(&mut self, text: String) -> Result<(), TransportError> {
        let mut state = self.lock();
        state.stats.send_attempts += 1;
        if !state.open {
            return Err(TransportError::NotOpen);
        }
        state.sent.push(text);
        Ok(())
    }

    fn close(&mut self) {
        let mut state = self.lock();
        state.stats.closes += 1;
        state.open = false;
    }
}

impl FakeProbe {
    /// Deliver an event to whatever listeners are currently registered.
    pub fn emit(&self, event: TransportEvent) {
        let mut state = self.state.lock().unwrap();
        match event {
            TransportEvent::Open => state.open = true,
            TransportEvent::Close { .. } => state.open = false,
            _ => {}
        }
        state.registry.dispatch(&event);
    }

    pub fn stats(&self) -> FakeStats {
        self.state.lock().unwrap().stats.clone()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.state.lock().unwrap().registry.count(kind)
    }

    pub fn sent(&self) -> Vec<String> {
        self.state.lock().unwrap().sent.clone()
    }
}

/// Creates a disconnected test App.
pub fn test_app() -> App {
    App::new("ws://test.invalid/chat")
}
