//! # Transport
//!
//! Capability-style interface over a bidirectional text socket.
//!
//! A transport exposes four lifecycle events (open, message, close, error).
//! Handlers are registered per [`EventKind`] and removed by [`ListenerId`],
//! mirroring the add/remove listener pairs of a browser WebSocket. This lets
//! [`ConnectionManager`] be driven by a fake transport in tests with no network.
//!
//! ```text
//!   WsTransport (tokio task) ──dispatch──► listeners ──Action──► mpsc ──► event loop
//!                 ▲                                                         │
//!                 └────────────────────── send(json) ◄──────────────────────┘
//! ```

pub mod connection;
pub mod listeners;
pub mod websocket;

use std::fmt;

pub use connection::ConnectionManager;
pub use listeners::{Listener, ListenerId, ListenerRegistry};
pub use websocket::WsTransport;

/// One lifecycle event delivered by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Open,
    Message(String),
    Close { code: Option<u16>, reason: String },
    Error(String),
}

impl TransportEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TransportEvent::Open => EventKind::Open,
            TransportEvent::Message(_) => EventKind::Message,
            TransportEvent::Close { .. } => EventKind::Close,
            TransportEvent::Error(_) => EventKind::Error,
        }
    }
}

/// Which lifecycle event a listener is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Open,
    Message,
    Close,
    Error,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Open,
        EventKind::Message,
        EventKind::Close,
        EventKind::Error,
    ];
}

/// Errors from the transport's outbound side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Socket exists but is not (yet) open.
    NotOpen,
    /// Socket was closed; nothing more can be sent.
    Closed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::NotOpen => write!(f, "socket is not open"),
            TransportError::Closed => write!(f, "socket is closed"),
        }
    }
}

impl std::error::Error for TransportError {}

/// A socket that reports lifecycle events to registered listeners.
pub trait Transport: Send {
    /// Register a handler for one event kind.
    fn add_listener(&mut self, kind: EventKind, listener: Listener) -> ListenerId;

    /// Remove a previously registered handler. Returns `false` if unknown.
    fn remove_listener(&mut self, id: ListenerId) -> bool;

    /// Start connecting. Events are only delivered after this call.
    fn connect(&mut self);

    /// Queue a text frame. Fire-and-forget: no delivery confirmation.
    fn send(&mut self, text: String) -> Result<(), TransportError>;

    /// Close the socket. Calling more than once is a no-op.
    fn close(&mut self);
}
