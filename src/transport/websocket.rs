//! WebSocket transport backed by tokio-tungstenite.
//!
//! Each connection runs in its own tokio task. The task owns the socket and
//! multiplexes inbound frames with an outbound queue; lifecycle events are
//! pushed to the shared [`ListenerRegistry`] as they happen. Event order
//! follows browser semantics: a failed connect or read reports `Error` and then
//! `Close` with code 1006.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use futures::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::tungstenite::Message;

use super::listeners::{Listener, ListenerId, ListenerRegistry};
use super::{EventKind, Transport, TransportError, TransportEvent};

/// Close code for connections that ended without a close frame.
pub const ABNORMAL_CLOSURE: u16 = 1006;

/// Socket ready states (matching the browser API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReadyState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl ReadyState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ReadyState::Connecting,
            1 => ReadyState::Open,
            2 => ReadyState::Closing,
            _ => ReadyState::Closed,
        }
    }
}

#[derive(Clone)]
struct SharedState(Arc<AtomicU8>);

impl SharedState {
    fn new(state: ReadyState) -> Self {
        Self(Arc::new(AtomicU8::new(state as u8)))
    }

    fn get(&self) -> ReadyState {
        ReadyState::from_u8(self.0.load(Ordering::SeqCst))
    }

    fn set(&self, state: ReadyState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }
}

enum Outgoing {
    Text(String),
    Close,
}

pub struct WsTransport {
    url: String,
    listeners: Arc<Mutex<ListenerRegistry>>,
    state: SharedState,
    outbound: Option<UnboundedSender<Outgoing>>,
    started: bool,
}

impl WsTransport {
    /// Create an unconnected transport. Nothing happens until `connect()`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            listeners: Arc::new(Mutex::new(ListenerRegistry::new())),
            state: SharedState::new(ReadyState::Connecting),
            outbound: None,
            started: false,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn ready_state(&self) -> ReadyState {
        self.state.get()
    }

    pub fn listener_count(&self) -> usize {
        lock_registry(&self.listeners).len()
    }
}

impl Transport for WsTransport {
    fn add_listener(&mut self, kind: EventKind, listener: Listener) -> ListenerId {
        lock_registry(&self.listeners).add(kind, listener)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        lock_registry(&self.listeners).remove(id)
    }

    fn connect(&mut self) {
        if self.started {
            warn!("connect() called twice for {}", self.url);
            return;
        }
        self.started = true;

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!("No tokio runtime to drive {}: {}", self.url, e);
                self.state.set(ReadyState::Closed);
                dispatch(&self.listeners, TransportEvent::Error(e.to_string()));
                dispatch(
                    &self.listeners,
                    TransportEvent::Close {
                        code: Some(ABNORMAL_CLOSURE),
                        reason: "no runtime".to_string(),
                    },
                );
                return;
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        self.outbound = Some(tx);
        runtime.spawn(run_socket(
            self.url.clone(),
            Arc::clone(&self.listeners),
            self.state.clone(),
            rx,
        ));
    }

    fn send(&mut self, text: String) -> Result<(), TransportError> {
        match self.state.get() {
            ReadyState::Open => {}
            ReadyState::Connecting => return Err(TransportError::NotOpen),
            ReadyState::Closing | ReadyState::Closed => return Err(TransportError::Closed),
        }
        let outbound = self.outbound.as_ref().ok_or(TransportError::Closed)?;
        outbound
            .send(Outgoing::Text(text))
            .map_err(|_| TransportError::Closed)
    }

    fn close(&mut self) {
        match self.outbound.take() {
            Some(outbound) => {
                if self.state.get() != ReadyState::Closed {
                    self.state.set(ReadyState::Closing);
                }
                // The task may already be gone; that's fine.
                let _ = outbound.send(Outgoing::Close);
                info!("Closing {}", self.url);
            }
            None if !self.started => {
                self.started = true;
                self.state.set(ReadyState::Closed);
            }
            None => {}
        }
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        self.close();
    }
}

fn lock_registry(listeners: &Mutex<ListenerRegistry>) -> std::sync::MutexGuard<'_, ListenerRegistry> {
    listeners
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn dispatch(listeners: &Mutex<ListenerRegistry>, event: TransportEvent) {
    lock_registry(listeners).dispatch(&event);
}

async fn run_socket(
    url: String,
    listeners: Arc<Mutex<ListenerRegistry>>,
    state: SharedState,
    mut outbound: UnboundedReceiver<Outgoing>,
) {
    info!("Connecting to {}", url);

    let stream = tokio::select! {
        result = tokio_tungstenite::connect_async(url.as_str()) => match result {
            Ok((stream, response)) => {
                info!("Connected to {} (status: {})", url, response.status());
                stream
            }
            Err(e) => {
                error!("Connection to {} failed: {}", url, e);
                state.set(ReadyState::Closed);
                dispatch(&listeners, TransportEvent::Error(e.to_string()));
                dispatch(&listeners, TransportEvent::Close {
                    code: Some(ABNORMAL_CLOSURE),
                    reason: "connection failed".to_string(),
                });
                return;
            }
        },
        // Only Close can be queued before the socket opens.
        _ = outbound.recv() => {
            info!("Closed {} before the connection was established", url);
            state.set(ReadyState::Closed);
            dispatch(&listeners, TransportEvent::Close {
                code: Some(ABNORMAL_CLOSURE),
                reason: "closed before open".to_string(),
            });
            return;
        }
    };

    state.set(ReadyState::Open);
    dispatch(&listeners, TransportEvent::Open);

    let (mut write, mut read) = stream.split();

    let (code, reason) = loop {
        tokio::select! {
            outgoing = outbound.recv() => match outgoing {
                Some(Outgoing::Text(text)) => {
                    debug!("Sending {} bytes", text.len());
                    if let Err(e) = write.send(Message::text(text)).await {
                        error!("Send error on {}: {}", url, e);
                        dispatch(&listeners, TransportEvent::Error(e.to_string()));
                    }
                }
                Some(Outgoing::Close) | None => {
                    state.set(ReadyState::Closing);
                    if let Err(e) = write.send(Message::Close(None)).await {
                        debug!("Close frame not sent on {}: {}", url, e);
                    }
                    break (Some(1000), String::new());
                }
            },
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    dispatch(&listeners, TransportEvent::Message(text.as_str().to_owned()));
                }
                Some(Ok(Message::Binary(data))) => {
                    debug!("Received binary frame ({} bytes)", data.len());
                    let text = String::from_utf8_lossy(&data).into_owned();
                    dispatch(&listeners, TransportEvent::Message(text));
                }
                Some(Ok(Message::Close(frame))) => {
                    break frame
                        .map(|f| (Some(u16::from(f.code)), f.reason.as_str().to_owned()))
                        .unwrap_or((None, String::new()));
                }
                // Ping/pong are answered by tungstenite
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!("Read error on {}: {}", url, e);
                    dispatch(&listeners, TransportEvent::Error(e.to_string()));
                    break (Some(ABNORMAL_CLOSURE), "connection error".to_string());
                }
                None => break (Some(ABNORMAL_CLOSURE), "connection dropped".to_string()),
            },
        }
    };

    state.set(ReadyState::Closed);
    info!("Connection to {} ended (code={:?})", url, code);
    dispatch(&listeners, TransportEvent::Close { code, reason });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transport_is_connecting_and_rejects_sends() {
        let mut transport = WsTransport::new("ws://127.0.0.1:9");
        assert_eq!(transport.ready_state(), ReadyState::Connecting);
        assert_eq!(
            transport.send("x".to_string()),
            Err(TransportError::NotOpen)
        );
    }

    #[test]
    fn close_before_connect_marks_closed_and_is_idempotent() {
        let mut transport = WsTransport::new("ws://127.0.0.1:9");
        transport.close();
        transport.close();
        assert_eq!(transport.ready_state(), ReadyState::Closed);
        assert_eq!(transport.send("x".to_string()), Err(TransportError::Closed));
    }

    #[test]
    fn connect_without_runtime_reports_error_then_close() {
        let mut transport = WsTransport::new("ws://127.0.0.1:9");
        let seen = Arc::new(Mutex::new(Vec::new()));
        for kind in EventKind::ALL {
            let seen = Arc::clone(&seen);
            transport.add_listener(
                kind,
                Box::new(move |event| seen.lock().unwrap().push(event.kind())),
            );
        }
        assert_eq!(transport.listener_count(), 4);

        transport.connect();

        assert_eq!(*seen.lock().unwrap(), [EventKind::Error, EventKind::Close]);
        assert_eq!(transport.ready_state(), ReadyState::Closed);
    }

    #[test]
    fn ready_state_round_trips_through_u8() {
        for state in [
            ReadyState::Connecting,
            ReadyState::Open,
            ReadyState::Closing,
            ReadyState::Closed,
        ] {
            assert_eq!(ReadyState::from_u8(state as u8), state);
        }
    }
}
