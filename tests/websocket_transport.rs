use std::future::Future;
use std::sync::mpsc as std_mpsc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

use wschat::core::action::{Action, Effect, update};
use wschat::core::state::App;
use wschat::transport::websocket::{ABNORMAL_CLOSURE, ReadyState};
use wschat::transport::{ConnectionManager, EventKind, Transport, TransportEvent, WsTransport};

const WAIT: Duration = Duration::from_secs(5);

// ============================================================================
// Helper Functions
// ============================================================================

/// Accepts one WebSocket client on an ephemeral port and hands it to `handler`.
async fn spawn_server<F, Fut>(handler: F) -> String
where
    F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        handler(ws).await;
    });
    format!("ws://{}", addr)
}

/// Registers a listener for every event kind that forwards into a channel.
fn record_events(transport: &mut WsTransport) -> mpsc::UnboundedReceiver<TransportEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    for kind in EventKind::ALL {
        let tx = tx.clone();
        transport.add_listener(
            kind,
            Box::new(move |event| {
                let _ = tx.send(event.clone());
            }),
        );
    }
    rx
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<TransportEvent>) -> TransportEvent {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for transport event")
        .expect("event channel closed")
}

/// Polls the event loop's std channel while letting the runtime make progress.
async fn next_action(rx: &std_mpsc::Receiver<Action>) -> Action {
    let deadline = tokio::time::Instant::now() + WAIT;
    loop {
        if let Ok(action) = rx.try_recv() {
            return action;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for action"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

// ============================================================================
// WsTransport Tests
// ============================================================================

#[tokio::test]
async fn test_open_receive_and_send_roundtrip() {
    let url = spawn_server(|mut ws| async move {
        ws.send(Message::text(r#"{"message":{"text":"welcome"}}"#))
            .await
            .unwrap();
        if let Some(Ok(Message::Text(text))) = ws.next().await {
            ws.send(Message::text(format!("echo:{}", text.as_str())))
                .await
                .unwrap();
        }
        // Keep the socket open until the client leaves
        while let Some(Ok(_)) = ws.next().await {}
    })
    .await;

    let mut transport = WsTransport::new(&url);
    let mut events = record_events(&mut transport);
    transport.connect();

    assert_eq!(next_event(&mut events).await, TransportEvent::Open);
    assert_eq!(transport.ready_state(), ReadyState::Open);
    assert_eq!(
        next_event(&mut events).await,
        TransportEvent::Message(r#"{"message":{"text":"welcome"}}"#.to_string())
    );

    tokio_test::assert_ok!(transport.send("ping".to_string()));
    assert_eq!(
        next_event(&mut events).await,
        TransportEvent::Message("echo:ping".to_string())
    );

    transport.close();
    assert_eq!(
        next_event(&mut events).await,
        TransportEvent::Close {
            code: Some(1000),
            reason: String::new()
        }
    );
    assert_eq!(transport.ready_state(), ReadyState::Closed);
}

#[tokio::test]
async fn test_binary_frames_arrive_as_lossy_text() {
    let url = spawn_server(|mut ws| async move {
        ws.send(Message::binary(br#"{"message":{"text":"bin"}}"#.to_vec()))
            .await
            .unwrap();
        ws.send(Message::binary(vec![b'o', b'k', 0xFF])).await.unwrap();
        while let Some(Ok(_)) = ws.next().await {}
    })
    .await;

    let mut transport = WsTransport::new(&url);
    let mut events = record_events(&mut transport);
    transport.connect();

    assert_eq!(next_event(&mut events).await, TransportEvent::Open);
    assert_eq!(
        next_event(&mut events).await,
        TransportEvent::Message(r#"{"message":{"text":"bin"}}"#.to_string())
    );
    assert_eq!(
        next_event(&mut events).await,
        TransportEvent::Message("ok\u{FFFD}".to_string())
    );
    transport.close();
}

#[tokio::test]
async fn test_server_close_reports_code_and_reason() {
    let url = spawn_server(|mut ws| async move {
        ws.close(Some(CloseFrame {
            code: CloseCode::Normal,
            reason: "bye".into(),
        }))
        .await
        .unwrap();
        while let Some(Ok(_)) = ws.next().await {}
    })
    .await;

    let mut transport = WsTransport::new(&url);
    let mut events = record_events(&mut transport);
    transport.connect();

    assert_eq!(next_event(&mut events).await, TransportEvent::Open);
    assert_eq!(
        next_event(&mut events).await,
        TransportEvent::Close {
            code: Some(1000),
            reason: "bye".to_string()
        }
    );
    assert_eq!(transport.ready_state(), ReadyState::Closed);
    assert!(transport.send("late".to_string()).is_err());
}

#[tokio::test]
async fn test_refused_connection_reports_error_then_abnormal_close() {
    // Reserve a port, then free it so nothing is listening there
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut transport = WsTransport::new(format!("ws://{}", addr));
    let mut events = record_events(&mut transport);
    transport.connect();

    assert!(matches!(
        next_event(&mut events).await,
        TransportEvent::Error(_)
    ));
    assert!(matches!(
        next_event(&mut events).await,
        TransportEvent::Close { code: Some(ABNORMAL_CLOSURE), .. }
    ));
    assert_eq!(transport.ready_state(), ReadyState::Closed);
}

// ============================================================================
// ConnectionManager + reducer end to end
// ============================================================================

#[tokio::test]
async fn test_chat_roundtrip_through_connection_manager() {
    let (closed_tx, closed_rx) = oneshot::channel();
    let url = spawn_server(|mut ws| async move {
        // Relay each sendMessage envelope back as a chat message
        while let Some(Ok(frame)) = ws.next().await {
            match frame {
                Message::Text(text) => {
                    let envelope: serde_json::Value =
                        serde_json::from_str(text.as_str()).unwrap();
                    assert_eq!(envelope["action"], "sendMessage");
                    let reply = serde_json::json!({
                        "message": {
                            "text": envelope["message"],
                            "timestamp": "2024-01-01T00:00:00Z",
                        }
                    });
                    ws.send(Message::text(reply.to_string())).await.unwrap();
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        let _ = closed_tx.send(());
    })
    .await;

    let mut app = App::new(url.clone());
    let (tx, rx) = std_mpsc::channel();
    let mut connection = ConnectionManager::mount(WsTransport::new(&url), tx);
    assert_eq!(connection.transport().listener_count(), 4);

    let action = next_action(&rx).await;
    assert_eq!(action, Action::Connected);
    update(&mut app, action);
    assert!(app.connected);

    update(&mut app, Action::UpdateDraft("hello".to_string()));
    let Effect::Transmit(payload) = update(&mut app, Action::Submit) else {
        panic!("expected a frame to transmit");
    };
    assert!(app.draft.is_empty());
    connection.send(payload);

    let action = next_action(&rx).await;
    assert!(matches!(action, Action::Received { .. }));
    update(&mut app, action);
    assert_eq!(app.messages.len(), 1);
    let message = app.messages.get(0).unwrap();
    assert_eq!(message.display_text(), "hello");
    assert_eq!(message.timestamp.as_deref(), Some("2024-01-01T00:00:00Z"));

    drop(connection);
    tokio::time::timeout(WAIT, closed_rx)
        .await
        .expect("server never saw the close")
        .unwrap();

    // Listeners were detached before the close, so nothing else arrives
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_two_managers_are_independent() {
    let serve = |tag: &'static str| {
        move |mut ws: WebSocketStream<TcpStream>| async move {
            ws.send(Message::text(tag)).await.unwrap();
            while let Some(Ok(_)) = ws.next().await {}
        }
    };
    let url_a = spawn_server(serve("from-a")).await;
    let url_b = spawn_server(serve("from-b")).await;

    let (tx_a, rx_a) = std_mpsc::channel();
    let (tx_b, rx_b) = std_mpsc::channel();
    let manager_a = ConnectionManager::mount(WsTransport::new(&url_a), tx_a);
    let manager_b = ConnectionManager::mount(WsTransport::new(&url_b), tx_b);

    assert_eq!(next_action(&rx_a).await, Action::Connected);
    assert_eq!(next_action(&rx_b).await, Action::Connected);
    assert!(matches!(
        next_action(&rx_a).await,
        Action::Received { ref payload, .. } if payload == "from-a"
    ));
    assert!(matches!(
        next_action(&rx_b).await,
        Action::Received { ref payload, .. } if payload == "from-b"
    ));

    drop(manager_a);
    assert_eq!(manager_b.transport().ready_state(), ReadyState::Open);
}
