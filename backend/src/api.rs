//! HTTP surface: health check and the WebSocket upgrade
//!
//! Socket tasks do no room bookkeeping themselves; they decode frames and
//! forward them to the relay hub, and drain the hub's outbound queue back
//! onto the wire.

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use shared::{ClientMessage, ServerMessage};

use crate::relay::RelayEvent;
use crate::rooms::ConnId;

#[derive(Clone)]
pub struct AppState {
    pub events: mpsc::UnboundedSender<RelayEvent>,
}

pub fn router(events: mpsc::UnboundedSender<RelayEvent>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/ws", get(ws_handler))
        .with_state(AppState { events })
}

async fn health() -> &'static str {
    "Chess backend is running"
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.events))
}

async fn handle_socket(socket: WebSocket, events: mpsc::UnboundedSender<RelayEvent>) {
    let conn: ConnId = Uuid::new_v4();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerMessage>();
    // Kept for direct replies (decode errors) that bypass the hub.
    let direct = outbound_tx.clone();

    if events.send(RelayEvent::Connected(conn, outbound_tx)).is_err() {
        warn!("[WS] Hub is gone; dropping connection {conn}");
        return;
    }

    let (mut sink, mut stream) = socket.split();

    // Writer: drain hub frames onto the wire.
    let writer = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sink.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(err) => warn!("[WS] Failed to encode frame: {err}"),
            }
        }
    });

    // Reader: decode frames and feed the hub.
    while let Some(Ok(msg)) = stream.next().await {
        let text = match msg {
            Message::Text(t) => t.to_string(),
            Message::Close(_) => break,
            _ => continue,
        };

        match serde_json::from_str::<ClientMessage>(&text) {
            Ok(parsed) => {
                if events.send(RelayEvent::Inbound(conn, parsed)).is_err() {
                    break;
                }
            }
            Err(err) => {
                debug!("[WS] Invalid frame from {conn}: {err}");
                let _ = direct.send(ServerMessage::Error {
                    message: format!("Invalid message: {err}"),
                });
            }
        }
    }

    let _ = events.send(RelayEvent::Disconnected(conn));
    writer.abort();
}
