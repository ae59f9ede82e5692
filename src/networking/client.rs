//! WebSocket connection to the relay server
//!
//! Frames are JSON text; outbound messages are `ClientMessage`s, inbound
//! frames decode to `ServerMessage`s. There is no retry logic: a failed
//! connection or a closed socket ends the online session.

use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tracing::{debug, info};
use websocket::{ClientBuilder, MaybeTlsStream, Message, WebSocketStream};

use shared::{ClientMessage, ServerMessage};

/// A live connection to the relay.
pub struct Connection {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Connection {
    pub async fn connect(url: &str) -> Result<Self> {
        info!("[NETWORK] Connecting to {url}");
        let (ws, _response) = ClientBuilder::new()
            .uri(url)
            .context("invalid server url")?
            .connect()
            .await
            .context("failed to connect to relay server")?;
        info!("[NETWORK] Connected");
        Ok(Connection { ws })
    }

    pub async fn send(&mut self, msg: &ClientMessage) -> Result<()> {
        let json = serde_json::to_string(msg).context("failed to encode message")?;
        self.ws
            .send(Message::text(json))
            .await
            .context("failed to send frame")?;
        Ok(())
    }

    /// The next decoded server message; `None` once the peer closed the
    /// connection.
    pub async fn recv(&mut self) -> Result<Option<ServerMessage>> {
        while let Some(frame) = self.ws.next().await {
            let frame = frame.context("transport error")?;
            if frame.is_close() {
                debug!("[NETWORK] Server closed the connection");
                return Ok(None);
            }
            let Some(text) = frame.as_text() else {
                continue;
            };
            let msg = serde_json::from_str(text).context("malformed server frame")?;
            return Ok(Some(msg));
        }
        Ok(None)
    }
}
