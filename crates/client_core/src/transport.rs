//! WebSocket link to the interrogation server.
//!
//! The controller never touches the socket: it pushes [`ClientFrame`]s into
//! an unbounded channel drained by a writer task, and a reader task forwards
//! every inbound text frame as a [`TransportEvent`].

use futures::{SinkExt, StreamExt};
use shared::protocol::{ClientFrame, GAME_WS_PATH};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::TransportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Frame(String),
    Closed,
    Failed(String),
}

pub struct Connection {
    pub url: Url,
    frames: mpsc::UnboundedSender<ClientFrame>,
    events: mpsc::UnboundedReceiver<TransportEvent>,
}

impl Connection {
    /// A sink for the controller. Sends fail with [`TransportError::Closed`]
    /// once the socket is gone.
    pub fn sender(&self) -> mpsc::UnboundedSender<ClientFrame> {
        self.frames.clone()
    }

    /// Next inbound event; `None` after the reader task has finished and
    /// every event has been consumed.
    pub async fn next_event(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }
}

/// Maps an `http(s)://` or `ws(s)://` base url onto the game endpoint.
pub fn game_ws_url(server_url: &str) -> Result<Url, TransportError> {
    let invalid = |reason: &str| TransportError::InvalidUrl {
        url: server_url.to_string(),
        reason: reason.to_string(),
    };

    let mut url = Url::parse(server_url.trim()).map_err(|err| invalid(&err.to_string()))?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        _ => return Err(invalid("scheme must be http, https, ws or wss")),
    };
    url.set_scheme(scheme)
        .map_err(|_| invalid("cannot switch to a websocket scheme"))?;

    if !url.path().ends_with(GAME_WS_PATH) {
        let path = format!("{}{GAME_WS_PATH}", url.path().trim_end_matches('/'));
        url.set_path(&path);
    }
    Ok(url)
}

pub async fn connect(server_url: &str) -> Result<Connection, TransportError> {
    let url = game_ws_url(server_url)?;
    let (ws_stream, _) = connect_async(url.as_str())
        .await
        .map_err(|source| TransportError::Connect {
            url: url.to_string(),
            source,
        })?;
    info!(url = %url, "connected to game server");
    let (mut ws_writer, mut ws_reader) = ws_stream.split();

    let (frame_tx, frame_rx) = mpsc::unbounded_channel::<ClientFrame>();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let writer_events = event_tx.clone();
    let writer = tokio::spawn(async move {
        let mut outbound = UnboundedReceiverStream::new(frame_rx);
        while let Some(frame) = outbound.next().await {
            let text = frame.into_text();
            debug!(frame_len = text.len(), "sending frame");
            if let Err(err) = ws_writer.send(Message::Text(text)).await {
                warn!(%err, "websocket send failed");
                let _ = writer_events.send(TransportEvent::Failed(err.to_string()));
                break;
            }
        }
        let _ = ws_writer.close().await;
    });

    tokio::spawn(async move {
        while let Some(msg) = ws_reader.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if event_tx.send(TransportEvent::Frame(text)).is_err() {
                        break;
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(err) => {
                    warn!(%err, "websocket receive failed");
                    let _ = event_tx.send(TransportEvent::Failed(err.to_string()));
                    break;
                }
            }
        }
        // dropping the writer's receiver makes later sends report Closed
        writer.abort();
        info!("game server connection closed");
        let _ = event_tx.send(TransportEvent::Closed);
    });

    Ok(Connection {
        url,
        frames: frame_tx,
        events: event_rx,
    })
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
