//! WebSocket transport adapter.
//!
//! Outbound intents are fire-and-forget: they are queued synchronously and a
//! writer task drains the queue, so no handler ever suspends on a send.
//! Inbound frames are decoded and delivered in wire order over a single
//! channel, which is what preserves per-room snapshot ordering for the
//! reconciler.

use anyhow::{anyhow, Context, Result};
use futures::{SinkExt, StreamExt};
use shared::protocol::{ClientIntent, ServerMessage};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport is disconnected")]
    Disconnected,
}

/// Outbound seam between the interaction layer and the wire. No
/// acknowledgement is awaited; a failed hand-off is reported, never retried.
pub trait IntentSink {
    fn send(&self, intent: ClientIntent) -> Result<(), TransportError>;
}

/// Inbound transport events, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Message(ServerMessage),
    /// A frame that could not be decoded, or a socket-level failure.
    Failed(String),
    Closed,
}

/// Queue-backed sink feeding the writer task.
#[derive(Clone)]
pub struct WsIntentSink {
    outbound: mpsc::UnboundedSender<ClientIntent>,
}

impl IntentSink for WsIntentSink {
    fn send(&self, intent: ClientIntent) -> Result<(), TransportError> {
        self.outbound
            .send(intent)
            .map_err(|_| TransportError::Disconnected)
    }
}

pub struct WsTransport {
    pub sink: WsIntentSink,
    pub events: mpsc::UnboundedReceiver<TransportEvent>,
}

impl WsTransport {
    /// Connects to the authority and spawns the reader and writer tasks.
    pub async fn connect(server_url: &str) -> Result<Self> {
        let ws_url = ws_url(server_url)?;
        let (stream, _) = connect_async(&ws_url)
            .await
            .with_context(|| format!("failed to connect websocket: {ws_url}"))?;
        info!(url = %ws_url, "websocket connected");
        let (mut writer, mut reader) = stream.split();

        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ClientIntent>();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(intent) = outbound_rx.recv().await {
                let frame = match serde_json::to_string(&intent) {
                    Ok(frame) => frame,
                    Err(err) => {
                        error!("failed to encode intent: {err}");
                        continue;
                    }
                };
                if let Err(err) = writer.send(Message::Text(frame)).await {
                    error!("websocket send failed: {err}");
                    break;
                }
            }
        });

        tokio::spawn(async move {
            while let Some(frame) = reader.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<ServerMessage>(&text) {
                            Ok(message) => {
                                if event_tx.send(TransportEvent::Message(message)).is_err() {
                                    break;
                                }
                            }
                            Err(err) => {
                                let _ = event_tx.send(TransportEvent::Failed(format!(
                                    "invalid server message: {err}"
                                )));
                            }
                        }
                    }
                    Ok(Message::Close(_)) => {
                        let _ = event_tx.send(TransportEvent::Closed);
                        break;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        let _ = event_tx.send(TransportEvent::Failed(format!(
                            "websocket receive failed: {err}"
                        )));
                        break;
                    }
                }
            }
        });

        Ok(Self {
            sink: WsIntentSink {
                outbound: outbound_tx,
            },
            events: event_rx,
        })
    }
}

/// `http(s)://` endpoints are rewritten to their websocket scheme;
/// `ws(s)://` endpoints pass through untouched.
fn ws_url(server_url: &str) -> Result<String> {
    let mut url = url::Url::parse(server_url)
        .with_context(|| format!("invalid server url: {server_url}"))?;
    match url.scheme() {
        "ws" | "wss" => {}
        "http" => url
            .set_scheme("ws")
            .map_err(|_| anyhow!("unable to derive websocket scheme for {server_url}"))?,
        "https" => url
            .set_scheme("wss")
            .map_err(|_| anyhow!("unable to derive websocket scheme for {server_url}"))?,
        other => return Err(anyhow!("unsupported server url scheme: {other}")),
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_schemes_are_rewritten_to_websocket_schemes() {
        assert_eq!(
            ws_url("http://127.0.0.1:5000").expect("rewrite"),
            "ws://127.0.0.1:5000/"
        );
        assert_eq!(
            ws_url("https://example.com/uno").expect("rewrite"),
            "wss://example.com/uno"
        );
        assert_eq!(
            ws_url("ws://127.0.0.1:5000/").expect("pass through"),
            "ws://127.0.0.1:5000/"
        );
    }

    #[test]
    fn non_http_schemes_are_rejected() {
        assert!(ws_url("ftp://example.com").is_err());
        assert!(ws_url("not a url").is_err());
    }
}
