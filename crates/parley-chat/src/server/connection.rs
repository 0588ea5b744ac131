//! Per-connection handler: start the session, then relay user messages.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use parley_common::SessionId;

use crate::handler::ChatHandler;

use super::protocol::{ClientFrame, ServerFrame};
use super::ws_transport::WsTransport;

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Handle a single WebSocket connection until the client leaves.
pub(crate) async fn handle_connection<H: ChatHandler>(
    ws: WebSocketStream<TcpStream>,
    addr: SocketAddr,
    handler: Arc<H>,
) {
    let (sink, mut stream) = ws.split();

    // Frames are written by a separate task so tokens reach the client
    // while the handler is still running.
    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_frames(sink, rx, addr));
    let transport = WsTransport::new(tx);

    let session_id = SessionId::new();
    if transport
        .send_frame(ServerFrame::SessionReady {
            session_id: session_id.clone(),
        })
        .is_err()
    {
        return;
    }

    let mut session = match handler.on_chat_start(session_id.clone(), &transport).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(peer = %addr, error = %e, "Chat start failed");
            return;
        }
    };

    tracing::info!(peer = %addr, session = %session_id, "Client connected");

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientFrame>(&text) {
                Ok(ClientFrame::UserMessage { content }) => {
                    if let Err(e) = handler.on_message(&mut session, &transport, &content).await {
                        tracing::debug!(session = %session_id, error = %e, "Transport closed mid-reply");
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(peer = %addr, error = %e, "Invalid client frame");
                    let message = format!("invalid frame: {e}");
                    if transport.send_frame(ServerFrame::Error { message }).is_err() {
                        break;
                    }
                }
            },
            Ok(Message::Binary(_)) => {
                let message = "binary frames are not supported".to_string();
                if transport.send_frame(ServerFrame::Error { message }).is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(peer = %addr, error = %e, "WS error");
                break;
            }
        }
    }

    tracing::info!(peer = %addr, session = %session_id, "Client disconnected");

    // Dropping the last sender lets the writer flush and close.
    drop(transport);
    drop(session);
    let _ = writer.await;
}

async fn write_frames(
    mut sink: WsSink,
    mut frames: mpsc::UnboundedReceiver<ServerFrame>,
    addr: SocketAddr,
) {
    while let Some(frame) = frames.recv().await {
        let json = match serde_json::to_string(&frame) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(peer = %addr, error = %e, "Failed to encode frame");
                continue;
            }
        };
        if sink.send(Message::Text(json.into())).await.is_err() {
            tracing::debug!(peer = %addr, "Write failed, stopping writer");
            return;
        }
    }
    let _ = sink.close().await;
}
