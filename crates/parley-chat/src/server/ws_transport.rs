//! [`ChatTransport`] over a WebSocket connection.

use async_trait::async_trait;
use tokio::sync::mpsc;

use parley_config::StarterConfig;

use crate::transport::{ChatTransport, MessageId, TransportError};

use super::protocol::ServerFrame;

/// Queues frames for the connection's writer task.
pub(crate) struct WsTransport {
    frames: mpsc::UnboundedSender<ServerFrame>,
}

impl WsTransport {
    pub(crate) fn new(frames: mpsc::UnboundedSender<ServerFrame>) -> Self {
        Self { frames }
    }

    pub(crate) fn send_frame(&self, frame: ServerFrame) -> Result<(), TransportError> {
        self.frames.send(frame).map_err(|_| TransportError::Closed)
    }
}

#[async_trait]
impl ChatTransport for WsTransport {
    async fn send_message(&self, content: &str) -> Result<MessageId, TransportError> {
        let id = MessageId::new();
        self.send_frame(ServerFrame::Message {
            id: id.clone(),
            content: content.to_string(),
        })?;
        Ok(id)
    }

    async fn update_message(&self, id: &MessageId, content: &str) -> Result<(), TransportError> {
        self.send_frame(ServerFrame::MessageUpdate {
            id: id.clone(),
            content: content.to_string(),
        })
    }

    async fn stream_token(&self, id: &MessageId, token: &str) -> Result<(), TransportError> {
        self.send_frame(ServerFrame::Token {
            id: id.clone(),
            token: token.to_string(),
        })
    }

    async fn send_starters(&self, starters: &[StarterConfig]) -> Result<(), TransportError> {
        self.send_frame(ServerFrame::Starters {
            starters: starters.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frames_reference_the_returned_id() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let transport = WsTransport::new(tx);

        let id = transport.send_message("").await.unwrap();
        transport.stream_token(&id, "Hi").await.unwrap();
        transport.update_message(&id, "Hi").await.unwrap();

        assert_eq!(
            rx.recv().await,
            Some(ServerFrame::Message {
                id: id.clone(),
                content: String::new()
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(ServerFrame::Token {
                id: id.clone(),
                token: "Hi".into()
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(ServerFrame::MessageUpdate {
                id,
                content: "Hi".into()
            })
        );
    }

    #[tokio::test]
    async fn closed_connection_is_reported() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let transport = WsTransport::new(tx);
        assert!(matches!(
            transport.send_message("x").await,
            Err(TransportError::Closed)
        ));
    }
}
