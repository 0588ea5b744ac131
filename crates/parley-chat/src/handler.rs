//! Session lifecycle hooks.

use async_trait::async_trait;

use parley_common::SessionId;

use crate::transport::{ChatTransport, TransportError};

/// Reacts to chat lifecycle events for every connection it is attached to.
///
/// The transport loop owns the per-connection state returned by
/// [`on_chat_start`](Self::on_chat_start) and hands it back, mutably, for
/// each message. Messages of one connection are delivered one at a time.
#[async_trait]
pub trait ChatHandler: Send + Sync + 'static {
    type Session: Send;

    async fn on_chat_start(
        &self,
        session_id: SessionId,
        transport: &dyn ChatTransport,
    ) -> Result<Self::Session, TransportError>;

    /// An error here ends the connection.
    async fn on_message(
        &self,
        session: &mut Self::Session,
        transport: &dyn ChatTransport,
        text: &str,
    ) -> Result<(), TransportError>;
}
