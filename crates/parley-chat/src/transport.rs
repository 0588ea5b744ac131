//! The outbound side of a chat connection.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use parley_common::new_id;
use parley_config::StarterConfig;

/// Identifies a message already shown to the user so it can be updated
/// or streamed into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new() -> Self {
        Self(new_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection closed")]
    Closed,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Delivers assistant output to one connected user.
///
/// Every call applies to the current session only; implementations hold
/// the connection they write to.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Show a new message and return its id.
    async fn send_message(&self, content: &str) -> Result<MessageId, TransportError>;

    /// Replace the full content of a shown message.
    async fn update_message(&self, id: &MessageId, content: &str) -> Result<(), TransportError>;

    /// Append a fragment to a shown message.
    async fn stream_token(&self, id: &MessageId, token: &str) -> Result<(), TransportError>;

    /// Offer suggested first prompts. Transports without a UI for them
    /// ignore the call.
    async fn send_starters(&self, _starters: &[StarterConfig]) -> Result<(), TransportError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_ids_are_unique_and_serialize_bare() {
        let a = MessageId::new();
        let b = MessageId::new();
        assert_ne!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            format!("\"{}\"", a.as_str())
        );
    }

    #[test]
    fn error_display() {
        assert_eq!(TransportError::Closed.to_string(), "connection closed");
    }
}
