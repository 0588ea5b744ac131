//! Chat wire protocol: JSON text frames tagged by `type`.

use serde::{Deserialize, Serialize};

use parley_common::SessionId;
use parley_config::StarterConfig;

use crate::transport::MessageId;

/// Frames a chat client sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientFrame {
    #[serde(rename = "user_message")]
    UserMessage { content: String },
}

/// Frames the server sends to a chat client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerFrame {
    #[serde(rename = "session_ready")]
    SessionReady { session_id: SessionId },

    #[serde(rename = "starters")]
    Starters { starters: Vec<StarterConfig> },

    /// A new message; later frames refer to it by `id`.
    #[serde(rename = "message")]
    Message { id: MessageId, content: String },

    /// Replaces the whole content of message `id`.
    #[serde(rename = "message_update")]
    MessageUpdate { id: MessageId, content: String },

    /// Appends `token` to message `id`.
    #[serde(rename = "token")]
    Token { id: MessageId, token: String },

    /// Protocol problem with the client's last frame.
    #[serde(rename = "error")]
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_message_parses() {
        let frame: ClientFrame =
            serde_json::from_str(r#"{"type":"user_message","content":"Hello, how are you."}"#)
                .unwrap();
        assert_eq!(
            frame,
            ClientFrame::UserMessage {
                content: "Hello, how are you.".into()
            }
        );
    }

    #[test]
    fn unknown_client_type_is_rejected() {
        assert!(serde_json::from_str::<ClientFrame>(r#"{"type":"shout","content":"x"}"#).is_err());
        assert!(serde_json::from_str::<ClientFrame>(r#"{"content":"x"}"#).is_err());
    }

    #[test]
    fn server_frames_use_snake_case_tags() {
        let id: MessageId = serde_json::from_value(json!("m1")).unwrap();
        let frame = ServerFrame::MessageUpdate {
            id: id.clone(),
            content: "done".into(),
        };
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({"type": "message_update", "id": "m1", "content": "done"})
        );

        let frame = ServerFrame::Token {
            id,
            token: "Hel".into(),
        };
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({"type": "token", "id": "m1", "token": "Hel"})
        );
    }

    #[test]
    fn starters_frame_lists_label_and_message() {
        let frame = ServerFrame::Starters {
            starters: vec![StarterConfig {
                label: "Weather".into(),
                message: "Find the weather in Hyderabad.".into(),
            }],
        };
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({
                "type": "starters",
                "starters": [{"label": "Weather", "message": "Find the weather in Hyderabad."}]
            })
        );
    }
}
