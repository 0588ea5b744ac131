//! Agent engine for Parley.
//!
//! Provides an Azure OpenAI chat-completions client and a small agent
//! runner on top of it:
//! - Blocking, async and streaming (SSE) runs
//! - Tool calling (function use) with an automatic tool-call loop
//! - Token usage tracking

pub mod agent;
pub mod azure;
pub mod runner;
pub mod streaming;
pub mod token_tracker;
pub mod tools;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

use async_trait::async_trait;

pub use agent::Agent;
pub use azure::{AzureConfig, AzureOpenAiClient};
pub use runner::{RunConfig, RunEvent, RunResult, Runner, StreamedRun};
pub use token_tracker::TokenTracker;
pub use tools::{builtin_tools, FunctionTool, ToolSet};

/// Receives stream events as they are decoded.
pub type ChunkCallback = Box<dyn Fn(StreamEvent) + Send + Sync>;

#[async_trait]
pub trait AiClient: Send + Sync {
    async fn send_message(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<AiResponse, AiError>;

    /// Like [`send_message`](Self::send_message), reporting each decoded
    /// stream chunk to `on_chunk` before returning the assembled response.
    async fn send_message_streaming(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
        on_chunk: ChunkCallback,
    ) -> Result<AiResponse, AiError>;
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Calls requested by an assistant message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// The call a tool message answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn assistant_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::assistant(content)
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::new(Role::Tool, content)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Developer,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Developer => "developer",
            Role::Tool => "tool",
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct AiResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// One decoded chunk of a streaming response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A fragment of generated text.
    Delta(String),
    /// A chunk that carries no text (role preamble, content-filter results,
    /// tool-call fragments, finish markers, unparseable data).
    Other(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }

    pub fn add(&mut self, other: &TokenUsage) {
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
    #[error("Tool '{name}' failed: {message}")]
    Tool { name: String, message: String },
    #[error("Max turns ({0}) exceeded")]
    MaxTurnsExceeded(u32),
    #[error("Runtime error: {0}")]
    Runtime(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_message_serializes_without_tool_fields() {
        let json = serde_json::to_value(Message::user("Hello, how are you.")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "user", "content": "Hello, how are you."})
        );
    }

    #[test]
    fn tool_result_carries_call_id() {
        let msg = Message::tool_result("call_1", "22 degrees");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn role_strings_match_wire_names() {
        for role in [
            Role::User,
            Role::Assistant,
            Role::System,
            Role::Developer,
            Role::Tool,
        ] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn usage_add_saturates() {
        let mut usage = TokenUsage {
            input_tokens: u64::MAX - 1,
            output_tokens: 3,
        };
        usage.add(&TokenUsage {
            input_tokens: 5,
            output_tokens: 4,
        });
        assert_eq!(usage.input_tokens, u64::MAX);
        assert_eq!(usage.output_tokens, 7);
        assert_eq!(usage.total_tokens(), u64::MAX);
    }

    #[test]
    fn error_display() {
        let err = AiError::Tool {
            name: "get_weather".into(),
            message: "missing location".into(),
        };
        assert_eq!(err.to_string(), "Tool 'get_weather' failed: missing location");
        assert_eq!(AiError::MaxTurnsExceeded(3).to_string(), "Max turns (3) exceeded");
        assert_eq!(AiError::Timeout.to_string(), "Timeout");
    }
}
