//! Chat front-end settings shared by the terminal and WebSocket transports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a user message is relayed to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Block the handling worker until the run finishes.
    #[serde(alias = "sync")]
    Blocking,
    /// Await the run without blocking the worker.
    Async,
    /// Stream text deltas to the client as they arrive.
    #[serde(alias = "stream")]
    Streaming,
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blocking" | "sync" => Ok(Self::Blocking),
            "async" => Ok(Self::Async),
            "streaming" | "stream" => Ok(Self::Streaming),
            other => Err(format!(
                "unknown run mode '{other}' (expected blocking, async or streaming)"
            )),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Blocking => "blocking",
            Self::Async => "async",
            Self::Streaming => "streaming",
        })
    }
}

/// Role label used when an agent reply is appended to history.
///
/// `Developer` reproduces an old client that filed replies under the
/// developer role; only useful for compatibility testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    #[default]
    Assistant,
    Developer,
}

/// What a finished run leaves in the session history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// One reply turn per user turn, labelled with `history_role`.
    #[default]
    Turns,
    /// Everything the run produced, tool calls and tool results included.
    /// `history_role` does not apply.
    Items,
}

/// A suggested first prompt shown to new sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarterConfig {
    pub label: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub mode: RunMode,
    pub greeting: String,
    pub history_role: HistoryRole,
    pub history: HistoryMode,
    /// Register the built-in tools on each session's agent.
    pub tools: bool,
    pub bind: String,
    pub port: u16,
    /// Abort a run that takes longer than this. Unset means wait forever.
    pub run_timeout_secs: Option<u64>,
    pub starters: Vec<StarterConfig>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Streaming,
            greeting: "Hello! How can I assist you today?".into(),
            history_role: HistoryRole::Assistant,
            history: HistoryMode::Turns,
            tools: false,
            bind: "127.0.0.1".into(),
            port: 8000,
            run_timeout_secs: None,
            starters: vec![
                StarterConfig {
                    label: "Greetings".into(),
                    message: "Hello! What can you help me with today?".into(),
                },
                StarterConfig {
                    label: "Weather".into(),
                    message: "Find the weather in Hyderabad.".into(),
                },
            ],
        }
    }
}
