//! Run configuration, results and stream events.

use crate::{Message, StreamEvent, TokenUsage};

pub const DEFAULT_MAX_TURNS: u32 = 10;

/// Per-run settings layered over the agent.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Overrides the agent's model for this run.
    pub model: Option<String>,
    /// Upper bound on model calls, tool rounds included.
    pub max_turns: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl RunConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The history the run started from (without the instructions).
    pub input: Vec<Message>,
    /// Everything the run produced: tool-call requests, tool results, and
    /// the final assistant reply, in order.
    pub new_items: Vec<Message>,
    pub final_output: String,
    pub usage: TokenUsage,
    /// Name of the agent that produced the final output.
    pub last_agent: String,
}

impl RunResult {
    /// Input followed by generated items; feed it back as the next run's history.
    pub fn to_input_list(&self) -> Vec<Message> {
        let mut items = self.input.clone();
        items.extend(self.new_items.iter().cloned());
        items
    }
}

/// One step of a streamed run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// A fragment of the reply text.
    Delta(String),
    /// The runner is about to execute a tool the model asked for.
    ToolCalled {
        name: String,
        arguments: serde_json::Value,
    },
    /// A tool finished; its output goes back to the model.
    ToolOutput { name: String, output: String },
    /// A model stream chunk without text.
    Other(String),
}

impl From<StreamEvent> for RunEvent {
    fn from(event: StreamEvent) -> Self {
        match event {
            StreamEvent::Delta(text) => RunEvent::Delta(text),
            StreamEvent::Other(kind) => RunEvent::Other(kind),
        }
    }
}
