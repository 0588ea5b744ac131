//! Agent descriptor settings.

use serde::{Deserialize, Serialize};

/// The agent every session talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub name: String,
    pub instructions: String,
    /// Model name sent with each request. Azure routes by deployment, so this
    /// is informational unless the deployment serves several models.
    pub model: String,
    /// Upper bound on model calls per run (tool rounds included).
    pub max_turns: u32,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "Assistant".into(),
            instructions: "You are a helpful assistant".into(),
            model: "gpt-4o".into(),
            max_turns: 10,
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}
