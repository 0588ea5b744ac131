//! Agent descriptor: who the model is told to be and what it may call.

use crate::tools::{FunctionTool, ToolSet};
use crate::ToolDefinition;

pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Immutable once built; share it behind an `Arc` across runs.
#[derive(Debug, Clone)]
pub struct Agent {
    name: String,
    instructions: String,
    model: String,
    tools: ToolSet,
}

impl Agent {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            model: DEFAULT_MODEL.to_string(),
            tools: ToolSet::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_tool(mut self, tool: FunctionTool) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn with_tools(mut self, tools: ToolSet) -> Self {
        for tool in tools.iter() {
            self.tools.register(tool.clone());
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    /// Definitions advertised to the model on every call.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.definitions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{builtin_tools, get_weather_tool};

    #[test]
    fn defaults() {
        let agent = Agent::new("Assistant", "You are a helpful assistant");
        assert_eq!(agent.name(), "Assistant");
        assert_eq!(agent.instructions(), "You are a helpful assistant");
        assert_eq!(agent.model(), "gpt-4o");
        assert!(agent.tools().is_empty());
    }

    #[test]
    fn registered_tools_are_discoverable() {
        let agent = Agent::new("Assistant", "help")
            .with_model("gpt-4o-mini")
            .with_tool(get_weather_tool());
        assert_eq!(agent.model(), "gpt-4o-mini");
        assert!(agent.tools().get("get_weather").is_some());
        assert_eq!(agent.tool_definitions()[0].name, "get_weather");
    }

    #[test]
    fn with_tools_merges_by_name() {
        let agent = Agent::new("a", "b")
            .with_tool(get_weather_tool())
            .with_tools(builtin_tools());
        assert_eq!(agent.tools().len(), 1);
    }
}
