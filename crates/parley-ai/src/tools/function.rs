//! Callable tools and the per-agent registry.

use std::fmt;
use std::sync::Arc;

use crate::{AiError, ToolDefinition};

/// Synchronous tool body: parsed JSON arguments in, text out.
pub type ToolHandler = Arc<dyn Fn(&serde_json::Value) -> Result<String, String> + Send + Sync>;

/// A tool definition paired with its implementation.
#[derive(Clone)]
pub struct FunctionTool {
    definition: ToolDefinition,
    handler: ToolHandler,
}

impl fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.definition.name)
            .finish_non_exhaustive()
    }
}

impl FunctionTool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
        handler: impl Fn(&serde_json::Value) -> Result<String, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            definition: ToolDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    pub fn call(&self, arguments: &serde_json::Value) -> Result<String, String> {
        (self.handler)(arguments)
    }
}

/// Tools keyed by name, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    tools: Vec<FunctionTool>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: FunctionTool) {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FunctionTool> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionTool> {
        self.tools.iter()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition().clone()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(FunctionTool::name).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name.
    pub fn call(&self, name: &str, arguments: &serde_json::Value) -> Result<String, AiError> {
        let tool = self.get(name).ok_or_else(|| AiError::Tool {
            name: name.to_string(),
            message: "no such tool registered".into(),
        })?;
        tool.call(arguments).map_err(|message| AiError::Tool {
            name: name.to_string(),
            message,
        })
    }
}

impl FromIterator<FunctionTool> for ToolSet {
    fn from_iter<I: IntoIterator<Item = FunctionTool>>(iter: I) -> Self {
        let mut set = ToolSet::new();
        for tool in iter {
            set.register(tool);
        }
        set
    }
}
