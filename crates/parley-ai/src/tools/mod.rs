//! Function tools an agent can expose to the model.
//!
//! The model decides when to call a tool; the runner executes it and feeds
//! the text result back. Nothing outside the runner invokes tools.

mod function;
mod weather;

pub use function::{FunctionTool, ToolHandler, ToolSet};
pub use weather::{get_weather, get_weather_tool};

use crate::ToolDefinition;

/// The tools shipped with Parley.
pub fn builtin_tools() -> ToolSet {
    let mut tools = ToolSet::new();
    tools.register(get_weather_tool());
    tools
}

/// Convert a tool definition to the chat-completions `tools` format.
pub fn to_openai_tool(tool: &ToolDefinition) -> serde_json::Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tools_include_weather() {
        let tools = builtin_tools();
        assert_eq!(tools.names(), vec!["get_weather"]);
    }

    #[test]
    fn openai_tool_shape() {
        let def = get_weather_tool().definition().clone();
        let wire = to_openai_tool(&def);
        assert_eq!(wire["type"], "function");
        assert_eq!(wire["function"]["name"], "get_weather");
        assert_eq!(wire["function"]["parameters"]["required"][0], "location");
    }
}
