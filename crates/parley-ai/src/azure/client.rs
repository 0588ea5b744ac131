//! Azure OpenAI client struct, request building, and response parsing.

use crate::tools::to_openai_tool;
use crate::{AiError, AiResponse, Message, TokenUsage, ToolCall, ToolDefinition};

use super::config::AzureConfig;

/// Azure OpenAI chat-completions client.
pub struct AzureOpenAiClient {
    pub(crate) config: AzureConfig,
    pub(crate) http: reqwest::Client,
}

impl AzureOpenAiClient {
    pub fn new(config: AzureConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &AzureConfig {
        &self.config
    }

    /// Build the JSON request body for the chat-completions API.
    pub(crate) fn build_request_body(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
        stream: bool,
    ) -> serde_json::Value {
        let msgs: Vec<_> = messages.iter().map(to_wire_message).collect();

        let mut body = serde_json::json!({
            "model": model,
            "messages": msgs,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        if !tools.is_empty() {
            let tool_defs: Vec<_> = tools.iter().map(to_openai_tool).collect();
            body["tools"] = serde_json::json!(tool_defs);
        }

        if stream {
            body["stream"] = serde_json::json!(true);
            body["stream_options"] = serde_json::json!({ "include_usage": true });
        }

        body
    }
}

fn to_wire_message(msg: &Message) -> serde_json::Value {
    let mut wire = serde_json::json!({
        "role": msg.role.as_str(),
        "content": msg.content,
    });

    if !msg.tool_calls.is_empty() {
        let calls: Vec<_> = msg
            .tool_calls
            .iter()
            .map(|call| {
                serde_json::json!({
                    "id": call.id,
                    "type": "function",
                    "function": {
                        "name": call.name,
                        "arguments": call.arguments.to_string(),
                    }
                })
            })
            .collect();
        wire["tool_calls"] = serde_json::json!(calls);
        if msg.content.is_empty() {
            wire["content"] = serde_json::Value::Null;
        }
    }

    if let Some(ref id) = msg.tool_call_id {
        wire["tool_call_id"] = serde_json::json!(id);
    }

    wire
}

/// Parse a non-streaming chat-completions response.
pub(crate) fn parse_response(json: serde_json::Value) -> Result<AiResponse, AiError> {
    let message = json["choices"]
        .get(0)
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| AiError::ParseError("response has no choices[0].message".into()))?;

    // `content` is null when the model only requests tool calls.
    let content = message["content"].as_str().unwrap_or_default().to_string();

    let tool_calls = match message["tool_calls"].as_array() {
        Some(calls) => calls
            .iter()
            .map(|call| {
                parse_tool_call(
                    call["id"].as_str().unwrap_or_default(),
                    call["function"]["name"].as_str().unwrap_or_default(),
                    call["function"]["arguments"].as_str().unwrap_or_default(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(AiResponse {
        content,
        tool_calls,
        usage: parse_usage(&json["usage"]),
    })
}

/// Tool-call arguments arrive as a JSON-encoded string.
pub(crate) fn parse_tool_call(id: &str, name: &str, arguments: &str) -> Result<ToolCall, AiError> {
    if name.is_empty() {
        return Err(AiError::ParseError(format!("tool call '{id}' has no function name")));
    }
    let arguments = if arguments.trim().is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_str(arguments).map_err(|e| {
            AiError::ParseError(format!("invalid arguments for tool call '{name}': {e}"))
        })?
    };
    Ok(ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments,
    })
}

pub(crate) fn parse_usage(usage: &serde_json::Value) -> TokenUsage {
    TokenUsage {
        input_tokens: usage["prompt_tokens"].as_u64().unwrap_or(0),
        output_tokens: usage["completion_tokens"].as_u64().unwrap_or(0),
    }
}
