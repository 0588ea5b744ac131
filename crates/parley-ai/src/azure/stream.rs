//! Assembles a streamed chat completion from its SSE `data:` payloads.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{AiError, AiResponse, StreamEvent, TokenUsage};

use super::client::{parse_tool_call, parse_usage};

/// A tool call whose fields arrive in fragments across chunks.
#[derive(Debug, Default)]
struct PartialToolCall {
    id: String,
    name: String,
    arguments: String,
}

#[derive(Debug, Default)]
pub(crate) struct StreamAccumulator {
    content: String,
    tool_calls: BTreeMap<u64, PartialToolCall>,
    usage: TokenUsage,
    done: bool,
}

impl StreamAccumulator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether the `[DONE]` terminator has been seen.
    pub(crate) fn is_done(&self) -> bool {
        self.done
    }

    /// Consume one SSE data payload. Returns `None` only for the terminator.
    pub(crate) fn push_data(&mut self, data: &str) -> Option<StreamEvent> {
        if data.trim() == "[DONE]" {
            self.done = true;
            return None;
        }

        let chunk: serde_json::Value = match serde_json::from_str(data) {
            Ok(chunk) => chunk,
            Err(e) => {
                debug!(error = %e, "Skipping unparseable stream chunk");
                return Some(StreamEvent::Other("malformed".into()));
            }
        };

        if chunk["usage"].is_object() {
            self.usage = parse_usage(&chunk["usage"]);
        }

        let Some(choice) = chunk["choices"].get(0) else {
            // Azure sends prompt_filter_results first and usage last with no choices.
            let kind = if chunk.get("prompt_filter_results").is_some() {
                "prompt_filter_results"
            } else if chunk["usage"].is_object() {
                "usage"
            } else {
                "empty"
            };
            return Some(StreamEvent::Other(kind.into()));
        };

        let delta = &choice["delta"];

        if let Some(calls) = delta["tool_calls"].as_array() {
            for call in calls {
                let index = call["index"].as_u64().unwrap_or(0);
                let entry = self.tool_calls.entry(index).or_default();
                if let Some(id) = call["id"].as_str() {
                    entry.id = id.to_string();
                }
                if let Some(name) = call["function"]["name"].as_str() {
                    entry.name.push_str(name);
                }
                if let Some(args) = call["function"]["arguments"].as_str() {
                    entry.arguments.push_str(args);
                }
            }
            return Some(StreamEvent::Other("tool_call_delta".into()));
        }

        match delta["content"].as_str() {
            Some(text) if !text.is_empty() => {
                self.content.push_str(text);
                Some(StreamEvent::Delta(text.to_string()))
            }
            _ if !choice["finish_reason"].is_null() => Some(StreamEvent::Other("finish".into())),
            _ => Some(StreamEvent::Other("empty_delta".into())),
        }
    }

    pub(crate) fn finish(self) -> Result<AiResponse, AiError> {
        let tool_calls = self
            .tool_calls
            .into_values()
            .map(|call| parse_tool_call(&call.id, &call.name, &call.arguments))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AiResponse {
            content: self.content,
            tool_calls,
            usage: self.usage,
        })
    }
}
