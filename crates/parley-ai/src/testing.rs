//! Scripted [`AiClient`] for tests that must not touch the network.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    AiClient, AiError, AiResponse, ChunkCallback, Message, StreamEvent, TokenUsage, ToolCall,
    ToolDefinition,
};

#[derive(Debug, Clone)]
enum Reply {
    /// Text split into the chunks a stream would deliver.
    Text(Vec<String>),
    ToolCalls(Vec<ToolCall>),
    /// Text alongside tool calls, as models do when they narrate a lookup.
    TextWithToolCalls(Vec<String>, Vec<ToolCall>),
    Fail(String),
}

/// One request as the client received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub tools: Vec<String>,
    pub streaming: bool,
}

/// Plays back queued replies in order, one per model call.
///
/// Streaming calls report `Other("role")`, one `Delta` per chunk, then
/// `Other("finish")`, mirroring what Azure sends.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
    delay: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text reply delivered as `chunks` when streamed.
    pub fn reply_text(self, chunks: &[&str]) -> Self {
        lock(&self.replies).push_back(Reply::Text(
            chunks.iter().map(|c| c.to_string()).collect(),
        ));
        self
    }

    /// Queue a reply requesting a single tool call.
    pub fn reply_tool_call(self, name: &str, arguments: serde_json::Value) -> Self {
        let id = format!("call_{}", lock(&self.replies).len());
        lock(&self.replies).push_back(Reply::ToolCalls(vec![ToolCall {
            id,
            name: name.to_string(),
            arguments,
        }]));
        self
    }

    /// Queue a reply carrying both text and a single tool call.
    pub fn reply_text_with_tool_call(
        self,
        chunks: &[&str],
        name: &str,
        arguments: serde_json::Value,
    ) -> Self {
        let id = format!("call_{}", lock(&self.replies).len());
        lock(&self.replies).push_back(Reply::TextWithToolCalls(
            chunks.iter().map(|c| c.to_string()).collect(),
            vec![ToolCall {
                id,
                name: name.to_string(),
                arguments,
            }],
        ));
        self
    }

    /// Queue a failing call.
    pub fn fail(self, message: &str) -> Self {
        lock(&self.replies).push_back(Reply::Fail(message.to_string()));
        self
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn remaining(&self) -> usize {
        lock(&self.replies).len()
    }

    /// Record the request and pop the next reply. Text replies come back
    /// and text-with-tool-call replies come back with their stream chunks.
    async fn next_reply(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
        streaming: bool,
    ) -> Result<(AiResponse, Vec<String>), AiError> {
        lock(&self.requests).push(RecordedRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            tools: tools.iter().map(|t| t.name.clone()).collect(),
            streaming,
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = lock(&self.replies)
            .pop_front()
            .ok_or_else(|| AiError::ApiError("no scripted reply left".into()))?;

        let usage = TokenUsage {
            input_tokens: 10,
            output_tokens: 5,
        };
        match reply {
            Reply::Text(chunks) => Ok((
                AiResponse {
                    content: chunks.concat(),
                    tool_calls: Vec::new(),
                    usage,
                },
                chunks,
            )),
            Reply::ToolCalls(tool_calls) => Ok((
                AiResponse {
                    content: String::new(),
                    tool_calls,
                    usage,
                },
                Vec::new(),
            )),
            Reply::TextWithToolCalls(chunks, tool_calls) => Ok((
                AiResponse {
                    content: chunks.concat(),
                    tool_calls,
                    usage,
                },
                chunks,
            )),
            Reply::Fail(message) => Err(AiError::ApiError(message)),
        }
    }
}

#[async_trait]
impl AiClient for ScriptedClient {
    async fn send_message(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<AiResponse, AiError> {
        let (response, _) = self.next_reply(model, messages, tools, false).await?;
        Ok(response)
    }

    async fn send_message_streaming(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
        on_chunk: ChunkCallback,
    ) -> Result<AiResponse, AiError> {
        let (response, chunks) = self.next_reply(model, messages, tools, true).await?;
        on_chunk(StreamEvent::Other("role".into()));
        for chunk in chunks {
            on_chunk(StreamEvent::Delta(chunk));
        }
        if !response.tool_calls.is_empty() {
            on_chunk(StreamEvent::Other("tool_call_delta".into()));
        }
        on_chunk(StreamEvent::Other("finish".into()));
        Ok(response)
    }
}
