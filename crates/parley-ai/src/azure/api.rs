//! AiClient trait implementation for AzureOpenAiClient (send_message + streaming).

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::streaming::{parse_sse_stream, SseEvent};
use crate::{AiClient, AiError, AiResponse, ChunkCallback, Message, ToolDefinition};

use super::client::{parse_response, AzureOpenAiClient};
use super::stream::StreamAccumulator;

impl AzureOpenAiClient {
    /// POST a body and map HTTP failures onto `AiError`.
    async fn post(&self, body: &serde_json::Value) -> Result<reqwest::Response, AiError> {
        let response = self
            .http
            .post(self.config.chat_completions_url())
            .header("api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        Ok(response)
    }
}

#[async_trait]
impl AiClient for AzureOpenAiClient {
    async fn send_message(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(model, messages, tools, false);

        debug!(
            deployment = %self.config.deployment,
            model,
            messages = messages.len(),
            "Azure OpenAI request"
        );

        let json: serde_json::Value = self
            .post(&body)
            .await?
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        parse_response(json)
    }

    async fn send_message_streaming(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
        on_chunk: ChunkCallback,
    ) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(model, messages, tools, true);

        debug!(
            deployment = %self.config.deployment,
            model,
            messages = messages.len(),
            "Azure OpenAI streaming request"
        );

        let response = self.post(&body).await?;
        let mut acc = StreamAccumulator::new();

        parse_sse_stream(response, |event: SseEvent| {
            if acc.is_done() {
                return;
            }
            if let Some(chunk) = acc.push_data(&event.data) {
                on_chunk(chunk);
            }
        })
        .await?;

        if !acc.is_done() {
            warn!("Stream ended without [DONE] terminator");
        }

        let response = acc.finish()?;
        if response.usage.total_tokens() == 0 {
            debug!("No usage data received in streaming response");
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use super::*;
    use crate::azure::AzureConfig;
    use crate::StreamEvent;

    const DEPLOYMENT_PATH: &str =
        "/openai/deployments/my-deploy/chat/completions?api-version=2024-08-01-preview";

    fn http_response(status: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Reads one request (headers plus `content-length` body) off the socket.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Answers a single connection with `response` and hands back the raw request.
    async fn serve_once(response: String) -> (AzureOpenAiClient, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        let config = AzureConfig::new(
            "test-key",
            "2024-08-01-preview",
            format!("http://{addr}/"),
            "my-deploy",
        );
        // Skip any proxy configured in the environment.
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        (AzureOpenAiClient { config, http }, server)
    }

    fn hello() -> Vec<Message> {
        vec![Message::user("hello")]
    }

    #[tokio::test]
    async fn request_targets_deployment_with_api_key() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "Hi there"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 5, "completion_tokens": 2}
        })
        .to_string();
        let (client, server) = serve_once(http_response("200 OK", "application/json", &body)).await;

        let response = client.send_message("gpt-4o", &hello(), &[]).await.unwrap();
        assert_eq!(response.content, "Hi there");
        assert_eq!(response.usage.total_tokens(), 7);

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert_eq!(request_line, format!("POST {DEPLOYMENT_PATH} HTTP/1.1"));
        let lowered = request.to_ascii_lowercase();
        assert!(lowered.contains("\r\napi-key: test-key\r\n"), "{request}");
        assert!(!lowered.contains("authorization:"));
        assert!(request.contains("\"model\":\"gpt-4o\""));
        assert!(!request.contains("\"stream\""));
    }

    #[tokio::test]
    async fn too_many_requests_is_rate_limited() {
        let (client, server) = serve_once(http_response(
            "429 Too Many Requests",
            "application/json",
            r#"{"error":{"code":"429"}}"#,
        ))
        .await;

        let err = client.send_message("gpt-4o", &hello(), &[]).await.unwrap_err();
        assert!(matches!(err, AiError::RateLimited), "{err:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn server_error_body_is_cut_to_200_chars() {
        let body = format!("{}{}", "x".repeat(200), "y".repeat(100));
        let (client, server) = serve_once(http_response(
            "500 Internal Server Error",
            "text/plain",
            &body,
        ))
        .await;

        let err = client.send_message("gpt-4o", &hello(), &[]).await.unwrap_err();
        let message = match err {
            AiError::ApiError(message) => message,
            other => panic!("expected ApiError, got {other:?}"),
        };
        assert_eq!(
            message,
            format!("HTTP 500 Internal Server Error: {}", "x".repeat(200))
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn event_stream_stops_at_done() {
        let chunk = |text: &str| {
            json!({"choices": [{"index": 0, "delta": {"content": text}, "finish_reason": null}]})
                .to_string()
        };
        let usage = json!({"choices": [], "usage": {"prompt_tokens": 4, "completion_tokens": 2}});
        let body = format!(
            "data: {}\n\ndata: {}\n\ndata: {usage}\n\ndata: [DONE]\n\ndata: {}\n\n",
            chunk("Hel"),
            chunk("lo"),
            chunk("ignored"),
        );
        let (client, server) =
            serve_once(http_response("200 OK", "text/event-stream", &body)).await;

        let deltas = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&deltas);
        let response = client
            .send_message_streaming(
                "gpt-4o",
                &hello(),
                &[],
                Box::new(move |event| {
                    if let StreamEvent::Delta(text) = event {
                        seen.lock().unwrap().push(text);
                    }
                }),
            )
            .await
            .unwrap();

        assert_eq!(response.content, "Hello");
        assert_eq!(response.usage.total_tokens(), 6);
        assert_eq!(*deltas.lock().unwrap(), vec!["Hel", "lo"]);

        let request = server.await.unwrap();
        assert!(request.starts_with(&format!("POST {DEPLOYMENT_PATH} ")));
        assert!(request.contains("\"stream\":true"));
    }
}
