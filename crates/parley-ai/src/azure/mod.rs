//! Azure OpenAI chat-completions client.
//!
//! Implements the `AiClient` trait against a deployment of the Azure
//! OpenAI service:
//! `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version=…`
//! authenticated with the `api-key` header.

mod api;
mod client;
mod config;
mod stream;

pub use client::AzureOpenAiClient;
pub use config::AzureConfig;
