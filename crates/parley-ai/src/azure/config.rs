//! Azure OpenAI client configuration.

use std::fmt;

/// Azure OpenAI client configuration.
#[derive(Clone)]
pub struct AzureConfig {
    pub api_key: String,
    pub api_version: String,
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,
    pub deployment: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl AzureConfig {
    pub fn new(
        api_key: impl Into<String>,
        api_version: impl Into<String>,
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_version: api_version.into(),
            endpoint: endpoint.into(),
            deployment: deployment.into(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Full chat-completions URL for the configured deployment.
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_trims_trailing_slash() {
        let config = AzureConfig::new(
            "key",
            "2024-08-01-preview",
            "https://res.openai.azure.com/",
            "gpt4o-deploy",
        );
        assert_eq!(
            config.chat_completions_url(),
            "https://res.openai.azure.com/openai/deployments/gpt4o-deploy/chat/completions?api-version=2024-08-01-preview"
        );
    }

    #[test]
    fn debug_redacts_key() {
        let config = AzureConfig::new("super-secret", "v", "https://e", "d");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
