//! Azure OpenAI credentials taken from the process environment.
//!
//! Every required key is checked up front so a misconfigured process stops
//! before any network client is built, naming all missing keys at once.

use std::fmt;

use parley_common::ConfigError;

pub const AZURE_OPENAI_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const AZURE_OPENAI_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
pub const AZURE_OPENAI_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const AZURE_OPENAI_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT";

/// Keys in the order they are reported when missing.
pub const REQUIRED_ENV_VARS: [&str; 4] = [
    AZURE_OPENAI_API_KEY,
    AZURE_OPENAI_API_VERSION,
    AZURE_OPENAI_ENDPOINT,
    AZURE_OPENAI_DEPLOYMENT,
];

#[derive(Clone, PartialEq, Eq)]
pub struct AzureCredentials {
    pub api_key: String,
    pub api_version: String,
    pub endpoint: String,
    pub deployment: String,
}

impl fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("api_key", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .finish()
    }
}

impl AzureCredentials {
    /// Read credentials from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through `lookup`. Empty values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut values = Vec::with_capacity(REQUIRED_ENV_VARS.len());
        let mut missing = Vec::new();

        for key in REQUIRED_ENV_VARS {
            match lookup(key).map(|v| v.trim().to_string()) {
                Some(value) if !value.is_empty() => values.push(value),
                _ => missing.push(key.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(ConfigError::MissingEnv(missing));
        }

        let mut values = values.into_iter();
        let mut next = || values.next().unwrap_or_default();
        Ok(Self {
            api_key: next(),
            api_version: next(),
            endpoint: next(),
            deployment: next(),
        })
    }
}
