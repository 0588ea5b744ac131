//! Parley configuration system.
//!
//! Two sources feed a running process:
//! - a TOML settings file (agent, chat, logging) where every field has a
//!   default, so a missing or partial file works out of the box;
//! - Azure OpenAI credentials from the environment, which have no defaults
//!   and are checked all at once before anything talks to the network.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use parley_config::{load_config, AzureCredentials};
//!
//! let config = load_config(None).expect("failed to load config");
//! let creds = AzureCredentials::from_env().expect("missing credentials");
//! println!("{} via {}", config.agent.name, creds.deployment);
//! ```

pub mod credentials;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use credentials::{AzureCredentials, REQUIRED_ENV_VARS};
pub use schema::{
    AgentConfig, ChatConfig, HistoryMode, HistoryRole, LoggingConfig, ParleyConfig, RunMode,
    StarterConfig,
};

use std::path::Path;

use parley_common::ConfigError;

/// Load and validate config.
///
/// With `path`, that file must exist. Without it, the platform default path
/// is used and a missing file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<ParleyConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ParleyConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
