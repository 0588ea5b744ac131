//! Subcommand implementations.

mod ask;
mod chat;
mod config;
mod serve;

use std::path::Path;
use std::sync::Arc;

use parley_ai::{AiClient, AzureConfig, AzureOpenAiClient};
use parley_common::ParleyError;
use parley_config::{AzureCredentials, ChatConfig, HistoryMode, HistoryRole, ParleyConfig};

use crate::cli::{ChatArgs, Command, ConfigCommand};

/// Dispatch a parsed command. `config_path` is the `--config` override.
pub fn run(
    command: Command,
    config: ParleyConfig,
    config_path: Option<&Path>,
) -> Result<(), ParleyError> {
    match command {
        Command::Ask {
            prompt,
            mode,
            tools,
        } => ask::ask(&config, &prompt, mode.unwrap_or(config.chat.mode), tools),
        Command::Chat(args) => chat::chat(apply_chat_args(config, &args)),
        Command::Serve { chat, port, bind } => {
            let mut config = apply_chat_args(config, &chat);
            if let Some(port) = port {
                config.chat.port = port;
            }
            if let Some(bind) = bind {
                config.chat.bind = bind;
            }
            serve::serve(config)
        }
        Command::Config(ConfigCommand::Init { force }) => config::init(config_path, force),
        Command::Config(ConfigCommand::Show) => config::show(&config),
    }
}

/// Layer command-line overrides over the `[chat]` section.
fn apply_chat_args(mut config: ParleyConfig, args: &ChatArgs) -> ParleyConfig {
    let chat: &mut ChatConfig = &mut config.chat;
    if let Some(mode) = args.mode {
        chat.mode = mode;
    }
    if args.tools {
        chat.tools = true;
    }
    if args.developer_role {
        chat.history_role = HistoryRole::Developer;
    }
    if args.full_history {
        chat.history = HistoryMode::Items;
    }
    config
}

/// Build the model client. Fails before anything else runs when a required
/// credential is missing.
fn build_client(config: &ParleyConfig) -> Result<Arc<dyn AiClient>, ParleyError> {
    let creds = AzureCredentials::from_env()?;
    tracing::debug!(
        endpoint = %creds.endpoint,
        deployment = %creds.deployment,
        api_version = %creds.api_version,
        "Azure OpenAI credentials loaded"
    );
    let azure = AzureConfig::new(
        creds.api_key,
        creds.api_version,
        creds.endpoint,
        creds.deployment,
    )
    .with_max_tokens(config.agent.max_tokens)
    .with_temperature(config.agent.temperature);
    let client = AzureOpenAiClient::new(azure).map_err(|e| ParleyError::Ai(e.to_string()))?;
    Ok(Arc::new(client))
}

fn runtime() -> Result<tokio::runtime::Runtime, ParleyError> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}
