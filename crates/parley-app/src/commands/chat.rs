//! `parley chat`: terminal chat through the conversation relay.

use parley_chat::ConversationRelay;
use parley_common::ParleyError;
use parley_config::ParleyConfig;

use crate::terminal::run_chat;

use super::{build_client, runtime};

pub fn chat(config: ParleyConfig) -> Result<(), ParleyError> {
    let relay = ConversationRelay::new(build_client(&config)?, &config);
    tracing::info!(mode = %relay.mode(), "Starting terminal chat");
    runtime()?
        .block_on(run_chat(&relay))
        .map_err(|e| ParleyError::Transport(e.to_string()))
}
