//! Full configuration validation.
//!
//! Each check pushes a message; all problems are reported together in a
//! single `ConfigError`.

mod helpers;


use parley_common::ConfigError;

use crate::schema::ParleyConfig;

use helpers::{validate_non_empty, validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ParleyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_agent(&mut errors, config);
    validate_chat(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_agent(errors: &mut Vec<String>, config: &ParleyConfig) {
    let agent = &config.agent;
    validate_non_empty(errors, "agent.name", &agent.name);
    validate_non_empty(errors, "agent.model", &agent.model);
    validate_range(errors, "agent.max_turns", agent.max_turns, 1, 100);
    validate_range(errors, "agent.max_tokens", agent.max_tokens, 1, 128_000);
    validate_range_f64(errors, "agent.temperature", agent.temperature, 0.0, 2.0);
}

fn validate_chat(errors: &mut Vec<String>, config: &ParleyConfig) {
    let chat = &config.chat;
    validate_non_empty(errors, "chat.bind", &chat.bind);
    if chat.port == 0 {
        errors.push("chat.port must not be 0".into());
    }
    if chat.run_timeout_secs == Some(0) {
        errors.push("chat.run_timeout_secs must be at least 1 when set".into());
    }
    for (i, starter) in chat.starters.iter().enumerate() {
        validate_non_empty(errors, &format!("chat.starters[{i}].label"), &starter.label);
        validate_non_empty(errors, &format!("chat.starters[{i}].message"), &starter.message);
    }
}
