//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::{HistoryRole, ParleyConfig, RunMode};
use parley_common::ConfigError;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_parley_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[agent]
name = "Weather Bot"

[chat]
mode = "blocking"
tools = true
port = 9001
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.agent.name, "Weather Bot");
    assert_eq!(config.chat.mode, RunMode::Blocking);
    assert!(config.chat.tools);
    assert_eq!(config.chat.port, 9001);
    // Defaults preserved
    assert_eq!(config.agent.instructions, "You are a helpful assistant");
    assert_eq!(config.chat.history_role, HistoryRole::Assistant);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_keeps_values_that_fail_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[agent]\nmax_turns = 0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.agent.max_turns, 0);
}

#[test]
fn template_parses_to_defaults() {
    let config: ParleyConfig = toml::from_str(&default_config_toml()).unwrap();
    let defaults = ParleyConfig::default();
    assert_eq!(config.agent.name, defaults.agent.name);
    assert_eq!(config.chat.mode, defaults.chat.mode);
    assert_eq!(config.chat.starters, defaults.chat.starters);
    assert_eq!(config.logging.level, defaults.logging.level);
}

#[test]
fn create_default_config_writes_template() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    create_default_config(&path, false).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, default_config_toml());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.agent.model, "gpt-4o");
}

#[test]
fn create_default_config_respects_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[agent]\nname = \"Mine\"\n").unwrap();

    assert!(create_default_config(&path, false).is_err());
    assert!(std::fs::read_to_string(&path).unwrap().contains("Mine"));

    create_default_config(&path, true).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), default_config_toml());
}

#[test]
fn default_config_path_ends_with_parley() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("parley/config.toml"));
    }
}
