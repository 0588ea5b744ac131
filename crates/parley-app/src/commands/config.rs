//! `parley config init|show`.

use std::path::Path;

use parley_common::ParleyError;
use parley_config::{config_to_json, toml_loader, ParleyConfig};

pub fn init(path: Option<&Path>, force: bool) -> Result<(), ParleyError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => toml_loader::default_config_path()?,
    };
    toml_loader::create_default_config(&path, force)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

pub fn show(config: &ParleyConfig) -> Result<(), ParleyError> {
    println!("{}", config_to_json(config));
    Ok(())
}
