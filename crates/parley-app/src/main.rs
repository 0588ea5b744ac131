mod cli;
mod commands;
mod terminal;

use std::process::ExitCode;

use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ConfigCommand};

const DEFAULT_LOG_DIRECTIVE: &str = "parley=info";

fn init_logging(directive: &str) {
    let directive = directive
        .parse::<Directive>()
        .or_else(|_| DEFAULT_LOG_DIRECTIVE.parse());
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = directive {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    // A missing .env is fine; the variables may already be set.
    let _ = dotenvy::dotenv();

    let args = cli::parse();

    // `config init` must work even when the existing file is broken.
    let config = match &args.command {
        Command::Config(ConfigCommand::Init { .. }) => Ok(Default::default()),
        _ => parley_config::load_config(args.config.as_deref()),
    };

    let directive = args
        .log_level
        .clone()
        .or_else(|| config.as_ref().ok().map(|c| c.logging.level.clone()))
        .unwrap_or_else(|| DEFAULT_LOG_DIRECTIVE.to_string());
    init_logging(&directive);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Config load failed: {e}");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "parley starting");

    match commands::run(args.command, config, args.config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
