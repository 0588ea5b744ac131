use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use parley_config::RunMode;

/// Parley: chat with an Azure OpenAI agent from the terminal or over WebSocket.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter directive, e.g. `parley=debug`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the agent once on a single prompt.
    Ask {
        /// Prompt to send.
        #[arg(default_value = "Hello, how are you.")]
        prompt: String,

        /// sync, async or stream. Defaults to the configured chat mode.
        #[arg(long)]
        mode: Option<RunMode>,

        /// Give the agent the built-in tools.
        #[arg(long)]
        tools: bool,
    },

    /// Chat with the agent in this terminal.
    Chat(ChatArgs),

    /// Serve the chat over WebSocket.
    Serve {
        #[command(flatten)]
        chat: ChatArgs,

        /// Port to listen on.
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Manage the config file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Overrides for the `[chat]` config section.
#[derive(ClapArgs, Debug, Default)]
pub struct ChatArgs {
    /// blocking, async or streaming.
    #[arg(long)]
    pub mode: Option<RunMode>,

    /// Give the agent the built-in tools.
    #[arg(long)]
    pub tools: bool,

    /// File agent replies under the developer role.
    #[arg(long)]
    pub developer_role: bool,

    /// Keep tool calls and tool results in the session history.
    #[arg(long)]
    pub full_history: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write the default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config as JSON.
    Show,
}

pub fn parse() -> Args {
    Args::parse()
}
