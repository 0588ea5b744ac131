//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub fn default_config_toml() -> String {
    r##"# Parley Configuration
# Only override what you want to change -- missing fields use defaults.
#
# Azure OpenAI credentials are NOT stored here. Set these in the
# environment or a .env file:
#   AZURE_OPENAI_API_KEY, AZURE_OPENAI_API_VERSION,
#   AZURE_OPENAI_ENDPOINT, AZURE_OPENAI_DEPLOYMENT

[agent]
# name = "Assistant"
# instructions = "You are a helpful assistant"
# model = "gpt-4o"
# max_turns = 10          # 1-100, model calls per run including tool rounds
# max_tokens = 1024       # 1-128000
# temperature = 0.7       # 0.0-2.0

[chat]
# mode = "streaming"      # blocking (sync), async, streaming (stream)
# greeting = "Hello! How can I assist you today?"
# history_role = "assistant"  # assistant, developer (compatibility only)
# history = "turns"       # turns, items (keep tool calls and results)
# tools = false           # register get_weather on each session's agent
# bind = "127.0.0.1"
# port = 8000
# run_timeout_secs = 120  # unset = wait forever

# [[chat.starters]]
# label = "Greetings"
# message = "Hello! What can you help me with today?"

# [[chat.starters]]
# label = "Weather"
# message = "Find the weather in Hyderabad."

[logging]
# level = "parley=info"
"##
    .to_string()
}
