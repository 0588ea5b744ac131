//! Agent runner: drives the model/tool loop for one run.
//!
//! A run takes the conversation so far, prepends the agent's instructions,
//! and calls the model until it answers without requesting tools. Tool
//! calls are executed in order and their results fed back. The same loop
//! backs all three entry points; only the transport differs:
//! - [`Runner::run`] awaits the result
//! - [`Runner::run_sync`] blocks the calling thread
//! - [`Runner::run_streamed`] spawns the run and yields [`RunEvent`]s

mod streamed;
mod types;


use std::sync::Arc;

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{Agent, AiClient, AiError, Message, TokenUsage};

pub use streamed::StreamedRun;
pub use types::{RunConfig, RunEvent, RunResult, DEFAULT_MAX_TURNS};

/// Executes agent runs against a chat-completions client.
#[derive(Clone)]
pub struct Runner {
    client: Arc<dyn AiClient>,
}

impl Runner {
    pub fn new(client: Arc<dyn AiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn AiClient> {
        &self.client
    }

    /// Run to completion.
    pub async fn run(
        &self,
        agent: &Agent,
        input: Vec<Message>,
        config: &RunConfig,
    ) -> Result<RunResult, AiError> {
        run_loop(self.client.as_ref(), agent, input, config, None).await
    }

    /// Run to completion, blocking the current thread.
    ///
    /// Outside a runtime a private current-thread runtime drives the run.
    /// Inside a multi-thread runtime the worker is handed off with
    /// `block_in_place`. A current-thread runtime cannot be blocked and
    /// yields [`AiError::Runtime`].
    pub fn run_sync(
        &self,
        agent: &Agent,
        input: Vec<Message>,
        config: &RunConfig,
    ) -> Result<RunResult, AiError> {
        match Handle::try_current() {
            Ok(handle) => match handle.runtime_flavor() {
                RuntimeFlavor::CurrentThread => Err(AiError::Runtime(
                    "run_sync cannot block a current-thread runtime; use run() instead".into(),
                )),
                _ => tokio::task::block_in_place(|| {
                    handle.block_on(self.run(agent, input, config))
                }),
            },
            Err(_) => {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| AiError::Runtime(format!("failed to build runtime: {e}")))?;
                rt.block_on(self.run(agent, input, config))
            }
        }
    }

    /// Start a run on the current runtime and return a handle to its events.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn run_streamed(
        &self,
        agent: Arc<Agent>,
        input: Vec<Message>,
        config: RunConfig,
    ) -> StreamedRun {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Arc::clone(&self.client);
        let task = tokio::spawn(async move {
            run_loop(client.as_ref(), &agent, input, &config, Some(tx)).await
        });
        StreamedRun::new(rx, task)
    }
}

/// The shared model/tool loop. `events` is set for streamed runs.
async fn run_loop(
    client: &dyn AiClient,
    agent: &Agent,
    input: Vec<Message>,
    config: &RunConfig,
    events: Option<mpsc::UnboundedSender<RunEvent>>,
) -> Result<RunResult, AiError> {
    let model = config
        .model
        .clone()
        .unwrap_or_else(|| agent.model().to_string());
    let tools = agent.tool_definitions();

    let mut messages = Vec::with_capacity(input.len() + 1);
    if !agent.instructions().is_empty() {
        messages.push(Message::system(agent.instructions()));
    }
    messages.extend(input.iter().cloned());

    let mut new_items = Vec::new();
    let mut usage = TokenUsage::default();

    debug!(
        agent = agent.name(),
        model = %model,
        history = input.len(),
        tools = tools.len(),
        streamed = events.is_some(),
        "Starting run"
    );

    for turn in 1..=config.max_turns {
        let response = match &events {
            Some(tx) => {
                let tx = tx.clone();
                client
                    .send_message_streaming(
                        &model,
                        &messages,
                        &tools,
                        Box::new(move |event| {
                            // Receiver gone means the caller stopped listening.
                            let _ = tx.send(RunEvent::from(event));
                        }),
                    )
                    .await?
            }
            None => client.send_message(&model, &messages, &tools).await?,
        };
        usage.add(&response.usage);

        if response.tool_calls.is_empty() {
            info!(
                agent = agent.name(),
                turns = turn,
                tokens = usage.total_tokens(),
                "Run complete"
            );
            new_items.push(Message::assistant(response.content.clone()));
            return Ok(RunResult {
                input,
                new_items,
                final_output: response.content,
                usage,
                last_agent: agent.name().to_string(),
            });
        }

        debug!(turn, calls = response.tool_calls.len(), "Model requested tools");

        let request = Message::assistant_tool_calls(response.content, response.tool_calls.clone());
        messages.push(request.clone());
        new_items.push(request);

        for call in response.tool_calls {
            emit(
                &events,
                RunEvent::ToolCalled {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                },
            );
            let output = agent.tools().call(&call.name, &call.arguments)?;
            debug!(tool = %call.name, "Tool returned");
            emit(
                &events,
                RunEvent::ToolOutput {
                    name: call.name.clone(),
                    output: output.clone(),
                },
            );
            let result = Message::tool_result(call.id, output);
            messages.push(result.clone());
            new_items.push(result);
        }
    }

    warn!(
        agent = agent.name(),
        max_turns = config.max_turns,
        "Run exceeded turn limit"
    );
    Err(AiError::MaxTurnsExceeded(config.max_turns))
}

fn emit(events: &Option<mpsc::UnboundedSender<RunEvent>>, event: RunEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}
