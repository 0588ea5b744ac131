//! Conversation relay: forwards each user message to the agent runner and
//! relays the reply back to the chat.


use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{debug, error, info};

use parley_ai::{
    builtin_tools, Agent, AiClient, AiError, FunctionTool, Message, Role, RunConfig, RunEvent,
    RunResult, Runner, ToolSet,
};
use parley_common::SessionId;
use parley_config::{AgentConfig, ChatConfig, HistoryMode, HistoryRole, ParleyConfig, RunMode};

use crate::handler::ChatHandler;
use crate::session::ChatSession;
use crate::transport::{ChatTransport, MessageId, TransportError};

/// Shown while a blocking or async run is in flight.
pub const THINKING_PLACEHOLDER: &str = "Thinking...";

/// Relays chat messages to an agent, one run per message.
pub struct ConversationRelay {
    runner: Runner,
    agent: AgentConfig,
    chat: ChatConfig,
    tools: ToolSet,
}

/// Why a relayed message produced no reply.
enum Failure {
    Run(AiError),
    Transport(TransportError),
}

impl From<AiError> for Failure {
    fn from(e: AiError) -> Self {
        Failure::Run(e)
    }
}

impl From<TransportError> for Failure {
    fn from(e: TransportError) -> Self {
        Failure::Transport(e)
    }
}

impl ConversationRelay {
    /// Build a relay from validated configuration. The built-in tools are
    /// attached when `chat.tools` is set.
    pub fn new(client: Arc<dyn AiClient>, config: &ParleyConfig) -> Self {
        let tools = if config.chat.tools {
            builtin_tools()
        } else {
            ToolSet::new()
        };
        Self {
            runner: Runner::new(client),
            agent: config.agent.clone(),
            chat: config.chat.clone(),
            tools,
        }
    }

    /// Give every new session's agent an extra tool.
    pub fn with_tool(mut self, tool: FunctionTool) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn mode(&self) -> RunMode {
        self.chat.mode
    }

    /// The agent descriptor handed to each new session.
    pub fn build_agent(&self) -> Agent {
        Agent::new(&self.agent.name, &self.agent.instructions)
            .with_model(&self.agent.model)
            .with_tools(self.tools.clone())
    }

    fn run_config(&self) -> RunConfig {
        RunConfig::default().with_max_turns(self.agent.max_turns)
    }

    fn run_timeout(&self) -> Option<Duration> {
        self.chat.run_timeout_secs.map(Duration::from_secs)
    }

    /// Role of the reply turn appended to history.
    fn reply_role(&self) -> Role {
        match self.chat.history_role {
            HistoryRole::Assistant => Role::Assistant,
            HistoryRole::Developer => Role::Developer,
        }
    }

    async fn bounded<T>(
        &self,
        run: impl Future<Output = Result<T, Failure>>,
    ) -> Result<T, Failure> {
        match self.run_timeout() {
            Some(limit) => tokio::time::timeout(limit, run)
                .await
                .map_err(|_| Failure::Run(AiError::Timeout))?,
            None => run.await,
        }
    }

    async fn run_async(&self, session: &ChatSession) -> Result<RunResult, Failure> {
        let run = async {
            let result = self
                .runner
                .run(session.agent(), session.history().to_vec(), &self.run_config())
                .await?;
            Ok::<_, Failure>(result)
        };
        self.bounded(run).await
    }

    /// Runs on the current worker thread, parking only this connection.
    fn run_blocking(&self, session: &ChatSession) -> Result<RunResult, Failure> {
        let handle = Handle::current();
        if handle.runtime_flavor() == RuntimeFlavor::CurrentThread {
            return Err(Failure::Run(AiError::Runtime(
                "blocking mode requires a multi-thread runtime".into(),
            )));
        }
        tokio::task::block_in_place(|| handle.block_on(self.run_async(session)))
    }

    /// Forwards every text delta as it arrives. Text the model sent alongside
    /// a tool call is shown live but the closing update carries only the
    /// final output.
    async fn run_streaming(
        &self,
        session: &ChatSession,
        transport: &dyn ChatTransport,
        id: &MessageId,
    ) -> Result<RunResult, Failure> {
        let mut run = self.runner.run_streamed(
            Arc::clone(session.agent()),
            session.history().to_vec(),
            self.run_config(),
        );
        let consume = async move {
            while let Some(event) = run.next_event().await {
                match event {
                    RunEvent::Delta(text) if !text.is_empty() => {
                        transport.stream_token(id, &text).await?;
                    }
                    RunEvent::ToolCalled { name, .. } => {
                        debug!(tool = %name, "Streamed run calling tool");
                    }
                    _ => {}
                }
            }
            Ok::<_, Failure>(run.into_result().await?)
        };
        self.bounded(consume).await
    }

    /// Fold a finished run into the session history.
    fn record(&self, session: &mut ChatSession, result: &RunResult) {
        session.record_usage(&result.usage);
        match self.chat.history {
            HistoryMode::Turns => {
                session.push(Message::new(self.reply_role(), result.final_output.clone()));
            }
            HistoryMode::Items => session.replace_history(result.to_input_list()),
        }
    }
}

#[async_trait]
impl ChatHandler for ConversationRelay {
    type Session = ChatSession;

    async fn on_chat_start(
        &self,
        session_id: SessionId,
        transport: &dyn ChatTransport,
    ) -> Result<ChatSession, TransportError> {
        let session = ChatSession::new(session_id, Arc::new(self.build_agent()));
        info!(
            session = %session.id(),
            agent = session.agent().name(),
            mode = %self.chat.mode,
            tools = ?session.agent().tools().names(),
            "Chat session started"
        );

        transport.send_message(&self.chat.greeting).await?;
        if !self.chat.starters.is_empty() {
            transport.send_starters(&self.chat.starters).await?;
        }
        Ok(session)
    }

    async fn on_message(
        &self,
        session: &mut ChatSession,
        transport: &dyn ChatTransport,
        text: &str,
    ) -> Result<(), TransportError> {
        session.push(Message::user(text));
        debug!(session = %session.id(), history = ?session.history(), "Sending history to agent");

        let (id, outcome) = match self.chat.mode {
            RunMode::Blocking => {
                let id = transport.send_message(THINKING_PLACEHOLDER).await?;
                let outcome = self.run_blocking(session);
                (id, outcome)
            }
            RunMode::Async => {
                let id = transport.send_message(THINKING_PLACEHOLDER).await?;
                let outcome = self.run_async(session).await;
                (id, outcome)
            }
            RunMode::Streaming => {
                let id = transport.send_message("").await?;
                let outcome = self.run_streaming(session, transport, &id).await;
                (id, outcome)
            }
        };

        match outcome {
            Ok(result) => {
                self.record(session, &result);
                let output = &result.final_output;
                info!(session = %session.id(), user = text, assistant = %output, "Relayed exchange");
                transport.update_message(&id, output).await
            }
            Err(Failure::Run(e)) => {
                error!(session = %session.id(), error = %e, "Agent run failed");
                transport.update_message(&id, &format!("Error: {e}")).await
            }
            Err(Failure::Transport(e)) => Err(e),
        }
    }
}
