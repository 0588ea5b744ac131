//! Per-connection conversation state.

use std::sync::Arc;

use parley_ai::{Agent, Message, TokenTracker, TokenUsage};
use parley_common::SessionId;

/// One user's conversation: the turns so far and the agent answering them.
///
/// Owned by the connection that created it and dropped with it.
#[derive(Debug)]
pub struct ChatSession {
    id: SessionId,
    history: Vec<Message>,
    agent: Arc<Agent>,
    tracker: TokenTracker,
}

impl ChatSession {
    pub fn new(id: SessionId, agent: Arc<Agent>) -> Self {
        Self {
            id,
            history: Vec::new(),
            agent,
            tracker: TokenTracker::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Turns in the order they happened.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn agent(&self) -> &Arc<Agent> {
        &self.agent
    }

    pub fn tracker(&self) -> &TokenTracker {
        &self.tracker
    }

    pub(crate) fn push(&mut self, turn: Message) {
        self.history.push(turn);
    }

    /// Swap in the history a run handed back, tool items included.
    pub(crate) fn replace_history(&mut self, history: Vec<Message>) {
        self.history = history;
    }

    pub(crate) fn record_usage(&mut self, usage: &TokenUsage) {
        self.tracker.record(self.agent.model(), usage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_appends_in_order() {
        let mut session = ChatSession::new(SessionId::new(), Arc::new(Agent::new("a", "b")));
        assert!(session.history().is_empty());

        session.push(Message::user("one"));
        session.push(Message::assistant("two"));
        let contents: Vec<_> = session.history().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two"]);
    }

    #[test]
    fn usage_is_recorded_under_agent_model() {
        let agent = Arc::new(Agent::new("a", "b").with_model("gpt-4o-mini"));
        let mut session = ChatSession::new(SessionId::new(), agent);
        session.record_usage(&TokenUsage {
            input_tokens: 3,
            output_tokens: 4,
        });
        assert_eq!(session.tracker().for_model("gpt-4o-mini").unwrap().total_tokens(), 7);
    }
}
