//! Token usage tracking across runs.

use std::collections::HashMap;

use crate::TokenUsage;

/// Cumulative usage for one conversation, broken down by model.
#[derive(Debug, Clone, Default)]
pub struct TokenTracker {
    total: TokenUsage,
    by_model: HashMap<String, TokenUsage>,
    runs: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the usage of one completed run.
    pub fn record(&mut self, model: &str, usage: &TokenUsage) {
        self.total.add(usage);
        self.runs += 1;
        self.by_model.entry(model.to_string()).or_default().add(usage);
    }

    pub fn total(&self) -> &TokenUsage {
        &self.total
    }

    pub fn for_model(&self, model: &str) -> Option<&TokenUsage> {
        self.by_model.get(model)
    }

    pub fn total_tokens(&self) -> u64 {
        self.total.total_tokens()
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
