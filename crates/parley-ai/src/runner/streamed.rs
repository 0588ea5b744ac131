//! Handle to a run executing in the background.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::AiError;

use super::types::{RunEvent, RunResult};

/// A run whose events can be consumed as they happen.
///
/// Dropping the handle before the run finishes aborts it.
pub struct StreamedRun {
    events: mpsc::UnboundedReceiver<RunEvent>,
    task: Option<JoinHandle<Result<RunResult, AiError>>>,
}

impl StreamedRun {
    pub(crate) fn new(
        events: mpsc::UnboundedReceiver<RunEvent>,
        task: JoinHandle<Result<RunResult, AiError>>,
    ) -> Self {
        Self {
            events,
            task: Some(task),
        }
    }

    /// Next event in arrival order, or `None` once the run has ended
    /// (successfully or not).
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }

    /// Wait for the run to finish and return its result or error.
    pub async fn into_result(mut self) -> Result<RunResult, AiError> {
        let Some(task) = self.task.take() else {
            return Err(AiError::Runtime("run result already taken".into()));
        };
        match task.await {
            Ok(result) => result,
            Err(e) => Err(AiError::Runtime(format!("run task failed: {e}"))),
        }
    }
}

impl Drop for StreamedRun {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
