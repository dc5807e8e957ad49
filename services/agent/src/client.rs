use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use reqwest::StatusCode;

use orchestrator_client::{TaskEnvelope, TaskId, TaskResult, TaskSpec};

use crate::clock::Clock;
use crate::error::AgentError;

/// Bounded pacing for result pushes: a fixed number of attempts with a
/// fixed delay between them.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

#[async_trait]
pub trait TaskClient: Send + Sync {
    /// Fetches a ready task; `None` when the orchestrator has nothing to
    /// hand out.
    async fn pull_task(&self) -> Result<Option<TaskSpec>, AgentError>;

    /// Pushes a computed result. A task that was already resolved upstream
    /// is an acceptable terminal outcome, not a failure.
    async fn push_result(&self, id: TaskId, result: f64) -> Result<(), AgentError>;
}

pub struct TaskClientHttp {
    task_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl TaskClientHttp {
    pub fn new(
        client: reqwest::Client,
        orchestrator: &str,
        retry: RetryPolicy,
        clock: Arc<dyn Clock>,
    ) -> TaskClientHttp {
        TaskClientHttp {
            task_url: format!("{}/internal/task", orchestrator),
            client,
            retry,
            clock,
        }
    }
}

#[async_trait]
impl TaskClient for TaskClientHttp {
    async fn pull_task(&self) -> Result<Option<TaskSpec>, AgentError> {
        let response = self.client.get(&self.task_url).send().await?;

        // Anything but success means no work right now
        if !response.status().is_success() {
            return Ok(None);
        }

        let envelope = response.json::<TaskEnvelope>().await?;
        Ok(Some(envelope.task))
    }

    async fn push_result(&self, id: TaskId, result: f64) -> Result<(), AgentError> {
        let body = TaskResult { id, result };

        for attempt in 1..=self.retry.attempts {
            match self.client.post(&self.task_url).json(&body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() || status == StatusCode::NOT_FOUND {
                        // 404 means the task was resolved already, e.g. by
                        // an earlier push whose response we never saw
                        return Ok(());
                    }
                    warn!(
                        "Pushing result for task {} got status {}, attempt {}/{}",
                        id, status, attempt, self.retry.attempts
                    );
                }
                Err(e) => {
                    warn!(
                        "Pushing result for task {} failed: {}, attempt {}/{}",
                        id, e, attempt, self.retry.attempts
                    );
                }
            }

            self.clock.sleep(self.retry.delay).await;
        }

        Err(AgentError::PushFailed(id))
    }
}
