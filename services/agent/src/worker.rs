use std::sync::Arc;
use std::time::Duration;

use log::{error, info};

use orchestrator_client::{Operation, TaskId, TaskSpec};

use crate::client::TaskClient;
use crate::clock::Clock;
use crate::error::AgentError;

/// What one pass of the polling loop did.
#[derive(Debug, PartialEq)]
pub enum StepOutcome {
    Idle,
    Completed(TaskId),
}

/// Applies the task's operator to its arguments. Division by zero is fatal
/// for the task, not for the worker.
pub fn compute(task: &TaskSpec) -> Result<f64, AgentError> {
    match task.operation {
        Operation::Add => Ok(task.arg1 + task.arg2),
        Operation::Sub => Ok(task.arg1 - task.arg2),
        Operation::Mul => Ok(task.arg1 * task.arg2),
        Operation::Div => {
            if task.arg2 == 0.0 {
                return Err(AgentError::Processing(format!(
                    "division by zero in task {}",
                    task.id
                )));
            }
            Ok(task.arg1 / task.arg2)
        }
    }
}

pub struct Worker {
    id: usize,
    client: Arc<dyn TaskClient>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
}

impl Worker {
    pub fn new(
        id: usize,
        client: Arc<dyn TaskClient>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
    ) -> Worker {
        Worker {
            id,
            client,
            clock,
            poll_interval,
        }
    }

    /// Polls the orchestrator forever. A failure affects only the task at
    /// hand; the loop itself never gives up.
    pub async fn run(&self) {
        info!("Worker {} started", self.id);

        loop {
            match self.step().await {
                Ok(StepOutcome::Idle) => {}
                Ok(StepOutcome::Completed(task)) => {
                    info!("Worker {} completed task {}", self.id, task)
                }
                Err(e) => error!("Worker {}: {}", self.id, e),
            }
        }
    }

    async fn step(&self) -> Result<StepOutcome, AgentError> {
        let task = match self.client.pull_task().await? {
            Some(task) => task,
            None => {
                self.clock.sleep(self.poll_interval).await;
                return Ok(StepOutcome::Idle);
            }
        };

        // Simulated processing cost, as dictated by the orchestrator
        self.clock
            .sleep(Duration::from_millis(task.operation_time))
            .await;

        let result = compute(&task)?;
        self.client.push_result(task.id, result).await?;

        Ok(StepOutcome::Completed(task.id))
    }
}
