use tokio::sync::RwLock;

use orchestrator_client::{ExpressionStatus, Operation, Status, TaskId};

use crate::expression::Expr;

pub use error::SchedulerError;

use task::{Operand, Task, TaskTable};

mod error;
mod task;

/// A dependency-satisfied task ready to hand to a worker. The simulated
/// processing cost is attached at the API layer, which owns that
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub id: TaskId,
    pub arg1: f64,
    pub arg2: f64,
    pub operation: Operation,
}

/// Authoritative task store. All mutations take the write lock, so readiness
/// checks, the single hand-out of each task and the done-once transition are
/// linearizable with respect to each other; status reads share the read
/// lock.
pub struct Scheduler {
    state: RwLock<TaskTable>,
}

impl TaskTable {
    fn operand_done(&self, operand: &Option<Operand>) -> Result<bool, SchedulerError> {
        match operand {
            None | Some(Operand::Literal(_)) => Ok(true),
            Some(Operand::Reference(id)) => self
                .tasks
                .get(id)
                .map(|task| task.done)
                .ok_or_else(|| SchedulerError::InternalError(format!("missing task {}", id))),
        }
    }

    fn operand_value(&self, operand: &Option<Operand>) -> Result<f64, SchedulerError> {
        match operand {
            None => Ok(0.0),
            Some(Operand::Literal(value)) => Ok(*value),
            Some(Operand::Reference(id)) => {
                let task = self
                    .tasks
                    .get(id)
                    .ok_or_else(|| SchedulerError::InternalError(format!("missing task {}", id)))?;
                task.result.ok_or_else(|| {
                    SchedulerError::InternalError(format!("task {} has no result", id))
                })
            }
        }
    }
}

fn expression_status(task: &Task) -> ExpressionStatus {
    ExpressionStatus {
        id: task.id,
        status: if task.done {
            Status::Completed
        } else {
            Status::Pending
        },
        result: if task.done { task.result } else { None },
    }
}

impl Scheduler {
    pub fn new() -> Scheduler {
        Scheduler {
            state: RwLock::new(TaskTable::default()),
        }
    }

    /// Registers the full task graph for one expression and returns the root
    /// task ID. The graph appears atomically: no concurrent acquisition can
    /// observe a partial graph.
    pub async fn submit_expression(&self, expr: &Expr) -> TaskId {
        let mut state = self.state.write().await;
        state.lower(expr, true)
    }

    /// Hands out one task whose referenced children are all done, marking it
    /// as sent so no other caller can receive it. `Ok(None)` when nothing is
    /// ready, a routine condition callers poll on.
    pub async fn acquire_next(&self) -> Result<Option<Assignment>, SchedulerError> {
        let mut state = self.state.write().await;

        let mut acquired = None;
        for task in state.tasks.values() {
            if task.done || task.sent {
                continue;
            }
            if !state.operand_done(&task.left)? || !state.operand_done(&task.right)? {
                continue;
            }

            let operation = task.operation.ok_or_else(|| {
                SchedulerError::InternalError(format!("pending task {} has no operation", task.id))
            })?;

            acquired = Some(Assignment {
                id: task.id,
                arg1: state.operand_value(&task.left)?,
                arg2: state.operand_value(&task.right)?,
                operation,
            });
            break;
        }

        if let Some(assignment) = &acquired {
            if let Some(task) = state.tasks.get_mut(&assignment.id) {
                task.sent = true;
            }
        }

        Ok(acquired)
    }

    /// Records a worker's result. Rejects unknown tasks and repeats of an
    /// already completed task; the stored result never changes once set.
    pub async fn submit_result(&self, id: TaskId, value: f64) -> Result<(), SchedulerError> {
        let mut state = self.state.write().await;

        let task = state.tasks.get_mut(&id).ok_or(SchedulerError::NotFound)?;
        if task.done {
            return Err(SchedulerError::AlreadyCompleted);
        }

        task.result = Some(value);
        task.done = true;
        Ok(())
    }

    /// Status of one expression; `None` unless the ID names a root task.
    pub async fn status(&self, id: TaskId) -> Option<ExpressionStatus> {
        let state = self.state.read().await;
        state
            .tasks
            .get(&id)
            .filter(|task| task.root)
            .map(expression_status)
    }

    /// Statuses of all expressions. Internal subexpression tasks are never
    /// listed.
    pub async fn list(&self) -> Vec<ExpressionStatus> {
        let state = self.state.read().await;
        state
            .tasks
            .values()
            .filter(|task| task.root)
            .map(expression_status)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::sync::Arc;

    use super::*;
    use crate::expression::parse;

    async fn register(scheduler: &Scheduler, input: &str) -> TaskId {
        let expr = parse(input).unwrap();
        scheduler.submit_expression(&expr).await
    }

    #[tokio::test]
    async fn test_graph_shape() -> Result<(), Box<dyn Error>> {
        let scheduler = Scheduler::new();
        register(&scheduler, "(3+4)*2-1").await;

        // Three operators, four literals
        let state = scheduler.state.read().await;
        assert_eq!(state.tasks.len(), 7);
        assert_eq!(
            state.tasks.values().filter(|t| t.operation.is_some()).count(),
            3
        );
        assert_eq!(state.tasks.values().filter(|t| t.root).count(), 1);

        // Leaves are born completed
        for task in state.tasks.values().filter(|t| t.operation.is_none()) {
            assert!(task.done);
            assert!(task.result.is_some());
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_constant_expression_completes_immediately() -> Result<(), Box<dyn Error>> {
        let scheduler = Scheduler::new();
        let id = register(&scheduler, "7").await;

        let status = scheduler.status(id).await.expect("root visible");
        assert_eq!(status.status, Status::Completed);
        assert_eq!(status.result, Some(7.0));

        assert_eq!(scheduler.acquire_next().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_acquire_respects_dependencies() -> Result<(), Box<dyn Error>> {
        let scheduler = Scheduler::new();
        let root = register(&scheduler, "(3+4)*2").await;

        // Only the addition is ready; the multiplication depends on it
        let first = scheduler.acquire_next().await?.expect("addition ready");
        assert_eq!(first.operation, Operation::Add);
        assert_eq!((first.arg1, first.arg2), (3.0, 4.0));

        assert_eq!(scheduler.acquire_next().await?, None);

        scheduler.submit_result(first.id, 7.0).await?;

        let second = scheduler.acquire_next().await?.expect("product ready");
        assert_eq!(second.id, root);
        assert_eq!(second.operation, Operation::Mul);
        assert_eq!((second.arg1, second.arg2), (7.0, 2.0));

        scheduler.submit_result(second.id, 14.0).await?;

        let status = scheduler.status(root).await.expect("root visible");
        assert_eq!(status.status, Status::Completed);
        assert_eq!(status.result, Some(14.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_acquire_is_exactly_once() -> Result<(), Box<dyn Error>> {
        let scheduler = Arc::new(Scheduler::new());
        for _ in 0..10 {
            register(&scheduler, "1+2").await;
        }

        let mut handles = Vec::new();
        for _ in 0..10 {
            let scheduler = scheduler.clone();
            handles.push(tokio::spawn(
                async move { scheduler.acquire_next().await },
            ));
        }

        let mut ids = Vec::new();
        for handle in handles {
            if let Some(assignment) = handle.await?? {
                ids.push(assignment.id);
            }
        }

        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before);
        assert_eq!(ids.len(), 10);

        assert_eq!(scheduler.acquire_next().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_result_is_idempotent() -> Result<(), Box<dyn Error>> {
        let scheduler = Scheduler::new();
        let root = register(&scheduler, "1+2").await;

        let assignment = scheduler.acquire_next().await?.expect("sum ready");
        scheduler.submit_result(assignment.id, 3.0).await?;

        assert_eq!(
            scheduler.submit_result(assignment.id, 99.0).await,
            Err(SchedulerError::AlreadyCompleted)
        );
        assert_eq!(
            scheduler.status(root).await.map(|s| s.result),
            Some(Some(3.0))
        );

        assert_eq!(
            scheduler.submit_result(12345, 1.0).await,
            Err(SchedulerError::NotFound)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_listing_exposes_roots_only() -> Result<(), Box<dyn Error>> {
        let scheduler = Scheduler::new();
        let first = register(&scheduler, "2+2").await;
        let second = register(&scheduler, "5*5").await;

        let listed = scheduler.list().await;
        assert_eq!(listed.len(), 2);
        for status in &listed {
            assert!(status.id == first || status.id == second);
            assert_eq!(status.status, Status::Pending);
            assert_eq!(status.result, None);
        }

        // Leaf tasks exist but are not addressable as expressions
        let state = scheduler.state.read().await;
        let leaf = state
            .tasks
            .values()
            .find(|t| !t.root)
            .map(|t| t.id)
            .expect("graph has leaves");
        drop(state);

        assert_eq!(scheduler.status(leaf).await, None);
        Ok(())
    }
}
