use std::collections::HashMap;

use orchestrator_client::{Operation, TaskId};

use crate::expression::Expr;

/// A task operand: an inline literal, or the ID of the task whose result
/// supplies the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Literal(f64),
    Reference(TaskId),
}

/// Unit of distributed work. Cross-task references are IDs into the owning
/// table, never pointers, so the graph cannot form cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub operation: Option<Operation>,
    pub left: Option<Operand>,
    pub right: Option<Operand>,
    pub root: bool,
    pub done: bool,
    pub sent: bool,
    pub result: Option<f64>,
}

/// Arena of tasks keyed by ID. IDs are assigned monotonically and never
/// reused.
#[derive(Debug, Default)]
pub struct TaskTable {
    pub tasks: HashMap<TaskId, Task>,
    next_id: TaskId,
}

impl TaskTable {
    fn next(&mut self) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Lowers an expression tree bottom-up into tasks. The caller holds the
    /// exclusive lock, so the whole graph becomes visible atomically. Leaves
    /// are born completed; the entry node's task is the expression's root.
    pub fn lower(&mut self, node: &Expr, root: bool) -> TaskId {
        match node {
            Expr::Constant(value) => {
                let id = self.next();
                self.tasks.insert(
                    id,
                    Task {
                        id,
                        operation: None,
                        left: Some(Operand::Literal(*value)),
                        right: None,
                        root,
                        done: true,
                        sent: false,
                        result: Some(*value),
                    },
                );
                id
            }
            Expr::Application(operation, left, right) => {
                let left_id = self.lower(left, false);
                let right_id = self.lower(right, false);

                let id = self.next();
                self.tasks.insert(
                    id,
                    Task {
                        id,
                        operation: Some(*operation),
                        left: Some(Operand::Reference(left_id)),
                        right: Some(Operand::Reference(right_id)),
                        root,
                        done: false,
                        sent: false,
                        result: None,
                    },
                );
                id
            }
        }
    }
}
