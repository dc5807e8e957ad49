use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Identity of a task in the orchestrator's task map. The ID of an
/// expression's root task doubles as the externally visible identity of the
/// expression itself.
pub type TaskId = u64;

/// The four binary operators tasks can carry. The serde renames keep the
/// wire representation as the bare operator symbol.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Operation {
    #[serde(rename = "+")]
    #[strum(serialize = "+")]
    Add,
    #[serde(rename = "-")]
    #[strum(serialize = "-")]
    Sub,
    #[serde(rename = "*")]
    #[strum(serialize = "*")]
    Mul,
    #[serde(rename = "/")]
    #[strum(serialize = "/")]
    Div,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CalculateRequest {
    pub expression: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CalculateResponse {
    pub id: TaskId,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Completed,
}

/// Externally visible state of one submitted expression. `result` stays
/// `null` until the root task completes.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ExpressionStatus {
    pub id: TaskId,
    pub status: Status,
    pub result: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ExpressionList {
    pub expressions: Vec<ExpressionStatus>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ExpressionEnvelope {
    pub expression: ExpressionStatus,
}

/// A dependency-satisfied task as handed to a worker. `operation_time` is
/// the simulated processing cost in milliseconds.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct TaskSpec {
    pub id: TaskId,
    pub arg1: f64,
    pub arg2: f64,
    pub operation: Operation,
    pub operation_time: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct TaskEnvelope {
    pub task: TaskSpec,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct TaskResult {
    pub id: TaskId,
    pub result: f64,
}
