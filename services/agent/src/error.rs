use derive_more::Display;

use orchestrator_client::TaskId;

#[derive(Debug, Display, Clone, PartialEq)]
pub enum AgentError {
    #[display(fmt = "connection error: {}", _0)]
    Transport(String),

    #[display(fmt = "processing error: {}", _0)]
    Processing(String),

    #[display(fmt = "failed to push result for task {}", _0)]
    PushFailed(TaskId),
}

impl std::error::Error for AgentError {}

impl From<reqwest::Error> for AgentError {
    fn from(e: reqwest::Error) -> Self {
        AgentError::Transport(e.to_string())
    }
}
