use derive_more::Display;

use telemetry::IsErr;

#[derive(Debug, Display, Clone, PartialEq)]
pub enum SchedulerError {
    #[display(fmt = "task not found")]
    NotFound,

    #[display(fmt = "task already completed")]
    AlreadyCompleted,

    #[display(fmt = "internal error: {}", _0)]
    InternalError(String),
}

impl std::error::Error for SchedulerError {}

impl IsErr for SchedulerError {
    fn is_err(&self) -> bool {
        matches!(self, SchedulerError::InternalError(_))
    }
}
