use std::borrow::Cow;

use log::error;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{response, Request};
use serde::Serialize;

use telemetry::IsErr;

use crate::expression::ExpressionError;
use crate::scheduler::SchedulerError;

#[derive(Debug)]
pub enum ApiError {
    InternalError(String),
    InvalidExpression(String),
    NotFound,
}

impl From<ExpressionError> for ApiError {
    fn from(e: ExpressionError) -> Self {
        ApiError::InvalidExpression(e.to_string())
    }
}

impl From<SchedulerError> for ApiError {
    fn from(e: SchedulerError) -> Self {
        match e {
            // A duplicate submission is a routine race, rejected the same
            // way as an unknown task
            SchedulerError::NotFound | SchedulerError::AlreadyCompleted => ApiError::NotFound,
            SchedulerError::InternalError(msg) => ApiError::InternalError(msg),
        }
    }
}

impl IsErr for ApiError {
    fn is_err(&self) -> bool {
        matches!(self, ApiError::InternalError(_))
    }
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    message: Cow<'a, str>,
}

impl<'r> response::Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let (message, status) = match self {
            ApiError::InternalError(e) => {
                error!("Internal Error: {}", e);
                (
                    Cow::Borrowed("Internal Server Error"),
                    Status::InternalServerError,
                )
            }
            ApiError::InvalidExpression(e) => (Cow::Owned(e), Status::UnprocessableEntity),
            ApiError::NotFound => (Cow::Borrowed("Not Found"), Status::NotFound),
        };
        response::status::Custom(status, Json(ErrorResponse { message })).respond_to(req)
    }
}
