use std::sync::Arc;

use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::{Route, State};

use orchestrator_client::{
    CalculateRequest, CalculateResponse, ExpressionEnvelope, ExpressionList, TaskEnvelope,
    TaskId, TaskResult, TaskSpec,
};
use telemetry::Measure;

use crate::config::OperationTimes;
use crate::error::ApiError;
use crate::expression;
use crate::scheduler::Scheduler;

lazy_static! {
    static ref CALCULATE_MEASURE: Measure = Measure::new("api", "calculate");
    static ref GET_TASK_MEASURE: Measure = Measure::new("api", "get_task");
    static ref SUBMIT_RESULT_MEASURE: Measure = Measure::new("api", "submit_result");
}

#[get("/status")]
fn health() -> Value {
    json!({ "status": "ok" })
}

#[get("/metrics")]
fn metrics() -> Result<String, Status> {
    telemetry::encode().map_err(|_| Status::InternalServerError)
}

#[post("/api/v1/calculate", format = "json", data = "<request>")]
async fn calculate(
    request: Json<CalculateRequest>,
    scheduler: &State<Arc<Scheduler>>,
) -> Result<status::Created<Json<CalculateResponse>>, ApiError> {
    CALCULATE_MEASURE
        .stats(async move {
            let expr = expression::parse(&request.expression)?;
            let id = scheduler.submit_expression(&expr).await;

            let location = format!("/api/v1/expressions/{}", id);
            Ok(status::Created::new(location).body(Json(CalculateResponse { id })))
        })
        .await
}

#[get("/api/v1/expressions")]
async fn list_expressions(scheduler: &State<Arc<Scheduler>>) -> Json<ExpressionList> {
    Json(ExpressionList {
        expressions: scheduler.list().await,
    })
}

#[get("/api/v1/expressions/<id>")]
async fn get_expression(
    id: TaskId,
    scheduler: &State<Arc<Scheduler>>,
) -> Option<Json<ExpressionEnvelope>> {
    scheduler
        .status(id)
        .await
        .map(|expression| Json(ExpressionEnvelope { expression }))
}

#[get("/internal/task")]
async fn get_task(
    scheduler: &State<Arc<Scheduler>>,
    times: &State<OperationTimes>,
) -> Result<Option<Json<TaskEnvelope>>, ApiError> {
    GET_TASK_MEASURE
        .stats(async move {
            let acquired = scheduler.acquire_next().await?;

            Ok(acquired.map(|assignment| {
                Json(TaskEnvelope {
                    task: TaskSpec {
                        id: assignment.id,
                        arg1: assignment.arg1,
                        arg2: assignment.arg2,
                        operation: assignment.operation,
                        operation_time: times.millis(assignment.operation),
                    },
                })
            }))
        })
        .await
}

#[post("/internal/task", format = "json", data = "<result>")]
async fn submit_result(
    result: Json<TaskResult>,
    scheduler: &State<Arc<Scheduler>>,
) -> Result<(), ApiError> {
    SUBMIT_RESULT_MEASURE
        .stats(async move { Ok(scheduler.submit_result(result.id, result.result).await?) })
        .await
}

pub fn routes() -> Vec<Route> {
    routes![
        health,
        metrics,
        calculate,
        list_expressions,
        get_expression,
        get_task,
        submit_result
    ]
}
