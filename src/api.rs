use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::protocol::{
    CalculateRequest, CalculateResponse, ExpressionResponse, ExpressionsResponse, ResultReport,
    TaskResponse,
};
use crate::queue::TaskQueue;
use crate::registry::ExpressionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ExpressionRegistry>,
    pub queue: TaskQueue,
    pub task_wait_timeout: Duration,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/calculate", post(calculate))
        .route("/api/v1/expressions", get(list_expressions))
        .route("/api/v1/expressions/:id", get(get_expression))
        .route("/internal/task", get(fetch_task))
        .route("/internal/task/result", post(accept_result))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Bodies are parsed by hand so that malformed JSON and empty fields both map
// to 422 instead of the extractor's default rejection.

async fn calculate(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<CalculateResponse>), ApiError> {
    let req: CalculateRequest =
        serde_json::from_str(&body).map_err(|e| ApiError::InvalidInput(e.to_string()))?;
    if req.expression.is_empty() {
        return Err(ApiError::InvalidInput(
            "expression must not be empty".to_string(),
        ));
    }

    let expr = state.registry.create(&req.expression).await;
    tracing::info!("accepted expression {} ({})", expr.id, expr.expression);

    Ok((StatusCode::CREATED, Json(CalculateResponse { id: expr.id })))
}

async fn list_expressions(State(state): State<AppState>) -> Json<ExpressionsResponse> {
    let expressions = state.registry.list().await;
    Json(ExpressionsResponse { expressions })
}

async fn get_expression(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExpressionResponse>, ApiError> {
    let expression = state
        .registry
        .get(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(id))?;
    Ok(Json(ExpressionResponse { expression }))
}

async fn fetch_task(State(state): State<AppState>) -> Result<Json<TaskResponse>, ApiError> {
    match state.queue.dequeue(state.task_wait_timeout).await {
        Some(task) => {
            tracing::debug!("handing out task {}", task.id);
            Ok(Json(TaskResponse { task }))
        }
        None => Err(ApiError::NoTaskAvailable),
    }
}

async fn accept_result(
    State(state): State<AppState>,
    body: String,
) -> Result<StatusCode, ApiError> {
    let report: ResultReport =
        serde_json::from_str(&body).map_err(|e| ApiError::InvalidInput(e.to_string()))?;
    if report.id.is_empty() {
        return Err(ApiError::InvalidInput("id must not be empty".to_string()));
    }

    let expr = state.registry.complete(&report.id, report.result).await?;
    tracing::info!(
        "expression {} completed with result {:?}",
        expr.id,
        report.result
    );

    Ok(StatusCode::OK)
}
