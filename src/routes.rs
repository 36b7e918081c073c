//! REST endpoints for goal submission and saved plans.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::{PlanError, Result};
use crate::plans::PlanService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PlanService>,
}

impl IntoResponse for PlanError {
    fn into_response(self) -> Response {
        let status = match &self {
            PlanError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PlanError::NotFound(_) => StatusCode::NOT_FOUND,
            PlanError::Upstream(_) | PlanError::Storage(_) => {
                error!(error = %self, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for PlanError {
    fn from(rejection: JsonRejection) -> Self {
        PlanError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for PlanError {
    fn from(rejection: PathRejection) -> Self {
        PlanError::InvalidInput(rejection.body_text())
    }
}

/// Build the Axum router with all planner routes.
pub fn plan_routes(service: Arc<PlanService>) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/plan-tasks", post(plan_tasks))
        .route("/resource-suggestions", post(resource_suggestions))
        .route("/saved-plans", get(list_plans))
        .route("/saved-plans/{id}", get(get_plan).delete(delete_plan))
        .route("/saved-plans/{id}/tasks/{task_index}", put(update_task))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `config`'s address and serve `app` until the process exits.
pub async fn serve(config: &ServerConfig, app: Router) -> Result<()> {
    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Task planner listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Status ──────────────────────────────────────────────────────────────

async fn home() -> impl IntoResponse {
    Json(json!({ "message": "Smart Task Planner backend is running" }))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

// ── Goal Submission ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PlanTasksRequest {
    #[serde(default)]
    goal: String,
}

async fn plan_tasks(
    State(state): State<AppState>,
    body: std::result::Result<Json<PlanTasksRequest>, JsonRejection>,
) -> std::result::Result<Json<Value>, PlanError> {
    let Json(body) = body?;
    let plan = state.service.submit_goal(&body.goal).await?;
    Ok(Json(json!({
        "goal": plan.goal,
        "task_breakdown": plan.task_breakdown,
        "plan_id": plan.id,
        "tasks": plan.tasks,
        "completion_percentage": plan.completion_percentage,
        "saved": true,
        "message": "Plan saved to storage!",
    })))
}

#[derive(Deserialize)]
struct ResourceRequest {
    #[serde(default)]
    goal: String,
    #[serde(default)]
    task: String,
}

async fn resource_suggestions(
    State(state): State<AppState>,
    body: std::result::Result<Json<ResourceRequest>, JsonRejection>,
) -> std::result::Result<Json<Value>, PlanError> {
    let Json(body) = body?;
    let resources = state
        .service
        .suggest_resources(&body.goal, &body.task)
        .await?;
    Ok(Json(json!({
        "goal": body.goal,
        "task": body.task,
        "resources": resources,
    })))
}

// ── Saved Plans ─────────────────────────────────────────────────────────

async fn list_plans(
    State(state): State<AppState>,
) -> std::result::Result<Json<Value>, PlanError> {
    let plans = state.service.list_plans().await?;
    Ok(Json(json!({
        "total_plans": plans.len(),
        "plans": plans,
    })))
}

async fn get_plan(
    State(state): State<AppState>,
    id: std::result::Result<Path<u64>, PathRejection>,
) -> std::result::Result<Json<Value>, PlanError> {
    let Path(id) = id?;
    let plan = state.service.get_plan(id).await?;
    Ok(Json(json!(plan)))
}

async fn delete_plan(
    State(state): State<AppState>,
    id: std::result::Result<Path<u64>, PathRejection>,
) -> std::result::Result<Json<Value>, PlanError> {
    let Path(id) = id?;
    let plan = state.service.delete_plan(id).await?;
    Ok(Json(json!({
        "deleted": true,
        "plan_id": id,
        "goal": plan.goal,
    })))
}

#[derive(Deserialize)]
struct UpdateTaskRequest {
    #[serde(default = "default_completed")]
    completed: bool,
}

fn default_completed() -> bool {
    true
}

/// The body is optional; an empty body marks the task completed.
async fn update_task(
    State(state): State<AppState>,
    path: std::result::Result<Path<(u64, usize)>, PathRejection>,
    body: Bytes,
) -> std::result::Result<Json<Value>, PlanError> {
    let Path((plan_id, task_index)) = path?;
    let completed = if body.iter().all(u8::is_ascii_whitespace) {
        default_completed()
    } else {
        serde_json::from_slice::<UpdateTaskRequest>(&body)
            .map_err(|e| PlanError::InvalidInput(format!("Invalid request body: {e}")))?
            .completed
    };

    let summary = state
        .service
        .update_task(plan_id, task_index, completed)
        .await?;
    Ok(Json(json!({
        "plan_id": plan_id,
        "task_index": task_index,
        "completed": completed,
        "completion_percentage": summary.completion_percentage,
        "completed_count": summary.completed_count,
        "total_count": summary.total_count,
    })))
}
