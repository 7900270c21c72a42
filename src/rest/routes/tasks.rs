// rest/routes/tasks.rs — Task REST routes.
//
// Error bodies are deliberately generic: store detail goes to the log,
// `{"error": <text>}` goes to the client.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::tasks::{NewTask, Task, TaskError, TaskPatch};
use crate::AppContext;

type Rejection = (StatusCode, Json<Value>);

fn store_failure(endpoint: &str, err: TaskError, message: &str) -> Rejection {
    error!(endpoint, err = %err, "store operation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
}

pub async fn list_tasks(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Vec<Task>>, Rejection> {
    match ctx.storage.list_tasks().await {
        Ok(tasks) => Ok(Json(tasks)),
        Err(e) => Err(store_failure("list_tasks", e, "Failed to fetch tasks")),
    }
}

pub async fn create_task(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<NewTask>,
) -> Result<Json<Task>, Rejection> {
    match ctx.storage.create_task(&body).await {
        Ok(task) => Ok(Json(task)),
        Err(e) => Err(store_failure("create_task", e, "Failed to create task")),
    }
}

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub completed: bool,
}

/// Replaces exactly the completion flag. An unmatched id yields a JSON
/// null body rather than a 404; only the partial-update endpoint
/// distinguishes missing rows.
pub async fn set_status(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
    Json(body): Json<SetStatusRequest>,
) -> Result<Json<Option<Task>>, Rejection> {
    match ctx.storage.set_completed(id, body.completed).await {
        Ok(task) => Ok(Json(task)),
        Err(e) => Err(store_failure("set_status", e, "Failed to update task")),
    }
}

pub async fn update_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
    Json(body): Json<TaskPatch>,
) -> Result<Json<Task>, Rejection> {
    match ctx.storage.update_task(id, &body).await {
        Ok(task) => Ok(Json(task)),
        Err(TaskError::NoFieldsProvided) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No data provided to update" })),
        )),
        Err(TaskError::NotFound) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Task not found" })),
        )),
        Err(e) => Err(store_failure("update_task", e, "Failed to update task")),
    }
}

/// Row-count-blind delete: reports success whether or not the id matched
/// a row.
pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, Rejection> {
    match ctx.storage.delete_task(id).await {
        Ok(()) => Ok(Json(json!({ "message": "Task deleted successfully" }))),
        Err(e) => Err(store_failure("delete_task", e, "Failed to delete task")),
    }
}
