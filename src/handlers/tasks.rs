use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{NewTask, Task, TaskPatch};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::TaskService;

/// GET /tasks - All tasks owned by the caller
pub async fn list(Extension(user): Extension<AuthUser>) -> Result<Json<Vec<Task>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let tasks = TaskService::new(pool).list_for_owner(user.user_id).await?;

    Ok(Json(tasks))
}

/// POST /tasks/addtask - Create a task for the caller
///
/// The owner is always the authenticated identity; owner fields in the
/// request body are ignored.
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let pool = DatabaseManager::pool().await?;
    let task = TaskService::new(pool).create(user.user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /tasks/:id - Partially update a task
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let task = TaskService::new(pool).update(user.user_id, task_id, payload).await?;

    Ok(Json(task))
}

/// DELETE /tasks/:id - Permanently delete a task
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    TaskService::new(pool).delete(user.user_id, task_id).await?;

    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

/// GET /tasks/month/:month - Tasks of the caller within a YYYY-MM month
pub async fn list_by_month(
    Extension(user): Extension<AuthUser>,
    Path(month): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let tasks = TaskService::new(pool).list_by_month(user.user_id, &month).await?;

    Ok(Json(tasks))
}

/// PUT /tasks/complete/:id - Toggle the completed flag
pub async fn toggle_completion(
    Extension(user): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let task = TaskService::new(pool).toggle_completion(user.user_id, task_id).await?;

    Ok(Json(task))
}
