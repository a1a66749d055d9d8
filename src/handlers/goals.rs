use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Goal, GoalPatch, NewGoal, ProgressUpdate};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::GoalService;

/// GET /goals - All goals owned by the caller
pub async fn list(Extension(user): Extension<AuthUser>) -> Result<Json<Vec<Goal>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let goals = GoalService::new(pool).list_for_owner(user.user_id).await?;

    Ok(Json(goals))
}

/// POST /goals/addgoal - Create a goal for the caller
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewGoal>,
) -> Result<(StatusCode, Json<Goal>), ApiError> {
    let pool = DatabaseManager::pool().await?;
    let goal = GoalService::new(pool).create(user.user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(goal)))
}

/// PUT /goals/:id - Partially update a goal
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
    Json(payload): Json<GoalPatch>,
) -> Result<Json<Goal>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let goal = GoalService::new(pool).update(user.user_id, goal_id, payload).await?;

    Ok(Json(goal))
}

/// DELETE /goals/:id - Permanently delete a goal
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    GoalService::new(pool).delete(user.user_id, goal_id).await?;

    Ok(Json(json!({ "message": "Goals deleted successfully" })))
}

/// PUT /goals/progress/:id - Overwrite the goal's current value
///
/// The stored value is not clamped to the target; the dashboard derives
/// completion from `currentValue >= targetValue` either way.
pub async fn set_progress(
    Extension(user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
    Json(payload): Json<ProgressUpdate>,
) -> Result<Json<Goal>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let goal = GoalService::new(pool)
        .set_progress(user.user_id, goal_id, payload.current_value)
        .await?;

    Ok(Json(goal))
}
