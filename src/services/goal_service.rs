use sqlx::PgPool;
use uuid::Uuid;

use super::ServiceError;
use crate::database::models::{Goal, GoalPatch, NewGoal};

const GOAL_COLUMNS: &str =
    "id, owner_id, title, description, target_value, current_value, unit, category, deadline, created_at";

/// Owner-scoped goal operations, mirroring TaskService.
pub struct GoalService {
    pool: PgPool,
}

impl GoalService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Goal>, ServiceError> {
        let goals = sqlx::query_as::<_, Goal>(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE owner_id = $1"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(goals)
    }

    pub async fn create(&self, owner_id: Uuid, new_goal: NewGoal) -> Result<Goal, ServiceError> {
        validate_new_goal(&new_goal)?;

        // The column default is 1 (inherited from the stored schema);
        // goals created through the API start at 0 unless told otherwise.
        let current_value = new_goal.current_value.unwrap_or(0.0);

        let goal = sqlx::query_as::<_, Goal>(&format!(
            "INSERT INTO goals (owner_id, title, description, target_value, current_value, unit, category, deadline) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {GOAL_COLUMNS}"
        ))
        .bind(owner_id)
        .bind(&new_goal.title)
        .bind(&new_goal.description)
        .bind(new_goal.target_value)
        .bind(current_value)
        .bind(&new_goal.unit)
        .bind(new_goal.category)
        .bind(new_goal.deadline)
        .fetch_one(&self.pool)
        .await?;

        Ok(goal)
    }

    pub async fn update(
        &self,
        owner_id: Uuid,
        goal_id: Uuid,
        patch: GoalPatch,
    ) -> Result<Goal, ServiceError> {
        validate_goal_patch(&patch)?;

        let goal = sqlx::query_as::<_, Goal>(&format!(
            "UPDATE goals SET \
                 title = COALESCE($3, title), \
                 description = COALESCE($4, description), \
                 target_value = COALESCE($5, target_value), \
                 current_value = COALESCE($6, current_value), \
                 unit = COALESCE($7, unit), \
                 category = COALESCE($8, category), \
                 deadline = COALESCE($9, deadline) \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {GOAL_COLUMNS}"
        ))
        .bind(goal_id)
        .bind(owner_id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.target_value)
        .bind(patch.current_value)
        .bind(patch.unit)
        .bind(patch.category)
        .bind(patch.deadline)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Goals"))?;

        Ok(goal)
    }

    pub async fn delete(&self, owner_id: Uuid, goal_id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND owner_id = $2")
            .bind(goal_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Goals"));
        }

        Ok(())
    }

    /// Overwrite `current_value` in a single statement. The value is
    /// stored verbatim: no clamping to [0, target_value] server-side.
    /// Display clamping is a client concern; see the goal store.
    pub async fn set_progress(
        &self,
        owner_id: Uuid,
        goal_id: Uuid,
        current_value: f64,
    ) -> Result<Goal, ServiceError> {
        if !current_value.is_finite() {
            return Err(ServiceError::Validation("currentValue must be a finite number".to_string()));
        }

        let goal = sqlx::query_as::<_, Goal>(&format!(
            "UPDATE goals SET current_value = $3 \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {GOAL_COLUMNS}"
        ))
        .bind(goal_id)
        .bind(owner_id)
        .bind(current_value)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Goals"))?;

        Ok(goal)
    }
}

fn validate_new_goal(new_goal: &NewGoal) -> Result<(), ServiceError> {
    if new_goal.title.trim().is_empty() {
        return Err(ServiceError::Validation("title must not be empty".to_string()));
    }
    if new_goal.description.trim().is_empty() {
        return Err(ServiceError::Validation("description must not be empty".to_string()));
    }
    if new_goal.unit.trim().is_empty() {
        return Err(ServiceError::Validation("unit must not be empty".to_string()));
    }
    if !(new_goal.target_value.is_finite() && new_goal.target_value > 0.0) {
        return Err(ServiceError::Validation("targetValue must be a positive number".to_string()));
    }
    if new_goal.current_value.is_some_and(|v| !v.is_finite()) {
        return Err(ServiceError::Validation("currentValue must be a finite number".to_string()));
    }
    Ok(())
}

fn validate_goal_patch(patch: &GoalPatch) -> Result<(), ServiceError> {
    if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ServiceError::Validation("title must not be empty".to_string()));
    }
    if patch.description.as_deref().is_some_and(|d| d.trim().is_empty()) {
        return Err(ServiceError::Validation("description must not be empty".to_string()));
    }
    if patch.unit.as_deref().is_some_and(|u| u.trim().is_empty()) {
        return Err(ServiceError::Validation("unit must not be empty".to_string()));
    }
    if patch.target_value.is_some_and(|v| !(v.is_finite() && v > 0.0)) {
        return Err(ServiceError::Validation("targetValue must be a positive number".to_string()));
    }
    if patch.current_value.is_some_and(|v| !v.is_finite()) {
        return Err(ServiceError::Validation("currentValue must be a finite number".to_string()));
    }
    Ok(())
}
