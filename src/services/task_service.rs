use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::ServiceError;
use crate::database::models::{NewTask, Task, TaskPatch};

const TASK_COLUMNS: &str = "id, owner_id, title, description, category, priority, date, completed";

/// Owner-scoped task operations. Every query carries the owner id, so a
/// task belonging to another user behaves exactly like a missing one.
pub struct TaskService {
    pool: PgPool,
}

impl TaskService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, ServiceError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = $1"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn create(&self, owner_id: Uuid, new_task: NewTask) -> Result<Task, ServiceError> {
        validate_new_task(&new_task)?;

        let date = new_task.date.unwrap_or_else(Utc::now);

        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (owner_id, title, description, category, priority, date, completed) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(owner_id)
        .bind(&new_task.title)
        .bind(&new_task.description)
        .bind(new_task.category)
        .bind(new_task.priority)
        .bind(date)
        .bind(new_task.completed)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn update(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> Result<Task, ServiceError> {
        validate_task_patch(&patch)?;

        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET \
                 title = COALESCE($3, title), \
                 description = COALESCE($4, description), \
                 category = COALESCE($5, category), \
                 priority = COALESCE($6, priority), \
                 date = COALESCE($7, date), \
                 completed = COALESCE($8, completed) \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task_id)
        .bind(owner_id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.category)
        .bind(patch.priority)
        .bind(patch.date)
        .bind(patch.completed)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Task"))?;

        Ok(task)
    }

    pub async fn delete(&self, owner_id: Uuid, task_id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(task_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Task"));
        }

        Ok(())
    }

    /// All tasks of the owner whose `date` falls inside the given
    /// `YYYY-MM` month, bounds inclusive, in server-local time.
    pub async fn list_by_month(&self, owner_id: Uuid, month: &str) -> Result<Vec<Task>, ServiceError> {
        let (start, end) = month_range(month)?;

        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE owner_id = $1 AND date >= $2 AND date <= $3"
        ))
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Flip `completed` in a single statement. Two concurrent toggles
    /// serialize at the row level instead of racing a read-then-write.
    pub async fn toggle_completion(&self, owner_id: Uuid, task_id: Uuid) -> Result<Task, ServiceError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET completed = NOT completed \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Task"))?;

        Ok(task)
    }
}

fn validate_new_task(new_task: &NewTask) -> Result<(), ServiceError> {
    if new_task.title.trim().is_empty() {
        return Err(ServiceError::Validation("title must not be empty".to_string()));
    }
    if new_task.description.trim().is_empty() {
        return Err(ServiceError::Validation("description must not be empty".to_string()));
    }
    Ok(())
}

fn validate_task_patch(patch: &TaskPatch) -> Result<(), ServiceError> {
    if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ServiceError::Validation("title must not be empty".to_string()));
    }
    if patch.description.as_deref().is_some_and(|d| d.trim().is_empty()) {
        return Err(ServiceError::Validation("description must not be empty".to_string()));
    }
    Ok(())
}

/// Parse a `YYYY-MM` token into the inclusive instant range
/// [first instant of month, last instant of month] in server-local time.
pub fn month_range(month: &str) -> Result<(DateTime<Utc>, DateTime<Utc>), ServiceError> {
    let invalid = || ServiceError::Validation(format!("invalid month '{}', expected YYYY-MM", month));

    let (year_str, month_str) = month.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year_str.parse().map_err(|_| invalid())?;
    let month_num: u32 = month_str.parse().map_err(|_| invalid())?;

    let first = NaiveDate::from_ymd_opt(year, month_num, 1).ok_or_else(invalid)?;
    let next = if month_num == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month_num + 1, 1)
    }
    .ok_or_else(invalid)?;

    let start = local_instant(first.and_time(NaiveTime::MIN))?;
    let end = local_instant(next.and_time(NaiveTime::MIN))? - Duration::milliseconds(1);

    Ok((start, end))
}

fn local_instant(naive: NaiveDateTime) -> Result<DateTime<Utc>, ServiceError> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ServiceError::Validation(format!("unrepresentable local time: {}", naive)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn month_range_covers_whole_month_inclusive() {
        let (start, end) = month_range("2025-08").unwrap();

        let local_start = start.with_timezone(&Local);
        assert_eq!(local_start.date_naive(), NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
        assert_eq!(local_start.time(), NaiveTime::MIN);

        let local_end = end.with_timezone(&Local);
        assert_eq!(local_end.date_naive(), NaiveDate::from_ymd_opt(2025, 8, 31).unwrap());
        assert_eq!(local_end.hour(), 23);
        assert_eq!(local_end.minute(), 59);
        assert_eq!(local_end.second(), 59);
    }

    #[test]
    fn month_range_handles_december_rollover() {
        let (_, end) = month_range("2025-12").unwrap();
        let local_end = end.with_timezone(&Local);
        assert_eq!(local_end.date_naive(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn month_range_handles_leap_february() {
        let (_, end) = month_range("2024-02").unwrap();
        let local_end = end.with_timezone(&Local);
        assert_eq!(local_end.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn month_range_rejects_malformed_tokens() {
        assert!(month_range("2025").is_err());
        assert!(month_range("2025-13").is_err());
        assert!(month_range("2025-00").is_err());
        assert!(month_range("2025-08-15").is_err());
        assert!(month_range("august").is_err());
    }

    #[test]
    fn validates_required_task_fields() {
        let new_task = NewTask {
            title: "   ".to_string(),
            description: "desc".to_string(),
            category: crate::database::models::TaskCategory::Work,
            priority: crate::database::models::TaskPriority::High,
            date: None,
            completed: false,
        };
        assert!(validate_new_task(&new_task).is_err());

        let patch = TaskPatch {
            description: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_task_patch(&patch).is_err());

        // Empty patch is a no-op update, not an error
        assert!(validate_task_patch(&TaskPatch::default()).is_ok());
    }
}
