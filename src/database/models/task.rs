use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::flexible_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "task_category", rename_all = "lowercase")]
pub enum TaskCategory {
    Work,
    Personal,
    Health,
    Learning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// A single to-do item, owned by exactly one user. Hard-deleted on
/// removal; `completed` flips through the toggle endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub date: DateTime<Utc>,
    pub completed: bool,
}

/// Creation payload. Carries no owner field: the owner always comes
/// from the authenticated identity, and any `ownerId`/`userId` in the
/// request body is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    /// Defaults to the creation time when omitted
    #[serde(default, deserialize_with = "flexible_date::deserialize_opt", skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "flexible_date::deserialize_opt", skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_serializes_camel_case() {
        let task = Task {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Buy milk".to_string(),
            description: "2%".to_string(),
            category: TaskCategory::Personal,
            priority: TaskPriority::Low,
            date: Utc::now(),
            completed: false,
        };

        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("ownerId").is_some());
        assert_eq!(value["category"], "personal");
        assert_eq!(value["priority"], "low");
    }

    #[test]
    fn new_task_ignores_owner_in_body() {
        // Spoofed ownerId/userId fields are dropped at deserialization
        let body = serde_json::json!({
            "title": "Buy milk",
            "description": "2%",
            "category": "personal",
            "priority": "low",
            "date": "2025-03-10",
            "ownerId": "11111111-1111-1111-1111-111111111111",
            "userId": "22222222-2222-2222-2222-222222222222"
        });

        let new_task: NewTask = serde_json::from_value(body).unwrap();
        assert_eq!(new_task.title, "Buy milk");
        assert_eq!(new_task.date.unwrap().to_rfc3339(), "2025-03-10T00:00:00+00:00");
        assert!(!new_task.completed);
    }

    #[test]
    fn new_task_rejects_unknown_enum_values() {
        let body = serde_json::json!({
            "title": "Stretch",
            "description": "morning routine",
            "category": "fitness",
            "priority": "low"
        });

        assert!(serde_json::from_value::<NewTask>(body).is_err());
    }

    #[test]
    fn patch_only_serializes_set_fields() {
        let patch = TaskPatch {
            completed: Some(true),
            ..Default::default()
        };

        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 1);
        assert_eq!(value["completed"], true);
    }
}
