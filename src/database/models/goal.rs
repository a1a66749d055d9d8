use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::flexible_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "goal_category", rename_all = "lowercase")]
pub enum GoalCategory {
    Fitness,
    Career,
    Personal,
    Learning,
    Financial,
}

/// A long-term goal with numeric progress toward a target. Completion
/// is derived from the values, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub target_value: f64,
    pub current_value: f64,
    pub unit: String,
    pub category: GoalCategory,
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn is_complete(&self) -> bool {
        self.current_value >= self.target_value
    }

    /// Progress as a fraction clamped to [0, 1] for display. The stored
    /// `current_value` itself is not clamped.
    pub fn progress_fraction(&self) -> f64 {
        if self.target_value <= 0.0 {
            return 0.0;
        }
        (self.current_value / self.target_value).clamp(0.0, 1.0)
    }
}

/// Creation payload; owner comes from the authenticated identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub target_value: f64,
    /// Starts at 0 when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    pub unit: String,
    pub category: GoalCategory,
    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub deadline: DateTime<Utc>,
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<GoalCategory>,
    #[serde(default, deserialize_with = "flexible_date::deserialize_opt", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

/// Body of the progress endpoint: `{ "currentValue": <number> }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub current_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(current: f64, target: f64) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Read books".to_string(),
            description: "one per week".to_string(),
            target_value: target,
            current_value: current,
            unit: "books".to_string(),
            category: GoalCategory::Learning,
            deadline: Utc::now(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn completion_is_derived() {
        assert!(!goal(9.0, 10.0).is_complete());
        assert!(goal(10.0, 10.0).is_complete());
        // Overachievement still counts as complete
        assert!(goal(12.0, 10.0).is_complete());
    }

    #[test]
    fn progress_fraction_is_clamped_for_display() {
        assert_eq!(goal(12.0, 10.0).progress_fraction(), 1.0);
        assert_eq!(goal(-3.0, 10.0).progress_fraction(), 0.0);
        assert_eq!(goal(5.0, 10.0).progress_fraction(), 0.5);
    }

    #[test]
    fn progress_update_uses_camel_case() {
        let update: ProgressUpdate = serde_json::from_str(r#"{"currentValue": 12.5}"#).unwrap();
        assert_eq!(update.current_value, 12.5);
    }
}
