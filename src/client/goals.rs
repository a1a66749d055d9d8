use uuid::Uuid;

use super::{ClientError, MiloClient};
use crate::database::models::{Goal, GoalPatch, NewGoal, ProgressUpdate};

/// In-memory mirror of the caller's goal collection. Progress updates
/// are sent verbatim to the server (which stores them unclamped); the
/// mirror keeps the display-clamped value, matching what the progress
/// bars render.
pub struct GoalStore {
    client: MiloClient,
    goals: Vec<Goal>,
}

impl GoalStore {
    pub fn new(client: MiloClient) -> Self {
        Self {
            client,
            goals: Vec::new(),
        }
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.goals = self.client.get_json("/goals").await?;
        Ok(())
    }

    pub async fn add(&mut self, new_goal: NewGoal) -> Result<Goal, ClientError> {
        let goal: Goal = self.client.post_json("/goals/addgoal", &new_goal).await?;
        self.goals.push(goal.clone());
        Ok(goal)
    }

    pub async fn update(&mut self, goal_id: Uuid, patch: GoalPatch) -> Result<Goal, ClientError> {
        let goal: Goal = self.client.put_json(&format!("/goals/{}", goal_id), &patch).await?;
        if let Some(existing) = self.goals.iter_mut().find(|goal| goal.id == goal_id) {
            *existing = goal.clone();
        }
        Ok(goal)
    }

    pub async fn remove(&mut self, goal_id: Uuid) -> Result<(), ClientError> {
        let _: serde_json::Value = self.client.delete_json(&format!("/goals/{}", goal_id)).await?;
        self.goals.retain(|goal| goal.id != goal_id);
        Ok(())
    }

    /// Send the new progress value and return the server's confirmed
    /// goal. The mirror stores the value clamped to [0, targetValue]
    /// even though the server keeps it verbatim.
    pub async fn set_progress(&mut self, goal_id: Uuid, value: f64) -> Result<Goal, ClientError> {
        let confirmed: Goal = self
            .client
            .put_json(
                &format!("/goals/progress/{}", goal_id),
                &ProgressUpdate { current_value: value },
            )
            .await?;

        if let Some(goal) = self.goals.iter_mut().find(|goal| goal.id == goal_id) {
            goal.current_value = clamp_progress(value, goal.target_value);
        }

        Ok(confirmed)
    }
}

/// Clamp a progress value to [0, target] for display
pub fn clamp_progress(value: f64, target: f64) -> f64 {
    value.clamp(0.0, target.max(0.0))
}
