use chrono::NaiveDate;
use uuid::Uuid;

use super::{ClientError, MiloClient};
use crate::database::models::{NewTask, Task, TaskPatch};

/// In-memory mirror of the caller's task collection. `refresh` replaces
/// the mirror wholesale; mutations apply the server's confirmed
/// response. A failed request leaves the mirror untouched.
pub struct TaskStore {
    client: MiloClient,
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(client: MiloClient) -> Self {
        Self {
            client,
            tasks: Vec::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.tasks = self.client.get_json("/tasks").await?;
        Ok(())
    }

    pub async fn add(&mut self, new_task: NewTask) -> Result<Task, ClientError> {
        let task: Task = self.client.post_json("/tasks/addtask", &new_task).await?;
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub async fn update(&mut self, task_id: Uuid, patch: TaskPatch) -> Result<Task, ClientError> {
        let task: Task = self.client.put_json(&format!("/tasks/{}", task_id), &patch).await?;
        self.apply(task.clone());
        Ok(task)
    }

    pub async fn remove(&mut self, task_id: Uuid) -> Result<(), ClientError> {
        let _: serde_json::Value = self.client.delete_json(&format!("/tasks/{}", task_id)).await?;
        self.tasks.retain(|task| task.id != task_id);
        Ok(())
    }

    pub async fn toggle(&mut self, task_id: Uuid) -> Result<Task, ClientError> {
        let task: Task = self.client.put_empty(&format!("/tasks/complete/{}", task_id)).await?;
        self.apply(task.clone());
        Ok(task)
    }

    /// Fetch a month's tasks (`YYYY-MM`) without touching the mirror;
    /// the calendar view keeps its own list.
    pub async fn fetch_month(&self, month: &str) -> Result<Vec<Task>, ClientError> {
        self.client.get_json(&format!("/tasks/month/{}", month)).await
    }

    /// Tasks on the given calendar day (UTC), from the local mirror
    pub fn tasks_for_date(&self, date: NaiveDate) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.date.date_naive() == date)
            .collect()
    }

    fn apply(&mut self, updated: Task) {
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == updated.id) {
            *task = updated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{TaskCategory, TaskPriority};

    fn task_on(date: &str) -> Task {
        Task {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Buy milk".to_string(),
            description: "2%".to_string(),
            category: TaskCategory::Personal,
            priority: TaskPriority::Low,
            date: crate::database::models::flexible_date::parse(date).unwrap(),
            completed: false,
        }
    }

    #[test]
    fn filters_tasks_by_calendar_day() {
        let mut store = TaskStore::new(MiloClient::new("http://localhost:3000", "token"));
        store.tasks = vec![
            task_on("2025-03-10"),
            task_on("2025-03-10T23:30:00+00:00"),
            task_on("2025-03-11"),
        ];

        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(store.tasks_for_date(day).len(), 2);

        let empty = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        assert!(store.tasks_for_date(empty).is_empty());
    }
}
