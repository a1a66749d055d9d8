use clap::Subcommand;
use uuid::Uuid;

use crate::cli::config::api_client;
use crate::cli::utils::{output_list, output_success};
use crate::cli::OutputFormat;
use crate::client::TaskStore;
use crate::database::models::{flexible_date, NewTask, Task, TaskCategory, TaskPatch, TaskPriority};

#[derive(Subcommand)]
pub enum TaskCommands {
    #[command(about = "List all tasks")]
    List,

    #[command(about = "Add a task")]
    Add {
        #[arg(help = "Task title")]
        title: String,
        #[arg(help = "Task description")]
        description: String,
        #[arg(long, value_enum, default_value = "work")]
        category: TaskCategory,
        #[arg(long, value_enum, default_value = "medium")]
        priority: TaskPriority,
        #[arg(long, help = "Due date (YYYY-MM-DD or RFC 3339); defaults to now")]
        date: Option<String>,
    },

    #[command(about = "Update a task")]
    Update {
        #[arg(help = "Task ID")]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_enum)]
        category: Option<TaskCategory>,
        #[arg(long, value_enum)]
        priority: Option<TaskPriority>,
        #[arg(long, help = "Due date (YYYY-MM-DD or RFC 3339)")]
        date: Option<String>,
    },

    #[command(about = "Delete a task")]
    Delete {
        #[arg(help = "Task ID")]
        id: String,
    },

    #[command(about = "Toggle a task's completed flag")]
    Toggle {
        #[arg(help = "Task ID")]
        id: String,
    },

    #[command(about = "List tasks for a month")]
    Month {
        #[arg(help = "Month as YYYY-MM")]
        month: String,
    },
}

pub async fn handle(cmd: TaskCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut store = TaskStore::new(api_client()?);

    match cmd {
        TaskCommands::List => {
            store.refresh().await?;
            output_list(&output_format, store.tasks(), "No tasks", format_task)
        }
        TaskCommands::Add { title, description, category, priority, date } => {
            let date = parse_date_arg(date.as_deref())?;
            let task = store
                .add(NewTask {
                    title,
                    description,
                    category,
                    priority,
                    date,
                    completed: false,
                })
                .await?;

            output_success(
                &output_format,
                &format!("Added task '{}'", task.title),
                Some(serde_json::to_value(&task)?),
            )
        }
        TaskCommands::Update { id, title, description, category, priority, date } => {
            let task_id = parse_id(&id)?;
            let date = parse_date_arg(date.as_deref())?;
            let task = store
                .update(
                    task_id,
                    TaskPatch {
                        title,
                        description,
                        category,
                        priority,
                        date,
                        completed: None,
                    },
                )
                .await?;

            output_success(
                &output_format,
                &format!("Updated task '{}'", task.title),
                Some(serde_json::to_value(&task)?),
            )
        }
        TaskCommands::Delete { id } => {
            let task_id = parse_id(&id)?;
            store.remove(task_id).await?;
            output_success(&output_format, "Task deleted successfully", None)
        }
        TaskCommands::Toggle { id } => {
            let task_id = parse_id(&id)?;
            let task = store.toggle(task_id).await?;
            let state = if task.completed { "done" } else { "open" };
            output_success(
                &output_format,
                &format!("Task '{}' is now {}", task.title, state),
                Some(serde_json::to_value(&task)?),
            )
        }
        TaskCommands::Month { month } => {
            let tasks = store.fetch_month(&month).await?;
            output_list(&output_format, &tasks, "No tasks in that month", format_task)
        }
    }
}

fn format_task(task: &Task) -> String {
    let marker = if task.completed { "x" } else { " " };
    format!(
        "[{}] {}  {}  {:?}/{:?}  {}",
        marker,
        task.id,
        task.date.format("%Y-%m-%d"),
        task.category,
        task.priority,
        task.title
    )
}

fn parse_id(id: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| anyhow::anyhow!("invalid task id: {}", id))
}

fn parse_date_arg(date: Option<&str>) -> anyhow::Result<Option<chrono::DateTime<chrono::Utc>>> {
    match date {
        None => Ok(None),
        Some(value) => flexible_date::parse(value)
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("invalid date '{}', expected YYYY-MM-DD or RFC 3339", value)),
    }
}
