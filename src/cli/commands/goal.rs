use clap::Subcommand;
use uuid::Uuid;

use crate::cli::config::api_client;
use crate::cli::utils::{output_list, output_success};
use crate::cli::OutputFormat;
use crate::client::GoalStore;
use crate::database::models::{flexible_date, Goal, GoalCategory, GoalPatch, NewGoal};

#[derive(Subcommand)]
pub enum GoalCommands {
    #[command(about = "List all goals")]
    List,

    #[command(about = "Add a goal")]
    Add {
        #[arg(help = "Goal title")]
        title: String,
        #[arg(help = "Goal description")]
        description: String,
        #[arg(long, help = "Target value to reach")]
        target: f64,
        #[arg(long, help = "Unit label, e.g. km or books")]
        unit: String,
        #[arg(long, value_enum, default_value = "personal")]
        category: GoalCategory,
        #[arg(long, help = "Deadline (YYYY-MM-DD or RFC 3339)")]
        deadline: String,
        #[arg(long, help = "Starting value; defaults to 0")]
        current: Option<f64>,
    },

    #[command(about = "Update a goal")]
    Update {
        #[arg(help = "Goal ID")]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        target: Option<f64>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long, value_enum)]
        category: Option<GoalCategory>,
        #[arg(long, help = "Deadline (YYYY-MM-DD or RFC 3339)")]
        deadline: Option<String>,
    },

    #[command(about = "Delete a goal")]
    Delete {
        #[arg(help = "Goal ID")]
        id: String,
    },

    #[command(about = "Set a goal's current progress value")]
    Progress {
        #[arg(help = "Goal ID")]
        id: String,
        #[arg(help = "New current value")]
        value: f64,
    },
}

pub async fn handle(cmd: GoalCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut store = GoalStore::new(api_client()?);

    match cmd {
        GoalCommands::List => {
            store.refresh().await?;
            output_list(&output_format, store.goals(), "No goals", format_goal)
        }
        GoalCommands::Add { title, description, target, unit, category, deadline, current } => {
            let deadline = parse_date_arg(&deadline)?;
            let goal = store
                .add(NewGoal {
                    title,
                    description,
                    target_value: target,
                    current_value: current,
                    unit,
                    category,
                    deadline,
                })
                .await?;

            output_success(
                &output_format,
                &format!("Added goal '{}'", goal.title),
                Some(serde_json::to_value(&goal)?),
            )
        }
        GoalCommands::Update { id, title, description, target, unit, category, deadline } => {
            let goal_id = parse_id(&id)?;
            let deadline = match deadline {
                Some(value) => Some(parse_date_arg(&value)?),
                None => None,
            };
            let goal = store
                .update(
                    goal_id,
                    GoalPatch {
                        title,
                        description,
                        target_value: target,
                        current_value: None,
                        unit,
                        category,
                        deadline,
                    },
                )
                .await?;

            output_success(
                &output_format,
                &format!("Updated goal '{}'", goal.title),
                Some(serde_json::to_value(&goal)?),
            )
        }
        GoalCommands::Delete { id } => {
            let goal_id = parse_id(&id)?;
            store.remove(goal_id).await?;
            output_success(&output_format, "Goals deleted successfully", None)
        }
        GoalCommands::Progress { id, value } => {
            let goal_id = parse_id(&id)?;
            let goal = store.set_progress(goal_id, value).await?;

            output_success(
                &output_format,
                &format!(
                    "Goal '{}' at {} / {} {}",
                    goal.title, goal.current_value, goal.target_value, goal.unit
                ),
                Some(serde_json::to_value(&goal)?),
            )
        }
    }
}

fn format_goal(goal: &Goal) -> String {
    let marker = if goal.is_complete() { "✓" } else { " " };
    format!(
        "[{}] {}  {:.0}%  {} / {} {}  (due {})  {}",
        marker,
        goal.id,
        goal.progress_fraction() * 100.0,
        goal.current_value,
        goal.target_value,
        goal.unit,
        goal.deadline.format("%Y-%m-%d"),
        goal.title
    )
}

fn parse_id(id: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| anyhow::anyhow!("invalid goal id: {}", id))
}

fn parse_date_arg(value: &str) -> anyhow::Result<chrono::DateTime<chrono::Utc>> {
    flexible_date::parse(value)
        .ok_or_else(|| anyhow::anyhow!("invalid date '{}', expected YYYY-MM-DD or RFC 3339", value))
}
