use chrono::Utc;

use crate::cli::config::api_client;
use crate::cli::OutputFormat;
use crate::client::{DashboardStats, GoalStore, TaskStore};

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let client = api_client()?;
    let mut tasks = TaskStore::new(client.clone());
    let mut goals = GoalStore::new(client);

    tasks.refresh().await?;
    goals.refresh().await?;

    let stats = DashboardStats::compute(tasks.tasks(), goals.goals(), Utc::now());

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Text => {
            println!(
                "Today's tasks:    {}/{} completed ({:.0}%)",
                stats.today_completed, stats.today_total, stats.today_completion_rate
            );
            println!(
                "Active goals:     {} ({} completed)",
                stats.active_goals, stats.completed_goals
            );
            println!("Weekly progress:  {:.0}% completion rate", stats.week_completion_rate);
            println!("This month:       {} total tasks", stats.month_total);
            println!("Goal progress:    {:.0}% on average", stats.average_goal_progress);
        }
    }

    Ok(())
}
