use chrono::{DateTime, Datelike, Duration, Local, Utc};
use serde::Serialize;

use crate::database::models::{Goal, Task};

/// Aggregates the dashboard renders from the mirrored collections:
/// today's completion, goal counts, weekly completion, month volume.
/// Weeks run Sunday through Saturday.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_total: usize,
    pub today_completed: usize,
    pub today_completion_rate: f64,
    pub active_goals: usize,
    pub completed_goals: usize,
    pub average_goal_progress: f64,
    pub week_total: usize,
    pub week_completed: usize,
    pub week_completion_rate: f64,
    pub month_total: usize,
}

impl DashboardStats {
    pub fn compute(tasks: &[Task], goals: &[Goal], now: DateTime<Utc>) -> Self {
        let today = now.with_timezone(&Local).date_naive();

        let week_start = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
        let week_end = week_start + Duration::days(6);

        let today_tasks: Vec<&Task> = tasks
            .iter()
            .filter(|task| task.date.with_timezone(&Local).date_naive() == today)
            .collect();
        let today_completed = today_tasks.iter().filter(|task| task.completed).count();

        let week_tasks: Vec<&Task> = tasks
            .iter()
            .filter(|task| {
                let day = task.date.with_timezone(&Local).date_naive();
                day >= week_start && day <= week_end
            })
            .collect();
        let week_completed = week_tasks.iter().filter(|task| task.completed).count();

        // Month bucketing follows the calendar month of the current UTC
        // timestamp, like the original's ISO-prefix comparison
        let month_total = tasks
            .iter()
            .filter(|task| task.date.year() == now.year() && task.date.month() == now.month())
            .count();

        let completed_goals = goals.iter().filter(|goal| goal.is_complete()).count();
        let active_goals = goals.len() - completed_goals;

        // Average of raw progress ratios; overachieving goals pull the
        // average above 100%
        let average_goal_progress = if goals.is_empty() {
            0.0
        } else {
            goals
                .iter()
                .map(|goal| {
                    if goal.target_value > 0.0 {
                        goal.current_value / goal.target_value * 100.0
                    } else {
                        0.0
                    }
                })
                .sum::<f64>()
                / goals.len() as f64
        };

        Self {
            today_total: today_tasks.len(),
            today_completed,
            today_completion_rate: rate(today_completed, today_tasks.len()),
            active_goals,
            completed_goals,
            average_goal_progress,
            week_total: week_tasks.len(),
            week_completed,
            week_completion_rate: rate(week_completed, week_tasks.len()),
            month_total,
        }
    }
}

fn rate(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}
