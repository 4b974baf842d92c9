use chrono::NaiveDateTime;
use clap::Args;
use tracing::warn;

use crate::application::commands::utils::date_format::{format_deadline, parse_deadline};
use crate::application::commands::utils::recurrence_args::RecurrenceArgs;
use crate::application::handlers::AppContext;
use crate::application::services::task_service::NewTask;
use crate::domain::entities::task::{Priority, TaskStatus};
use crate::domain::value_objects::reminder_offset::ReminderOffset;

#[derive(Debug, Args)]
pub struct AddTaskArgs {
    /// Task title
    pub title: String,

    #[arg(short, long, default_value = "")]
    pub description: String,

    /// low, medium or high
    #[arg(short, long, default_value_t = Priority::Medium)]
    pub priority: Priority,

    /// not-started, in-progress or completed
    #[arg(short, long, default_value_t = TaskStatus::NotStarted)]
    pub status: TaskStatus,

    /// "YYYY-MM-DD HH:MM", or a bare date for end of day
    #[arg(long, value_parser = parse_deadline)]
    pub deadline: Option<NaiveDateTime>,

    /// none, 5m, 15m, 30m, 1h or 1d
    #[arg(short, long, default_value_t = ReminderOffset::NoReminder,
          value_parser = str::parse::<ReminderOffset>)]
    pub reminder: ReminderOffset,

    #[command(flatten)]
    pub recurrence: RecurrenceArgs,
}

pub fn run_add_task(ctx: &AppContext, args: AddTaskArgs) -> anyhow::Result<()> {
    let recurrence = args.recurrence.to_pattern();
    if recurrence.as_ref().is_some_and(|p| p.is_recurring()) && args.deadline.is_none() {
        warn!("Recurring task has no deadline, completing it will not schedule another");
    }

    let task_id = ctx.task_service.create_task(NewTask {
        title: args.title,
        description: args.description,
        priority: args.priority,
        status: args.status,
        deadline: args.deadline,
        reminder_offset: args.reminder,
        recurrence,
    })?;

    let task = ctx.task_service.get_task(task_id)?;
    println!("✅ Added task #{}: {}", task.id, task.title);
    if task.deadline.is_some() {
        println!("   Due: {}", format_deadline(task.deadline));
    }
    if let Some(reminder_time) = task.reminder_time {
        println!("   Reminder at {}", format_deadline(Some(reminder_time)));
    }
    if let Some(pattern) = task.recurrence.as_ref().filter(|p| p.is_recurring()) {
        println!("   Repeats: {}", pattern);
    }
    Ok(())
}
