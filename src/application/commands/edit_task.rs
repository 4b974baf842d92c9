use chrono::NaiveDateTime;
use clap::Args;

use crate::application::commands::utils::date_format::{format_deadline, parse_deadline};
use crate::application::commands::utils::recurrence_args::RecurrenceArgs;
use crate::application::handlers::AppContext;
use crate::application::services::task_service::TaskChanges;
use crate::domain::entities::task::{Priority, TaskStatus};
use crate::domain::value_objects::reminder_offset::ReminderOffset;

#[derive(Debug, Args)]
pub struct EditTaskArgs {
    pub id: u64,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(short, long)]
    pub priority: Option<Priority>,

    #[arg(short, long)]
    pub status: Option<TaskStatus>,

    #[arg(long, value_parser = parse_deadline, conflicts_with = "clear_deadline")]
    pub deadline: Option<NaiveDateTime>,

    /// Remove the deadline (and with it the reminder)
    #[arg(long)]
    pub clear_deadline: bool,

    /// none, 5m, 15m, 30m, 1h or 1d
    #[arg(short, long, value_parser = str::parse::<ReminderOffset>)]
    pub reminder: Option<ReminderOffset>,

    // `--repeat none` removes the recurrence
    #[command(flatten)]
    pub recurrence: RecurrenceArgs,
}

impl EditTaskArgs {
    fn changes(&self) -> TaskChanges {
        let deadline = if self.clear_deadline {
            Some(None)
        } else {
            self.deadline.map(Some)
        };
        let recurrence = self
            .recurrence
            .to_pattern()
            .map(|pattern| pattern.is_recurring().then_some(pattern));

        TaskChanges {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            status: self.status,
            deadline,
            reminder_offset: self.reminder,
            recurrence,
        }
    }
}

pub fn run_edit_task(ctx: &AppContext, args: EditTaskArgs) -> anyhow::Result<()> {
    let completion = ctx.task_service.edit_task(args.id, args.changes())?;
    let task = &completion.task;

    println!("✏️ Updated task #{}: {}", task.id, task.title);
    println!(
        "   {} | {} | due {}",
        task.priority,
        task.status,
        format_deadline(task.deadline)
    );
    if let Some(next_id) = completion.next_task_id {
        let next = ctx.task_service.get_task(next_id)?;
        println!(
            "🔁 Next occurrence scheduled as #{} (due {})",
            next.id,
            format_deadline(next.deadline)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::recurrence::RecurrenceKind;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: EditTaskArgs,
    }

    fn parse(argv: &[&str]) -> EditTaskArgs {
        let mut full = vec!["edit"];
        full.extend_from_slice(argv);
        Harness::parse_from(full).args
    }

    #[test]
    fn untouched_fields_stay_none() {
        let changes = parse(&["3", "--priority", "high"]).changes();
        assert_eq!(changes.priority, Some(Priority::High));
        assert!(changes.title.is_none());
        assert!(changes.deadline.is_none());
        assert!(changes.recurrence.is_none());
    }

    #[test]
    fn clear_deadline_and_drop_recurrence() {
        let changes = parse(&["3", "--clear-deadline", "--repeat", "none"]).changes();
        assert_eq!(changes.deadline, Some(None));
        assert_eq!(changes.recurrence, Some(None));
    }

    #[test]
    fn new_weekly_pattern() {
        let changes = parse(&["3", "--repeat", "weekly", "--on", "mon,thu"]).changes();
        let pattern = changes.recurrence.flatten().unwrap();
        assert_eq!(pattern.kind, RecurrenceKind::Weekly);
        assert_eq!(pattern.weekdays.into_iter().collect::<Vec<_>>(), vec![0, 3]);
    }
}
