use chrono::NaiveDateTime;
use clap::Args;

use crate::application::commands::utils::date_format::{format_deadline, parse_deadline};
use crate::application::commands::utils::recurrence_args::RecurrenceArgs;
use crate::application::handlers::AppContext;
use crate::application::services::recurrence_service::RecurrenceSystem;
use crate::domain::entities::recurrence::RecurrencePattern;
use crate::domain::entities::task::{Priority, Task};
use crate::domain::value_objects::reminder_offset::ReminderOffset;

/// Previews a recurrence: either an existing task's, or one built from flags
#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Describe the recurrence of this task
    #[arg(long, conflicts_with_all = ["kind", "from"])]
    pub task: Option<u64>,

    /// First deadline of the preview, defaults to now
    #[arg(long, value_parser = parse_deadline)]
    pub from: Option<NaiveDateTime>,

    /// How many upcoming occurrences to list
    #[arg(short = 'n', long, default_value_t = 5,
          value_parser = clap::value_parser!(u16).range(1..))]
    pub count: u16,

    #[command(flatten)]
    pub recurrence: RecurrenceArgs,
}

pub fn run_describe(ctx: &AppContext, args: DescribeArgs) -> anyhow::Result<()> {
    let (pattern, start) = match args.task {
        Some(task_id) => {
            let task = ctx.task_service.get_task(task_id)?;
            let pattern = task.recurrence.unwrap_or_default();
            (pattern, task.deadline)
        }
        None => {
            let pattern = args.recurrence.to_pattern().unwrap_or_default();
            (pattern, Some(args.from.unwrap_or_else(|| ctx.clock.now())))
        }
    };

    println!("🔁 {}", pattern.describe());
    let Some(start) = start else {
        println!("   (no deadline to repeat from)");
        return Ok(());
    };

    let upcoming = upcoming_occurrences(&pattern, start, usize::from(args.count));
    if upcoming.is_empty() {
        println!("   No upcoming occurrences after {}", format_deadline(Some(start)));
    }
    for (n, deadline) in upcoming.iter().enumerate() {
        println!("   {}. {}", n + 1, format_deadline(Some(*deadline)));
    }
    Ok(())
}

/// Deadlines of the next `count` instances, walked the same way completing
/// each instance in turn would
fn upcoming_occurrences(
    pattern: &RecurrencePattern,
    start: NaiveDateTime,
    count: usize,
) -> Vec<NaiveDateTime> {
    let mut current = Task::new(
        String::from("preview"),
        String::new(),
        Priority::default(),
        Some(start),
        ReminderOffset::NoReminder,
        Some(pattern.clone()),
    );

    let mut deadlines = Vec::new();
    while deadlines.len() < count {
        let Some(next) = RecurrenceSystem::next_instance(&current) else {
            break;
        };
        if let Some(deadline) = next.deadline {
            deadlines.push(deadline);
        }
        current = next;
    }
    deadlines
}
