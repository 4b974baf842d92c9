use clap::Args;

use crate::application::commands::utils::date_format::format_deadline;
use crate::application::handlers::AppContext;

#[derive(Debug, Args)]
pub struct CompleteTaskArgs {
    pub id: u64,
}

pub fn run_complete_task(ctx: &AppContext, args: CompleteTaskArgs) -> anyhow::Result<()> {
    let before = ctx.task_service.get_task(args.id)?;
    if before.is_completed() {
        println!("Task #{} is already completed.", before.id);
        return Ok(());
    }

    let completion = ctx.task_service.complete_task(args.id)?;
    println!("✅ Completed task #{}: {}", completion.task.id, completion.task.title);

    match completion.next_task_id {
        Some(next_id) => {
            let next = ctx.task_service.get_task(next_id)?;
            println!(
                "🔁 Next occurrence scheduled as #{} (due {})",
                next.id,
                format_deadline(next.deadline)
            );
        }
        None if completion.task.is_recurring() => {
            println!("🔁 No further occurrences.");
        }
        None => {}
    }
    Ok(())
}
