use clap::Args;
use tracing::info;

use crate::application::handlers::AppContext;

#[derive(Debug, Args)]
pub struct RemoveTaskArgs {
    pub id: u64,

    /// Leave attachment files on disk even if nothing else uses them
    #[arg(long)]
    pub keep_files: bool,
}

pub fn run_remove_task(ctx: &AppContext, args: RemoveTaskArgs) -> anyhow::Result<()> {
    let (task, unused) = ctx.task_service.remove_task(args.id)?;
    println!("🗑️ Removed task #{}: {}", task.id, task.title);

    if args.keep_files || unused.is_empty() {
        return Ok(());
    }

    let removed = ctx.attachments()?.clean_unused_attachments(&unused);
    info!("Deleted {} attachment file(s) of task {}", removed, task.id);
    if removed > 0 {
        println!("   Deleted {} attachment file(s).", removed);
    }
    Ok(())
}
