use tracing::{error, info};

use crate::application::handlers::AppContext;
use crate::application::services::reminder_service::{ReminderService, format_reminder};
use crate::infrastructure::scheduler::reminder_scheduler::ReminderScheduler;

/// Prints every reminder that is due right now
pub fn run_check_reminders(ctx: &AppContext) -> anyhow::Result<()> {
    let tasks = ctx.task_repo.list_tasks();
    let due = ReminderService::new().check_reminders(&tasks, ctx.clock.now());

    if due.is_empty() {
        println!("🔔 No reminders due.");
        return Ok(());
    }
    for task in &due {
        println!("🔔 {}", format_reminder(task));
    }
    Ok(())
}

/// Keeps checking reminders until Ctrl+C
pub async fn run_watch(ctx: &AppContext) -> anyhow::Result<()> {
    let scheduler = ReminderScheduler::new(
        ctx.task_repo.clone(),
        ctx.clock,
        ctx.config.reminder_interval,
    );

    println!(
        "👀 Watching for reminders in {} (Ctrl+C to stop)...",
        ctx.clock.timezone()
    );
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
        info!("Shutting down reminder watch");
    };

    scheduler
        .run(|task| println!("🔔 {}", format_reminder(task)), shutdown)
        .await;
    Ok(())
}
