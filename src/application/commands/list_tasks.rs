use chrono::NaiveDateTime;
use clap::Args;

use crate::application::commands::utils::task_format::{format_task_details, format_task_line};
use crate::application::handlers::AppContext;
use crate::domain::entities::task::{Task, TaskFilter};

#[derive(Debug, Args)]
pub struct ListTasksArgs {
    /// all, active, completed or overdue
    #[arg(short, long, default_value = "all")]
    pub filter: TaskFilter,
}

#[derive(Debug, Args)]
pub struct SearchTasksArgs {
    /// Matched against title and description
    pub query: String,
}

#[derive(Debug, Args)]
pub struct ShowTaskArgs {
    pub id: u64,
}

pub fn run_list_tasks(ctx: &AppContext, args: ListTasksArgs) -> anyhow::Result<()> {
    let now = ctx.clock.now();
    let tasks = ctx.task_service.list_tasks(args.filter, now);

    if tasks.is_empty() {
        println!("📝 No tasks found.");
        return Ok(());
    }

    print!("{}", format_task_list(&tasks, now));
    Ok(())
}

pub fn run_search_tasks(ctx: &AppContext, args: SearchTasksArgs) -> anyhow::Result<()> {
    let tasks = ctx.task_service.search_tasks(&args.query);

    if tasks.is_empty() {
        println!("🔍 No tasks match '{}'.", args.query);
        return Ok(());
    }

    let now = ctx.clock.now();
    println!("🔍 {} match(es) for '{}':", tasks.len(), args.query);
    for task in &tasks {
        println!("{}", format_task_line(task, now));
    }
    Ok(())
}

pub fn run_show_task(ctx: &AppContext, args: ShowTaskArgs) -> anyhow::Result<()> {
    let task = ctx.task_service.get_task(args.id)?;
    print!("{}", format_task_details(&task));
    Ok(())
}

/// Splits the list into one-off and recurring sections
fn format_task_list(tasks: &[Task], now: NaiveDateTime) -> String {
    let (recurring, single): (Vec<&Task>, Vec<&Task>) =
        tasks.iter().partition(|task| task.is_recurring());

    let mut out = String::new();
    if !single.is_empty() {
        out.push_str("📅 Single tasks:\n");
        for task in single {
            out.push_str(&format_task_line(task, now));
            out.push('\n');
        }
    }
    if !recurring.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("🔁 Recurring tasks:\n");
        for task in recurring {
            out.push_str(&format_task_line(task, now));
            out.push('\n');
        }
    }
    out
}
