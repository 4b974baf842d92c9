use chrono::NaiveDateTime;

use crate::application::handlers::AppContext;
use crate::domain::entities::task::{Priority, Task, TaskStatus};

#[derive(Debug, Default, PartialEq, Eq)]
struct TaskStats {
    total: usize,
    not_started: usize,
    in_progress: usize,
    completed: usize,
    overdue: usize,
    recurring: usize,
    high_priority_open: usize,
    attachments: usize,
}

impl TaskStats {
    fn collect(tasks: &[Task], now: NaiveDateTime) -> Self {
        let mut stats = TaskStats {
            total: tasks.len(),
            ..Default::default()
        };
        for task in tasks {
            match task.status {
                _ if task.is_completed() => stats.completed += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                _ => stats.not_started += 1,
            }
            if task.is_overdue(now) {
                stats.overdue += 1;
            }
            if task.is_recurring() {
                stats.recurring += 1;
            }
            if task.priority == Priority::High && !task.is_completed() {
                stats.high_priority_open += 1;
            }
            stats.attachments += task.attachments.len();
        }
        stats
    }
}

pub fn run_stats(ctx: &AppContext) -> anyhow::Result<()> {
    let tasks = ctx.task_repo.list_tasks();
    let stats = TaskStats::collect(&tasks, ctx.clock.now());

    println!("📊 Statistics");
    println!("   All tasks:          {}", stats.total);
    println!("   Not started:        {}", stats.not_started);
    println!("   In progress:        {}", stats.in_progress);
    println!("   Completed:          {}", stats.completed);
    println!("   Overdue:            {}", stats.overdue);
    println!("   Recurring:          {}", stats.recurring);
    println!("   Open high priority: {}", stats.high_priority_open);
    println!("   Attachments:        {}", stats.attachments);
    Ok(())
}
