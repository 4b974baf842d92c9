use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::entities::task::Task;
use crate::domain::repositories::task_repository::TaskRepository;

/// Date-oriented views over the task list
#[derive(Clone)]
pub struct CalendarService {
    task_repo: Arc<dyn TaskRepository>,
}

impl CalendarService {
    pub fn new(task_repo: Arc<dyn TaskRepository>) -> Self {
        Self { task_repo }
    }

    /// Tasks whose deadline falls on `date`, earliest first
    pub fn tasks_on(&self, date: NaiveDate) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .task_repo
            .list_tasks()
            .into_iter()
            .filter(|task| task.is_due_on(date))
            .collect();
        tasks.sort_by_key(|task| (task.deadline, task.id));
        tasks
    }

    /// Days of the given month that have at least one deadline
    pub fn dates_with_tasks(&self, year: i32, month: u32) -> BTreeSet<NaiveDate> {
        self.task_repo
            .list_tasks()
            .iter()
            .filter_map(|task| task.deadline.map(|d| d.date()))
            .filter(|date| date.year() == year && date.month() == month)
            .collect()
    }
}

/// "Title (HH:MM) - High priority - In Progress"
pub fn format_day_entry(task: &Task) -> String {
    let time = task
        .deadline
        .map(|d| d.format("%H:%M").to_string())
        .unwrap_or_else(|| "No time".to_string());
    format!(
        "{} ({}) - {} priority - {}",
        task.title, time, task.priority, task.status
    )
}
