use chrono::NaiveDateTime;
use std::collections::{HashMap, HashSet};

use crate::domain::entities::task::Task;

/// Tracks which reminders have already fired.
///
/// Entries are keyed by task id and remember the reminder time that fired, so
/// moving a task's deadline re-arms its reminder. Entries for tasks that have
/// been removed or completed are dropped on every check.
#[derive(Debug, Default)]
pub struct ReminderService {
    reminded: HashMap<u64, NaiveDateTime>,
}

impl ReminderService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tasks whose reminder is due at `now` and has not fired yet,
    /// and records them as reminded.
    pub fn check_reminders(&mut self, tasks: &[Task], now: NaiveDateTime) -> Vec<Task> {
        self.prune(tasks);

        let mut due = Vec::new();
        for task in tasks {
            if task.is_completed() {
                continue;
            }
            let Some(reminder_time) = task.reminder_time else {
                continue;
            };
            if reminder_time > now || self.reminded.get(&task.id) == Some(&reminder_time) {
                continue;
            }

            self.reminded.insert(task.id, reminder_time);
            due.push(task.clone());
        }
        due
    }

    pub fn reminded_count(&self) -> usize {
        self.reminded.len()
    }

    fn prune(&mut self, tasks: &[Task]) {
        let live: HashSet<u64> = tasks
            .iter()
            .filter(|task| !task.is_completed())
            .map(|task| task.id)
            .collect();
        self.reminded.retain(|id, _| live.contains(id));
    }
}

/// One-line reminder text
pub fn format_reminder(task: &Task) -> String {
    let deadline = task
        .deadline
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "No deadline".to_string());

    if task.description.trim().is_empty() {
        format!("Reminder for task #{}: {} (deadline {})", task.id, task.title, deadline)
    } else {
        format!(
            "Reminder for task #{}: {} (deadline {}) - {}",
            task.id, task.title, deadline, task.description
        )
    }
}
