use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::entities::task::{Task, TaskStatus};
use crate::domain::repositories::task_repository::{Result, TaskRepository};

/// Spawns the next instance of a recurring task once the current one is done.
///
/// There is no series object: every instance carries its own copy of the
/// pattern, so a chain ends as soon as one instance has no next occurrence.
#[derive(Clone)]
pub struct RecurrenceSystem {
    task_repo: Arc<dyn TaskRepository>,
}

impl RecurrenceSystem {
    pub fn new(task_repo: Arc<dyn TaskRepository>) -> Self {
        Self { task_repo }
    }

    /// Builds the successor of `task`, or `None` when the task does not recur
    /// any further.
    pub fn next_instance(task: &Task) -> Option<Task> {
        let pattern = task.recurrence.as_ref().filter(|p| p.is_recurring())?;
        let deadline = task.deadline?;
        let next_deadline = pattern.next_occurrence(deadline)?;

        let mut successor = task.clone();
        successor.id = 0;
        successor.deadline = Some(next_deadline);
        successor.set_status(TaskStatus::NotStarted);
        successor.refresh_reminder_time();

        if pattern.occurrences.is_some() {
            // reaching zero does not stop this successor from being created
            successor.recurrence = Some(pattern.consume_occurrence());
        }

        Some(successor)
    }

    /// Inserts the successor of a just-completed task into the task store.
    /// Returns the new task's id, or `None` if no task was created.
    pub fn handle_completed_task(&self, task: &Task) -> Result<Option<u64>> {
        let Some(successor) = Self::next_instance(task) else {
            debug!("Task {} has no further occurrence", task.id);
            return Ok(None);
        };

        let next_deadline = successor.deadline;
        let id = self.task_repo.add_task(successor)?;
        info!(
            "Created task {} as next occurrence of task {} (deadline {:?})",
            id, task.id, next_deadline
        );
        Ok(Some(id))
    }
}
