use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::task::Task;
use crate::domain::repositories::task_repository::{RepositoryError, Result, TaskRepository};

#[derive(Debug)]
struct TaskTable {
    tasks: BTreeMap<u64, Task>, // id -> Task
    next_id: u64,               // for auto-incrementing IDs
}

/// In-memory implementation of TaskRepository
#[derive(Debug)]
pub struct MemoryTaskRepository {
    table: Mutex<TaskTable>,
}

impl MemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(TaskTable {
                tasks: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Builds a repository from previously stored tasks. Tasks without an id
    /// (or sharing one) get a fresh id after the highest one seen.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let repo = Self::new();
        repo.replace_all(tasks);
        repo
    }

    fn table(&self) -> MutexGuard<'_, TaskTable> {
        // a panic while holding the lock leaves the map itself intact
        self.table
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn replace_all(&self, tasks: Vec<Task>) {
        let mut table = self.table();
        table.tasks.clear();

        let highest = tasks.iter().map(|task| task.id).max().unwrap_or(0);
        table.next_id = highest + 1;

        for mut task in tasks {
            if task.id == 0 || table.tasks.contains_key(&task.id) {
                task.id = table.next_id;
                table.next_id += 1;
            }
            table.tasks.insert(task.id, task);
        }
    }

    /// Puts a task back under its own id, replacing whatever holds that id.
    pub(crate) fn restore(&self, task: Task) {
        let mut table = self.table();
        table.next_id = table.next_id.max(task.id + 1);
        table.tasks.insert(task.id, task);
    }
}

impl Default for MemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRepository for MemoryTaskRepository {
    fn add_task(&self, mut task: Task) -> Result<u64> {
        task.validate().map_err(RepositoryError::InvalidData)?;

        let mut table = self.table();
        let id = table.next_id;
        table.next_id += 1;

        task.id = id;
        table.tasks.insert(id, task);
        Ok(id)
    }

    fn update_task(&self, task: Task) -> Result<()> {
        task.validate().map_err(RepositoryError::InvalidData)?;

        let mut table = self.table();
        let slot = table
            .tasks
            .get_mut(&task.id)
            .ok_or(RepositoryError::NotFound(task.id))?;
        *slot = task;
        Ok(())
    }

    fn remove_task(&self, task_id: u64) -> Result<Task> {
        self.table()
            .tasks
            .remove(&task_id)
            .ok_or(RepositoryError::NotFound(task_id))
    }

    fn get_task(&self, task_id: u64) -> Option<Task> {
        self.table().tasks.get(&task_id).cloned()
    }

    fn list_tasks(&self) -> Vec<Task> {
        self.table().tasks.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::task::Priority;
    use crate::domain::value_objects::reminder_offset::ReminderOffset;

    fn task(title: &str) -> Task {
        Task::new(
            title.to_string(),
            String::new(),
            Priority::Medium,
            None,
            ReminderOffset::NoReminder,
            None,
        )
    }

    #[test]
    fn assigns_increasing_ids() {
        let repo = MemoryTaskRepository::new();
        assert_eq!(repo.add_task(task("a")).unwrap(), 1);
        assert_eq!(repo.add_task(task("b")).unwrap(), 2);
        assert_eq!(repo.get_task(2).unwrap().title, "b");
    }

    #[test]
    fn rejects_blank_titles() {
        let repo = MemoryTaskRepository::new();
        let result = repo.add_task(task(" "));
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
        assert!(repo.list_tasks().is_empty());
    }

    #[test]
    fn update_and_remove_unknown_ids_fail() {
        let repo = MemoryTaskRepository::new();
        let mut ghost = task("ghost");
        ghost.id = 42;
        assert!(matches!(
            repo.update_task(ghost),
            Err(RepositoryError::NotFound(42))
        ));
        assert!(matches!(
            repo.remove_task(42),
            Err(RepositoryError::NotFound(42))
        ));
    }

    #[test]
    fn loaded_tasks_without_ids_are_numbered_after_existing_ones() {
        let mut kept = task("kept");
        kept.id = 7;
        let repo = MemoryTaskRepository::with_tasks(vec![task("legacy"), kept, task("other")]);

        let ids: Vec<u64> = repo.list_tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![7, 8, 9]);
        assert_eq!(repo.add_task(task("new")).unwrap(), 10);
    }
}
