use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::domain::entities::task::Task;
use crate::domain::repositories::task_repository::{RepositoryError, Result, TaskRepository};
use crate::infrastructure::repositories::json_storage;
use crate::infrastructure::repositories::memory_task_repository::MemoryTaskRepository;

// implementation of TaskRepository that stores tasks in JSON
#[derive(Debug)]
pub struct JsonTaskRepository {
    tasks: MemoryTaskRepository,
    file_path: PathBuf,
}

impl JsonTaskRepository {
    pub fn new(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        let loaded_tasks = Self::read_file(&file_path)?;
        Ok(Self {
            tasks: MemoryTaskRepository::with_tasks(loaded_tasks),
            file_path,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn save_all(&self) -> Result<()> {
        let all_tasks = self.tasks.list_tasks();
        json_storage::save_tasks(&all_tasks, &self.file_path).map_err(|e| {
            error!("Failed to save tasks to {}: {}", self.file_path.display(), e);
            RepositoryError::StorageError(format!("Failed to write file: {}", e))
        })?;
        debug!("Saved {} tasks to {}", all_tasks.len(), self.file_path.display());
        Ok(())
    }

    fn read_file(file_path: &Path) -> Result<Vec<Task>> {
        let loaded_tasks = json_storage::load_tasks(file_path).map_err(|e| {
            RepositoryError::StorageError(format!("Failed to read {}: {}", file_path.display(), e))
        })?;
        debug!("Loaded {} tasks from {}", loaded_tasks.len(), file_path.display());
        Ok(loaded_tasks)
    }

    fn load_all(&self) -> Result<()> {
        self.tasks.replace_all(Self::read_file(&self.file_path)?);
        Ok(())
    }
}

// a failed save rolls the in-memory change back so memory keeps matching the file
impl TaskRepository for JsonTaskRepository {
    fn add_task(&self, task: Task) -> Result<u64> {
        let id = self.tasks.add_task(task)?;
        if let Err(e) = self.save_all() {
            self.tasks.remove_task(id)?;
            return Err(e);
        }
        Ok(id)
    }

    fn update_task(&self, task: Task) -> Result<()> {
        let previous = self
            .tasks
            .get_task(task.id)
            .ok_or(RepositoryError::NotFound(task.id))?;
        self.tasks.update_task(task)?;
        if let Err(e) = self.save_all() {
            self.tasks.restore(previous);
            return Err(e);
        }
        Ok(())
    }

    fn remove_task(&self, task_id: u64) -> Result<Task> {
        let removed = self.tasks.remove_task(task_id)?;
        if let Err(e) = self.save_all() {
            self.tasks.restore(removed);
            return Err(e);
        }
        Ok(removed)
    }

    fn get_task(&self, task_id: u64) -> Option<Task> {
        self.tasks.get_task(task_id)
    }

    fn list_tasks(&self) -> Vec<Task> {
        self.tasks.list_tasks()
    }

    fn reload(&self) -> Result<()> {
        self.load_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::recurrence::{RecurrenceKind, RecurrencePattern};
    use crate::domain::entities::task::Priority;
    use crate::domain::value_objects::reminder_offset::ReminderOffset;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_task() -> Task {
        let deadline = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(17, 0, 0)
            .unwrap();
        Task::new(
            "Water plants".to_string(),
            "Balcony and kitchen".to_string(),
            Priority::Low,
            Some(deadline),
            ReminderOffset::OneHour,
            Some(
                RecurrencePattern::new(RecurrenceKind::Weekly, 1)
                    .with_weekdays([0, 3])
                    .with_occurrences(4),
            ),
        )
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let repo = JsonTaskRepository::new(dir.path().join("tasks.json")).unwrap();
        assert!(repo.list_tasks().is_empty());
        assert!(!repo.file_path().exists());
    }

    #[test]
    fn tasks_survive_reopening() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("tasks.json");

        let repo = JsonTaskRepository::new(&path).unwrap();
        let id = repo.add_task(sample_task()).unwrap();
        let stored = repo.get_task(id).unwrap();

        let reopened = JsonTaskRepository::new(&path).unwrap();
        assert_eq!(reopened.list_tasks(), vec![stored]);
    }

    #[test]
    fn reload_sees_changes_from_another_handle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");

        let watcher = JsonTaskRepository::new(&path).unwrap();
        let writer = JsonTaskRepository::new(&path).unwrap();
        writer.add_task(sample_task()).unwrap();

        assert!(watcher.list_tasks().is_empty());
        watcher.reload().unwrap();
        assert_eq!(watcher.list_tasks().len(), 1);
    }

    #[test]
    fn remove_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");

        let repo = JsonTaskRepository::new(&path).unwrap();
        let id = repo.add_task(sample_task()).unwrap();
        repo.remove_task(id).unwrap();

        let reopened = JsonTaskRepository::new(&path).unwrap();
        assert!(reopened.list_tasks().is_empty());
    }

    #[test]
    fn failed_add_leaves_no_task_behind() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let repo = JsonTaskRepository::new(blocker.join("tasks.json")).unwrap();
        let result = repo.add_task(sample_task());
        assert!(matches!(result, Err(RepositoryError::StorageError(_))));
        assert!(repo.list_tasks().is_empty());
    }

    #[test]
    fn failed_update_and_remove_keep_the_stored_task() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");

        let repo = JsonTaskRepository::new(&path).unwrap();
        let id = repo.add_task(sample_task()).unwrap();
        let stored = repo.get_task(id).unwrap();

        // a directory in place of the file makes every later save fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let mut renamed = stored.clone();
        renamed.title = "Water the cactus".to_string();
        assert!(matches!(
            repo.update_task(renamed),
            Err(RepositoryError::StorageError(_))
        ));
        assert_eq!(repo.get_task(id), Some(stored.clone()));

        assert!(matches!(
            repo.remove_task(id),
            Err(RepositoryError::StorageError(_))
        ));
        assert_eq!(repo.list_tasks(), vec![stored]);
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JsonTaskRepository::new(&path);
        assert!(matches!(result, Err(RepositoryError::StorageError(_))));
    }
}
