use chrono::NaiveDateTime;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::services::recurrence_service::RecurrenceSystem;
use crate::domain::entities::recurrence::RecurrencePattern;
use crate::domain::entities::task::{Priority, Task, TaskFilter, TaskStatus};
use crate::domain::repositories::task_repository::{RepositoryError, Result, TaskRepository};
use crate::domain::value_objects::reminder_offset::ReminderOffset;
use crate::infrastructure::export::csv_export;

/// Fields for a new task
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub deadline: Option<NaiveDateTime>,
    pub reminder_offset: ReminderOffset,
    pub recurrence: Option<RecurrencePattern>,
}

/// Partial update, `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub deadline: Option<Option<NaiveDateTime>>,
    pub reminder_offset: Option<ReminderOffset>,
    pub recurrence: Option<Option<RecurrencePattern>>,
}

/// Result of marking a task as completed
#[derive(Debug, Clone)]
pub struct Completion {
    pub task: Task,
    pub next_task_id: Option<u64>,
}

#[derive(Clone)]
pub struct TaskService {
    task_repo: Arc<dyn TaskRepository>,
    recurrence: RecurrenceSystem,
}

impl TaskService {
    pub fn new(task_repo: Arc<dyn TaskRepository>) -> Self {
        Self {
            recurrence: RecurrenceSystem::new(task_repo.clone()),
            task_repo,
        }
    }

    // === TASK CREATION ===

    pub fn create_task(&self, new_task: NewTask) -> Result<u64> {
        let mut task = Task::new(
            new_task.title.trim().to_string(),
            new_task.description,
            new_task.priority,
            new_task.deadline,
            new_task.reminder_offset,
            new_task.recurrence,
        );
        task.set_status(new_task.status);

        let id = self.task_repo.add_task(task)?;
        info!("Created task {}", id);
        Ok(id)
    }

    pub fn get_task(&self, task_id: u64) -> Result<Task> {
        self.task_repo
            .get_task(task_id)
            .ok_or(RepositoryError::NotFound(task_id))
    }

    // === EDIT ===

    /// Applies `changes`. Moving a recurring task into `Completed` spawns its
    /// next occurrence, same as [`TaskService::complete_task`].
    pub fn edit_task(&self, task_id: u64, changes: TaskChanges) -> Result<Completion> {
        let mut task = self.get_task(task_id)?;
        let was_completed = task.is_completed();

        if let Some(title) = changes.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = changes.description {
            task.description = description;
        }
        if let Some(priority) = changes.priority {
            task.priority = priority;
        }
        if let Some(status) = changes.status {
            task.set_status(status);
        }
        if let Some(deadline) = changes.deadline {
            task.deadline = deadline;
        }
        if let Some(offset) = changes.reminder_offset {
            task.reminder_offset = offset;
        }
        if let Some(recurrence) = changes.recurrence {
            task.recurrence = recurrence;
        }
        task.refresh_reminder_time();

        self.task_repo.update_task(task.clone())?;

        let next_task_id = if !was_completed && task.is_completed() {
            self.recurrence.handle_completed_task(&task)?
        } else {
            None
        };

        Ok(Completion { task, next_task_id })
    }

    // === COMPLETE ===

    pub fn complete_task(&self, task_id: u64) -> Result<Completion> {
        let mut task = self.get_task(task_id)?;

        if task.is_completed() {
            warn!("Task {} is already completed", task_id);
            return Ok(Completion {
                task,
                next_task_id: None,
            });
        }

        task.mark_completed();
        self.task_repo.update_task(task.clone())?;
        let next_task_id = self.recurrence.handle_completed_task(&task)?;

        Ok(Completion { task, next_task_id })
    }

    // === REMOVE ===

    /// Removes a task and returns it along with the attachment paths that no
    /// remaining task refers to any more
    pub fn remove_task(&self, task_id: u64) -> Result<(Task, Vec<PathBuf>)> {
        let removed = self.task_repo.remove_task(task_id)?;

        let still_used: HashSet<PathBuf> = self
            .task_repo
            .list_tasks()
            .into_iter()
            .flat_map(|task| task.attachments)
            .collect();
        let unused = removed
            .attachments
            .iter()
            .filter(|path| !still_used.contains(*path))
            .cloned()
            .collect();

        info!("Removed task {}", task_id);
        Ok((removed, unused))
    }

    // === ATTACHMENTS ===

    pub fn attach_file(&self, task_id: u64, stored_path: PathBuf) -> Result<Task> {
        let mut task = self.get_task(task_id)?;
        if !task.attachments.contains(&stored_path) {
            task.attachments.push(stored_path);
            self.task_repo.update_task(task.clone())?;
        }
        Ok(task)
    }

    /// Detaches `path` from the task; returns whether any other task still uses it
    pub fn detach_file(&self, task_id: u64, path: &Path) -> Result<bool> {
        let mut task = self.get_task(task_id)?;
        let before = task.attachments.len();
        task.attachments.retain(|p| p != path);
        if task.attachments.len() == before {
            return Err(RepositoryError::InvalidData(format!(
                "Task {} has no attachment {}",
                task_id,
                path.display()
            )));
        }
        self.task_repo.update_task(task)?;

        let shared = self
            .task_repo
            .list_tasks()
            .iter()
            .any(|t| t.attachments.iter().any(|p| p == path));
        Ok(shared)
    }

    /// Every attachment path referenced by some task
    pub fn referenced_attachments(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .task_repo
            .list_tasks()
            .into_iter()
            .flat_map(|task| task.attachments)
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }

    // === LIST / SEARCH ===

    pub fn list_tasks(&self, filter: TaskFilter, now: NaiveDateTime) -> Vec<Task> {
        self.task_repo
            .list_tasks()
            .into_iter()
            .filter(|task| filter.matches(task, now))
            .collect()
    }

    /// Case-insensitive search over title and description. Substring matches
    /// come first, then fuzzy matches by score.
    pub fn search_tasks(&self, query: &str) -> Vec<Task> {
        let query = query.trim();
        if query.is_empty() {
            return self.task_repo.list_tasks();
        }

        let needle = query.to_lowercase();
        let matcher = SkimMatcherV2::default().ignore_case();

        let mut scored: Vec<(bool, i64, Task)> = self
            .task_repo
            .list_tasks()
            .into_iter()
            .filter_map(|task| {
                let haystack = format!("{} {}", task.title, task.description);
                let exact = haystack.to_lowercase().contains(&needle);
                let score = matcher.fuzzy_match(&haystack, query);
                match (exact, score) {
                    (false, None) => None,
                    (exact, score) => Some((exact, score.unwrap_or(0), task)),
                }
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)).then(a.2.id.cmp(&b.2.id)));
        scored.into_iter().map(|(_, _, task)| task).collect()
    }

    // === EXPORT ===

    pub fn export_csv(&self, file_path: &Path) -> Result<usize> {
        let tasks = self.task_repo.list_tasks();
        csv_export::export_to_csv(&tasks, file_path).map_err(|e| {
            RepositoryError::StorageError(format!(
                "Failed to export to {}: {}",
                file_path.display(),
                e
            ))
        })?;
        info!("Exported {} tasks to {}", tasks.len(), file_path.display());
        Ok(tasks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::recurrence::RecurrenceKind;
    use crate::infrastructure::repositories::memory_task_repository::MemoryTaskRepository;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn service() -> (Arc<MemoryTaskRepository>, TaskService) {
        let repo = Arc::new(MemoryTaskRepository::new());
        (repo.clone(), TaskService::new(repo))
    }

    fn new_task(title: &str, description: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: description.to_string(),
            deadline: Some(at(2024, 7, 1, 9, 0)),
            reminder_offset: ReminderOffset::FiveMinutes,
            ..NewTask::default()
        }
    }

    fn daily(title: &str) -> NewTask {
        NewTask {
            recurrence: Some(RecurrencePattern::new(RecurrenceKind::Daily, 1)),
            ..new_task(title, "")
        }
    }

    #[test]
    fn create_trims_title_and_sets_reminder() {
        let (_, service) = service();
        let id = service.create_task(new_task("  Plan trip ", "")).unwrap();
        let task = service.get_task(id).unwrap();

        assert_eq!(task.title, "Plan trip");
        assert_eq!(task.reminder_time, Some(at(2024, 7, 1, 8, 55)));
    }

    #[test]
    fn create_rejects_blank_title() {
        let (_, service) = service();
        assert!(matches!(
            service.create_task(new_task("   ", "")),
            Err(RepositoryError::InvalidData(_))
        ));
    }

    #[test]
    fn completing_recurring_task_spawns_next() {
        let (repo, service) = service();
        let id = service.create_task(daily("Stretch")).unwrap();

        let completion = service.complete_task(id).unwrap();
        let next_id = completion.next_task_id.unwrap();

        assert!(completion.task.completed);
        assert!(repo.get_task(id).unwrap().completed);
        assert_eq!(repo.get_task(next_id).unwrap().deadline, Some(at(2024, 7, 2, 9, 0)));
    }

    #[test]
    fn completing_twice_spawns_only_once() {
        let (repo, service) = service();
        let id = service.create_task(daily("Stretch")).unwrap();

        service.complete_task(id).unwrap();
        let second = service.complete_task(id).unwrap();

        assert_eq!(second.next_task_id, None);
        assert_eq!(repo.list_tasks().len(), 2);
    }

    #[test]
    fn editing_status_to_completed_also_spawns_next() {
        let (repo, service) = service();
        let id = service.create_task(daily("Stretch")).unwrap();

        let edited = service
            .edit_task(
                id,
                TaskChanges {
                    status: Some(TaskStatus::Completed),
                    ..TaskChanges::default()
                },
            )
            .unwrap();

        assert!(edited.next_task_id.is_some());
        assert_eq!(repo.list_tasks().len(), 2);
    }

    #[test]
    fn editing_deadline_moves_reminder() {
        let (_, service) = service();
        let id = service.create_task(new_task("Call mom", "")).unwrap();

        let edited = service
            .edit_task(
                id,
                TaskChanges {
                    deadline: Some(Some(at(2024, 7, 3, 18, 0))),
                    reminder_offset: Some(ReminderOffset::OneHour),
                    ..TaskChanges::default()
                },
            )
            .unwrap();

        assert_eq!(edited.task.reminder_time, Some(at(2024, 7, 3, 17, 0)));
        assert_eq!(edited.next_task_id, None);
    }

    #[test]
    fn edit_unknown_task_fails() {
        let (_, service) = service();
        assert!(matches!(
            service.edit_task(99, TaskChanges::default()),
            Err(RepositoryError::NotFound(99))
        ));
    }

    #[test]
    fn filters_by_state() {
        let (_, service) = service();
        let overdue = service.create_task(new_task("old", "")).unwrap();
        let done = service.create_task(new_task("done", "")).unwrap();
        service.complete_task(done).unwrap();
        let future = service
            .create_task(NewTask {
                deadline: Some(at(2030, 1, 1, 0, 0)),
                ..new_task("future", "")
            })
            .unwrap();

        let now = at(2025, 1, 1, 0, 0);
        let ids = |filter| {
            service
                .list_tasks(filter, now)
                .iter()
                .map(|t| t.id)
                .collect::<Vec<_>>()
        };

        assert_eq!(ids(TaskFilter::Overdue), vec![overdue]);
        assert_eq!(ids(TaskFilter::Completed), vec![done]);
        assert_eq!(ids(TaskFilter::Active), vec![future]);
        assert_eq!(ids(TaskFilter::All).len(), 3);
    }

    #[test]
    fn search_prefers_substring_matches() {
        let (_, service) = service();
        service
            .create_task(new_task("Buy groceries", "milk and bread"))
            .unwrap();
        service.create_task(new_task("Gym", "leg day")).unwrap();
        service
            .create_task(new_task("Budget review", "Q3 numbers"))
            .unwrap();

        let titles: Vec<String> = service
            .search_tasks("MILK")
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles.first().map(String::as_str), Some("Buy groceries"));
        assert!(!titles.contains(&"Gym".to_string()));

        assert_eq!(service.search_tasks("").len(), 3);
        assert!(service.search_tasks("zzzz").is_empty());
    }

    #[test]
    fn removing_keeps_attachments_shared_with_other_tasks() {
        let (_, service) = service();
        let id = service.create_task(daily("Report")).unwrap();
        let shared = PathBuf::from("attachments/template_0000abcd.docx");
        let own = PathBuf::from("attachments/draft_0000beef.docx");
        service.attach_file(id, shared.clone()).unwrap();

        // successor copies the shared attachment
        let next = service.complete_task(id).unwrap().next_task_id.unwrap();
        service.attach_file(id, own.clone()).unwrap();

        let (removed, unused) = service.remove_task(id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(unused, vec![own]);
        assert_eq!(service.get_task(next).unwrap().attachments, vec![shared]);
    }

    #[test]
    fn detach_reports_sharing() {
        let (_, service) = service();
        let a = service.create_task(new_task("a", "")).unwrap();
        let b = service.create_task(new_task("b", "")).unwrap();
        let path = PathBuf::from("attachments/x_00000001.txt");
        service.attach_file(a, path.clone()).unwrap();
        service.attach_file(b, path.clone()).unwrap();

        assert!(service.detach_file(a, &path).unwrap());
        assert!(!service.detach_file(b, &path).unwrap());
        assert!(service.detach_file(b, &path).is_err());
        assert!(service.referenced_attachments().is_empty());
    }

    #[test]
    fn export_writes_every_task() {
        let (_, service) = service();
        service.create_task(new_task("a", "")).unwrap();
        service.create_task(new_task("b", "")).unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.csv");
        assert_eq!(service.export_csv(&path).unwrap(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }
}
