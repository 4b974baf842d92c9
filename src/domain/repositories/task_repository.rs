use crate::domain::entities::task::Task;

#[derive(Debug)]
pub enum RepositoryError {
    NotFound(u64),
    InvalidData(String),
    StorageError(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RepositoryError::NotFound(id) => write!(f, "Couldn't find task with ID {}", id),
            RepositoryError::InvalidData(msg) => write!(f, "Invalid task: {}", msg),
            RepositoryError::StorageError(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Owner of the task collection.
pub trait TaskRepository: Send + Sync {
    /// Store a new task and return the id assigned to it
    fn add_task(&self, task: Task) -> Result<u64>;

    /// Replace the stored task that has the same id
    fn update_task(&self, task: Task) -> Result<()>;

    /// Remove a task and hand it back
    fn remove_task(&self, task_id: u64) -> Result<Task>;

    fn get_task(&self, task_id: u64) -> Option<Task>;

    /// All tasks ordered by id
    fn list_tasks(&self) -> Vec<Task>;

    /// Pick up changes made outside this process, if the backend can see them
    fn reload(&self) -> Result<()> {
        Ok(())
    }
}
