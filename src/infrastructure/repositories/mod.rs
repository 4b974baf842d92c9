pub mod json_storage;
pub mod json_task_repository;
pub mod memory_task_repository;
