pub mod calendar_service;
pub mod recurrence_service;
pub mod reminder_service;
pub mod task_service;
