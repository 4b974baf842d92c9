pub mod recurrence;
pub mod task;
