pub mod date_format;
pub mod recurrence_args;
pub mod task_format;
pub mod weekly_parser;
