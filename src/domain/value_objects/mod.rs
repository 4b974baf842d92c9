pub mod reminder_offset;
pub mod weekday_format;
