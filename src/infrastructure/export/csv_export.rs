use csv::{Terminator, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::entities::task::Task;

const COLUMNS: [&str; 6] = [
    "Title",
    "Description",
    "Priority",
    "Status",
    "Deadline",
    "Reminder",
];

/// Writes tasks as CSV with CRLF line endings
pub fn write_tasks_csv<W: Write>(tasks: &[Task], out: W) -> csv::Result<()> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(out);
    writer.write_record(COLUMNS)?;

    for task in tasks {
        let deadline = task
            .deadline
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        writer.write_record([
            task.title.as_str(),
            task.description.as_str(),
            task.priority.as_str(),
            task.status.as_str(),
            deadline.as_str(),
            task.reminder_offset.label(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn export_to_csv(tasks: &[Task], file_path: &Path) -> csv::Result<()> {
    let file = File::create(file_path)?;
    write_tasks_csv(tasks, file)
}
