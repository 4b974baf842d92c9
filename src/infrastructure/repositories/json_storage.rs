use crate::domain::entities::task::Task;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

// Save to JSON
pub fn save_tasks(tasks: &[Task], file_path: &Path) -> io::Result<()> {
    let json = serde_json::to_string_pretty(tasks)?;
    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(file_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

// Load from JSON, a missing file is an empty task list
pub fn load_tasks(file_path: &Path) -> io::Result<Vec<Task>> {
    if !file_path.exists() {
        return Ok(Vec::new());
    }
    let data = fs::read_to_string(file_path)?;
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    let tasks: Vec<Task> = serde_json::from_str(&data)?;
    Ok(tasks)
}
