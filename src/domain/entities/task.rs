use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::entities::recurrence::RecurrencePattern;
use crate::domain::value_objects::reminder_offset::ReminderOffset;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: u64, // 0 until the repository assigns one
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub deadline: Option<NaiveDateTime>,
    #[serde(default)]
    pub reminder_offset: ReminderOffset,
    #[serde(default)]
    pub reminder_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub recurrence: Option<RecurrencePattern>,
    #[serde(default)]
    pub attachments: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

/// Which slice of the task list to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
    Overdue,
}

impl Task {
    pub fn new(
        title: String,
        description: String,
        priority: Priority,
        deadline: Option<NaiveDateTime>,
        reminder_offset: ReminderOffset,
        recurrence: Option<RecurrencePattern>,
    ) -> Self {
        let mut task = Self {
            id: 0, // id is assigned in the repo
            title,
            description,
            priority,
            status: TaskStatus::NotStarted,
            deadline,
            reminder_offset,
            reminder_time: None,
            completed: false,
            recurrence,
            attachments: Vec::new(),
        };
        task.refresh_reminder_time();
        task
    }

    /// Recomputes `reminder_time` from the deadline and the configured offset
    pub fn refresh_reminder_time(&mut self) {
        self.reminder_time = self
            .deadline
            .and_then(|deadline| self.reminder_offset.reminder_time_for(deadline));
    }

    /// Sets the status and keeps the `completed` flag in step with it
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.completed = status == TaskStatus::Completed;
    }

    pub fn mark_completed(&mut self) {
        self.set_status(TaskStatus::Completed);
    }

    pub fn is_completed(&self) -> bool {
        self.completed || self.status == TaskStatus::Completed
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence
            .as_ref()
            .is_some_and(|pattern| pattern.is_recurring())
    }

    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.is_completed() && self.deadline.is_some_and(|deadline| deadline < now)
    }

    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.deadline.is_some_and(|deadline| deadline.date() == date)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Task title cannot be empty".to_string());
        }
        Ok(())
    }
}

impl TaskFilter {
    pub fn matches(&self, task: &Task, now: NaiveDateTime) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Completed => task.is_completed(),
            TaskFilter::Overdue => task.is_overdue(now),
            TaskFilter::Active => !task.is_completed() && !task.is_overdue(now),
        }
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("Invalid priority '{}'. Use low, medium or high", s)),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "not started" | "todo" => Ok(TaskStatus::NotStarted),
            "in progress" | "doing" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            _ => Err(format!(
                "Invalid status '{}'. Use not-started, in-progress or completed",
                s
            )),
        }
    }
}

impl FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "active" => Ok(TaskFilter::Active),
            "completed" => Ok(TaskFilter::Completed),
            "overdue" => Ok(TaskFilter::Overdue),
            _ => Err(format!(
                "Invalid filter '{}'. Use all, active, completed or overdue",
                s
            )),
        }
    }
}
