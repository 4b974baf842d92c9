use chrono::{Duration, NaiveDateTime};

use crate::application::commands::utils::date_format::format_deadline;
use crate::domain::entities::task::Task;
use crate::infrastructure::attachments::attachment_manager::FileKind;

/// One line per task for `list` and `search`
pub fn format_task_line(task: &Task, now: NaiveDateTime) -> String {
    let mut line = format!(
        "#{:<4} [{:<6}] {:<11} {}  {}",
        task.id,
        task.priority,
        task.status,
        format_deadline(task.deadline),
        task.title
    );

    if task.is_overdue(now) {
        line.push_str("  (overdue)");
    } else if let Some(deadline) = task.deadline.filter(|_| !task.is_completed()) {
        line.push_str(&format!("  ({})", format_time_remaining(deadline, now)));
    }

    if let Some(pattern) = task.recurrence.as_ref().filter(|p| p.is_recurring()) {
        line.push_str(&format!("  [{}]", pattern));
    }
    line
}

/// Multi-line view of a single task
pub fn format_task_details(task: &Task) -> String {
    let mut out = format!("#{} {}\n", task.id, task.title);
    if !task.description.trim().is_empty() {
        out.push_str(&format!("  Description: {}\n", task.description));
    }
    out.push_str(&format!("  Priority:    {}\n", task.priority));
    out.push_str(&format!("  Status:      {}\n", task.status));
    out.push_str(&format!("  Deadline:    {}\n", format_deadline(task.deadline)));
    out.push_str(&format!("  Reminder:    {}", task.reminder_offset));
    if let Some(reminder_time) = task.reminder_time {
        out.push_str(&format!(" ({})", format_deadline(Some(reminder_time))));
    }
    out.push('\n');
    if let Some(pattern) = &task.recurrence {
        out.push_str(&format!("  Repeats:     {}\n", pattern));
    }
    for path in &task.attachments {
        out.push_str(&format!(
            "  Attachment:  {} ({})\n",
            path.display(),
            FileKind::of(path).label()
        ));
    }
    out
}

/// "in 2 days 3 hours", "in 45 mins", "due now"
pub fn format_time_remaining(target: NaiveDateTime, now: NaiveDateTime) -> String {
    if target <= now {
        return "due now".to_string();
    }

    format!("in {}", format_duration(target - now))
}

fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.num_seconds();
    let days = total_seconds / 86400;
    let hours = (total_seconds % 86400) / 3600;
    let minutes = (total_seconds % 3600) / 60;

    let plural = |n: i64| if n != 1 { "s" } else { "" };

    match (days, hours, minutes) {
        (0, 0, 0) => "less than 1 min".to_string(),
        (0, 0, mins) => format!("{} min{}", mins, plural(mins)),
        (0, hrs, 0) => format!("{} hour{}", hrs, plural(hrs)),
        (0, hrs, mins) => format!("{} hour{} {} min{}", hrs, plural(hrs), mins, plural(mins)),
        (days, 0, _) => format!("{} day{}", days, plural(days)),
        (days, hrs, _) => format!("{} day{} {} hour{}", days, plural(days), hrs, plural(hrs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::recurrence::{RecurrenceKind, RecurrencePattern};
    use crate::domain::entities::task::Priority;
    use crate::domain::value_objects::reminder_offset::ReminderOffset;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn remaining_time_wording() {
        let now = at(2024, 1, 1, 8, 0);
        assert_eq!(format_time_remaining(at(2024, 1, 1, 8, 0), now), "due now");
        assert_eq!(format_time_remaining(at(2024, 1, 1, 8, 1), now), "in 1 min");
        assert_eq!(format_time_remaining(at(2024, 1, 1, 10, 0), now), "in 2 hours");
        assert_eq!(
            format_time_remaining(at(2024, 1, 1, 9, 30), now),
            "in 1 hour 30 mins"
        );
        assert_eq!(
            format_time_remaining(at(2024, 1, 3, 11, 15), now),
            "in 2 days 3 hours"
        );
    }

    #[test]
    fn line_marks_overdue_and_recurrence() {
        let mut task = Task::new(
            "Backup".to_string(),
            String::new(),
            Priority::High,
            Some(at(2024, 1, 1, 7, 0)),
            ReminderOffset::NoReminder,
            Some(RecurrencePattern::new(RecurrenceKind::Daily, 1)),
        );
        task.id = 12;

        let line = format_task_line(&task, at(2024, 1, 1, 8, 0));
        assert!(line.starts_with("#12"));
        assert!(line.contains("2024-01-01 07:00"));
        assert!(line.contains("(overdue)"));
        assert!(line.ends_with("[Every day]"));
    }

    #[test]
    fn details_list_attachments_with_kind() {
        let mut task = Task::new(
            "Taxes".to_string(),
            "Form 1040".to_string(),
            Priority::High,
            None,
            ReminderOffset::NoReminder,
            None,
        );
        task.attachments.push("attachments/w2_12ab34cd.pdf".into());

        let details = format_task_details(&task);
        assert!(details.contains("Description: Form 1040"));
        assert!(details.contains("w2_12ab34cd.pdf (pdf)"));
    }
}
