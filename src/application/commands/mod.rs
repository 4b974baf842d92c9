pub mod add_task;
pub mod attachments;
pub mod calendar;
pub mod complete_task;
pub mod describe;
pub mod edit_task;
pub mod export;
pub mod list_tasks;
pub mod reminders;
pub mod remove_task;
pub mod stats;
pub mod utils;

pub use add_task::run_add_task;
pub use attachments::{run_attach, run_clean_attachments, run_detach};
pub use calendar::run_calendar;
pub use complete_task::run_complete_task;
pub use describe::run_describe;
pub use edit_task::run_edit_task;
pub use export::run_export;
pub use list_tasks::{run_list_tasks, run_search_tasks, run_show_task};
pub use reminders::{run_check_reminders, run_watch};
pub use remove_task::run_remove_task;
pub use stats::run_stats;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "task-manager", version, about = "Track tasks with deadlines, reminders and recurrence")]
pub struct Cli {
    /// Task file to use instead of TASKS_FILE
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Data directory to use instead of DATA_DIR
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new task
    Add(add_task::AddTaskArgs),
    /// Change fields of a task
    Edit(edit_task::EditTaskArgs),
    /// Show every field of a task
    Show(list_tasks::ShowTaskArgs),
    /// List tasks
    List(list_tasks::ListTasksArgs),
    /// Search titles and descriptions
    Search(list_tasks::SearchTasksArgs),
    /// Mark a task as completed, scheduling its next occurrence
    Complete(complete_task::CompleteTaskArgs),
    /// Delete a task
    Remove(remove_task::RemoveTaskArgs),
    /// Tasks for a day, or a month overview
    Calendar(calendar::CalendarArgs),
    /// Print reminders that are due now
    Reminders,
    /// Keep checking for due reminders until interrupted
    Watch,
    /// Write all tasks to a CSV file
    Export(export::ExportArgs),
    /// Attach a file to a task
    Attach(attachments::AttachArgs),
    /// Detach a file from a task
    Detach(attachments::DetachArgs),
    /// Delete attachment files no task refers to
    CleanAttachments(attachments::CleanAttachmentsArgs),
    /// Explain a recurrence and preview its next dates
    Describe(describe::DescribeArgs),
    /// Task counts
    Stats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_file_flag_after_subcommand() {
        let cli = Cli::parse_from(["task-manager", "list", "--file", "other.json"]);
        assert_eq!(cli.file, Some(PathBuf::from("other.json")));
        assert!(matches!(cli.command, Command::List(_)));
    }

    #[test]
    fn add_parses_recurrence_flags() {
        let cli = Cli::parse_from([
            "task-manager",
            "add",
            "Water plants",
            "--deadline",
            "2024-05-01 08:00",
            "--repeat",
            "weekly",
            "--on",
            "mon,thu",
            "--times",
            "4",
        ]);
        let Command::Add(args) = cli.command else {
            panic!("expected add");
        };
        let pattern = args.recurrence.to_pattern().unwrap();
        assert_eq!(pattern.occurrences, Some(4));
        assert_eq!(pattern.weekdays.len(), 2);
    }

    #[test]
    fn unknown_labels_are_rejected_on_the_command_line() {
        assert!(Cli::try_parse_from(["task-manager", "add", "x", "--repeat", "fortnightly"]).is_err());
        assert!(Cli::try_parse_from(["task-manager", "add", "x", "--reminder", "soon"]).is_err());
        assert!(Cli::try_parse_from(["task-manager", "add", "x", "--reminder", "1h"]).is_ok());
    }

    #[test]
    fn describe_count_is_bounded() {
        assert!(Cli::try_parse_from(["task-manager", "describe", "-n", "0"]).is_err());
        assert!(Cli::try_parse_from(["task-manager", "describe", "-n", "18446744073709551615"]).is_err());
        let cli = Cli::parse_from(["task-manager", "describe", "-n", "12"]);
        let Command::Describe(args) = cli.command else {
            panic!("expected describe");
        };
        assert_eq!(args.count, 12);
    }
}
