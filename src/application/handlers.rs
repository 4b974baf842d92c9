use anyhow::Context as _;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::application::commands::{self, Cli, Command};
use crate::application::services::calendar_service::CalendarService;
use crate::application::services::task_service::TaskService;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::infrastructure::attachments::attachment_manager::AttachmentManager;
use crate::infrastructure::config::app_config::AppConfig;
use crate::infrastructure::repositories::json_task_repository::JsonTaskRepository;
use crate::infrastructure::timezone::clock::Clock;

/// Everything a command needs, wired once per process
pub struct AppContext {
    pub config: AppConfig,
    pub clock: Clock,
    pub task_repo: Arc<dyn TaskRepository>,
    pub task_service: TaskService,
    pub calendar_service: CalendarService,
}

impl AppContext {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let repo = JsonTaskRepository::new(&config.tasks_file)
            .with_context(|| format!("Failed to open {}", config.tasks_file.display()))?;
        debug!("Using task file {}", repo.file_path().display());

        let task_repo: Arc<dyn TaskRepository> = Arc::new(repo);
        Ok(Self {
            clock: Clock::new(config.timezone),
            task_service: TaskService::new(task_repo.clone()),
            calendar_service: CalendarService::new(task_repo.clone()),
            task_repo,
            config,
        })
    }

    /// The attachments directory is only created when a command needs it
    pub fn attachments(&self) -> anyhow::Result<AttachmentManager> {
        let dir = self.config.attachments_dir();
        AttachmentManager::new(&dir)
            .with_context(|| format!("Failed to prepare {}", dir.display()))
    }
}

/// Applies command-line overrides and runs the selected command
pub async fn run(cli: Cli, mut config: AppConfig) -> anyhow::Result<()> {
    apply_overrides(&mut config, cli.file, cli.data_dir);
    let ctx = AppContext::new(config)?;

    match cli.command {
        Command::Add(args) => commands::run_add_task(&ctx, args),
        Command::Edit(args) => commands::run_edit_task(&ctx, args),
        Command::Show(args) => commands::run_show_task(&ctx, args),
        Command::List(args) => commands::run_list_tasks(&ctx, args),
        Command::Search(args) => commands::run_search_tasks(&ctx, args),
        Command::Complete(args) => commands::run_complete_task(&ctx, args),
        Command::Remove(args) => commands::run_remove_task(&ctx, args),
        Command::Calendar(args) => commands::run_calendar(&ctx, args),
        Command::Reminders => commands::run_check_reminders(&ctx),
        Command::Watch => commands::run_watch(&ctx).await,
        Command::Export(args) => commands::run_export(&ctx, args),
        Command::Attach(args) => commands::run_attach(&ctx, args),
        Command::Detach(args) => commands::run_detach(&ctx, args),
        Command::CleanAttachments(args) => commands::run_clean_attachments(&ctx, args),
        Command::Describe(args) => commands::run_describe(&ctx, args),
        Command::Stats => commands::run_stats(&ctx),
    }
}

fn apply_overrides(config: &mut AppConfig, file: Option<PathBuf>, data_dir: Option<PathBuf>) {
    if let Some(data_dir) = data_dir {
        // keep the task file where it was relative to the data dir
        if let Ok(relative) = config.tasks_file.strip_prefix(&config.data_dir) {
            config.tasks_file = data_dir.join(relative);
        }
        config.data_dir = data_dir;
    }
    if let Some(file) = file {
        config.tasks_file = file;
    }
}
