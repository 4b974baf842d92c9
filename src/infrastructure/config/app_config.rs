use chrono_tz::Tz;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

use crate::infrastructure::timezone::clock::parse_timezone;

const DEFAULT_TASKS_FILE: &str = "tasks.json";
const DEFAULT_REMINDER_INTERVAL_SECS: u64 = 60;

/// Runtime settings, read from the environment (and `.env`) at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tasks_file: PathBuf,
    pub data_dir: PathBuf,
    pub timezone: Tz,
    pub reminder_interval: Duration,
    pub log_level: Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tasks_file: PathBuf::from(".").join(DEFAULT_TASKS_FILE),
            data_dir: PathBuf::from("."),
            timezone: Tz::UTC,
            reminder_interval: Duration::from_secs(DEFAULT_REMINDER_INTERVAL_SECS),
            log_level: Level::INFO,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(data_dir) = value("DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        // relative task files live inside the data dir
        config.tasks_file = match value("TASKS_FILE") {
            Some(file) => config.data_dir.join(file),
            None => config.data_dir.join(DEFAULT_TASKS_FILE),
        };

        if let Some(tz) = value("TASK_TIMEZONE") {
            config.timezone = parse_timezone(&tz).map_err(anyhow::Error::msg)?;
        }

        if let Some(secs) = value("REMINDER_INTERVAL_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid REMINDER_INTERVAL_SECS '{}': {}", secs, e))?;
            config.reminder_interval = Duration::from_secs(secs.max(1));
        }

        if let Some(level) = value("LOG_LEVEL") {
            config.log_level = level
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid LOG_LEVEL '{}'", level))?;
        }

        Ok(config)
    }

    pub fn attachments_dir(&self) -> PathBuf {
        self.data_dir.join("attachments")
    }
}
