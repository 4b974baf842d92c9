use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

use crate::application::services::reminder_service::ReminderService;
use crate::domain::entities::task::Task;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::infrastructure::timezone::clock::Clock;

/// Periodically re-reads the task store and reports due reminders
pub struct ReminderScheduler {
    task_repo: Arc<dyn TaskRepository>,
    reminders: ReminderService,
    clock: Clock,
    period: Duration,
}

impl ReminderScheduler {
    pub fn new(task_repo: Arc<dyn TaskRepository>, clock: Clock, period: Duration) -> Self {
        Self {
            task_repo,
            reminders: ReminderService::new(),
            clock,
            period,
        }
    }

    /// One pass: reload, then collect reminders that became due
    pub fn tick(&mut self) -> Vec<Task> {
        if let Err(e) = self.task_repo.reload() {
            // keep working with what is already in memory
            error!("Failed to reload tasks: {}", e);
        }

        let tasks = self.task_repo.list_tasks();
        let due = self.reminders.check_reminders(&tasks, self.clock.now());
        debug!(
            "Checked {} tasks, {} reminders due, {} already sent",
            tasks.len(),
            due.len(),
            self.reminders.reminded_count()
        );
        due
    }

    /// Runs until `shutdown` resolves, handing every due task to `notify`
    pub async fn run<F, S>(mut self, mut notify: F, shutdown: S)
    where
        F: FnMut(&Task),
        S: Future<Output = ()>,
    {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!("Checking reminders every {:?}", self.period);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Reminder scheduler stopped");
                    break;
                }
                _ = ticker.tick() => {
                    for task in self.tick() {
                        notify(&task);
                    }
                }
            }
        }
    }
}
