//! Reminder dispatch: query, send-then-mark loop, and daily flag reset.
//!
//! One invocation runs strictly in program order. The due-task query is the
//! only fatal step; every later failure is recorded in the result and the
//! loop moves on. Nothing is retried. A task whose send succeeded but whose
//! flag update failed stays eligible and will be sent again next run.

use tracing::{error, info};

use crate::clock::CivilNow;
use crate::message::reminder_body;
use crate::messaging::{MessagingSettings, Messenger};
use crate::models::outcome::{DispatchError, InvocationResult};
use crate::models::task::Task;
use crate::store::TaskStore;
use crate::Result;

/// Runs one reminder check against a store and a messaging provider.
pub struct ReminderDispatcher<'a> {
    store: &'a dyn TaskStore,
    messenger: &'a dyn Messenger,
    settings: &'a MessagingSettings,
}

impl<'a> ReminderDispatcher<'a> {
    /// Bind the collaborators for a single invocation.
    #[must_use]
    pub fn new(
        store: &'a dyn TaskStore,
        messenger: &'a dyn Messenger,
        settings: &'a MessagingSettings,
    ) -> Self {
        Self {
            store,
            messenger,
            settings,
        }
    }

    /// Execute the check for the civil minute `now`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::StoreQuery` if the due-task query fails. No
    /// message is sent in that case.
    pub async fn run(&self, now: CivilNow) -> Result<InvocationResult> {
        info!(
            today = %now.today_str(),
            time = %now.time_str(),
            "checking reminders"
        );

        let tasks = self.store.fetch_due(now).await?;
        info!(count = tasks.len(), "found tasks to remind");

        let mut result = InvocationResult {
            checked_at: now.checked_at(),
            central_time: now.central_time(),
            tasks_found: tasks.len(),
            messages_sent: 0,
            errors: Vec::new(),
            reset_performed: None,
        };

        for task in &tasks {
            match self.dispatch_one(task).await {
                Ok(()) => result.messages_sent += 1,
                Err(entry) => result.errors.push(entry),
            }
        }

        if now.in_reset_window() {
            self.reset_flags(&mut result).await;
        }

        Ok(result)
    }

    async fn dispatch_one(&self, task: &Task) -> std::result::Result<(), DispatchError> {
        let body = reminder_body(task);

        let sid = match self
            .messenger
            .send(&body, &self.settings.from, &self.settings.to)
            .await
        {
            Ok(sid) => sid,
            Err(err) => {
                error!(task_id = %task.id, task = %task.task, %err, "failed to send reminder");
                return Err(DispatchError::send(
                    task.id.clone(),
                    task.task.clone(),
                    err.detail().to_owned(),
                ));
            }
        };
        info!(task_id = %task.id, task = %task.task, message_sid = %sid, "sent reminder");

        if let Err(err) = self.store.mark_notified(&task.id).await {
            error!(task_id = %task.id, %err, "failed to update reminder_sent_today");
            return Err(DispatchError::update(task.id.clone(), err.detail()));
        }

        Ok(())
    }

    async fn reset_flags(&self, result: &mut InvocationResult) {
        info!("resetting reminder_sent_today flags");
        match self.store.reset_notified().await {
            Ok(()) => {
                result.reset_performed = Some(true);
                info!("reset complete");
            }
            Err(err) => {
                error!(%err, "failed to reset reminder flags");
                result.errors.push(DispatchError::reset(err.detail()));
            }
        }
    }
}
