//! In-process periodic trigger.
//!
//! Runs the same pipeline as `GET` on the reminder route at a fixed
//! interval. Useful when no external cron is available; when both are
//! active, overlapping ticks can send duplicate reminders.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::api::trigger::Trigger;
use crate::api::{run_invocation, AppState};

/// Spawn the periodic reminder check.
///
/// The first check runs immediately; later ones follow every `interval`.
/// Ticks missed while a check is still running are skipped, not queued.
#[must_use]
pub fn spawn_schedule_task(
    state: Arc<AppState>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("reminder schedule shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let span = info_span!(
                        "check_reminders",
                        invocation_id = %Uuid::new_v4(),
                        trigger = Trigger::Periodic.as_str(),
                        secret = "internal",
                    );
                    match run_invocation(&state).instrument(span).await {
                        Ok(result) => info!(
                            tasks_found = result.tasks_found,
                            messages_sent = result.messages_sent,
                            errors = result.errors.len(),
                            "scheduled reminder check complete"
                        ),
                        Err(err) => error!(%err, "scheduled reminder check failed"),
                    }
                }
            }
        }
    })
}
