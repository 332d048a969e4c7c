//! Integration tests for the in-process periodic trigger.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use reminder_dispatch::scheduler::spawn_schedule_task;

use super::test_helpers::{civil_at, due_task, env_without, full_env, harness, TestStore};

#[tokio::test]
async fn first_tick_runs_immediately_and_stops_on_cancel() {
    let store = TestStore::new().await;
    let task = due_task("Scheduled", 9, 0);
    store.seed(&[task.clone()]).await;
    let h = harness(store, full_env(), civil_at(9, 0));
    let ct = CancellationToken::new();

    let handle = spawn_schedule_task(Arc::clone(&h.state), Duration::from_secs(3600), ct.clone());
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(h.messenger.sent().len(), 1);
    assert!(h.store.flag_of(&task.id).await);

    ct.cancel();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("schedule task should stop after cancel")
        .expect("schedule task should not panic");
}

#[tokio::test]
async fn failing_invocation_does_not_stop_schedule() {
    let h = harness(
        TestStore::new().await,
        env_without(reminder_dispatch::config::ENV_AUTH_TOKEN),
        civil_at(9, 0),
    );
    let ct = CancellationToken::new();

    let handle = spawn_schedule_task(Arc::clone(&h.state), Duration::from_millis(50), ct.clone());
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(!handle.is_finished(), "config errors are logged, not fatal");
    assert_eq!(h.messenger.attempts(), 0);

    ct.cancel();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("schedule task should stop after cancel")
        .expect("schedule task should not panic");
}
