//! Unit tests for `TaskRepo` against in-memory `SQLite`.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use reminder_dispatch::clock::{civil_instant, CivilNow};
use reminder_dispatch::models::task::{Task, TaskId};
use reminder_dispatch::persistence::{db, task_repo::TaskRepo};
use reminder_dispatch::store::{StoreBackend, StoreSettings, TaskStore};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
}

fn at(hour: u32, minute: u32) -> CivilNow {
    CivilNow::from_utc(civil_instant(today(), hour, minute).unwrap())
}

fn reminder(title: &str, hour: u32, minute: u32) -> Task {
    Task::new(title, today()).with_reminder(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
}

async fn repo() -> TaskRepo {
    let pool = db::connect_memory().await.expect("db");
    TaskRepo::new(Arc::new(pool))
}

#[tokio::test]
async fn in_memory_connect_creates_tasks_table() {
    let pool = db::connect_memory().await.expect("in-memory connect should succeed");
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
        .fetch_one(&pool)
        .await
        .expect("tasks table should be queryable");
    assert_eq!(row.0, 0);
}

#[tokio::test]
async fn file_database_is_created_on_connect() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("tasks.db").display());
    let pool = db::connect(&url).await.expect("file connect");
    let repo = TaskRepo::new(Arc::new(pool));
    repo.insert(&reminder("Persisted", 9, 0)).await.expect("insert");
    assert!(dir.path().join("tasks.db").exists());
}

#[tokio::test]
async fn insert_and_get_round_trip() {
    let repo = repo().await;
    let task = reminder("Pay rent", 9, 0)
        .with_priority("high")
        .with_category("Finance");
    repo.insert(&task).await.expect("insert");

    let loaded = repo.get(&task.id).await.expect("get").expect("exists");
    assert_eq!(loaded, task);
}

#[tokio::test]
async fn get_missing_returns_none() {
    let repo = repo().await;
    assert!(repo.get(&TaskId::from("missing")).await.expect("get").is_none());
}

#[tokio::test]
async fn list_due_boundary_is_inclusive() {
    let repo = repo().await;
    let task = reminder("Boundary", 9, 0);
    repo.insert(&task).await.expect("insert");

    assert_eq!(repo.list_due(at(9, 0)).await.expect("query").len(), 1);
    assert!(repo.list_due(at(8, 59)).await.expect("query").is_empty());
}

#[tokio::test]
async fn list_due_applies_every_filter() {
    let repo = repo().await;
    let eligible = reminder("Eligible", 8, 0);
    let mut completed = reminder("Completed", 8, 0);
    completed.completed = true;
    let mut sent = reminder("Sent", 8, 0);
    sent.reminder_sent_today = true;
    let mut no_time = reminder("No time", 8, 0);
    no_time.reminder_time = None;
    let mut other_day = reminder("Other day", 8, 0);
    other_day.due_date = today().succ_opt().unwrap();
    let later = reminder("Later", 23, 0);

    for task in [&eligible, &completed, &sent, &no_time, &other_day, &later] {
        repo.insert(task).await.expect("insert");
    }

    let due = repo.list_due(at(12, 0)).await.expect("query");
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, eligible.id);
}

#[tokio::test]
async fn mark_and_reset_via_store_trait() {
    let repo = repo().await;
    let a = reminder("A", 8, 0);
    let b = reminder("B", 8, 0);
    repo.insert(&a).await.expect("insert a");
    repo.insert(&b).await.expect("insert b");

    let store: &dyn TaskStore = &repo;
    store.mark_notified(&a.id).await.expect("mark a");
    store.mark_notified(&b.id).await.expect("mark b");
    assert!(store.fetch_due(at(9, 0)).await.expect("query").is_empty());

    store.reset_notified().await.expect("reset");
    assert_eq!(store.fetch_due(at(9, 0)).await.expect("query").len(), 2);
}

#[tokio::test]
async fn clear_all_reports_rows_touched() {
    let repo = repo().await;
    let mut flagged = reminder("Flagged", 8, 0);
    flagged.reminder_sent_today = true;
    repo.insert(&flagged).await.expect("insert");
    repo.insert(&reminder("Clear", 8, 0)).await.expect("insert");

    assert_eq!(repo.clear_all_notified().await.expect("reset"), 1);
    assert_eq!(repo.clear_all_notified().await.expect("reset again"), 0);
}

#[test]
fn store_url_selects_backend() {
    let rest = StoreSettings {
        url: "https://abc.supabase.co".into(),
        key: "k".into(),
    };
    let sqlite = StoreSettings {
        url: "sqlite://tasks.db".into(),
        key: "k".into(),
    };
    assert_eq!(rest.backend(), StoreBackend::Rest);
    assert_eq!(sqlite.backend(), StoreBackend::Sqlite);
}
