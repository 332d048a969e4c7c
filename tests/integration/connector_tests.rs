//! Integration tests for the live client factory.

use reminder_dispatch::api::{Connector, LiveConnector};
use reminder_dispatch::store::StoreSettings;

fn sqlite_url(dir: &tempfile::TempDir, name: &str) -> String {
    format!("sqlite://{}", dir.path().join(name).display())
}

#[tokio::test]
async fn sqlite_pool_is_reused_for_the_same_url() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = sqlite_url(&dir, "tasks.db");
    let connector = LiveConnector::default();

    let first = connector.sqlite_pool(&url).await.expect("first open");
    let second = connector.sqlite_pool(&url).await.expect("second open");

    // Both handles share one pool, so closing either closes both.
    first.close().await;
    assert!(second.is_closed());
}

#[tokio::test]
async fn distinct_urls_get_distinct_pools() {
    let dir = tempfile::tempdir().expect("tempdir");
    let connector = LiveConnector::default();

    let a = connector
        .sqlite_pool(&sqlite_url(&dir, "a.db"))
        .await
        .expect("open a");
    let b = connector
        .sqlite_pool(&sqlite_url(&dir, "b.db"))
        .await
        .expect("open b");

    a.close().await;
    assert!(!b.is_closed());
}

#[tokio::test]
async fn repeated_store_builds_keep_one_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = sqlite_url(&dir, "tasks.db");
    let connector = LiveConnector::default();
    let settings = StoreSettings {
        url: url.clone(),
        key: "unused".into(),
    };

    for _ in 0..3 {
        connector.store(&settings).await.expect("store");
    }

    let pool = connector.sqlite_pool(&url).await.expect("cached pool");
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
        .fetch_one(&pool)
        .await
        .expect("tasks table");
    assert_eq!(row.0, 0);
}
