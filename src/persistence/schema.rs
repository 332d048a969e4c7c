//! `SQLite` schema bootstrap logic.
//!
//! Table definitions use `CREATE TABLE IF NOT EXISTS` and are safe to
//! re-run on every connect.

use sqlx::SqlitePool;

use crate::Result;

/// Apply the `tasks` table and its lookup index.
///
/// Dates are stored as `YYYY-MM-DD` text and reminder times as `HH:MM:SS`
/// text so that string comparison matches chronological order.
///
/// # Errors
///
/// Returns `AppError::Db` if any DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS tasks (
    id                  TEXT PRIMARY KEY NOT NULL,
    task                TEXT NOT NULL,
    due_date            TEXT NOT NULL,
    completed           INTEGER NOT NULL DEFAULT 0,
    priority            TEXT,
    category            TEXT,
    reminder_time       TEXT,
    reminder_sent_today INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_tasks_due ON tasks(due_date, reminder_sent_today);
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}
