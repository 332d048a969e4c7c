//! Task repository for `SQLite` persistence.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use crate::clock::CivilNow;
use crate::models::task::{Task, TaskId};
use crate::store::TaskStore;
use crate::{AppError, Result};

use super::db::Database;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Repository for task records.
#[derive(Clone)]
pub struct TaskRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    task: String,
    due_date: String,
    completed: i64,
    priority: Option<String>,
    category: Option<String>,
    reminder_time: Option<String>,
    reminder_sent_today: i64,
}

impl TaskRow {
    fn into_task(self) -> Result<Task> {
        let due_date = NaiveDate::parse_from_str(&self.due_date, DATE_FORMAT)
            .map_err(|e| AppError::Db(format!("invalid due_date: {e}")))?;
        let reminder_time = self
            .reminder_time
            .as_deref()
            .map(|raw| NaiveTime::parse_from_str(raw, TIME_FORMAT))
            .transpose()
            .map_err(|e| AppError::Db(format!("invalid reminder_time: {e}")))?;

        Ok(Task {
            id: TaskId::Text(self.id),
            task: self.task,
            due_date,
            completed: self.completed != 0,
            priority: self.priority.filter(|s| !s.is_empty()),
            category: self.category.filter(|s| !s.is_empty()),
            reminder_time,
            reminder_sent_today: self.reminder_sent_today != 0,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, task, due_date, completed, priority, category, \
     reminder_time, reminder_sent_today FROM tasks";

impl TaskRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a new task record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the database insert fails.
    pub async fn insert(&self, task: &Task) -> Result<Task> {
        let due_date = task.due_date.format(DATE_FORMAT).to_string();
        let reminder_time = task
            .reminder_time
            .map(|t| t.format(TIME_FORMAT).to_string());

        sqlx::query(
            "INSERT INTO tasks (id, task, due_date, completed, priority, category, reminder_time, reminder_sent_today)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(task.id.to_string())
        .bind(&task.task)
        .bind(&due_date)
        .bind(i64::from(task.completed))
        .bind(&task.priority)
        .bind(&task.category)
        .bind(&reminder_time)
        .bind(i64::from(task.reminder_sent_today))
        .execute(self.db.as_ref())
        .await?;

        Ok(task.clone())
    }

    /// Retrieve a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails or the row is malformed.
    pub async fn get(&self, id: &TaskId) -> Result<Option<Task>> {
        let query = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let row: Option<TaskRow> = sqlx::query_as(&query)
            .bind(id.to_string())
            .fetch_optional(self.db.as_ref())
            .await?;
        row.map(TaskRow::into_task).transpose()
    }

    /// Tasks with a reminder due at `now` that has not gone out yet.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails or a row is malformed.
    pub async fn list_due(&self, now: CivilNow) -> Result<Vec<Task>> {
        let query = format!(
            "{SELECT_COLUMNS}
             WHERE due_date = ?1
               AND completed = 0
               AND reminder_sent_today = 0
               AND reminder_time IS NOT NULL
               AND reminder_time <= ?2
             ORDER BY rowid ASC"
        );
        let rows: Vec<TaskRow> = sqlx::query_as(&query)
            .bind(now.today_str())
            .bind(now.time_str())
            .fetch_all(self.db.as_ref())
            .await?;

        rows.into_iter().map(TaskRow::into_task).collect()
    }

    /// Set or clear the sent flag on one task.
    ///
    /// Returns the number of rows updated.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the update fails.
    pub async fn set_notified(&self, id: &TaskId, sent: bool) -> Result<u64> {
        let result = sqlx::query("UPDATE tasks SET reminder_sent_today = ?1 WHERE id = ?2")
            .bind(i64::from(sent))
            .bind(id.to_string())
            .execute(self.db.as_ref())
            .await?;
        Ok(result.rows_affected())
    }

    /// Clear the sent flag on every flagged task.
    ///
    /// Returns the number of rows updated.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the update fails.
    pub async fn clear_all_notified(&self) -> Result<u64> {
        let result =
            sqlx::query("UPDATE tasks SET reminder_sent_today = 0 WHERE reminder_sent_today = 1")
                .execute(self.db.as_ref())
                .await?;
        Ok(result.rows_affected())
    }
}

impl TaskStore for TaskRepo {
    fn fetch_due(&self, now: CivilNow) -> Pin<Box<dyn Future<Output = Result<Vec<Task>>> + Send + '_>> {
        Box::pin(async move {
            self.list_due(now)
                .await
                .map_err(|err| AppError::StoreQuery(err.detail().to_owned()))
        })
    }

    fn mark_notified(&self, id: &TaskId) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let id = id.clone();
        Box::pin(async move {
            self.set_notified(&id, true)
                .await
                .map(|_| ())
                .map_err(|err| AppError::Update(err.detail().to_owned()))
        })
    }

    fn reset_notified(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let cleared = self
                .clear_all_notified()
                .await
                .map_err(|err| AppError::Reset(err.detail().to_owned()))?;
            tracing::debug!(cleared, "sqlite reminder flags cleared");
            Ok(())
        })
    }
}
