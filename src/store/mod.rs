//! Task store abstraction.
//!
//! The [`TaskStore`] trait is the only surface the dispatcher sees. Two
//! backends implement it: the PostgREST client in [`rest`] for hosted
//! deployments and the `SQLite` repository in
//! [`crate::persistence::task_repo`] for local runs and tests.

pub mod rest;

use std::future::Future;
use std::pin::Pin;

use crate::clock::CivilNow;
use crate::models::task::{Task, TaskId};
use crate::Result;

/// Store endpoint and access key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// `http(s)://` PostgREST base URL or a `sqlite:` database URL.
    pub url: String,
    /// Access key; the service key when available, otherwise the anon key.
    pub key: String,
}

/// Which backend a [`StoreSettings`] URL selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Hosted PostgREST endpoint.
    Rest,
    /// Local `SQLite` database.
    Sqlite,
}

impl StoreSettings {
    /// Backend selected by the URL scheme.
    ///
    /// Anything that is not a `sqlite:` URL is treated as PostgREST.
    #[must_use]
    pub fn backend(&self) -> StoreBackend {
        if self.url.starts_with("sqlite:") {
            StoreBackend::Sqlite
        } else {
            StoreBackend::Rest
        }
    }
}

/// Read/update operations the reminder check needs from the task store.
pub trait TaskStore: Send + Sync {
    /// Fetch tasks whose reminder is due at `now` and has not been sent.
    ///
    /// Selects rows where `due_date` is today, `completed` is false,
    /// `reminder_sent_today` is false, and `reminder_time` is set and not
    /// after the current civil minute. Row order is whatever the backend
    /// returns.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreQuery`](crate::AppError::StoreQuery) if the
    /// read fails.
    fn fetch_due(&self, now: CivilNow) -> Pin<Box<dyn Future<Output = Result<Vec<Task>>> + Send + '_>>;

    /// Set `reminder_sent_today = true` for a single task.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Update`](crate::AppError::Update) if the write fails.
    fn mark_notified(&self, id: &TaskId) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Clear `reminder_sent_today` on every task where it is set,
    /// regardless of due date.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Reset`](crate::AppError::Reset) if the write fails.
    fn reset_notified(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}
