//! PostgREST (Supabase) client for the `tasks` table.

use std::future::Future;
use std::pin::Pin;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::{json, Value};
use tracing::debug;

use super::{StoreSettings, TaskStore};
use crate::clock::CivilNow;
use crate::models::task::{Task, TaskId};
use crate::{AppError, Result};

const TASKS_PATH: &str = "/rest/v1/tasks";

/// HTTP client speaking PostgREST filter syntax against `tasks`.
#[derive(Debug, Clone)]
pub struct RestTaskStore {
    client: Client,
    endpoint: String,
    key: String,
}

impl RestTaskStore {
    /// Build a client for `settings.url`.
    #[must_use]
    pub fn new(settings: &StoreSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    /// Build a client reusing an existing connection pool.
    #[must_use]
    pub fn with_client(client: Client, settings: &StoreSettings) -> Self {
        let endpoint = format!("{}{TASKS_PATH}", settings.url.trim_end_matches('/'));
        Self {
            client,
            endpoint,
            key: settings.key.clone(),
        }
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, &self.endpoint)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    async fn patch_flag(&self, filter: (&str, String), value: bool) -> std::result::Result<(), String> {
        let response = self
            .request(Method::PATCH)
            .query(&[filter])
            .header("Prefer", "return=minimal")
            .json(&json!({ "reminder_sent_today": value }))
            .send()
            .await
            .map_err(|err| err.to_string())?;
        ensure_success(response).await.map(|_| ())
    }
}

impl TaskStore for RestTaskStore {
    fn fetch_due(&self, now: CivilNow) -> Pin<Box<dyn Future<Output = Result<Vec<Task>>> + Send + '_>> {
        Box::pin(async move {
            let filters = [
                ("select", "*".to_owned()),
                ("due_date", format!("eq.{}", now.today_str())),
                ("completed", "eq.false".to_owned()),
                ("reminder_sent_today", "eq.false".to_owned()),
                ("reminder_time", "not.is.null".to_owned()),
                ("reminder_time", format!("lte.{}", now.time_str())),
            ];
            debug!(endpoint = %self.endpoint, "querying due reminders");

            let response = self
                .request(Method::GET)
                .query(&filters)
                .send()
                .await
                .map_err(|err| AppError::StoreQuery(err.to_string()))?;
            let response = ensure_success(response).await.map_err(AppError::StoreQuery)?;
            response
                .json::<Vec<Task>>()
                .await
                .map_err(|err| AppError::StoreQuery(format!("invalid task rows: {err}")))
        })
    }

    fn mark_notified(&self, id: &TaskId) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let filter = format!("eq.{id}");
        Box::pin(async move {
            self.patch_flag(("id", filter), true)
                .await
                .map_err(AppError::Update)
        })
    }

    fn reset_notified(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.patch_flag(("reminder_sent_today", "eq.true".to_owned()), false)
                .await
                .map_err(AppError::Reset)
        })
    }
}

/// Pass 2xx responses through; otherwise extract PostgREST's `message`.
async fn ensure_success(response: Response) -> std::result::Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned));
    Err(message.unwrap_or_else(|| format!("{status}: {body}")))
}
