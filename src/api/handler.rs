//! Request handlers for the reminder check and health probe.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::SecondsFormat;
use serde_json::json;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::trigger::{check_secret, SecretCheck, Trigger};
use super::{run_invocation, AppState};
use crate::config::ENV_CRON_SECRET;
use crate::models::outcome::FailureBody;

/// Handler for `GET /health`: returns 200 OK with a plain-text body.
pub async fn health() -> &'static str {
    "ok"
}

/// Handler for the reminder-check route.
///
/// Mounted for every method so that unsupported ones get a JSON 405
/// instead of axum's empty default. The shared-secret check never blocks.
pub async fn check_reminders(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let trigger = match Trigger::from_method(&method) {
        Ok(trigger) => trigger,
        Err(err) => {
            warn!(%err, "rejected reminder check");
            return (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "GET, POST")],
                Json(json!({ "error": "Method not allowed" })),
            )
                .into_response();
        }
    };

    let secret = check_secret(&headers, state.env.get(ENV_CRON_SECRET).as_deref());
    if secret == SecretCheck::Mismatch {
        // Still allowed so the endpoint can be exercised by hand.
        warn!("unauthorized request - missing or invalid cron secret");
    }

    let span = info_span!(
        "check_reminders",
        invocation_id = %Uuid::new_v4(),
        trigger = trigger.as_str(),
        secret = secret.as_str(),
    );

    match run_invocation(&state).instrument(span).await {
        Ok(result) => {
            info!(
                tasks_found = result.tasks_found,
                messages_sent = result.messages_sent,
                errors = result.errors.len(),
                "reminder check complete"
            );
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(err) => {
            error!(%err, "reminder check failed");
            let body = FailureBody {
                error: err.response_message(),
                timestamp: state
                    .clock
                    .now()
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
