//! Invocation result bodies returned to the trigger.

use serde::{Deserialize, Serialize};

use super::task::TaskId;

/// One recorded failure inside an otherwise successful invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchError {
    /// Task the failure belongs to; absent for the reset sweep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    /// Task title; present only for send failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    /// Human-readable failure description.
    pub error: String,
}

impl DispatchError {
    /// The provider refused or failed to deliver the reminder.
    #[must_use]
    pub fn send(task_id: TaskId, task_name: String, error: String) -> Self {
        Self {
            task_id: Some(task_id),
            task_name: Some(task_name),
            error,
        }
    }

    /// The reminder went out but the task could not be flagged.
    #[must_use]
    pub fn update(task_id: TaskId, detail: &str) -> Self {
        Self {
            task_id: Some(task_id),
            task_name: None,
            error: format!("Update failed: {detail}"),
        }
    }

    /// The daily flag reset failed.
    #[must_use]
    pub fn reset(detail: &str) -> Self {
        Self {
            task_id: None,
            task_name: None,
            error: format!("Reset failed: {detail}"),
        }
    }
}

/// Summary of a completed invocation (HTTP 200 body).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvocationResult {
    /// UTC instant the check ran, RFC 3339.
    pub checked_at: String,
    /// Civil date and time the query used.
    pub central_time: String,
    /// Number of eligible tasks returned by the store.
    pub tasks_found: usize,
    /// Reminders both sent and flagged.
    pub messages_sent: usize,
    /// Per-task and reset failures, in occurrence order.
    pub errors: Vec<DispatchError>,
    /// Present and `true` only when the daily reset ran successfully.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_performed: Option<bool>,
}

/// Body returned when the invocation fails before dispatch (HTTP 500).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureBody {
    /// Failure description.
    pub error: String,
    /// UTC instant of the failure, RFC 3339.
    pub timestamp: String,
}
