//! Task model as stored in the to-do list store.

use std::fmt::{Display, Formatter};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::deserialize_empty_as_none;

/// Marker shown when a task has no recognised priority.
pub const NEUTRAL_MARKER: &str = "⚪";

/// Opaque task identifier.
///
/// The store may key tasks by UUID text or by integer sequence; both are
/// carried through unchanged so error reports echo the original shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    /// Integer primary key.
    Number(i64),
    /// Text or UUID primary key.
    Text(String),
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Recognised task priority levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Urgent.
    High,
    /// Default.
    Medium,
    /// Whenever.
    Low,
}

impl Priority {
    /// Parse a stored priority label. Unknown labels yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Coloured marker prefixed to the reminder title.
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Self::High => "🔴",
            Self::Medium => "🟡",
            Self::Low => "🟢",
        }
    }
}

/// A to-do item with an optional daily reminder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Display title.
    pub task: String,
    /// Civil due date.
    pub due_date: NaiveDate,
    /// Whether the task is done.
    #[serde(default)]
    pub completed: bool,
    /// Raw priority label; kept as text so unknown values survive.
    #[serde(default, deserialize_with = "deserialize_empty_as_none")]
    pub priority: Option<String>,
    /// Free-text category label.
    #[serde(default, deserialize_with = "deserialize_empty_as_none")]
    pub category: Option<String>,
    /// Civil time of day the reminder fires; `None` means no reminder.
    #[serde(default)]
    pub reminder_time: Option<NaiveTime>,
    /// Set once a reminder has gone out for the current day.
    #[serde(default)]
    pub reminder_sent_today: bool,
}

impl Task {
    /// Construct an open task without a reminder.
    #[must_use]
    pub fn new(task: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: TaskId::Text(Uuid::new_v4().to_string()),
            task: task.into(),
            due_date,
            completed: false,
            priority: None,
            category: None,
            reminder_time: None,
            reminder_sent_today: false,
        }
    }

    /// Builder-style reminder time.
    #[must_use]
    pub fn with_reminder(mut self, at: NaiveTime) -> Self {
        self.reminder_time = Some(at);
        self
    }

    /// Builder-style priority label.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Builder-style category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Parsed priority, if the label is recognised.
    #[must_use]
    pub fn priority_level(&self) -> Option<Priority> {
        self.priority.as_deref().and_then(Priority::parse)
    }

    /// Priority text shown to the recipient; absent labels read `medium`.
    #[must_use]
    pub fn priority_label(&self) -> &str {
        self.priority.as_deref().unwrap_or("medium")
    }

    /// Marker for this task's priority, neutral when unknown or absent.
    #[must_use]
    pub fn priority_marker(&self) -> &'static str {
        self.priority_level()
            .map_or(NEUTRAL_MARKER, Priority::marker)
    }
}
