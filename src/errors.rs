//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration is missing or invalid.
    Config(String),
    /// The invocation used an HTTP method other than GET or POST.
    MethodNotAllowed(String),
    /// The eligible-task query failed; fatal to the invocation.
    StoreQuery(String),
    /// The messaging provider rejected or failed a send.
    Send(String),
    /// Marking a single task as notified failed.
    Update(String),
    /// The daily bulk reset of notification flags failed.
    Reset(String),
    /// Persistence failure when interacting with `SQLite`.
    Db(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::MethodNotAllowed(msg) => write!(f, "method not allowed: {msg}"),
            Self::StoreQuery(msg) => write!(f, "store query: {msg}"),
            Self::Send(msg) => write!(f, "send: {msg}"),
            Self::Update(msg) => write!(f, "update: {msg}"),
            Self::Reset(msg) => write!(f, "reset: {msg}"),
            Self::Db(msg) => write!(f, "db: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Detail message without the category prefix.
    ///
    /// Used where the error text is reported to callers inside a JSON body
    /// that already names the failing step.
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Config(msg)
            | Self::MethodNotAllowed(msg)
            | Self::StoreQuery(msg)
            | Self::Send(msg)
            | Self::Update(msg)
            | Self::Reset(msg)
            | Self::Db(msg)
            | Self::Io(msg) => msg,
        }
    }

    /// Text returned in the `error` field of a failed invocation.
    ///
    /// Query failures name the store; everything else reports the bare
    /// detail. The prefixed [`Display`] form stays in the logs.
    #[must_use]
    pub fn response_message(&self) -> String {
        match self {
            Self::StoreQuery(msg) => format!("Supabase query error: {msg}"),
            other => other.detail().to_owned(),
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Db(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
