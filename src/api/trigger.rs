//! Trigger classification and the soft shared-secret check.

use axum::http::{HeaderMap, Method};

use crate::{AppError, Result};

/// Header carrying the shared secret on scheduler requests.
pub const SECRET_HEADER: &str = "x-vercel-cron-secret";

/// User-agent fragment identifying the platform scheduler.
pub const CRON_USER_AGENT: &str = "vercel-cron";

/// How an invocation was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Scheduler tick (`GET`, or the in-process ticker).
    Periodic,
    /// Operator-initiated run (`POST`).
    Manual,
}

impl Trigger {
    /// Classify an HTTP method.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MethodNotAllowed` for anything but `GET` or `POST`.
    pub fn from_method(method: &Method) -> Result<Self> {
        if method == Method::GET {
            Ok(Self::Periodic)
        } else if method == Method::POST {
            Ok(Self::Manual)
        } else {
            Err(AppError::MethodNotAllowed(method.as_str().to_owned()))
        }
    }

    /// Short label for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Periodic => "periodic",
            Self::Manual => "manual",
        }
    }
}

/// Outcome of comparing the request credential with the configured secret.
///
/// No outcome blocks the invocation; a mismatch is only logged so that
/// manual runs without the secret keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretCheck {
    /// No secret configured.
    NotConfigured,
    /// Header matched the configured secret.
    Matched,
    /// Header missing or wrong, but the platform scheduler sent it.
    TrustedAgent,
    /// Header missing or wrong from an unknown caller.
    Mismatch,
}

impl SecretCheck {
    /// Short label for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::Matched => "matched",
            Self::TrustedAgent => "trusted_agent",
            Self::Mismatch => "mismatch",
        }
    }
}

/// Compare request headers against `expected`.
#[must_use]
pub fn check_secret(headers: &HeaderMap, expected: Option<&str>) -> SecretCheck {
    let Some(expected) = expected else {
        return SecretCheck::NotConfigured;
    };

    let presented = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
    if presented == Some(expected) {
        return SecretCheck::Matched;
    }

    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if user_agent.contains(CRON_USER_AGENT) {
        SecretCheck::TrustedAgent
    } else {
        SecretCheck::Mismatch
    }
}
