//! Outbound messaging provider abstraction.

pub mod twilio;

use std::future::Future;
use std::pin::Pin;

use crate::Result;

/// Provider account and the fixed sender/recipient pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagingSettings {
    /// Provider account identifier.
    pub account_sid: String,
    /// Provider auth token.
    pub auth_token: String,
    /// Sender address, e.g. `whatsapp:+14155238886`.
    pub from: String,
    /// Recipient address.
    pub to: String,
}

/// Fire-and-forget message delivery.
pub trait Messenger: Send + Sync {
    /// Send `body` from `from` to `to`, returning the provider message id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Send`](crate::AppError::Send) if the provider
    /// rejects the message or cannot be reached.
    fn send(
        &self,
        body: &str,
        from: &str,
        to: &str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>>;
}
