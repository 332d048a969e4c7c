//! Twilio Programmable Messaging client.

use std::future::Future;
use std::pin::Pin;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{MessagingSettings, Messenger};
use crate::{AppError, Result};

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

#[derive(Deserialize)]
struct MessageResource {
    sid: String,
}

/// Sends messages through `POST /2010-04-01/Accounts/{sid}/Messages.json`.
#[derive(Debug, Clone)]
pub struct TwilioMessenger {
    client: Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
}

impl TwilioMessenger {
    /// Build a client for the account in `settings`.
    #[must_use]
    pub fn new(settings: &MessagingSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    /// Build a client reusing an existing connection pool.
    #[must_use]
    pub fn with_client(client: Client, settings: &MessagingSettings) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.into(),
            account_sid: settings.account_sid.clone(),
            auth_token: settings.auth_token.clone(),
        }
    }

    /// Point the client at a different API host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            self.account_sid
        )
    }
}

impl Messenger for TwilioMessenger {
    fn send(
        &self,
        body: &str,
        from: &str,
        to: &str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        let form = [
            ("Body", body.to_owned()),
            ("From", from.to_owned()),
            ("To", to.to_owned()),
        ];
        Box::pin(async move {
            let response = self
                .client
                .post(self.messages_url())
                .basic_auth(&self.account_sid, Some(&self.auth_token))
                .form(&form)
                .send()
                .await
                .map_err(|err| AppError::Send(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<Value>(&text)
                    .ok()
                    .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
                    .unwrap_or_else(|| format!("{status}: {text}"));
                return Err(AppError::Send(message));
            }

            let resource: MessageResource = response
                .json()
                .await
                .map_err(|err| AppError::Send(format!("invalid provider response: {err}")))?;
            Ok(resource.sid)
        })
    }
}
