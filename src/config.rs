//! Server configuration parsing and per-invocation credential resolution.
//!
//! Two layers exist. [`ServerConfig`] describes how the process listens
//! and is read once from an optional TOML file. [`ReminderConfig`] holds the
//! store and messaging credentials and is resolved from the environment at
//! the start of every invocation, so secrets never live in the TOML file.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::net::IpAddr;
use std::path::Path;

use serde::Deserialize;

use crate::messaging::MessagingSettings;
use crate::store::StoreSettings;
use crate::{AppError, Result};

/// Store endpoint URL.
pub const ENV_STORE_URL: &str = "SUPABASE_URL";
/// Service-level store key (preferred).
pub const ENV_STORE_SERVICE_KEY: &str = "SUPABASE_SERVICE_KEY";
/// Restricted store key used when no service key is set.
pub const ENV_STORE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
/// Messaging provider account identifier.
pub const ENV_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
/// Messaging provider auth token.
pub const ENV_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
/// Sender address for outbound reminders.
pub const ENV_SENDER: &str = "TWILIO_WHATSAPP_NUMBER";
/// Recipient address for outbound reminders.
pub const ENV_RECIPIENT: &str = "YOUR_WHATSAPP_NUMBER";
/// Optional shared secret expected on trigger requests.
pub const ENV_CRON_SECRET: &str = "CRON_SECRET";

/// In-process periodic trigger settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ScheduleConfig {
    /// Whether the built-in ticker runs alongside the HTTP endpoint.
    #[serde(default)]
    pub enabled: bool,
    /// Seconds between periodic invocations.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_seconds: default_interval_seconds(),
        }
    }
}

fn default_interval_seconds() -> u64 {
    60
}

fn default_http_port() -> u16 {
    3000
}

fn default_bind_address() -> String {
    "127.0.0.1".into()
}

fn default_route_path() -> String {
    "/api/check-reminders".into()
}

/// Process-level configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// HTTP port for the invocation endpoint.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Interface address to bind.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Route serving the reminder check.
    #[serde(default = "default_route_path")]
    pub route_path: String,
    /// Optional in-process periodic trigger.
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            bind_address: default_bind_address(),
            route_path: default_route_path(),
            schedule: ScheduleConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `bind_address` is not an IP address.
    pub fn bind_ip(&self) -> Result<IpAddr> {
        self.bind_address
            .parse()
            .map_err(|err| AppError::Config(format!("bind_address invalid: {err}")))
    }

    fn validate(&self) -> Result<()> {
        if self.schedule.interval_seconds == 0 {
            return Err(AppError::Config(
                "schedule.interval_seconds must be greater than zero".into(),
            ));
        }

        if !self.route_path.starts_with('/') {
            return Err(AppError::Config("route_path must start with '/'".into()));
        }

        self.bind_ip()?;
        Ok(())
    }
}

/// Where invocation settings are read from.
///
/// Production reads the process environment; tests supply a fixed map so
/// that no global state is mutated.
#[derive(Debug, Clone, Default)]
pub enum EnvSource {
    /// Read from `std::env` at lookup time.
    #[default]
    Process,
    /// Read from a fixed in-memory map.
    Fixed(HashMap<String, String>),
}

impl EnvSource {
    /// Build a fixed source from key/value pairs.
    pub fn fixed<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Fixed(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Look up a value, treating empty strings as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match self {
            Self::Process => env::var(key).ok(),
            Self::Fixed(map) => map.get(key).cloned(),
        };
        value.filter(|v| !v.is_empty())
    }
}

/// Credentials and addresses required for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderConfig {
    /// Task store endpoint and key.
    pub store: StoreSettings,
    /// Messaging provider account and addresses.
    pub messaging: MessagingSettings,
}

impl ReminderConfig {
    /// Resolve invocation settings from `source`.
    ///
    /// Store settings are checked before messaging settings. The service
    /// key wins over the anon key when both are present.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when the store or messaging settings are
    /// incomplete.
    pub fn resolve(source: &EnvSource) -> Result<Self> {
        let url = source.get(ENV_STORE_URL);
        let key = source
            .get(ENV_STORE_SERVICE_KEY)
            .or_else(|| source.get(ENV_STORE_ANON_KEY));
        let (Some(url), Some(key)) = (url, key) else {
            return Err(AppError::Config("Missing Supabase configuration".into()));
        };

        let account_sid = source.get(ENV_ACCOUNT_SID);
        let auth_token = source.get(ENV_AUTH_TOKEN);
        let from = source.get(ENV_SENDER);
        let to = source.get(ENV_RECIPIENT);
        let (Some(account_sid), Some(auth_token), Some(from), Some(to)) =
            (account_sid, auth_token, from, to)
        else {
            return Err(AppError::Config("Missing Twilio configuration".into()));
        };

        Ok(Self {
            store: StoreSettings { url, key },
            messaging: MessagingSettings {
                account_sid,
                auth_token,
                from,
                to,
            },
        })
    }
}
