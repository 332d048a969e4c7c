//! HTTP surface for the reminder check.
//!
//! [`AppState`] bundles everything an invocation needs. Collaborator
//! clients are built per invocation through the [`Connector`] seam so that
//! configuration errors surface before any I/O and tests can substitute
//! in-memory backends.

pub mod handler;
pub mod server;
pub mod trigger;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::clock::{CivilNow, Clock, SystemClock};
use crate::config::{EnvSource, ReminderConfig, ServerConfig};
use crate::dispatch::ReminderDispatcher;
use crate::messaging::twilio::TwilioMessenger;
use crate::messaging::{MessagingSettings, Messenger};
use crate::models::outcome::InvocationResult;
use crate::persistence::db::{self, Database};
use crate::persistence::task_repo::TaskRepo;
use crate::store::rest::RestTaskStore;
use crate::store::{StoreBackend, StoreSettings, TaskStore};
use crate::Result;

/// Builds store and messaging clients from resolved settings.
pub trait Connector: Send + Sync {
    /// Open the task store described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if a local database cannot be opened.
    fn store<'a>(
        &'a self,
        settings: &'a StoreSettings,
    ) -> Pin<Box<dyn Future<Output = Result<Arc<dyn TaskStore>>> + Send + 'a>>;

    /// Build the messaging client described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the client cannot be constructed.
    fn messenger(&self, settings: &MessagingSettings) -> Result<Arc<dyn Messenger>>;
}

/// Production connector: PostgREST or `SQLite` store, Twilio messaging.
///
/// `SQLite` pools are opened once per URL and reused by later invocations.
#[derive(Debug, Clone, Default)]
pub struct LiveConnector {
    http: reqwest::Client,
    pools: Arc<Mutex<HashMap<String, Database>>>,
}

impl LiveConnector {
    /// Pool for `url`, connecting and bootstrapping the schema on first use.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the database cannot be opened.
    pub async fn sqlite_pool(&self, url: &str) -> Result<Database> {
        let mut pools = self.pools.lock().await;
        if let Some(pool) = pools.get(url) {
            return Ok(pool.clone());
        }
        let pool = db::connect(url).await?;
        pools.insert(url.to_owned(), pool.clone());
        Ok(pool)
    }
}

impl Connector for LiveConnector {
    fn store<'a>(
        &'a self,
        settings: &'a StoreSettings,
    ) -> Pin<Box<dyn Future<Output = Result<Arc<dyn TaskStore>>> + Send + 'a>> {
        Box::pin(async move {
            let store: Arc<dyn TaskStore> = match settings.backend() {
                StoreBackend::Rest => {
                    Arc::new(RestTaskStore::with_client(self.http.clone(), settings))
                }
                StoreBackend::Sqlite => {
                    let pool = self.sqlite_pool(&settings.url).await?;
                    Arc::new(TaskRepo::new(Arc::new(pool)))
                }
            };
            Ok(store)
        })
    }

    fn messenger(&self, settings: &MessagingSettings) -> Result<Arc<dyn Messenger>> {
        Ok(Arc::new(TwilioMessenger::with_client(
            self.http.clone(),
            settings,
        )))
    }
}

/// Shared state handed to every request.
pub struct AppState {
    /// Listener and scheduler settings.
    pub config: Arc<ServerConfig>,
    /// Source for per-invocation credentials.
    pub env: EnvSource,
    /// Time source for civil-time computation.
    pub clock: Arc<dyn Clock>,
    /// Client factory for the store and messaging provider.
    pub connector: Arc<dyn Connector>,
}

impl AppState {
    /// State wired to the process environment, system clock, and live clients.
    #[must_use]
    pub fn live(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            env: EnvSource::Process,
            clock: Arc::new(SystemClock),
            connector: Arc::new(LiveConnector::default()),
        }
    }
}

/// Resolve configuration, build clients, and run one reminder check.
///
/// # Errors
///
/// Returns `AppError::Config` when required settings are missing, any
/// error from client construction, or `AppError::StoreQuery` when the
/// due-task query fails. Per-task failures are reported inside the result.
pub async fn run_invocation(state: &AppState) -> Result<InvocationResult> {
    let config = ReminderConfig::resolve(&state.env)?;
    let store = state.connector.store(&config.store).await?;
    let messenger = state.connector.messenger(&config.messaging)?;

    let now = CivilNow::from_utc(state.clock.now());
    ReminderDispatcher::new(store.as_ref(), messenger.as_ref(), &config.messaging)
        .run(now)
        .await
}
