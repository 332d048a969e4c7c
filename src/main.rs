#![forbid(unsafe_code)]

//! `reminder-dispatch` — HTTP endpoint that sends due task reminders.
//!
//! Bootstraps configuration, starts the reminder route (and optionally the
//! in-process schedule), then waits for a shutdown signal.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use reminder_dispatch::api::{server, AppState};
use reminder_dispatch::config::ServerConfig;
use reminder_dispatch::scheduler;
use reminder_dispatch::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "reminder-dispatch", about = "Task reminder dispatcher", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the HTTP port from the configuration file.
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("reminder-dispatch bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = match args.config {
        Some(ref path) => ServerConfig::load_from_path(path)?,
        None => ServerConfig::default(),
    };
    if let Some(port) = args.port {
        config.http_port = port;
    }
    info!(
        port = config.http_port,
        schedule = config.schedule.enabled,
        "configuration loaded"
    );

    let state = Arc::new(AppState::live(config));
    let ct = CancellationToken::new();

    // ── Start optional schedule ─────────────────────────
    let schedule_handle = if state.config.schedule.enabled {
        let interval = Duration::from_secs(state.config.schedule.interval_seconds);
        info!(?interval, "in-process schedule started");
        Some(scheduler::spawn_schedule_task(
            Arc::clone(&state),
            interval,
            ct.clone(),
        ))
    } else {
        None
    };

    // ── Start HTTP endpoint ─────────────────────────────
    let http_ct = ct.clone();
    let http_state = Arc::clone(&state);
    let http_handle = tokio::spawn(async move {
        if let Err(err) = server::serve(http_state, http_ct).await {
            error!(%err, "http endpoint failed");
        }
    });

    // ── Wait for shutdown signal ────────────────────────
    shutdown_signal().await;
    info!("shutdown signal received");
    ct.cancel();

    let _ = http_handle.await;
    if let Some(handle) = schedule_handle {
        let _ = handle.await;
    }
    info!("reminder-dispatch shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
