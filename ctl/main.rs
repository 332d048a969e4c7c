#![forbid(unsafe_code)]

//! `reminder-ctl` — local CLI companion for `reminder-dispatch`.
//!
//! Fires a manual or periodic reminder check at a running server, or
//! probes its health route, and prints the JSON reply.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reqwest::Method;

#[derive(Debug, Parser)]
#[command(
    name = "reminder-ctl",
    about = "Local CLI for reminder-dispatch server",
    version,
    long_about = None
)]
struct Cli {
    /// Base URL of the running server.
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    url: String,

    /// Reminder route path (must match server's `route_path` config).
    #[arg(long, default_value = "/api/check-reminders")]
    route: String,

    /// Shared secret sent in `x-vercel-cron-secret`.
    #[arg(long, env = "CRON_SECRET")]
    secret: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a manual reminder check (POST).
    Trigger,

    /// Run a check the way the scheduler does (GET).
    Probe,

    /// Check that the server is up.
    Health,
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("error: failed to build runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(execute(&args)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Send the request for `args.command`, print the reply, and report
/// whether the server answered with a success status.
async fn execute(args: &Cli) -> Result<bool, reqwest::Error> {
    let base = args.url.trim_end_matches('/');
    let (method, url) = match args.command {
        Command::Trigger => (Method::POST, format!("{base}{}", args.route)),
        Command::Probe => (Method::GET, format!("{base}{}", args.route)),
        Command::Health => (Method::GET, format!("{base}/health")),
    };

    let client = reqwest::Client::new();
    let mut request = client.request(method, url);
    if let Some(ref secret) = args.secret {
        request = request.header("x-vercel-cron-secret", secret);
    }

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    let rendered = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or(text);
    println!("{rendered}");

    if !status.is_success() {
        eprintln!("server returned {status}");
    }
    Ok(status.is_success())
}
