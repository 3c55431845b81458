//! `sentinel-tui` — Terminal dashboard for the OSNIT Shield intelligence backend.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `sentinel-core`'s [`DataStore`](sentinel_core::DataStore). Screens are
//! navigable via number keys (1-5): Overview, Threats, Incidents, Map,
//! and Alerts.
//!
//! Logs are written to a file (default `/tmp/sentinel-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task continuously
//! forwards store updates from the polling monitor into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use sentinel_core::Monitor;

use crate::app::App;

/// Terminal dashboard for monitoring OSNIT Shield intelligence data.
#[derive(Parser, Debug)]
#[command(name = "sentinel-tui", version, about)]
struct Cli {
    /// Backend base URL (e.g., http://127.0.0.1:8000)
    #[arg(short = 'u', long, env = "SENTINEL_URL")]
    url: Option<String>,

    /// Auto-refresh interval in seconds (0 disables the timer)
    #[arg(long, env = "SENTINEL_REFRESH_SECS")]
    refresh_secs: Option<u64>,

    /// Explicit config file path (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip TLS verification (self-signed reverse proxies)
    #[arg(long)]
    insecure: bool,

    /// Log file path (defaults to /tmp/sentinel-tui.log)
    #[arg(long, default_value = "/tmp/sentinel-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "sentinel_tui={log_level},sentinel_core={log_level},sentinel_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("sentinel-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve config (file + env), apply CLI overrides, and build a [`Monitor`].
fn build_monitor(cli: &Cli) -> Result<Monitor> {
    let mut config = match &cli.config {
        Some(path) => sentinel_config::load_config_from(path)
            .map_err(|e| eyre!("failed to load config: {e}"))?,
        None => sentinel_config::load_config_or_default(),
    };

    if let Some(ref url) = cli.url {
        config.base_url.clone_from(url);
    }
    if let Some(secs) = cli.refresh_secs {
        config.refresh_interval_secs = secs;
    }
    if cli.insecure {
        config.insecure = true;
    }

    let monitor_config =
        sentinel_config::to_monitor_config(&config).map_err(|e| eyre!("invalid config: {e}"))?;
    Ok(Monitor::new(monitor_config))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let monitor = build_monitor(&cli)?;
    info!(url = %monitor.config().url, "starting sentinel-tui");

    let mut app = App::new(monitor);
    app.run().await?;

    Ok(())
}
