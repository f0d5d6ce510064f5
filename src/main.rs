//! # Graveyard - Terminal Process Monitor with AI Inspection
//!
//! Live process list with CPU, memory and GPU readings. Selected processes
//! can be explained by Gemini, looked up on VirusTotal, or killed.

#[macro_use]
extern crate rust_i18n;

// Load locale files from `locales/` directory, default to English
i18n!("locales", fallback = "en");

mod actions;
mod ai;
mod app;
mod config;
pub mod constants;
mod error;
mod models;
mod monitor;
mod scan;
mod state;
mod ui;
mod utils;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{Config, Credentials};
use constants::{config_file_path, DEFAULT_CREDENTIALS_FILE, MIN_REFRESH_MS};
use monitor::{MetricsSampler, ProcessSampler, SamplingDriver, SysinfoMetrics, SysinfoProcessTable};
use state::SharedState;
use ui::UpdateLoop;

/// Graveyard - terminal process monitor with AI inspection
#[derive(Parser, Debug)]
#[command(name = "graveyard", version, about = "A terminal process monitor with AI inspection and VirusTotal lookups")]
struct Cli {
    /// Refresh rate in milliseconds
    #[arg(long, short = 'r')]
    refresh_rate: Option<u64>,

    /// Disable AI inspection and scanning (no API calls)
    #[arg(long)]
    no_ai: bool,

    /// Log file path
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Config file (default ~/.config/graveyard/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Append-mode file logging, `RUST_LOG` filter defaulting to `info`.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install logger: {}", e))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and apply CLI overrides to config
    let config_path = cli.config.clone().unwrap_or_else(config_file_path);
    let (mut config, config_error) = match Config::load_from(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    if let Some(rate) = cli.refresh_rate {
        config.refresh_interval_ms = rate.max(MIN_REFRESH_MS);
    }
    if let Some(path) = cli.log_file {
        config.log_file = path;
    }

    init_logging(&config.log_file)?;
    info!(version = env!("CARGO_PKG_VERSION"), "graveyard starting");
    if let Some(e) = config_error {
        warn!("ignoring config file: {}", e);
    }

    let credentials_path = Path::new(DEFAULT_CREDENTIALS_FILE);
    let credentials = match Credentials::load(credentials_path) {
        Ok(creds) => creds,
        Err(e) => {
            warn!("ignoring credentials file: {}", e);
            Credentials::empty(credentials_path)
        }
    };

    let (shared, receivers) = SharedState::new();
    let (cancel_tx, cancel_rx) = watch::channel(false);

    let driver = SamplingDriver::new(
        ProcessSampler::new(SysinfoProcessTable::new(), config.max_processes),
        MetricsSampler::new(SysinfoMetrics::new()),
        Arc::clone(&shared),
        config.refresh_interval(),
    );
    let sampler = driver
        .spawn(cancel_rx.clone())
        .context("cannot start sampling thread")?;

    let mut app = app::App::new(
        config,
        credentials,
        shared,
        UpdateLoop::new(receivers, cancel_rx),
        Box::new(SysinfoProcessTable::new()),
        !cli.no_ai,
    );
    let result = app.run().await;

    let _ = cancel_tx.send(true);
    if sampler.join().is_err() {
        warn!("sampling thread panicked");
    }
    info!("graveyard stopped");
    result
}
