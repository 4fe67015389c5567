//! flowreap — workflow history cleanup daemon.
//!
//! Loads configuration, runs one cleanup pass against the configured
//! workflow engine, and optionally keeps running passes on a fixed
//! interval. The initial pass is fatal on failure; scheduled passes
//! log their error and wait for the next tick.

mod config;

use std::path::Path;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use flowreap_engine::run_cleanup_pass;
use flowreap_history::HistoryStore;
use flowreap_history_rest::{EngineClient, resolve_timezone};

use crate::config::{ConfigError, DaemonConfig};

/// Workflow history cleanup daemon.
#[derive(Parser, Debug)]
#[command(name = "flowreap", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "flowreap.toml")]
    config: String,

    /// Override the engine base URL.
    #[arg(long)]
    engine_url: Option<String>,

    /// Override the age threshold (e.g. "10m", "672h").
    #[arg(long)]
    max_age: Option<String>,

    /// Override the page size per history request.
    #[arg(long)]
    batch_size: Option<usize>,

    /// Override the eligibility strategy ("server" or "client").
    #[arg(long)]
    strategy: Option<String>,

    /// Override the repeat interval ("-" to run exactly once).
    #[arg(long)]
    interval: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the number of finished history instances and exit.
    Count,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = if Path::new(&cli.config).exists() {
        DaemonConfig::load(&cli.config)?
    } else {
        info!(path = %cli.config, "config file not found, using defaults");
        DaemonConfig::default()
    };
    apply_overrides(&mut config, &cli)?;

    let client = EngineClient::builder(&config.engine_url)
        .timeout(Duration::from_secs(config.timeout_secs))
        .timezone(resolve_timezone(&config.timezone))
        .build()?;

    if let Some(Command::Count) = cli.command {
        let count = client.count_finished().await?;
        println!("{count}");
        return Ok(());
    }

    // Parse durations before the first pass so a bad value fails the
    // process without touching the engine.
    let cleanup = config.cleanup_config()?;
    let interval = config.interval()?;

    info!(
        engine_url = %config.engine_url,
        max_age = %config.max_age,
        batch_size = cleanup.batch_size,
        strategy = ?cleanup.strategy,
        "starting cleanup"
    );
    run_cleanup_pass(&client, &cleanup).await?;

    let Some(every) = interval else {
        return Ok(());
    };

    info!(interval = %config.interval.as_deref().unwrap_or_default(), "scheduling recurring cleanup");
    let mut timer = tokio::time::interval(every);
    // The first tick completes immediately; skip it, the initial pass
    // just ran.
    timer.tick().await;
    loop {
        timer.tick().await;
        if let Err(e) = run_cleanup_pass(&client, &cleanup).await {
            error!(error = %e, "scheduled cleanup pass failed");
        }
    }
}

fn apply_overrides(config: &mut DaemonConfig, cli: &Cli) -> Result<(), ConfigError> {
    if let Some(ref url) = cli.engine_url {
        config.engine_url.clone_from(url);
    }
    if let Some(ref max_age) = cli.max_age {
        config.max_age.clone_from(max_age);
    }
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(ref strategy) = cli.strategy {
        config.strategy = strategy.parse().map_err(ConfigError::InvalidStrategy)?;
    }
    if let Some(ref interval) = cli.interval {
        config.interval = Some(interval.clone());
    }
    Ok(())
}
