//! hashwatch CLI - track the persisted-query hash behind IMDb's title search
//!
//! Usage:
//!   hashwatch                       Run with ./hashwatch.toml or built-in defaults
//!   hashwatch --config <file>       Run with an explicit config file
//!   hashwatch --hash-file <file>    Compare against and update a different HASH file
//!   hashwatch --headed              Show the browser window
//!
//! The process exits 0 once a run completes, whatever it found; the last log
//! line states whether a hash was retrieved and whether it matched.

mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use hashwatch_browser::ChromeLauncher;
use hashwatch_core::fail_open::{fail_open, fail_open_sync};
use hashwatch_core::{HashStore, HashwatchConfig, HashwatchError, RunReport};
use hashwatch_orchestrator::{InteractionScript, Pipeline, ScreenshotHook};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hashwatch")]
#[command(author, version, about = "Watch the persisted-query hash behind IMDb's title search")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file (defaults to ./hashwatch.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stored-hash file to compare against and update
    #[arg(long, value_name = "FILE")]
    hash_file: Option<PathBuf>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    headed: bool,

    /// Skip diagnostic screenshots
    #[arg(long)]
    no_screenshots: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli, Path::new("."))?;

    let run_id = logging::generate_run_id();
    let log_path = logging::init_logging(&config.logging.log_dir, &run_id, cli.verbose)?;

    info!("===================START===================");
    info!("Run {} logging to {}", run_id, log_path.display());

    fail_open_sync("log_cleanup", || {
        logging::cleanup_old_logs(&config.logging.log_dir, config.logging.max_logs_to_keep)
    });

    run(&config).await;

    info!("====================END====================");
    Ok(())
}

/// Resolve configuration: explicit file, else `<dir>/hashwatch.toml`, else defaults; then CLI overrides
fn load_config(cli: &Cli, dir: &Path) -> Result<HashwatchConfig> {
    let mut config = match &cli.config {
        Some(path) => HashwatchConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => HashwatchConfig::load_or_default(dir).context("Failed to load hashwatch.toml")?,
    };

    if let Some(ref hash_file) = cli.hash_file {
        config.storage.hash_file = hash_file.clone();
    }
    if cli.headed {
        config.browser.headless = false;
    }
    if cli.no_screenshots {
        config.diagnostics.screenshots = false;
    }

    Ok(config)
}

async fn run(config: &HashwatchConfig) -> RunReport {
    let provider = ChromeLauncher::new(config.browser.clone());
    let script = InteractionScript::from_config(config);
    let store = HashStore::new(&config.storage.hash_file);

    let mut pipeline = Pipeline::new(provider, script, store);

    if config.diagnostics.screenshots {
        let dir = config.diagnostics.screenshot_dir.clone();
        fail_open("screenshot_dir", || async move {
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(HashwatchError::from)
        })
        .await;
        pipeline = pipeline.with_observer(Box::new(ScreenshotHook::new(
            &config.diagnostics.screenshot_dir,
        )));
    }

    pipeline.run().await
}
