//! Per-run logging: console plus `hashwatch-<run_id>.log`, and old-log cleanup

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Timestamp-based run id with millisecond precision (`YYYYMMDDHHMMSSmmm`)
pub fn generate_run_id() -> String {
    chrono::Local::now().format("%Y%m%d%H%M%S%3f").to_string()
}

pub fn log_file_name(run_id: &str) -> String {
    format!("hashwatch-{}.log", run_id)
}

fn run_log_pattern() -> Regex {
    Regex::new(r"^hashwatch-\d{17}\.log$").expect("run log pattern is valid")
}

/// Install the global subscriber: console and a non-ANSI copy in the run log.
///
/// `RUST_LOG` overrides the level; otherwise `info`, or `debug` when verbose.
pub fn init_logging(log_dir: &Path, run_id: &str, verbose: bool) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let log_path = log_dir.join(log_file_name(run_id));
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(log_path)
}

/// Delete the oldest run logs in `log_dir` so at most `max_logs_to_keep` remain.
///
/// Only files named like `hashwatch-<17 digits>.log` are considered. A file
/// that cannot be deleted is logged and skipped. Returns the removed paths.
pub fn cleanup_old_logs(log_dir: &Path, max_logs_to_keep: usize) -> Result<Vec<PathBuf>> {
    let pattern = run_log_pattern();

    let mut log_files: Vec<String> = fs::read_dir(log_dir)
        .with_context(|| format!("Failed to list {}", log_dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| pattern.is_match(name))
        .collect();

    if log_files.len() <= max_logs_to_keep {
        return Ok(Vec::new());
    }

    // run ids are fixed-width timestamps, so name order is age order
    log_files.sort();
    let excess = log_files.len() - max_logs_to_keep;

    let mut removed = Vec::with_capacity(excess);
    for name in log_files.into_iter().take(excess) {
        let path = log_dir.join(&name);
        info!("Removing log file: {}", name);
        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(e) => error!("Error while deleting log file {}: {}", name, e),
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn test_run_id_shape() {
        let run_id = generate_run_id();
        assert_eq!(run_id.len(), 17);
        assert!(run_id.chars().all(|c| c.is_ascii_digit()));
        assert!(run_log_pattern().is_match(&log_file_name(&run_id)));
    }

    #[test]
    fn test_cleanup_keeps_newest() {
        let dir = TempDir::new().unwrap();
        for i in 0..5 {
            touch(dir.path(), &format!("hashwatch-2024010112000000{}.log", i));
        }

        let removed = cleanup_old_logs(dir.path(), 3).unwrap();

        assert_eq!(removed.len(), 2);
        assert!(!dir.path().join("hashwatch-20240101120000000.log").exists());
        assert!(!dir.path().join("hashwatch-20240101120000001.log").exists());
        assert!(dir.path().join("hashwatch-20240101120000002.log").exists());
        assert!(dir.path().join("hashwatch-20240101120000004.log").exists());
    }

    #[test]
    fn test_cleanup_ignores_unrelated_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "hashwatch-20240101120000000.log");
        touch(dir.path(), "hashwatch-20240101120000001.log");
        touch(dir.path(), "hashwatch-latest.log");
        touch(dir.path(), "HASH");
        touch(dir.path(), "hashwatch-20240101120000002.log.bak");

        let removed = cleanup_old_logs(dir.path(), 1).unwrap();

        assert_eq!(removed, vec![dir.path().join("hashwatch-20240101120000000.log")]);
        assert!(dir.path().join("hashwatch-latest.log").exists());
        assert!(dir.path().join("HASH").exists());
        assert!(dir.path().join("hashwatch-20240101120000002.log.bak").exists());
    }

    #[test]
    fn test_cleanup_under_limit_removes_nothing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "hashwatch-20240101120000000.log");

        assert!(cleanup_old_logs(dir.path(), 10).unwrap().is_empty());
    }

    #[test]
    fn test_cleanup_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        assert!(cleanup_old_logs(&dir.path().join("missing"), 10).is_err());
    }
}
