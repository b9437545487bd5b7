//! Configuration management for hashwatch
//!
//! Every field has a default, so a missing `hashwatch.toml` (or one that only
//! overrides a few keys) yields the stock IMDb "Shrek" run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{HashwatchError, Result};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "hashwatch.toml";

/// Top-level hashwatch configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HashwatchConfig {
    /// What to search for and where
    #[serde(default)]
    pub target: TargetConfig,

    /// Browser launch settings
    #[serde(default)]
    pub browser: BrowserSettings,

    /// Wait and settle timings for the interaction sequence
    #[serde(default)]
    pub timing: TimingConfig,

    /// Stored-hash location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Per-run log files
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Diagnostic screenshots
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Search target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_url")]
    pub url: String,

    /// Keyword typed into the title search; also a required URL marker
    #[serde(default = "default_keyword")]
    pub keyword: String,
}

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserSettings {
    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: Option<String>,

    /// Chrome/Chromium executable; auto-detected when unset
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,
}

/// Interaction timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Upper bound for each element wait
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Pause after page load and after submitting the search
    #[serde(default = "default_settle_secs")]
    pub settle_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_hash_file")]
    pub hash_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory holding `hashwatch-<run_id>.log` files
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default = "default_max_logs_to_keep")]
    pub max_logs_to_keep: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default = "default_true")]
    pub screenshots: bool,

    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: PathBuf,
}

// Default value providers
fn default_url() -> String {
    "https://www.imdb.com/search/title/".to_string()
}

fn default_keyword() -> String {
    "Shrek".to_string()
}

fn default_true() -> bool {
    true
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1600
}

fn default_user_agent() -> Option<String> {
    Some(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/97.0.4692.71 Safari/537.36"
            .to_string(),
    )
}

fn default_wait_timeout_secs() -> u64 {
    20
}

fn default_settle_secs() -> u64 {
    5
}

fn default_hash_file() -> PathBuf {
    PathBuf::from(crate::store::DEFAULT_HASH_FILE)
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_logs_to_keep() -> usize {
    10
}

fn default_screenshot_dir() -> PathBuf {
    PathBuf::from(".")
}

impl HashwatchConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| HashwatchError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Load configuration from an explicit file; the file must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HashwatchError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Load `hashwatch.toml` from `dir` or use defaults
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Render the configuration back to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| HashwatchError::Config(format!("Failed to serialize config: {}", e)))
    }
}

impl TimingConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            keyword: default_keyword(),
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: default_window_width(),
            window_height: default_window_height(),
            user_agent: default_user_agent(),
            chrome_path: None,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            wait_timeout_secs: default_wait_timeout_secs(),
            settle_secs: default_settle_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            hash_file: default_hash_file(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            max_logs_to_keep: default_max_logs_to_keep(),
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            screenshots: true,
            screenshot_dir: default_screenshot_dir(),
        }
    }
}
