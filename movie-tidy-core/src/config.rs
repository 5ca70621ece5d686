use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the current directory before the user config dir.
pub const LOCAL_CONFIG_FILE: &str = ".movie-tidy.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsConfig {
    /// Directory scanned by `run` when `--dir` is not given
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Template sent to the naming service as `custom_name`
    #[serde(default = "default_name_format")]
    pub name_format: String,

    /// Ask for confirmation even when the service returns a single name
    #[serde(default = "default_true")]
    pub manual_mode: bool,

    /// Only process the N most recently modified files (0 = all)
    #[serde(default)]
    pub recent_file_count: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            name_format: default_name_format(),
            manual_mode: true,
            recent_file_count: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    /// Base URL of the naming service; the query path is appended to it
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Retry policy for transport failures when talking to the naming service.
///
/// Only network-level errors are retried. A response that parses, even one
/// carrying a non-zero `code`, is final.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one; 0 behaves like 1
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Factor applied to the backoff after every failed attempt
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            multiplier: default_multiplier(),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff_ms: 0,
            multiplier: 1,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.multiplier.max(1))
            .saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.initial_backoff_ms.saturating_mul(factor))
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("./")
}

fn default_name_format() -> String {
    "[year][star]title_short".to_string()
}

fn default_endpoint() -> String {
    "https://api.rettrue.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_multiplier() -> u32 {
    2
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from `./.movie-tidy.toml`, then the user config dir,
    /// falling back to defaults when neither exists.
    pub fn load() -> Result<Self> {
        if let Ok(cwd) = std::env::current_dir() {
            let local = cwd.join(LOCAL_CONFIG_FILE);
            if local.exists() {
                return Self::load_from_path(&local);
            }
        }

        if let Some(global) = Self::global_path() {
            if global.exists() {
                return Self::load_from_path(&global);
            }
        }

        Ok(Self::default())
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// `<config_dir>/movie-tidy/config.toml`, if the platform has a config dir
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("movie-tidy").join("config.toml"))
    }
}
