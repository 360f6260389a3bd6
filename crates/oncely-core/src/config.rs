use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::{
    Backoff, ConfigError, ErrorCatalog, ErrorClassifier, LogListener, RetryExecutor, RetryPolicy,
};

/// Retry policy parameters (`[retry]` section in config.toml).
///
/// camelCase keys (`maxAttempts`, `initialInterval`, ...) are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    #[serde(alias = "maxAttempts")]
    pub max_attempts: u32,
    /// Delay before the second attempt, in milliseconds.
    #[serde(alias = "initialInterval")]
    pub initial_interval_ms: u64,
    /// Growth factor applied per attempt.
    pub multiplier: f64,
    /// Ceiling on the pre-jitter delay, in milliseconds.
    #[serde(alias = "maxInterval")]
    pub max_interval_ms: u64,
    /// Upper bound of the random delay added after the ceiling, in milliseconds.
    #[serde(alias = "jitter")]
    pub jitter_ms: u64,
    /// Failure kinds to retry. Empty means every kind not listed as non-retryable.
    #[serde(alias = "retryableExceptions")]
    pub retryable_exceptions: Vec<String>,
    /// Failure kinds never retried; wins over `retryable_exceptions`.
    #[serde(alias = "nonRetryableExceptions")]
    pub non_retryable_exceptions: Vec<String>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_interval_ms: 100,
            multiplier: 2.0,
            max_interval_ms: 5000,
            jitter_ms: 0,
            retryable_exceptions: Vec::new(),
            non_retryable_exceptions: Vec::new(),
        }
    }
}

impl RetryConfig {
    pub fn backoff(&self) -> Backoff {
        Backoff {
            initial: Duration::from_millis(self.initial_interval_ms),
            multiplier: self.multiplier,
            max: Duration::from_millis(self.max_interval_ms),
            jitter: Duration::from_millis(self.jitter_ms),
        }
    }

    /// Check numeric ranges. Failure kinds are checked by [`policy`](Self::policy).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "max_attempts",
                reason: "must be at least 1".into(),
            });
        }
        self.backoff().validate()
    }

    /// Build a policy, resolving failure kinds against `catalog`.
    pub fn policy(&self, catalog: &ErrorCatalog) -> Result<RetryPolicy, ConfigError> {
        self.validate()?;
        let classifier = ErrorClassifier::new(
            catalog.clone(),
            self.retryable_exceptions.iter().cloned(),
            self.non_retryable_exceptions.iter().cloned(),
        )?;
        RetryPolicy::new(self.max_attempts, self.backoff(), classifier)
    }
}

impl RetryExecutor {
    /// Executor for `config` that logs every event through `tracing`.
    pub fn from_config(config: &RetryConfig, catalog: &ErrorCatalog) -> Result<Self, ConfigError> {
        Ok(RetryExecutor::new(config.policy(catalog)?).with_listener(LogListener))
    }
}

/// Global configuration loaded from `~/.config/oncely/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OncelyConfig {
    pub retry: RetryConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("oncely")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<OncelyConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = OncelyConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load and validate configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<OncelyConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let cfg: OncelyConfig =
        toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    cfg.retry
        .validate()
        .with_context(|| format!("invalid [retry] section in {}", path.display()))?;
    Ok(cfg)
}
