use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::{Attempts, BackoffPolicy, PolicyError};

/// Default retry policy parameters (`[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first). Negative = unbounded.
    pub max_attempts: i64,
    /// Wait before the second attempt, in seconds (e.g. 0.25 = 250ms).
    pub interval_secs: f64,
    /// Factor applied to the wait after each failed attempt.
    pub multiplier: f64,
    /// Seconds added to the wait after each failed attempt (after the multiplier).
    pub addend_secs: f64,
    /// Upper bound on the wait in seconds; none = no cap.
    pub max_interval_secs: Option<f64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: -1,
            interval_secs: 0.0,
            multiplier: 1.0,
            addend_secs: 0.0,
            max_interval_secs: None,
        }
    }
}

fn secs(field: &'static str, value: f64) -> Result<Duration, PolicyError> {
    Duration::try_from_secs_f64(value).map_err(|_| PolicyError::InvalidDuration { field, value })
}

impl RetryConfig {
    /// Validate and convert to a policy that retries every failure.
    pub fn to_policy(&self) -> Result<BackoffPolicy, PolicyError> {
        let max_interval = self
            .max_interval_secs
            .map(|v| secs("max_interval_secs", v))
            .transpose()?;
        Ok(BackoffPolicy::builder()
            .max_attempts(Attempts::from_count(self.max_attempts)?)
            .initial_interval(secs("interval_secs", self.interval_secs)?)
            .multiplier(self.multiplier)?
            .addend(secs("addend_secs", self.addend_secs)?)
            .max_interval(max_interval)
            .build())
    }
}

/// Global configuration loaded from `~/.config/reattempt/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReattemptConfig {
    /// Policy used when the command line does not override a parameter.
    #[serde(default)]
    pub retry: RetryConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("reattempt")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ReattemptConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ReattemptConfig::default();
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

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<ReattemptConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: ReattemptConfig = toml::from_str(&data)?;
    Ok(cfg)
}
