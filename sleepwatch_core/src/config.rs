//! Configuration for sleepwatch.
//!
//! Settings resolve in layers: built-in defaults, then the optional
//! `$XDG_CONFIG_HOME/sleepwatch/config.toml` (or an explicit path), then
//! environment variables. The result is read-only for the rest of the run.

use crate::{Error, Result, Thresholds};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_TOKEN: &str = "OURA_TOKEN";
pub const ENV_WEBHOOK_URL: &str = "POKE_WEBHOOK_URL";
pub const ENV_SCORE_THRESHOLD: &str = "SLEEP_SCORE_THRESHOLD";
pub const ENV_MIN_TOTAL_SLEEP: &str = "MIN_TOTAL_SLEEP_MIN";
pub const ENV_MAX_LATENCY: &str = "MAX_SLEEP_LATENCY_MIN";
pub const ENV_STREAK: &str = "POOR_NIGHTS_STREAK";
pub const ENV_TIMEZONE: &str = "TIMEZONE";
pub const ENV_API_BASE_URL: &str = "OURA_API_BASE_URL";

/// Application configuration
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Informational only; never used in evaluation
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            provider: ProviderConfig::default(),
            webhook: WebhookConfig::default(),
            timezone: default_timezone(),
        }
    }
}

/// Sleep provider connection settings
#[derive(Clone, Debug, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub token: Option<String>,

    /// Days of history to request, ending today
    #[serde(default = "default_window_days")]
    pub window_days: i64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            window_days: default_window_days(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Notification webhook settings
#[derive(Clone, Debug, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl WebhookConfig {
    /// The webhook URL, if one is set and non-blank
    pub fn target(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

// Default value functions
fn default_timezone() -> String {
    "America/New_York".into()
}

fn default_base_url() -> String {
    "https://api.ouraring.com".into()
}

fn default_window_days() -> i64 {
    7
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from `path`, or from the standard config path.
    ///
    /// An explicit path must exist; the standard path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from(path);
        }

        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            other => {
                tracing::debug!("No config file found at {:?}, using defaults", other);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("sleepwatch").join("config.toml"))
    }

    /// Apply overrides from the process environment
    pub fn with_env(mut self) -> Self {
        self.apply_env_with(|key| std::env::var(key).ok());
        self
    }

    /// Apply overrides using `lookup` to read variables.
    ///
    /// Empty values count as unset. Numbers that fail to parse keep the
    /// previous value and log a warning.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get(ENV_TOKEN) {
            self.provider.token = Some(token);
        }
        if let Some(url) = get(ENV_WEBHOOK_URL) {
            self.webhook.url = Some(url);
        }
        if let Some(url) = get(ENV_API_BASE_URL) {
            self.provider.base_url = url;
        }
        if let Some(tz) = get(ENV_TIMEZONE) {
            self.timezone = tz;
        }

        let t = &mut self.thresholds;
        override_number(&get, ENV_SCORE_THRESHOLD, &mut t.score_threshold);
        override_number(&get, ENV_MIN_TOTAL_SLEEP, &mut t.min_total_sleep_min);
        override_number(&get, ENV_MAX_LATENCY, &mut t.max_sleep_latency_min);

        if let Some(raw) = get(ENV_STREAK) {
            match raw.trim().parse::<u32>() {
                Ok(value) => t.poor_nights_streak = value,
                Err(_) => tracing::warn!(
                    "Ignoring {}={:?}: not a whole number, keeping {}",
                    ENV_STREAK,
                    raw,
                    t.poor_nights_streak
                ),
            }
        }
    }
}

fn override_number<G>(get: &G, key: &str, slot: &mut f64)
where
    G: Fn(&str) -> Option<String>,
{
    let Some(raw) = get(key) else {
        return;
    };

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => *slot = value,
        _ => tracing::warn!("Ignoring {}={:?}: not a number, keeping {}", key, raw, slot),
    }
}
