//! Client settings
//!
//! Settings can be loaded from a YAML document and overridden from the
//! environment. Every field is optional; anything left unset keeps the
//! client defaults.
//!
//! ```yaml
//! base_url: https://api.figma.com/v1/
//! access_token: figd_...
//! timeout_seconds: 30
//! retry:
//!   max_attempts: 3
//!   initial_backoff_seconds: 1.0
//!   backoff_multiplier: 2.0
//!   max_retry_after_seconds: 300
//! ```

use crate::error::{Error, Result};
use crate::http::ClientConfig;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the access token
pub const ENV_ACCESS_TOKEN: &str = "FIGMA_ACCESS_TOKEN";

/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "FIGMA_BASE_URL";

/// Environment variable overriding the per-attempt timeout
pub const ENV_TIMEOUT_SECONDS: &str = "FIGMA_TIMEOUT_SECONDS";

/// Top-level settings document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Base URL for API requests
    #[serde(default)]
    pub base_url: Option<String>,

    /// Personal access token
    #[serde(default)]
    pub access_token: Option<String>,

    /// Header carrying the access token
    #[serde(default)]
    pub auth_header: Option<String>,

    /// Per-attempt transport timeout
    #[serde(default)]
    pub timeout_seconds: Option<f64>,

    /// Retry behavior
    #[serde(default)]
    pub retry: RetrySettings,
}

/// Retry section of the settings document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySettings {
    #[serde(default)]
    pub max_attempts: Option<u32>,

    #[serde(default)]
    pub initial_backoff_seconds: Option<f64>,

    #[serde(default)]
    pub backoff_multiplier: Option<f64>,

    /// Longest `Retry-After` the client will wait for
    #[serde(default)]
    pub max_retry_after_seconds: Option<f64>,
}

impl RetrySettings {
    /// Apply these settings on top of `base`
    pub fn apply(&self, base: RetryPolicy) -> Result<RetryPolicy> {
        let mut policy = base;
        if let Some(attempts) = self.max_attempts {
            policy.max_attempts = attempts;
        }
        if let Some(secs) = self.initial_backoff_seconds {
            policy.initial_backoff = seconds("retry.initial_backoff_seconds", secs)?;
        }
        if let Some(multiplier) = self.backoff_multiplier {
            policy.backoff_multiplier = multiplier;
        }
        if let Some(secs) = self.max_retry_after_seconds {
            policy.max_retry_after = seconds("retry.max_retry_after_seconds", secs)?;
        }
        Ok(policy)
    }
}

impl Settings {
    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load settings from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Override fields from the process environment
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Override fields from an arbitrary variable lookup
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_ACCESS_TOKEN).filter(|t| !t.is_empty()) {
            self.access_token = Some(token);
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.is_empty()) {
            self.base_url = Some(url);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECONDS).and_then(|s| s.trim().parse().ok()) {
            self.timeout_seconds = Some(secs);
        }
        self
    }

    /// Build a client configuration, falling back to defaults
    pub fn into_client_config(self) -> Result<ClientConfig> {
        let mut config = ClientConfig::default();

        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        config.access_token = self.access_token;
        if let Some(header) = self.auth_header {
            config.auth_header = header;
        }
        if let Some(secs) = self.timeout_seconds {
            config.timeout = seconds("timeout_seconds", secs)?;
        }
        config.retry = self.retry.apply(config.retry)?;

        Ok(config)
    }
}

fn seconds(field: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| Error::config(format!("invalid duration for '{field}': {e}")))
}
