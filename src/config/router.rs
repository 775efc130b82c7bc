//! Router configuration file
//!
//! ```json
//! {
//!   "profile": "test",
//!   "window_ms": 3600000,
//!   "soft_delete_channel": "soft_deleted",
//!   "soft_delete_ttl_secs": 300,
//!   "log_level": "info"
//! }
//! ```
//!
//! Every field is optional. Explicit values override the profile.

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::observability::Severity;
use crate::routing::ResurrectionPolicy;

use super::errors::{ConfigError, ConfigResult};

/// Built-in policy profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyProfile {
    /// One hour window, six month cleanup TTL
    #[default]
    Production,
    /// One hour window, five minute cleanup TTL
    Test,
}

impl PolicyProfile {
    pub fn policy(&self) -> ResurrectionPolicy {
        match self {
            PolicyProfile::Production => ResurrectionPolicy::production(),
            PolicyProfile::Test => ResurrectionPolicy::testing(),
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Base profile (default "production")
    #[serde(default)]
    pub profile: PolicyProfile,

    /// Resurrection window override in milliseconds
    #[serde(default)]
    pub window_ms: Option<u64>,

    /// Cleanup channel override
    #[serde(default)]
    pub soft_delete_channel: Option<String>,

    /// Cleanup TTL override in seconds
    #[serde(default)]
    pub soft_delete_ttl_secs: Option<u64>,

    /// Minimum log severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            profile: PolicyProfile::default(),
            window_ms: None,
            soft_delete_channel: None,
            soft_delete_ttl_secs: None,
            log_level: default_log_level(),
        }
    }
}

impl RouterConfig {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: RouterConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the effective policy can be built and the log level is known
    pub fn validate(&self) -> ConfigResult<()> {
        self.log_severity()?;
        self.to_policy()?;
        Ok(())
    }

    /// Effective policy: profile defaults overridden by explicit fields
    pub fn to_policy(&self) -> ConfigResult<ResurrectionPolicy> {
        let base = self.profile.policy();

        let window = match self.window_ms {
            Some(ms) => Duration::milliseconds(to_i64(ms, "window_ms")?),
            None => base.window(),
        };
        let channel = self
            .soft_delete_channel
            .clone()
            .unwrap_or_else(|| base.soft_delete_channel().to_string());
        let ttl = match self.soft_delete_ttl_secs {
            Some(secs) => Duration::seconds(to_i64(secs, "soft_delete_ttl_secs")?),
            None => base.soft_delete_ttl(),
        };

        Ok(ResurrectionPolicy::new(window, channel, ttl)?)
    }

    pub fn log_severity(&self) -> ConfigResult<Severity> {
        self.log_level
            .parse::<Severity>()
            .map_err(ConfigError::Invalid)
    }
}

/// chrono durations overflow well below `u64::MAX`; cap at ~100 years.
fn to_i64(value: u64, field: &str) -> ConfigResult<i64> {
    const MAX_SECS: u64 = 100 * 365 * 24 * 3600;
    const MAX_MS: u64 = MAX_SECS * 1000;
    let limit = if field.ends_with("_ms") { MAX_MS } else { MAX_SECS };
    if value > limit {
        return Err(ConfigError::Invalid(format!(
            "{} is too large: {} (max {})",
            field, value, limit
        )));
    }
    Ok(value as i64)
}
