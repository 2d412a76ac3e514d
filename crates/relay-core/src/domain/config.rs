//! Relay configuration with validation.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default wait for an executor response. Matches the sandbox timeout the
/// executor side is provisioned with.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Upper bound on a single transport submit call.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_MAX_PENDING: usize = 1024;

pub const DEFAULT_SOURCE: &str = "agent";

/// Correlation engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Timeout used by `send_default`
    #[serde(with = "humantime_serde")]
    pub default_timeout: Duration,
    /// Bound on how long a transport submit may take before the request is
    /// reported as unavailable
    #[serde(with = "humantime_serde")]
    pub submit_timeout: Duration,
    /// Maximum number of in-flight requests
    pub max_pending: usize,
    /// Value of the `source` field on outbound envelopes
    pub source: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            max_pending: DEFAULT_MAX_PENDING,
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

impl RelayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "default_timeout cannot be 0".into(),
            ));
        }
        if self.submit_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "submit_timeout cannot be 0".into(),
            ));
        }
        if self.max_pending == 0 {
            return Err(ConfigError::InvalidLimit("max_pending cannot be 0".into()));
        }
        if self.source.trim().is_empty() {
            return Err(ConfigError::Invalid("source cannot be empty".into()));
        }
        Ok(())
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RELAY_DEFAULT_TIMEOUT`: e.g. `120s`, `500ms`, `2m` (default: 120s)
    /// - `RELAY_SUBMIT_TIMEOUT`: (default: 5s)
    /// - `RELAY_MAX_PENDING`: (default: 1024)
    /// - `RELAY_SOURCE`: (default: agent)
    ///
    /// Unparseable values are rejected rather than silently defaulted.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(v) = env::var("RELAY_DEFAULT_TIMEOUT") {
            config.default_timeout = humantime_serde::parse_duration(&v)
                .map_err(|e| ConfigError::InvalidTimeout(format!("RELAY_DEFAULT_TIMEOUT: {}", e)))?;
        }
        if let Ok(v) = env::var("RELAY_SUBMIT_TIMEOUT") {
            config.submit_timeout = humantime_serde::parse_duration(&v)
                .map_err(|e| ConfigError::InvalidTimeout(format!("RELAY_SUBMIT_TIMEOUT: {}", e)))?;
        }
        if let Ok(v) = env::var("RELAY_MAX_PENDING") {
            config.max_pending = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidLimit(format!("RELAY_MAX_PENDING: {}", v)))?;
        }
        if let Ok(v) = env::var("RELAY_SOURCE") {
            config.source = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Humantime serde module for Duration serialization
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // "ms" before "s" and "m"
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            let m = mins.trim().parse::<u64>().map_err(|_| "invalid minutes")?;
            m.checked_mul(60)
                .map(Duration::from_secs)
                .ok_or("minutes out of range")
        } else {
            // Try parsing as plain seconds
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}
