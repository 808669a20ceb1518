//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; the remote endpoint can be
//! overridden with `SCENEBOARD_ENDPOINT_URL`.
//!
//! # Example
//!
//! ```no_run
//! use sceneboard::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::logging::{LoggingConfig, LOG_FORMATS};
use crate::adapter::outbound::local::DEFAULT_STORAGE_KEY;
use crate::adapter::outbound::remote::client::parse_endpoint;
use crate::adapter::outbound::remote::settings::{RemoteConfig, ENDPOINT_ENV_VAR};
use crate::application::player::PlayerConfig;
use crate::error::{ConfigError, Result};

/// Where events are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Spreadsheet endpoint, optionally falling back to local storage.
    Remote,
    /// Local storage only.
    #[default]
    Local,
}

impl Backend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

/// Store selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,
    /// Reroute failed remote calls to local storage.
    pub fallback_to_local: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            fallback_to_local: true,
        }
    }
}

/// Local key-value storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Storage directory. Empty means `<home>/store`.
    pub dir: String,
    /// Storage key; the blob lives at `<dir>/<key>.json`.
    pub key: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl LocalConfig {
    /// Storage directory, resolved against the application home.
    #[must_use]
    pub fn resolve_dir(&self, home: &Path) -> PathBuf {
        if self.dir.trim().is_empty() {
            home.join("store")
        } else {
            PathBuf::from(self.dir.trim())
        }
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend selection and fallback policy.
    pub store: StoreConfig,

    /// Remote endpoint settings.
    pub remote: RemoteConfig,

    /// Local storage settings.
    pub local: LocalConfig,

    /// Playback timing.
    pub player: PlayerConfig,

    /// Logging and tracing configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load the file if it exists, otherwise use defaults.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENDPOINT_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            self.remote.endpoint_url = url;
        }
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.store.backend == Backend::Remote || self.remote.is_configured() {
            parse_endpoint(&self.remote.endpoint_url)?;
        }
        if self.remote.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "remote.timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.remote.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "remote.connect_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.remote.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "remote.retry_max_attempts",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.remote.callback_prefix.is_empty()
            || !self
                .remote
                .callback_prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        {
            return Err(ConfigError::InvalidValue {
                field: "remote.callback_prefix",
                reason: "must be a non-empty identifier".to_string(),
            }
            .into());
        }
        if self.local.key.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "local.key" }.into());
        }
        if !is_valid_key(&self.local.key) {
            return Err(ConfigError::InvalidValue {
                field: "local.key",
                reason: "use letters, digits, '_', '-' or '.' (no leading '.')".to_string(),
            }
            .into());
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("expected one of {}", LOG_FORMATS.join(", ")),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Serialize back to TOML.
    #[allow(clippy::result_large_err)]
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::InvalidValue {
                field: "config",
                reason: e.to_string(),
            }
            .into()
        })
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
