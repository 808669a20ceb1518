//! Remote endpoint configuration.

use serde::{Deserialize, Serialize};

/// Environment variable that overrides `remote.endpoint_url`.
pub const ENDPOINT_ENV_VAR: &str = "SCENEBOARD_ENDPOINT_URL";

/// Settings for the spreadsheet-backed HTTP endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Web app URL accepting GET requests. Empty means "not configured".
    pub endpoint_url: String,
    /// Whole-request timeout.
    pub timeout_ms: u64,
    /// TCP/TLS connect timeout.
    pub connect_timeout_ms: u64,
    /// Attempts for read requests (`list`). Mutations are sent once.
    pub retry_max_attempts: u32,
    /// Pause between read attempts.
    pub retry_backoff_ms: u64,
    /// Prefix for the per-request callback name.
    pub callback_prefix: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            timeout_ms: 10_000,
            connect_timeout_ms: 5_000,
            retry_max_attempts: 2,
            retry_backoff_ms: 250,
            callback_prefix: "jsonp_callback_".to_string(),
        }
    }
}

impl RemoteConfig {
    /// True when an endpoint URL has been provided.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.endpoint_url.trim().is_empty()
    }
}
