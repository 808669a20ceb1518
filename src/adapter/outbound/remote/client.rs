//! GET-only RPC client for the spreadsheet endpoint.
//!
//! Every operation is one GET request:
//! - `t`: cache-busting timestamp in milliseconds
//! - `data`: base64 of the JSON request payload (omitted for `list`)
//! - `callback`: name the endpoint wraps its envelope in

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::Rng;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use super::dto::RpcRequest;
use super::envelope;
use super::settings::RemoteConfig;
use crate::error::{ConfigError, Result, TransportError};

/// HTTP client for the remote record store.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: HttpClient,
    endpoint: Url,
    callback_prefix: String,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl RpcClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the endpoint is missing or is not an
    /// http(s) URL.
    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        let endpoint = parse_endpoint(&config.endpoint_url)?;
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Ok(Self {
            http,
            endpoint,
            callback_prefix: config.callback_prefix.clone(),
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    /// Endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Read request (no payload), retried on timeout and connect errors.
    pub async fn fetch<T: DeserializeOwned>(&self) -> Result<T> {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            match self.send(None).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < max_attempts && should_retry(&err) => {
                    warn!(attempt, max_attempts, error = %err, "Remote read failed, retrying");
                    if self.retry_backoff_ms > 0 {
                        sleep(Duration::from_millis(self.retry_backoff_ms)).await;
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Mutating request. Sent exactly once.
    pub async fn call<T: DeserializeOwned>(&self, request: &RpcRequest<'_>) -> Result<T> {
        let data = encode_payload(request)?;
        debug!(action = request.action(), bytes = data.len(), "Sending remote request");
        Ok(self.send(Some(&data)).await?)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        data: Option<&str>,
    ) -> std::result::Result<T, TransportError> {
        let callback = self.callback_name();
        let timestamp = chrono::Utc::now().timestamp_millis().to_string();

        let mut query: Vec<(&str, &str)> = vec![("t", timestamp.as_str())];
        if let Some(data) = data {
            query.push(("data", data));
        }
        query.push(("callback", callback.as_str()));

        let body = self
            .http
            .get(self.endpoint.clone())
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        envelope::decode(&body, &callback)
    }

    fn callback_name(&self) -> String {
        let n: u32 = rand::thread_rng().gen_range(0..100_000);
        format!("{}{n}", self.callback_prefix)
    }
}

/// Base64 of the JSON-serialized request.
pub fn encode_payload(request: &RpcRequest<'_>) -> Result<String> {
    let json = serde_json::to_vec(request)?;
    Ok(STANDARD.encode(json))
}

/// Validate the configured endpoint URL.
pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::MissingField {
            field: "remote.endpoint_url",
        }
        .into());
    }
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        field: "remote.endpoint_url",
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            field: "remote.endpoint_url",
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }
        .into());
    }
    Ok(url)
}

fn should_retry(err: &TransportError) -> bool {
    match err {
        TransportError::Timeout => true,
        TransportError::Request(e) => e.is_connect(),
        _ => false,
    }
}
