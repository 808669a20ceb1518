use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::id::EventId;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures talking to the remote record store.
///
/// Every variant counts as a transport failure for the fallback policy.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("endpoint returned HTTP {0}")]
    Status(u16),

    #[error("malformed response envelope: {0}")]
    MalformedEnvelope(String),

    #[error("endpoint rejected request: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        if let Some(status) = err.status() {
            return Self::Status(status.as_u16());
        }
        Self::Request(err)
    }
}

/// Errors raised while parsing a dialogs module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("invalid value at {path}: {message}")]
    Schema { path: String, message: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("event not found: {id}")]
    NotFound { id: EventId },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the failure came from the remote channel and may be
    /// recovered by the local fallback.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// True for caller mistakes (bad input, invariant violations).
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Domain(_) | Self::Import(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.into())
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}
