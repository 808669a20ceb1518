//! Decoding of the callback-wrapped `{success, data|error}` envelope.
//!
//! The endpoint answers `name({"success":true,"data":...})`. When it could
//! not read the callback parameter it answers with the bare JSON object.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::TransportError;

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default)]
    error: Option<String>,
}

/// Strip `callback(` ... `)` (and an optional trailing `;`) from `body`.
pub fn unwrap_callback<'a>(body: &'a str, callback: &str) -> Result<&'a str, TransportError> {
    let body = body.trim();
    if body.starts_with('{') {
        return Ok(body);
    }

    let rest = body.strip_prefix(callback).ok_or_else(|| {
        TransportError::MalformedEnvelope(format!("expected callback '{callback}'"))
    })?;
    let rest = rest.trim_start().strip_prefix('(').ok_or_else(|| {
        TransportError::MalformedEnvelope("missing '(' after callback name".to_string())
    })?;
    let rest = rest.trim_end();
    let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
    rest.strip_suffix(')')
        .ok_or_else(|| TransportError::MalformedEnvelope("missing closing ')'".to_string()))
}

/// Decode a response body into the envelope's `data` payload.
pub fn decode<T: DeserializeOwned>(body: &str, callback: &str) -> Result<T, TransportError> {
    let json = unwrap_callback(body, callback)?;
    let envelope: Envelope = serde_json::from_str(json)
        .map_err(|e| TransportError::MalformedEnvelope(e.to_string()))?;

    if !envelope.success {
        return Err(TransportError::Rejected(
            envelope
                .error
                .unwrap_or_else(|| "unknown error".to_string()),
        ));
    }

    serde_json::from_value(envelope.data)
        .map_err(|e| TransportError::MalformedEnvelope(format!("unexpected data: {e}")))
}
