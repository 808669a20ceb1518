//! Wire types for the remote endpoint.
//!
//! Requests are action-tagged JSON objects. Rows come back from the
//! spreadsheet loosely typed (numbers where strings are expected, dates as
//! strings or empty cells), so decoding here is deliberately lenient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{Dialog, Event, EventId, Speaker};

/// Action-tagged request payload.
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RpcRequest<'a> {
    Create {
        event: &'a Event,
    },
    Update {
        #[serde(rename = "eventId")]
        event_id: &'a EventId,
        event: &'a Event,
    },
    Delete {
        #[serde(rename = "eventId")]
        event_id: &'a EventId,
    },
    SaveAll {
        events: &'a [Event],
    },
}

impl RpcRequest<'_> {
    /// Action tag, for logging.
    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::SaveAll { .. } => "saveAll",
        }
    }
}

/// One event row as returned by the endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRow {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail: String,
    #[serde(default)]
    pub dialogs: Vec<DialogRow>,
    #[serde(default)]
    pub created_at: Value,
    #[serde(default)]
    pub updated_at: Value,
}

/// One dialog inside a row.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogRow {
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub speaker: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_path: String,
}

impl From<DialogRow> for Dialog {
    fn from(row: DialogRow) -> Self {
        Self {
            text: row.text,
            speaker: row.speaker.parse().unwrap_or(Speaker::Left),
            image_path: row.image_path,
        }
    }
}

impl EventRow {
    /// Convert into a domain event, filling unreadable timestamps.
    #[must_use]
    pub fn into_event(self, now: DateTime<Utc>) -> Event {
        let updated = parse_timestamp(&self.updated_at);
        let created = parse_timestamp(&self.created_at).or(updated).unwrap_or(now);
        let updated = updated.unwrap_or(created);

        Event::from_parts(
            EventId::new(self.id),
            self.name,
            self.thumbnail,
            self.dialogs.into_iter().map(Dialog::from).collect(),
            created,
            updated,
        )
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}
