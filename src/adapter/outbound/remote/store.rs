//! Remote event store over the spreadsheet endpoint.
//!
//! The endpoint only knows `list` plus four mutating actions, so `get` and
//! `update` read the full list first.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use super::client::RpcClient;
use super::dto::{EventRow, RpcRequest};
use super::settings::RemoteConfig;
use crate::domain::{Event, EventDraft, EventId, EventPatch};
use crate::error::{Error, Result};
use crate::port::outbound::store::{fresh_id, EventStore};

/// Spreadsheet-backed event store.
#[derive(Debug, Clone)]
pub struct RemoteEventStore {
    client: RpcClient,
}

impl RemoteEventStore {
    #[must_use]
    pub fn new(client: RpcClient) -> Self {
        Self { client }
    }

    /// Build the store from configuration.
    ///
    /// # Errors
    ///
    /// Fails when the endpoint URL is missing or invalid.
    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        Ok(Self::new(RpcClient::from_config(config)?))
    }

    #[must_use]
    pub fn client(&self) -> &RpcClient {
        &self.client
    }
}

#[async_trait]
impl EventStore for RemoteEventStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn list(&self) -> Result<Vec<Event>> {
        let rows: Vec<EventRow> = self.client.fetch().await?;
        let now = Utc::now();
        debug!(count = rows.len(), "Fetched events from remote");
        Ok(rows.into_iter().map(|row| row.into_event(now)).collect())
    }

    async fn get(&self, id: &EventId) -> Result<Option<Event>> {
        Ok(self.list().await?.into_iter().find(|e| e.id() == id))
    }

    async fn create(&self, draft: EventDraft) -> Result<Event> {
        let existing = self.list().await?;
        let event = Event::from_draft(fresh_id(&existing)?, draft)?;
        let _: serde_json::Value = self.client.call(&RpcRequest::Create { event: &event }).await?;
        info!(id = %event.id(), "Created event on remote");
        Ok(event)
    }

    async fn update(&self, id: &EventId, patch: EventPatch) -> Result<Event> {
        let mut event = self
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound { id: id.clone() })?;
        event.apply(patch)?;

        let row: EventRow = self
            .client
            .call(&RpcRequest::Update {
                event_id: id,
                event: &event,
            })
            .await?;
        Ok(row.into_event(event.updated_at()))
    }

    async fn delete(&self, id: &EventId) -> Result<bool> {
        let deleted: bool = self.client.call(&RpcRequest::Delete { event_id: id }).await?;
        if deleted {
            info!(id = %id, "Deleted event on remote");
        }
        Ok(deleted)
    }

    async fn replace_all(&self, events: Vec<Event>) -> Result<()> {
        let _: serde_json::Value = self
            .client
            .call(&RpcRequest::SaveAll { events: &events })
            .await?;
        info!(count = events.len(), "Replaced remote collection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dialog, Speaker};
    use crate::error::TransportError;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    /// Echoes the request's callback name around a fixed envelope.
    struct Jsonp(serde_json::Value);

    impl Respond for Jsonp {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let callback = request
                .url
                .query_pairs()
                .find(|(k, _)| k == "callback")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();
            ResponseTemplate::new(200).set_body_string(format!("{callback}({})", self.0))
        }
    }

    /// Answers `list` with `rows` and echoes the decoded payload's event for
    /// mutations.
    struct Sheet(serde_json::Value);

    impl Respond for Sheet {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let pairs: Vec<(String, String)> = request
                .url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            let callback = pairs
                .iter()
                .find(|(k, _)| k == "callback")
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            let envelope = match pairs.iter().find(|(k, _)| k == "data") {
                None => serde_json::json!({"success": true, "data": self.0}),
                Some((_, data)) => {
                    let payload: serde_json::Value =
                        serde_json::from_slice(&STANDARD.decode(data).unwrap()).unwrap();
                    match payload["action"].as_str() {
                        Some("delete") => serde_json::json!({"success": true, "data": true}),
                        Some("saveAll") => {
                            serde_json::json!({"success": true, "data": payload["events"]})
                        }
                        _ => serde_json::json!({"success": true, "data": payload["event"]}),
                    }
                }
            };
            ResponseTemplate::new(200).set_body_string(format!("{callback}({envelope})"))
        }
    }

    fn store_for(server: &MockServer) -> RemoteEventStore {
        RemoteEventStore::from_config(&RemoteConfig {
            endpoint_url: format!("{}/exec", server.uri()),
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
            ..RemoteConfig::default()
        })
        .unwrap()
    }

    fn sheet_rows() -> serde_json::Value {
        serde_json::json!([{
            "id": "intro",
            "name": "Intro",
            "thumbnail": "",
            "dialogs": [{"text": "Hi", "speaker": "left", "imagePath": ""}],
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-02T00:00:00.000Z"
        }])
    }

    #[tokio::test]
    async fn list_decodes_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/exec"))
            .respond_with(Jsonp(serde_json::json!({"success": true, "data": sheet_rows()})))
            .mount(&server)
            .await;

        let events = store_for(&server).list().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id().as_str(), "intro");
        assert_eq!(events[0].dialogs()[0].text, "Hi");
    }

    #[tokio::test]
    async fn server_error_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = store_for(&server).list().await.unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Status(500))));
    }

    #[tokio::test]
    async fn rejected_envelope_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(Jsonp(
                serde_json::json!({"success": false, "error": "Exception: sheet locked"}),
            ))
            .mount(&server)
            .await;

        let err = store_for(&server).list().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn delete_sends_tagged_payload() {
        let server = MockServer::start().await;
        let expected = STANDARD.encode(br#"{"action":"delete","eventId":"intro"}"#);
        Mock::given(method("GET"))
            .and(query_param("data", expected.as_str()))
            .respond_with(Jsonp(serde_json::json!({"success": true, "data": true})))
            .expect(1)
            .mount(&server)
            .await;

        assert!(store_for(&server).delete(&EventId::new("intro")).await.unwrap());
    }

    #[tokio::test]
    async fn update_merges_patch_into_listed_event() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(Sheet(sheet_rows()))
            .mount(&server)
            .await;

        let patch = EventPatch {
            dialogs: Some(vec![
                Dialog::try_new("Hi", Speaker::Left, "").unwrap(),
                Dialog::try_new("Bye", Speaker::Right, "./img/b.png").unwrap(),
            ]),
            ..EventPatch::default()
        };
        let updated = store_for(&server)
            .update(&EventId::new("intro"), patch)
            .await
            .unwrap();

        assert_eq!(updated.name(), "Intro");
        assert_eq!(updated.dialogs().len(), 2);
        assert_eq!(updated.dialogs()[1].speaker, Speaker::Right);
        assert_eq!(updated.created_at().to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_without_mutation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(Sheet(sheet_rows()))
            .expect(1)
            .mount(&server)
            .await;

        let err = store_for(&server)
            .update(&EventId::new("missing"), EventPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn create_assigns_id_not_in_sheet() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(Sheet(sheet_rows()))
            .mount(&server)
            .await;

        let event = store_for(&server)
            .create(EventDraft::named("New"))
            .await
            .unwrap();
        assert_ne!(event.id().as_str(), "intro");
        assert_eq!(event.dialogs(), &[Dialog::blank()]);
    }
}
