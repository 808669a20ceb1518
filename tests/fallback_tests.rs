mod support;

use sceneboard::adapter::outbound::remote::settings::RemoteConfig;
use sceneboard::adapter::outbound::{FallbackStore, RemoteEventStore};
use sceneboard::domain::{EventDraft, EventId};
use sceneboard::error::Error;
use sceneboard::infrastructure::bootstrap::build_store;
use sceneboard::infrastructure::config::{Backend, Config};
use sceneboard::port::outbound::store::EventStore;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn remote_config(endpoint: &str) -> RemoteConfig {
    RemoteConfig {
        endpoint_url: endpoint.to_string(),
        timeout_ms: 2_000,
        connect_timeout_ms: 500,
        retry_max_attempts: 1,
        retry_backoff_ms: 0,
        ..RemoteConfig::default()
    }
}

#[tokio::test]
async fn unreachable_endpoint_lists_local_events() {
    let (_dir, local) = support::temp_store();
    local.create(EventDraft::named("Offline scene")).await.unwrap();

    let remote = RemoteEventStore::from_config(&remote_config("http://127.0.0.1:9/exec")).unwrap();
    let store = FallbackStore::new(remote, local, true);

    let events = store.list().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name(), "Offline scene");
}

#[tokio::test]
async fn unreachable_endpoint_with_empty_local_store_lists_nothing() {
    let (_dir, local) = support::temp_store();
    let remote = RemoteEventStore::from_config(&remote_config("http://127.0.0.1:9/exec")).unwrap();
    let store = FallbackStore::new(remote, local, true);

    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn server_errors_fall_back_for_writes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (_dir, local) = support::temp_store();
    let remote = RemoteEventStore::from_config(&remote_config(&format!("{}/exec", server.uri()))).unwrap();
    let store = FallbackStore::new(remote, local, true);

    let created = store.create(EventDraft::named("Saved locally")).await.unwrap();
    let stored = store.secondary().get(created.id()).await.unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn garbage_body_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let (_dir, local) = support::temp_store();
    let remote = RemoteEventStore::from_config(&remote_config(&server.uri())).unwrap();
    let store = FallbackStore::new(remote, local, true);

    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn disabled_fallback_surfaces_transport_error() {
    let (_dir, local) = support::temp_store();
    let remote = RemoteEventStore::from_config(&remote_config("http://127.0.0.1:9/exec")).unwrap();
    let store = FallbackStore::new(remote, local, false);

    let err = store.list().await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn not_found_is_never_rerouted() {
    let (_dir, local) = support::temp_store();
    let remote = RemoteEventStore::from_config(&remote_config("http://127.0.0.1:9/exec")).unwrap();
    let store = FallbackStore::new(remote, local, true);

    let err = store
        .update(&EventId::new("ghost"), Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn bootstrap_wires_fallback_for_remote_backend() {
    let home = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.store.backend = Backend::Remote;
    config.remote = remote_config("http://127.0.0.1:9/exec");

    let store = build_store(&config, home.path()).unwrap();
    assert_eq!(store.name(), "fallback");
    store.create(EventDraft::named("Kept")).await.unwrap();
    assert_eq!(store.list().await.unwrap().len(), 1);
}
