//! File-backed event store.
//!
//! The whole collection lives in one JSON blob stored under a fixed key,
//! i.e. the file `<dir>/<key>.json`. Every mutation rewrites the blob.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::{Event, EventDraft, EventId, EventPatch};
use crate::error::{Error, Result};
use crate::port::outbound::store::{fresh_id, EventStore};

/// Default storage key for the event collection.
pub const DEFAULT_STORAGE_KEY: &str = "pawapoke_events";

/// Local key-value fallback store.
///
/// Implements the [`EventStore`] trait over a single serialized blob.
#[derive(Debug)]
pub struct LocalEventStore {
    /// Blob location (`<dir>/<key>.json`).
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl LocalEventStore {
    /// Create a store keeping its blob under `dir` with the given key.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, key: &str) -> Self {
        let path = dir.into().join(format!("{key}.json"));
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing blob.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<Event>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            Error::Storage(format!(
                "corrupt event blob at {}: {e}",
                self.path.display()
            ))
        })
    }

    async fn save(&self, events: &[Event]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec(events)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), count = events.len(), "Wrote event blob");
        Ok(())
    }
}

#[async_trait]
impl EventStore for LocalEventStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn list(&self) -> Result<Vec<Event>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    async fn get(&self, id: &EventId) -> Result<Option<Event>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.into_iter().find(|e| e.id() == id))
    }

    async fn create(&self, draft: EventDraft) -> Result<Event> {
        let _guard = self.lock.lock().await;
        let mut events = self.load().await?;
        let event = Event::from_draft(fresh_id(&events)?, draft)?;
        events.push(event.clone());
        self.save(&events).await?;
        info!(id = %event.id(), "Created event");
        Ok(event)
    }

    async fn update(&self, id: &EventId, patch: EventPatch) -> Result<Event> {
        let _guard = self.lock.lock().await;
        let mut events = self.load().await?;
        let event = events
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| Error::NotFound { id: id.clone() })?;
        event.apply(patch)?;
        let updated = event.clone();
        self.save(&events).await?;
        Ok(updated)
    }

    async fn delete(&self, id: &EventId) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut events = self.load().await?;
        let before = events.len();
        events.retain(|e| e.id() != id);
        if events.len() == before {
            return Ok(false);
        }
        self.save(&events).await?;
        info!(id = %id, "Deleted event");
        Ok(true)
    }

    async fn replace_all(&self, events: Vec<Event>) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.save(&events).await
    }
}
