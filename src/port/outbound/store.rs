//! Persistence port for events.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::{Event, EventDraft, EventId, EventPatch};
use crate::error::{Error, Result};

/// Storage operations for events.
///
/// Implementations are the record store adapters (remote endpoint, local
/// blob, fallback wrapper). All of them are last-write-wins.
///
/// # Errors
///
/// `update` returns [`Error::NotFound`] for unknown ids. Remote failures
/// surface as [`Error::Transport`].
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Return the adapter name for logging.
    fn name(&self) -> &'static str;

    /// List all events in storage order.
    async fn list(&self) -> Result<Vec<Event>>;

    /// Get an event by ID.
    async fn get(&self, id: &EventId) -> Result<Option<Event>>;

    /// Create an event with a fresh unique id and timestamps.
    async fn create(&self, draft: EventDraft) -> Result<Event>;

    /// Apply a partial update and return the stored copy.
    async fn update(&self, id: &EventId, patch: EventPatch) -> Result<Event>;

    /// Delete an event by ID. Returns false if it did not exist.
    async fn delete(&self, id: &EventId) -> Result<bool>;

    /// Overwrite the whole collection.
    async fn replace_all(&self, events: Vec<Event>) -> Result<()>;
}

/// Pick an id that collides with nothing in `events`.
pub fn fresh_id(events: &[Event]) -> Result<EventId> {
    let existing: HashSet<EventId> = events.iter().map(|e| e.id().clone()).collect();
    EventId::generate_unique(&existing)
        .ok_or_else(|| Error::Storage("could not generate a unique event id".to_string()))
}
