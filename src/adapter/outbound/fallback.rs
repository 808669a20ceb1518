//! Remote-first store that falls back to local storage.
//!
//! Any transport failure from the primary store (network, timeout, bad
//! status, malformed or rejected envelope) reroutes the same operation to
//! the secondary store when fallback is enabled. Not-found and validation
//! errors are answers, not failures, and are returned as-is.

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{Event, EventDraft, EventId, EventPatch};
use crate::error::{Error, Result};
use crate::port::outbound::store::EventStore;

/// Wraps a primary store with a best-effort secondary.
#[derive(Debug)]
pub struct FallbackStore<P, S> {
    primary: P,
    secondary: S,
    enabled: bool,
}

impl<P: EventStore, S: EventStore> FallbackStore<P, S> {
    #[must_use]
    pub fn new(primary: P, secondary: S, enabled: bool) -> Self {
        Self {
            primary,
            secondary,
            enabled,
        }
    }

    #[must_use]
    pub fn primary(&self) -> &P {
        &self.primary
    }

    #[must_use]
    pub fn secondary(&self) -> &S {
        &self.secondary
    }

    fn falls_back(&self, operation: &'static str, err: &Error) -> bool {
        if !self.enabled || !err.is_transport() {
            return false;
        }
        warn!(
            operation,
            primary = self.primary.name(),
            secondary = self.secondary.name(),
            error = %err,
            "Primary store failed, using fallback"
        );
        true
    }
}

#[async_trait]
impl<P: EventStore, S: EventStore> EventStore for FallbackStore<P, S> {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn list(&self) -> Result<Vec<Event>> {
        match self.primary.list().await {
            Err(err) if self.falls_back("list", &err) => self.secondary.list().await,
            result => result,
        }
    }

    async fn get(&self, id: &EventId) -> Result<Option<Event>> {
        match self.primary.get(id).await {
            Err(err) if self.falls_back("get", &err) => self.secondary.get(id).await,
            result => result,
        }
    }

    async fn create(&self, draft: EventDraft) -> Result<Event> {
        match self.primary.create(draft.clone()).await {
            Err(err) if self.falls_back("create", &err) => self.secondary.create(draft).await,
            result => result,
        }
    }

    async fn update(&self, id: &EventId, patch: EventPatch) -> Result<Event> {
        match self.primary.update(id, patch.clone()).await {
            Err(err) if self.falls_back("update", &err) => self.secondary.update(id, patch).await,
            result => result,
        }
    }

    async fn delete(&self, id: &EventId) -> Result<bool> {
        match self.primary.delete(id).await {
            Err(err) if self.falls_back("delete", &err) => self.secondary.delete(id).await,
            result => result,
        }
    }

    async fn replace_all(&self, events: Vec<Event>) -> Result<()> {
        match self.primary.replace_all(events.clone()).await {
            Err(err) if self.falls_back("replace_all", &err) => {
                self.secondary.replace_all(events).await
            }
            result => result,
        }
    }
}
