//! Edit buffer for one event.
//!
//! An [`EditSession`] owns a working copy of an event. Every edit mutates
//! that copy only and marks it dirty; nothing reaches the store until
//! [`EditSession::save`].

use tracing::{debug, info};

use crate::domain::{Dialog, Event, EventId, EventPatch, Speaker};
use crate::error::{Error, Result};
use crate::port::outbound::store::EventStore;

/// In-memory working copy of one event.
#[derive(Debug, Clone)]
pub struct EditSession {
    event: Event,
    pending: usize,
}

/// Outcome of closing a session without saving.
#[must_use = "unsaved edits are lost unless the caller reacts to `Discard::Unsaved`"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discard {
    /// The buffer matched the store.
    Clean,
    /// The buffer held edits that were never saved.
    Unsaved { id: EventId, pending_edits: usize },
}

impl Discard {
    #[must_use]
    pub fn lost_edits(&self) -> bool {
        matches!(self, Self::Unsaved { .. })
    }
}

impl EditSession {
    /// Load `id` from the store into a new buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, or the store's error.
    pub async fn open(store: &dyn EventStore, id: &EventId) -> Result<Self> {
        let event = store
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound { id: id.clone() })?;
        debug!(id = %id, dialogs = event.dialogs().len(), "Opened edit session");
        Ok(Self::from_event(event))
    }

    /// Start a clean session over an event already in hand.
    #[must_use]
    pub fn from_event(event: Event) -> Self {
        Self { event, pending: 0 }
    }

    #[must_use]
    pub fn event(&self) -> &Event {
        &self.event
    }

    #[must_use]
    pub fn id(&self) -> &EventId {
        self.event.id()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.pending > 0
    }

    /// Number of edits since the last save.
    #[must_use]
    pub fn pending_edits(&self) -> usize {
        self.pending
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.event.set_name(name);
        self.mark();
    }

    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        self.event.set_text(index, text)?;
        self.mark();
        Ok(())
    }

    pub fn set_speaker(&mut self, index: usize, speaker: Speaker) -> Result<()> {
        self.event.set_speaker(index, speaker)?;
        self.mark();
        Ok(())
    }

    pub fn toggle_speaker(&mut self, index: usize) -> Result<Speaker> {
        let speaker = self.event.toggle_speaker(index)?;
        self.mark();
        Ok(speaker)
    }

    /// Set the image for a dialog. An empty path clears it.
    pub fn set_image(&mut self, index: usize, image_path: impl Into<String>) -> Result<()> {
        self.event.set_image(index, image_path)?;
        self.mark();
        Ok(())
    }

    /// Insert a blank dialog at `at`, or append. Returns its position.
    pub fn add_dialog(&mut self, at: Option<usize>) -> Result<usize> {
        self.insert_dialog(at, Dialog::blank())
    }

    /// Insert a prepared dialog at `at`, or append. Returns its position.
    pub fn insert_dialog(&mut self, at: Option<usize>, dialog: Dialog) -> Result<usize> {
        let index = self.event.insert_dialog(at, dialog)?;
        self.mark();
        Ok(index)
    }

    pub fn duplicate(&mut self, index: usize) -> Result<usize> {
        let index = self.event.duplicate_dialog(index)?;
        self.mark();
        Ok(index)
    }

    pub fn move_dialog(&mut self, from: usize, to: usize) -> Result<()> {
        self.event.move_dialog(from, to)?;
        if from != to {
            self.mark();
        }
        Ok(())
    }

    /// Swap a dialog with its predecessor. Returns false at the top.
    pub fn move_up(&mut self, index: usize) -> Result<bool> {
        self.event.dialog(index)?;
        if index == 0 {
            return Ok(false);
        }
        self.move_dialog(index, index - 1)?;
        Ok(true)
    }

    /// Swap a dialog with its successor. Returns false at the bottom.
    pub fn move_down(&mut self, index: usize) -> Result<bool> {
        self.event.dialog(index)?;
        if index + 1 >= self.event.dialogs().len() {
            return Ok(false);
        }
        self.move_dialog(index, index + 1)?;
        Ok(true)
    }

    pub fn delete_dialog(&mut self, index: usize) -> Result<Dialog> {
        let removed = self.event.remove_dialog(index)?;
        self.mark();
        Ok(removed)
    }

    /// Flush the buffer with one `update` call.
    ///
    /// On success the buffer becomes the store's canonical copy and is no
    /// longer dirty. On failure nothing changes.
    pub async fn save(&mut self, store: &dyn EventStore) -> Result<&Event> {
        let patch = EventPatch::from_event(&self.event);
        let saved = store.update(self.event.id(), patch).await?;
        info!(
            id = %saved.id(),
            dialogs = saved.dialogs().len(),
            edits = self.pending,
            store = store.name(),
            "Saved event"
        );
        self.event = saved;
        self.pending = 0;
        Ok(&self.event)
    }

    /// Close the session without saving.
    pub fn discard(self) -> Discard {
        if self.pending == 0 {
            return Discard::Clean;
        }
        Discard::Unsaved {
            id: self.event.id().clone(),
            pending_edits: self.pending,
        }
    }

    fn mark(&mut self) {
        self.pending += 1;
    }
}
