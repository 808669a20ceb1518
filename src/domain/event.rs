//! Event records and the dialog-list operations that keep them valid.
//!
//! An [`Event`] always holds at least one [`Dialog`]. Every mutation
//! refreshes `updated_at`; `id` and `created_at` never change after
//! construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::dialog::{check_text, Dialog, Speaker};
use super::error::DomainError;
use super::id::EventId;

/// Name given to events created without one.
pub const DEFAULT_EVENT_NAME: &str = "Untitled event";

/// One dialogue sequence (a "scene").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    id: EventId,
    name: String,
    #[serde(default)]
    thumbnail: String,
    #[serde(default, deserialize_with = "dialogs_or_blank")]
    dialogs: Vec<Dialog>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Event {
    /// Create an event holding one blank left-side dialog.
    #[must_use]
    pub fn new(id: EventId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: normalize_name(name.into()),
            thumbnail: String::new(),
            dialogs: vec![Dialog::blank()],
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an event from a draft, falling back to one blank dialog.
    pub fn from_draft(id: EventId, draft: EventDraft) -> Result<Self, DomainError> {
        let mut event = Self::new(id, draft.name.unwrap_or_default());
        if let Some(thumbnail) = draft.thumbnail {
            event.thumbnail = thumbnail;
        }
        if !draft.dialogs.is_empty() {
            for dialog in &draft.dialogs {
                check_text(&dialog.text)?;
            }
            event.dialogs = draft.dialogs;
        }
        Ok(event)
    }

    /// Reassemble an event read back from storage.
    ///
    /// An empty dialog list becomes one blank dialog.
    #[must_use]
    pub fn from_parts(
        id: EventId,
        name: String,
        thumbnail: String,
        dialogs: Vec<Dialog>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            thumbnail,
            dialogs: or_blank(dialogs),
            created_at,
            updated_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> &EventId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn thumbnail(&self) -> &str {
        &self.thumbnail
    }

    #[must_use]
    pub fn dialogs(&self) -> &[Dialog] {
        &self.dialogs
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Borrow one dialog.
    pub fn dialog(&self, index: usize) -> Result<&Dialog, DomainError> {
        self.dialogs.get(index).ok_or(DomainError::IndexOutOfRange {
            index,
            len: self.dialogs.len(),
        })
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = normalize_name(name.into());
        self.touch();
    }

    pub fn set_thumbnail(&mut self, thumbnail: impl Into<String>) {
        self.thumbnail = thumbnail.into();
        self.touch();
    }

    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), DomainError> {
        let text = text.into();
        check_text(&text)?;
        self.dialog_mut(index)?.text = text;
        self.touch();
        Ok(())
    }

    pub fn set_speaker(&mut self, index: usize, speaker: Speaker) -> Result<(), DomainError> {
        self.dialog_mut(index)?.speaker = speaker;
        self.touch();
        Ok(())
    }

    /// Flip the speaker side and return the new side.
    pub fn toggle_speaker(&mut self, index: usize) -> Result<Speaker, DomainError> {
        let dialog = self.dialog_mut(index)?;
        dialog.speaker = dialog.speaker.toggled();
        let speaker = dialog.speaker;
        self.touch();
        Ok(speaker)
    }

    pub fn set_image(
        &mut self,
        index: usize,
        image_path: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.dialog_mut(index)?.image_path = image_path.into().trim().to_string();
        self.touch();
        Ok(())
    }

    /// Insert a dialog at `at`, or append when `at` is `None` or past the end.
    ///
    /// Returns the position the dialog landed at.
    pub fn insert_dialog(&mut self, at: Option<usize>, dialog: Dialog) -> Result<usize, DomainError> {
        check_text(&dialog.text)?;
        let index = match at {
            Some(i) if i < self.dialogs.len() => i,
            _ => self.dialogs.len(),
        };
        self.dialogs.insert(index, dialog);
        self.touch();
        Ok(index)
    }

    /// Insert a copy of dialog `index` immediately after it.
    pub fn duplicate_dialog(&mut self, index: usize) -> Result<usize, DomainError> {
        let copy = self.dialog(index)?.clone();
        self.dialogs.insert(index + 1, copy);
        self.touch();
        Ok(index + 1)
    }

    /// Move dialog `from` to position `to` by one extraction and one
    /// reinsertion. Other dialogs keep their relative order.
    pub fn move_dialog(&mut self, from: usize, to: usize) -> Result<(), DomainError> {
        let len = self.dialogs.len();
        if from >= len {
            return Err(DomainError::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(DomainError::IndexOutOfRange { index: to, len });
        }
        if from == to {
            return Ok(());
        }
        let dialog = self.dialogs.remove(from);
        self.dialogs.insert(to, dialog);
        self.touch();
        Ok(())
    }

    /// Remove dialog `index`. The last remaining dialog cannot be removed.
    pub fn remove_dialog(&mut self, index: usize) -> Result<Dialog, DomainError> {
        if self.dialogs.len() <= 1 {
            return Err(DomainError::LastDialog);
        }
        self.dialog(index)?;
        let removed = self.dialogs.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Apply a partial update. Nothing changes if the patch is invalid.
    pub fn apply(&mut self, patch: EventPatch) -> Result<(), DomainError> {
        if let Some(dialogs) = &patch.dialogs {
            if dialogs.is_empty() {
                return Err(DomainError::LastDialog);
            }
            for dialog in dialogs {
                check_text(&dialog.text)?;
            }
        }
        if let Some(name) = patch.name {
            self.name = normalize_name(name);
        }
        if let Some(thumbnail) = patch.thumbnail {
            self.thumbnail = thumbnail;
        }
        if let Some(dialogs) = patch.dialogs {
            self.dialogs = dialogs;
        }
        self.touch();
        Ok(())
    }

    /// Refresh `updated_at`, never moving it backwards.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }

    fn dialog_mut(&mut self, index: usize) -> Result<&mut Dialog, DomainError> {
        let len = self.dialogs.len();
        self.dialogs
            .get_mut(index)
            .ok_or(DomainError::IndexOutOfRange { index, len })
    }
}

fn normalize_name(name: String) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_EVENT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

fn or_blank(dialogs: Vec<Dialog>) -> Vec<Dialog> {
    if dialogs.is_empty() {
        vec![Dialog::blank()]
    } else {
        dialogs
    }
}

fn dialogs_or_blank<'de, D>(deserializer: D) -> Result<Vec<Dialog>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Dialog>::deserialize(deserializer).map(or_blank)
}

/// Fields for a new event. The store assigns the id and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    /// Empty means "one blank dialog".
    pub dialogs: Vec<Dialog>,
}

impl EventDraft {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    pub dialogs: Option<Vec<Dialog>>,
}

impl EventPatch {
    /// Patch carrying the full editable content of `event`.
    #[must_use]
    pub fn from_event(event: &Event) -> Self {
        Self {
            name: Some(event.name.clone()),
            thumbnail: None,
            dialogs: Some(event.dialogs.clone()),
        }
    }
}
