//! Export and import of the dialogs module.
//!
//! Import is all-or-nothing: the text is parsed and validated before the
//! store is touched, and the merged collection is written with a single
//! `replace_all`.

pub mod format;

use std::collections::HashSet;

use tracing::{debug, info};

use crate::domain::{Event, EventDraft, EventId};
use crate::error::{Error, Result};
use crate::port::outbound::store::EventStore;

pub use format::{read_module, write_module, DialogSet};

/// Name prefix for imported events.
pub const IMPORTED_NAME_PREFIX: &str = "Imported: ";

/// One imported entry and the id it was stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedEvent {
    pub key: String,
    pub id: EventId,
    pub dialogs: usize,
}

impl ImportedEvent {
    /// True when the key collided and a fresh id was assigned.
    #[must_use]
    pub fn renamed(&self) -> bool {
        self.id.as_str() != self.key
    }
}

/// Result of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: Vec<ImportedEvent>,
}

impl ImportReport {
    #[must_use]
    pub fn len(&self) -> usize {
        self.imported.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.imported.is_empty()
    }
}

/// Export every event in the store, in store order.
pub async fn export_dialogs(store: &dyn EventStore) -> Result<String> {
    let events = store.list().await?;
    debug!(count = events.len(), "Exporting events");
    write_module(&events)
}

/// Import a dialogs module into the store.
///
/// Keys that collide with existing ids (or with ids assigned earlier in the
/// same import) get a fresh generated id.
///
/// # Errors
///
/// [`Error::Import`] for malformed text, in which case nothing is written.
pub async fn import_dialogs(store: &dyn EventStore, source: &str) -> Result<ImportReport> {
    let sets = read_module(source)?;
    let existing = store.list().await?;
    let (events, report) = merge(&existing, sets)?;

    let mut all = existing;
    all.extend(events);
    store.replace_all(all).await?;

    info!(
        imported = report.len(),
        renamed = report.imported.iter().filter(|e| e.renamed()).count(),
        store = store.name(),
        "Imported dialogs"
    );
    Ok(report)
}

/// Turn validated sets into new events with ids unique against `existing`.
fn merge(existing: &[Event], sets: Vec<DialogSet>) -> Result<(Vec<Event>, ImportReport)> {
    let mut taken: HashSet<EventId> = existing.iter().map(|e| e.id().clone()).collect();
    let mut events = Vec::with_capacity(sets.len());
    let mut report = ImportReport::default();

    for set in sets {
        let wanted = EventId::new(set.key.as_str());
        let id = if taken.contains(&wanted) {
            EventId::generate_unique(&taken).ok_or_else(|| {
                Error::Storage(format!("could not generate a unique id for '{}'", set.key))
            })?
        } else {
            wanted
        };
        taken.insert(id.clone());

        let draft = EventDraft {
            name: Some(format!("{IMPORTED_NAME_PREFIX}{}", set.key)),
            thumbnail: None,
            dialogs: set.dialogs,
        };
        let event = Event::from_draft(id.clone(), draft)?;
        report.imported.push(ImportedEvent {
            key: set.key,
            id,
            dialogs: event.dialogs().len(),
        });
        events.push(event);
    }
    Ok((events, report))
}
