//! Events, dialogs and the invariants that hold between them.

pub mod dialog;
pub mod error;
pub mod event;
pub mod id;

pub use dialog::{Dialog, Speaker, MAX_TEXT_CHARS};
pub use error::DomainError;
pub use event::{Event, EventDraft, EventPatch, DEFAULT_EVENT_NAME};
pub use id::EventId;
