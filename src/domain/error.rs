//! Domain validation errors for events and dialogs.
//!
//! These errors are returned when an edit would break an event invariant.
//! They never mutate the event they were raised for.
//!
//! # Examples
//!
//! ```
//! use sceneboard::domain::error::DomainError;
//! use sceneboard::domain::event::Event;
//! use sceneboard::domain::id::EventId;
//!
//! let mut event = Event::new(EventId::new("intro"), "Intro");
//! let result = event.remove_dialog(0);
//!
//! assert!(matches!(result, Err(DomainError::LastDialog)));
//! assert_eq!(event.dialogs().len(), 1);
//! ```

use thiserror::Error;

use super::dialog::MAX_TEXT_CHARS;

/// Errors that occur when event invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Every event keeps at least one dialog.
    #[error("an event must keep at least one dialog")]
    LastDialog,

    /// A dialog position outside the event.
    #[error("dialog index {index} out of range (event has {len} dialogs)")]
    IndexOutOfRange {
        /// The requested position.
        index: usize,
        /// Number of dialogs in the event.
        len: usize,
    },

    /// Dialog text exceeds the character limit.
    #[error("dialog text is {chars} characters, limit is {}", MAX_TEXT_CHARS)]
    TextTooLong {
        /// Length of the rejected text in characters.
        chars: usize,
    },

    /// Identifier does not match the allowed character set or length.
    #[error("invalid event id '{0}'")]
    InvalidId(String),

    /// Unknown speaker side.
    #[error("invalid speaker '{0}' (expected left or right)")]
    InvalidSpeaker(String),
}
