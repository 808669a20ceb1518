//! Event identifier type with proper encapsulation.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest identifier accepted by [`EventId::is_valid`].
pub const MAX_EVENT_ID_LEN: usize = 50;

/// How many fresh ids [`EventId::generate_unique`] tries before giving up.
pub const MAX_GENERATE_ATTEMPTS: usize = 16;

/// Event identifier - newtype for type safety.
///
/// Generated as UUID v4 for new events, or constructed from an existing
/// string for persistence/deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Create an `EventId` from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random UUID v4 identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Generate an identifier that is not in `existing`.
    ///
    /// Returns `None` if every attempt collided.
    #[must_use]
    pub fn generate_unique(existing: &HashSet<EventId>) -> Option<Self> {
        Self::generate_unique_with(existing, Self::generate)
    }

    /// Check-and-regenerate loop with an injectable generator.
    pub(crate) fn generate_unique_with(
        existing: &HashSet<EventId>,
        mut generate: impl FnMut() -> EventId,
    ) -> Option<Self> {
        (0..MAX_GENERATE_ATTEMPTS)
            .map(|_| generate())
            .find(|candidate| !existing.contains(candidate))
    }

    /// True when the id is non-empty, at most 50 characters, and made only of
    /// ASCII letters, digits, `_` and `-`.
    #[must_use]
    pub fn is_valid(id: &str) -> bool {
        !id.is_empty()
            && id.len() <= MAX_EVENT_ID_LEN
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }

    /// Get the event ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
