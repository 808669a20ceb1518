//! A single line of an event.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Maximum dialog text length, counted in characters.
pub const MAX_TEXT_CHARS: usize = 1000;

/// Which side of the screen is speaking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    #[default]
    Left,
    Right,
}

impl Speaker {
    /// The opposite side.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Speaker {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            other => Err(DomainError::InvalidSpeaker(other.to_string())),
        }
    }
}

/// One line: speaker side, text and an optional character image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dialog {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub speaker: Speaker,
    /// Relative image path, empty when the line has no image.
    #[serde(default)]
    pub image_path: String,
}

impl Dialog {
    /// A blank left-side line.
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    /// Build a dialog, checking the text limit.
    pub fn try_new(
        text: impl Into<String>,
        speaker: Speaker,
        image_path: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let text = text.into();
        check_text(&text)?;
        Ok(Self {
            text,
            speaker,
            image_path: image_path.into(),
        })
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.image_path.trim().is_empty()
    }
}

/// Reject text longer than [`MAX_TEXT_CHARS`].
pub fn check_text(text: &str) -> Result<(), DomainError> {
    let chars = text.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(DomainError::TextTooLong { chars });
    }
    Ok(())
}
