//! Slideshow cursor over an event's dialogs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{Dialog, DomainError, Event, Speaker};

/// Playback timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Delay between revealed characters.
    pub typewriter_ms: u64,
    /// Pause after a line finishes before moving to the next one.
    pub advance_delay_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            typewriter_ms: 25,
            advance_delay_ms: 1000,
        }
    }
}

impl PlayerConfig {
    #[must_use]
    pub fn char_delay(&self) -> Duration {
        Duration::from_millis(self.typewriter_ms)
    }

    /// Pause before auto-advancing, or `None` on the last line.
    #[must_use]
    pub fn advance_after(&self, player: &Player<'_>) -> Option<Duration> {
        (!player.is_last()).then(|| Duration::from_millis(self.advance_delay_ms))
    }
}

/// What the stage shows for one dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub speaker: Speaker,
    pub text: &'a str,
    pub left_image: Option<&'a str>,
    pub right_image: Option<&'a str>,
}

impl<'a> Frame<'a> {
    fn of(dialog: &'a Dialog) -> Self {
        let image = dialog.has_image().then_some(dialog.image_path.as_str());
        let (left_image, right_image) = match dialog.speaker {
            Speaker::Left => (image, None),
            Speaker::Right => (None, image),
        };
        Self {
            speaker: dialog.speaker,
            text: &dialog.text,
            left_image,
            right_image,
        }
    }
}

/// Cursor over the dialogs of one event.
#[derive(Debug, Clone)]
pub struct Player<'a> {
    event: &'a Event,
    position: usize,
}

impl<'a> Player<'a> {
    /// Start at the first dialog. Events always hold at least one.
    #[must_use]
    pub fn new(event: &'a Event) -> Self {
        Self { event, position: 0 }
    }

    #[must_use]
    pub fn event(&self) -> &'a Event {
        self.event
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of dialogs in the event.
    #[must_use]
    pub fn total(&self) -> usize {
        self.event.dialogs().len()
    }

    #[must_use]
    pub fn current(&self) -> &'a Dialog {
        &self.event.dialogs()[self.position]
    }

    #[must_use]
    pub fn frame(&self) -> Frame<'a> {
        Frame::of(self.current())
    }

    /// Step forward. Returns false when already on the last dialog.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.position += 1;
        true
    }

    /// Step back. Returns false when already on the first dialog.
    pub fn prev(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.position -= 1;
        true
    }

    pub fn seek(&mut self, index: usize) -> Result<(), DomainError> {
        if index >= self.total() {
            return Err(DomainError::IndexOutOfRange {
                index,
                len: self.total(),
            });
        }
        self.position = index;
        Ok(())
    }

    /// One-based progress, e.g. `"2 / 5"`.
    #[must_use]
    pub fn progress(&self) -> String {
        format!("{} / {}", self.position + 1, self.total())
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.position + 1 == self.total()
    }
}

/// Growing prefixes of `text`, one character at a time.
pub fn typewriter(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.char_indices()
        .map(move |(start, c)| &text[..start + c.len_utf8()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventId;

    fn scene() -> Event {
        let mut event = Event::new(EventId::new("e1"), "Scene");
        event.set_text(0, "Hello").unwrap();
        event.set_image(0, "./img/hero.png").unwrap();
        event
            .insert_dialog(None, Dialog::try_new("Yo", Speaker::Right, "./img/rival.png").unwrap())
            .unwrap();
        event
            .insert_dialog(None, Dialog::try_new("...", Speaker::Right, "").unwrap())
            .unwrap();
        event
    }

    #[test]
    fn navigation_saturates_at_both_ends() {
        let event = scene();
        let mut player = Player::new(&event);
        assert!(player.is_first());
        assert!(!player.prev());
        assert!(player.next());
        assert!(player.next());
        assert!(player.is_last());
        assert!(!player.next());
        assert_eq!(player.progress(), "3 / 3");
    }

    #[test]
    fn frame_places_image_on_speaker_side() {
        let event = scene();
        let mut player = Player::new(&event);
        let frame = player.frame();
        assert_eq!(frame.left_image, Some("./img/hero.png"));
        assert_eq!(frame.right_image, None);

        player.next();
        let frame = player.frame();
        assert_eq!(frame.speaker, Speaker::Right);
        assert_eq!(frame.left_image, None);
        assert_eq!(frame.right_image, Some("./img/rival.png"));

        player.next();
        let frame = player.frame();
        assert_eq!(frame.left_image, None);
        assert_eq!(frame.right_image, None);
    }

    #[test]
    fn seek_out_of_range_keeps_position() {
        let event = scene();
        let mut player = Player::new(&event);
        player.seek(1).unwrap();
        assert!(player.seek(3).is_err());
        assert_eq!(player.position(), 1);
        assert_eq!(player.progress(), "2 / 3");
    }

    #[test]
    fn event_stored_without_dialogs_plays_one_blank_line() {
        let event = Event::from_parts(
            EventId::new("e1"),
            "Empty".into(),
            String::new(),
            Vec::new(),
            chrono::Utc::now(),
            chrono::Utc::now(),
        );
        let player = Player::new(&event);
        assert_eq!(player.total(), 1);
        assert_eq!(player.progress(), "1 / 1");
        assert_eq!(player.frame().text, "");
    }

    #[test]
    fn no_auto_advance_after_last_line() {
        let event = scene();
        let config = PlayerConfig::default();
        let mut player = Player::new(&event);
        assert_eq!(config.advance_after(&player), Some(Duration::from_millis(1000)));
        player.seek(2).unwrap();
        assert_eq!(config.advance_after(&player), None);
    }

    #[test]
    fn typewriter_respects_char_boundaries() {
        let frames: Vec<&str> = typewriter("やあ!").collect();
        assert_eq!(frames, vec!["や", "やあ", "やあ!"]);
        assert_eq!(typewriter("").count(), 0);
    }
}
