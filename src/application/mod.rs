//! Application services (use cases).
//!
//! These services drive the domain through the [`EventStore`] port and
//! never talk to an adapter directly.
//!
//! [`EventStore`]: crate::port::EventStore

pub mod catalog;
pub mod editor;
pub mod player;
pub mod transfer;

pub use editor::{Discard, EditSession};
pub use player::{Frame, Player, PlayerConfig};
