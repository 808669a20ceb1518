//! Sceneboard - author and play back two-sided dialogue events.
//!
//! An event is an ordered list of dialog lines, each spoken from the left or
//! right of the stage with optional character art. Events live in a
//! spreadsheet-backed web endpoint, with local storage as a fallback.
//!
//! # Architecture
//!
//! The crate follows a ports-and-adapters layout:
//!
//! - [`domain`] - `Event`, `Dialog`, `Speaker`, `EventId` and their rules
//! - [`port`] - the `EventStore` trait every backend implements
//! - [`adapter`] - remote, local and fallback stores, plus the CLI
//! - [`application`] - edit sessions, playback, import/export and the
//!   image catalog
//! - [`infrastructure`] - configuration, logging and store wiring
//! - [`error`] - crate-wide error types
//!
//! # Example
//!
//! ```no_run
//! use sceneboard::adapter::outbound::LocalEventStore;
//! use sceneboard::application::EditSession;
//! use sceneboard::domain::EventDraft;
//! use sceneboard::port::outbound::store::EventStore;
//!
//! # async fn demo() -> sceneboard::error::Result<()> {
//! let store = LocalEventStore::new("/tmp/sceneboard", "pawapoke_events");
//! let event = store.create(EventDraft::named("Intro")).await?;
//!
//! let mut session = EditSession::open(&store, event.id()).await?;
//! session.set_text(0, "Hello!")?;
//! session.save(&store).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
