//! Local key-value fallback storage.

pub mod store;

pub use store::{LocalEventStore, DEFAULT_STORAGE_KEY};
