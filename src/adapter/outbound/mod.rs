//! Outbound adapters (driven side).

pub mod fallback;
pub mod local;
pub mod remote;

pub use fallback::FallbackStore;
pub use local::LocalEventStore;
pub use remote::RemoteEventStore;
