//! Spreadsheet-backed remote store reached through a GET-only web app.

pub mod client;
pub mod dto;
pub mod envelope;
pub mod settings;
pub mod store;

pub use client::RpcClient;
pub use settings::RemoteConfig;
pub use store::RemoteEventStore;
