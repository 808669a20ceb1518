//! Composition root: turns configuration into a ready [`EventStore`].

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::fallback::FallbackStore;
use crate::adapter::outbound::local::LocalEventStore;
use crate::adapter::outbound::remote::RemoteEventStore;
use crate::error::Result;
use crate::infrastructure::config::settings::{Backend, Config};
use crate::port::outbound::store::EventStore;

/// Build the local store from configuration.
#[must_use]
pub fn build_local_store(config: &Config, home: &Path) -> LocalEventStore {
    LocalEventStore::new(config.local.resolve_dir(home), &config.local.key)
}

/// Build the configured store.
///
/// The remote backend is wrapped in a [`FallbackStore`] over local storage;
/// whether it actually falls back follows `store.fallback_to_local`.
///
/// # Errors
///
/// Returns a configuration error when the remote endpoint is missing or
/// invalid.
pub fn build_store(config: &Config, home: &Path) -> Result<Arc<dyn EventStore>> {
    let local = build_local_store(config, home);
    match config.store.backend {
        Backend::Local => {
            info!(path = %local.path().display(), "Using local store");
            Ok(Arc::new(local))
        }
        Backend::Remote => {
            let remote = RemoteEventStore::from_config(&config.remote)?;
            info!(
                endpoint = %remote.client().endpoint(),
                fallback = config.store.fallback_to_local,
                "Using remote store"
            );
            Ok(Arc::new(FallbackStore::new(
                remote,
                local,
                config.store.fallback_to_local,
            )))
        }
    }
}

/// Build only the configured primary backend, without fallback.
///
/// Used by health checks that must see the backend's own failures.
pub fn build_primary_store(config: &Config, home: &Path) -> Result<Arc<dyn EventStore>> {
    match config.store.backend {
        Backend::Local => Ok(Arc::new(build_local_store(config, home))),
        Backend::Remote => Ok(Arc::new(RemoteEventStore::from_config(&config.remote)?)),
    }
}
