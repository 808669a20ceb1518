//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use sceneboard::adapter::outbound::local::DEFAULT_STORAGE_KEY;
use sceneboard::adapter::outbound::LocalEventStore;
use tempfile::TempDir;

/// A local store in its own temp directory.
pub fn temp_store() -> (TempDir, LocalEventStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = LocalEventStore::new(dir.path(), DEFAULT_STORAGE_KEY);
    (dir, store)
}

/// Write `contents` to `config.toml` inside `dir`.
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

/// Config pointing the local store at `store_dir`.
pub fn local_config(store_dir: &Path) -> String {
    format!(
        "[store]\nbackend = \"local\"\n\n[local]\ndir = {:?}\n",
        store_dir.display().to_string()
    )
}
