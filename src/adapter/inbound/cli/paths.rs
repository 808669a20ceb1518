//! Path utilities for sceneboard.
//!
//! All data lives under `~/.sceneboard/`:
//! - `~/.sceneboard/config.toml` - main configuration
//! - `~/.sceneboard/store/` - local event storage

use std::path::PathBuf;

/// Returns the sceneboard home directory (`~/.sceneboard/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sceneboard")
}

/// Returns the default config file path (`~/.sceneboard/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_under_sceneboard_home() {
        assert!(home_dir().ends_with(".sceneboard"));
        assert!(default_config().ends_with(".sceneboard/config.toml"));
    }
}
