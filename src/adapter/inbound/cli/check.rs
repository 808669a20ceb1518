//! Handler for `check store`.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_primary_store;
use crate::infrastructure::config::Config;

/// Probe the configured backend by listing events, with no fallback.
pub async fn execute_store(config: &Config, home: &Path) -> Result<()> {
    let store = build_primary_store(config, home)?;
    let backend = config.store.backend.as_str();

    let spinner = output::spinner(&format!("Checking {backend} store"));
    let result = store.list().await;
    output::spinner_clear(&spinner);

    match result {
        Ok(events) => {
            if output::is_json() {
                output::json_output(json!({
                    "command": "check store",
                    "backend": backend,
                    "ok": true,
                    "events": events.len(),
                }));
            } else {
                output::success(&format!("{backend} store reachable ({} events)", events.len()));
            }
            Ok(())
        }
        Err(err) => {
            if output::is_json() {
                output::json_output(json!({
                    "command": "check store",
                    "backend": backend,
                    "ok": false,
                    "error": err.to_string(),
                }));
            }
            Err(err)
        }
    }
}
