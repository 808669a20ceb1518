//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::{Backend, Config};

/// Default config template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../../../config.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config init",
            "path": path.display().to_string(),
        }));
        return Ok(());
    }

    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your settings", path.display()));
    output::note("2. Set [remote] endpoint_url or SCENEBOARD_ENDPOINT_URL for the remote store");
    output::note(&format!("3. Run: sceneboard check store -c {}", path.display()));
    Ok(())
}

/// Execute `config show` for an already loaded configuration.
pub fn execute_show(config: &Config, path: &Path) -> Result<()> {
    if output::is_json() {
        output::json_output(json!({
            "command": "config show",
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field("Path", path.display());
    if !path.exists() {
        output::note("(file not found, showing defaults)");
    }

    output::section("Store");
    output::field("Backend", config.store.backend.as_str());
    output::field(
        "Fallback",
        if config.store.fallback_to_local {
            "local"
        } else {
            "off"
        },
    );

    output::section("Remote");
    if config.remote.is_configured() {
        output::field("Endpoint", &config.remote.endpoint_url);
    } else {
        output::field("Endpoint", "(not set)");
    }
    output::field("Timeout", format!("{}ms", config.remote.timeout_ms));
    output::field("Connect", format!("{}ms", config.remote.connect_timeout_ms));
    output::field(
        "Retries",
        format!(
            "{} attempts, {}ms apart",
            config.remote.retry_max_attempts, config.remote.retry_backoff_ms
        ),
    );

    output::section("Local");
    let dir = if config.local.dir.is_empty() {
        "(default)"
    } else {
        config.local.dir.as_str()
    };
    output::field("Dir", dir);
    output::field("Key", &config.local.key);

    output::section("Player");
    output::field("Typewriter", format!("{}ms/char", config.player.typewriter_ms));
    output::field("Advance", format!("{}ms", config.player.advance_delay_ms));

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);
    Ok(())
}

/// Execute `config validate`. The file must exist.
pub fn execute_validate(path: &Path) -> Result<()> {
    let config = Config::load(path)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config validate",
            "path": path.display().to_string(),
            "valid": true,
        }));
        return Ok(());
    }

    output::section("Config Validation");
    output::field("Path", path.display());
    output::success("Config file is valid");

    if config.store.fallback_to_local && config.store.backend == Backend::Local {
        output::note("fallback_to_local has no effect with the local backend");
    }
    output::field(
        "Next",
        format!("sceneboard config show -c {}", path.display()),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_config_template_parses_with_defaults() {
        let config = Config::parse_toml(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.store.backend, Backend::Local);
        assert_eq!(config.local.key, "pawapoke_events");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.player.typewriter_ms, 25);
    }

    #[test]
    fn test_execute_init_writes_template_content() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        execute_init(&config_path, false).unwrap();
        let content = fs::read_to_string(&config_path).unwrap();
        assert_eq!(content, CONFIG_TEMPLATE);
    }

    #[test]
    fn test_execute_init_refuses_existing_file_without_force() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "existing content").unwrap();

        let error = execute_init(&config_path, false).unwrap_err();
        assert!(error.to_string().contains("--force"));
        assert_eq!(fs::read_to_string(&config_path).unwrap(), "existing content");

        execute_init(&config_path, true).unwrap();
        assert_eq!(fs::read_to_string(&config_path).unwrap(), CONFIG_TEMPLATE);
    }

    #[test]
    fn test_execute_validate_requires_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = execute_validate(&temp_dir.path().join("missing.toml"));
        assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
    }

    #[test]
    fn test_execute_validate_rejects_bad_format() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[logging]\nformat = \"xml\"\n").unwrap();

        let result = execute_validate(&config_path);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "logging.format",
                ..
            }))
        ));
    }
}
