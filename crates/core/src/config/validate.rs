use regex_lite::Regex;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Remote store section exists (enforced by serde)
/// - Server port is not 0
/// - Watched folder id is set and well-formed when the watcher is enabled
/// - Composite settings are usable
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Watcher validation
    if config.watcher.enabled {
        if config.watcher.folder_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "watcher.folder_id must be set when the watcher is enabled".to_string(),
            ));
        }
        if !is_valid_folder_id(&config.watcher.folder_id) {
            return Err(ConfigError::ValidationError(format!(
                "watcher.folder_id is not a valid folder id: {}",
                config.watcher.folder_id
            )));
        }
        if config.watcher.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "watcher.poll_interval_ms cannot be 0".to_string(),
            ));
        }
    }

    // Remote store validation
    if !config.remote_store.upload_folder_id.is_empty()
        && !is_valid_folder_id(&config.remote_store.upload_folder_id)
    {
        return Err(ConfigError::ValidationError(format!(
            "remote_store.upload_folder_id is not a valid folder id: {}",
            config.remote_store.upload_folder_id
        )));
    }

    // Composite validation
    if config.composite.max_inputs == 0 {
        return Err(ConfigError::ValidationError(
            "composite.max_inputs must be at least 1".to_string(),
        ));
    }
    if !config.composite.dest_folder_id.is_empty()
        && !is_valid_folder_id(&config.composite.dest_folder_id)
    {
        return Err(ConfigError::ValidationError(format!(
            "composite.dest_folder_id is not a valid folder id: {}",
            config.composite.dest_folder_id
        )));
    }
    if config.composite.output_name.is_empty() {
        return Err(ConfigError::ValidationError(
            "composite.output_name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Drive folder ids are opaque but always URL-safe tokens.
fn is_valid_folder_id(id: &str) -> bool {
    let re = Regex::new(r"^[A-Za-z0-9_-]+$").expect("folder id pattern is valid");
    re.is_match(id)
}
