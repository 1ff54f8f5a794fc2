//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::CodecConfig;
use std::path::Path;

/// The configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "frost.toml";

/// Loads and validates a `frost.toml` configuration from a directory.
pub fn load_config(dir: &Path) -> Result<CodecConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    let content =
        std::fs::read_to_string(&path).map_err(|source| ConfigError::Read { path, source })?;
    load_config_from_str(&content)
}

/// Parses and validates a `frost.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<CodecConfig, ConfigError> {
    let config: CodecConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &CodecConfig) -> Result<(), ConfigError> {
    if let Some(chipdb) = &config.device.chipdb {
        if chipdb.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "device.chipdb",
                reason: "must not be empty".to_string(),
            });
        }
    }
    Ok(())
}
