//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ClassmapConfig;
use std::path::Path;

/// Name of the configuration file looked up in the base directory.
pub const CONFIG_FILE: &str = "classmap.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<ClassmapConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_config_from_str(&content)
}

/// Loads `<base_dir>/classmap.toml`, or the defaults when it does not exist.
pub fn load_or_default(base_dir: &Path) -> Result<ClassmapConfig, ConfigError> {
    let path = base_dir.join(CONFIG_FILE);
    if path.is_file() {
        tracing::debug!(path = %path.display(), "loading configuration");
        load_config(&path)
    } else {
        tracing::debug!(path = %path.display(), "no configuration file, using defaults");
        Ok(ClassmapConfig::default())
    }
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ClassmapConfig, ConfigError> {
    let config: ClassmapConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required values are present and non-empty.
fn validate_config(config: &ClassmapConfig) -> Result<(), ConfigError> {
    if config.scan.extension.trim_start_matches('.').is_empty() {
        return Err(ConfigError::MissingField("scan.extension".to_string()));
    }
    if config.cache.file.as_os_str().is_empty() {
        return Err(ConfigError::MissingField("cache.file".to_string()));
    }
    if config.resolver.scope.is_empty() {
        return Err(ConfigError::MissingField("resolver.scope".to_string()));
    }
    Ok(())
}
