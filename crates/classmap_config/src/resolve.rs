//! Base directory resolution.
//!
//! The base directory is fixed once per process. An explicit setting wins;
//! otherwise the value exported by the bootstrap entry point through
//! [`BASE_DIR_ENV`] is used; otherwise the current working directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::loader::{load_config, load_or_default};
use crate::types::ClassmapConfig;

/// Environment variable through which a bootstrap entry point hands the
/// base directory to the resolver.
pub const BASE_DIR_ENV: &str = "CLASSMAP_BASE_DIR";

/// Resolves the base directory from an explicit value, the process
/// environment, or the current working directory, in that order.
pub fn resolve_base_dir(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::BaseDir(e.to_string()));
    resolve_base_dir_from(explicit, std::env::var_os(BASE_DIR_ENV), cwd)
}

/// Pure form of [`resolve_base_dir`] with every input supplied by the caller.
///
/// Empty explicit or environment values are treated as unset.
pub fn resolve_base_dir_from(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
    cwd: Result<PathBuf, ConfigError>,
) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = env_value.filter(|v| !v.is_empty()) {
        tracing::debug!(dir = ?dir, var = BASE_DIR_ENV, "base directory taken from environment");
        return Ok(PathBuf::from(dir));
    }
    cwd
}

/// A resolved base directory and the configuration that applies to it.
#[derive(Debug, Clone)]
pub struct Settings {
    /// The base directory all stored paths are relative to.
    pub base_dir: PathBuf,
    /// The loaded (or default) configuration.
    pub config: ClassmapConfig,
}

/// Resolves the base directory and loads its configuration.
///
/// The configuration is read from `config_file` when given, otherwise from
/// `classmap.toml` in the provisional base directory. A `base_dir` key in
/// the configuration replaces the environment and working-directory
/// fallbacks but never an explicit base directory. A relative `base_dir`
/// key is taken relative to the provisional base directory.
pub fn load_settings(
    explicit_base: Option<&Path>,
    config_file: Option<&Path>,
) -> Result<Settings, ConfigError> {
    let explicit_base = explicit_base.filter(|p| !p.as_os_str().is_empty());
    let provisional = resolve_base_dir(explicit_base)?;
    let config = match config_file {
        Some(path) => load_config(path)?,
        None => load_or_default(&provisional)?,
    };
    let base_dir = match (explicit_base, &config.base_dir) {
        (None, Some(dir)) => provisional.join(dir),
        _ => provisional,
    };
    Ok(Settings { base_dir, config })
}
