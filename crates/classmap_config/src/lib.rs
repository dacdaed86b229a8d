//! Parsing and validation of `classmap.toml` configuration files.
//!
//! This crate reads the optional configuration file at the base directory and
//! produces a strongly-typed [`ClassmapConfig`], and resolves the base
//! directory itself from explicit settings or the bootstrap environment.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, load_or_default, CONFIG_FILE};
pub use resolve::{load_settings, resolve_base_dir, resolve_base_dir_from, Settings, BASE_DIR_ENV};
pub use types::*;
