//! `classmap`: generate and inspect the class path cache.
//!
//! A single `--action` selects what to do; the available actions are kept
//! in an [`action::ActionRegistry`] that also produces the usage text.

#![warn(missing_docs)]

mod action;
mod clear;
mod generate;
mod info;
mod lookup;

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use classmap_config::{load_settings, ConfigError, Settings};
use tracing_subscriber::EnvFilter;

use crate::action::ActionRegistry;

/// Class path cache generator.
#[derive(Parser, Debug)]
#[command(name = "classmap", version, about = "Class path cache generator")]
pub struct Cli {
    /// Action to run.
    #[arg(long)]
    pub action: Option<String>,

    /// Cache type for `generate`.
    #[arg(long = "type", value_name = "TYPE")]
    pub cache_type: Option<String>,

    /// Artifact path, overriding `[cache] file`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Type name for `lookup`; may be repeated.
    #[arg(long = "name", value_name = "TYPE_NAME")]
    pub names: Vec<String>,

    /// Base directory of the application.
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Path to a custom `classmap.toml` configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format for `lookup` and `info`.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Suppress all log output except errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolves the base directory and loads the configuration.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        load_settings(self.base_dir.as_deref(), self.config.as_deref())
    }

    /// The artifact path: `--output` if given, else the configured one.
    pub fn artifact_path(&self, settings: &Settings) -> PathBuf {
        match &self.output {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => settings.base_dir.join(path),
            None => settings.config.cache.path_under(&settings.base_dir),
        }
    }
}

/// Result output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Machine-readable JSON.
    Json,
}

fn init_tracing(cli: &Cli) {
    let default = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn,classmap=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Runs the action named by `--action`.
///
/// A missing or unknown action prints the usage text and yields exit
/// code 1.
fn dispatch(cli: &Cli, registry: &ActionRegistry) -> Result<i32, Box<dyn std::error::Error>> {
    let Some(name) = cli.action.as_deref() else {
        eprint!("{}", registry.usage());
        return Ok(1);
    };
    match registry.find(name) {
        Some(action) => (action.handler)(cli, registry),
        None => {
            eprintln!("error: unknown action '{name}'");
            eprint!("{}", registry.usage());
            Ok(1)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let registry = ActionRegistry::standard();
    match dispatch(&cli, &registry) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("classmap").chain(args.iter().copied()))
    }

    #[test]
    fn parse_generate() {
        let cli = cli(&["--action", "generate", "--type", "trie-hashed"]);
        assert_eq!(cli.action.as_deref(), Some("generate"));
        assert_eq!(cli.cache_type.as_deref(), Some("trie-hashed"));
        assert!(cli.output.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parse_repeated_names() {
        let cli = cli(&[
            "--action",
            "lookup",
            "--name",
            "Mage",
            "--name",
            "Varien_Object",
            "--format",
            "json",
        ]);
        assert_eq!(cli.names, vec!["Mage", "Varien_Object"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn parse_global_flags() {
        let cli = cli(&["-q", "--base-dir", "/srv/shop", "--config", "/etc/classmap.toml"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.base_dir, Some(PathBuf::from("/srv/shop")));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/classmap.toml")));
        assert!(cli.action.is_none());
    }

    #[test]
    fn missing_action_exits_one() {
        let registry = ActionRegistry::standard();
        assert_eq!(dispatch(&cli(&[]), &registry).unwrap(), 1);
    }

    #[test]
    fn unknown_action_exits_one() {
        let registry = ActionRegistry::standard();
        assert_eq!(
            dispatch(&cli(&["--action", "compile"]), &registry).unwrap(),
            1
        );
    }

    #[test]
    fn relative_output_is_under_base() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_str().unwrap();
        let cli = cli(&["--base-dir", base, "--output", "out/cpc.bin"]);
        let settings = cli.settings().unwrap();
        assert_eq!(cli.artifact_path(&settings), dir.path().join("out/cpc.bin"));
    }

    #[test]
    fn default_output_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_str().unwrap();
        let cli = cli(&["--base-dir", base]);
        let settings = cli.settings().unwrap();
        assert_eq!(
            cli.artifact_path(&settings),
            dir.path().join("var/cache/classPathCache.bin")
        );
    }
}
