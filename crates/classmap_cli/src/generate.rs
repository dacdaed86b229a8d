//! `--action generate`: scan the base directory and write the cache.

use std::path::{Path, PathBuf};

use classmap_cache::{generate, CacheVariant};
use classmap_scanner::Scanner;

use crate::action::ActionRegistry;
use crate::Cli;

/// Runs generation for the variant named by `--type`.
///
/// A missing or unknown type prints usage and returns 1 before anything
/// is written.
pub fn run(cli: &Cli, registry: &ActionRegistry) -> Result<i32, Box<dyn std::error::Error>> {
    let Some(type_name) = cli.cache_type.as_deref() else {
        eprintln!("error: --type is required for generate");
        eprint!("{}", registry.usage());
        return Ok(1);
    };
    let variant: CacheVariant = match type_name.parse() {
        Ok(variant) => variant,
        Err(e) => {
            eprintln!("error: {e}");
            eprint!("{}", registry.usage());
            return Ok(1);
        }
    };

    let settings = cli.settings()?;
    let output = cli.artifact_path(&settings);
    let scanner = Scanner::from_config(&settings.base_dir, &settings.config.scan);

    let report = generate(&scanner, variant, &output)?;
    tracing::info!(
        files = report.scan.files_scanned,
        unreadable = report.scan.files_unreadable,
        entries = report.entries,
        unconventional = report.scan.unconventional,
        variant = %report.variant,
        "scan complete"
    );
    println!(
        "Class path cache was successfully generated and saved to file {}",
        saved_location(&report.output).display()
    );
    Ok(0)
}

/// The resolved location of a freshly written artifact, or `output` as given
/// if it cannot be resolved.
fn saved_location(output: &Path) -> PathBuf {
    std::fs::canonicalize(output).unwrap_or_else(|_| output.to_path_buf())
}
