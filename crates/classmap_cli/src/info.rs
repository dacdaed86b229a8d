//! `--action info`: describe the current artifact.

use classmap_cache::read_artifact;

use crate::action::ActionRegistry;
use crate::{Cli, OutputFormat};

/// Prints the artifact's variant, generator version and entry count.
///
/// A missing or unusable artifact is an error.
pub fn run(cli: &Cli, _registry: &ActionRegistry) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = cli.settings()?;
    let path = cli.artifact_path(&settings);
    let cache = read_artifact(&path)?;

    match cli.format {
        OutputFormat::Text => {
            println!("file:      {}", path.display());
            println!("type:      {}", cache.header.variant);
            println!("generator: {}", cache.header.generator_version);
            println!("entries:   {}", cache.table.len());
        }
        OutputFormat::Json => {
            let out = serde_json::json!({
                "file": path.display().to_string(),
                "type": cache.header.variant.name(),
                "generator": cache.header.generator_version,
                "entries": cache.table.len(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(base: &std::path::Path) -> Cli {
        let base = base.display().to_string();
        Cli::parse_from([
            "classmap",
            "--action",
            "info",
            "--format",
            "json",
            "--base-dir",
            base.as_str(),
        ])
    }

    #[test]
    fn missing_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ActionRegistry::standard();
        assert!(run(&cli(dir.path()), &registry).is_err());
    }

    #[test]
    fn describes_generated_artifact() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("app")).unwrap();
        std::fs::write(dir.path().join("app/Mage.php"), "<?php final class Mage {}").unwrap();
        classmap_cache::generate(
            &classmap_scanner::Scanner::new(dir.path(), "php"),
            classmap_cache::CacheVariant::MapHashed,
            &dir.path().join("var/cache/classPathCache.bin"),
        )
        .unwrap();

        let registry = ActionRegistry::standard();
        assert_eq!(run(&cli(dir.path()), &registry).unwrap(), 0);
    }
}
