//! `--action lookup`: resolve type names the way the runtime does.

use classmap_resolver::{Resolution, Resolver};

use crate::action::ActionRegistry;
use crate::{Cli, OutputFormat};

/// Resolves every `--name`. Returns 1 if any is not found.
pub fn run(cli: &Cli, registry: &ActionRegistry) -> Result<i32, Box<dyn std::error::Error>> {
    if cli.names.is_empty() {
        eprintln!("error: --name is required for lookup");
        eprint!("{}", registry.usage());
        return Ok(1);
    }

    let settings = cli.settings()?;
    let resolver = Resolver::from_config(&settings.base_dir, &settings.config)
        .cache_file(cli.artifact_path(&settings))
        .build();

    let results: Vec<(&str, Resolution)> = cli
        .names
        .iter()
        .map(|name| (name.as_str(), resolver.lookup(name)))
        .collect();

    match cli.format {
        OutputFormat::Text => {
            for (name, resolution) in &results {
                match resolution {
                    Resolution::Found(path) => println!("{name}\t{path}"),
                    Resolution::NotFound => println!("{name}\tnot found"),
                }
            }
        }
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = results
                .iter()
                .map(|(name, resolution)| {
                    serde_json::json!({ "name": name, "path": resolution.path() })
                })
                .collect();
            let out = serde_json::json!({
                "cache_loaded": resolver.load_cache(),
                "results": entries,
                "stats": resolver.stats().snapshot(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    let all_found = results.iter().all(|(_, r)| r.is_found());
    Ok(if all_found { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(base: &std::path::Path, names: &[&str]) -> Cli {
        let mut args = vec![
            "classmap".to_string(),
            "--action".to_string(),
            "lookup".to_string(),
            "--base-dir".to_string(),
            base.display().to_string(),
        ];
        for name in names {
            args.push("--name".to_string());
            args.push(name.to_string());
        }
        Cli::parse_from(args)
    }

    #[test]
    fn found_names_exit_zero() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("lib/Varien/Object.php");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, "<?php class Varien_Object {}").unwrap();

        let registry = ActionRegistry::standard();
        assert_eq!(run(&cli(dir.path(), &["Varien_Object"]), &registry).unwrap(), 0);
    }

    #[test]
    fn any_missing_name_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ActionRegistry::standard();
        assert_eq!(run(&cli(dir.path(), &["Nope_Nothing"]), &registry).unwrap(), 1);
    }

    #[test]
    fn no_names_is_a_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ActionRegistry::standard();
        assert_eq!(run(&cli(dir.path(), &[]), &registry).unwrap(), 1);
    }
}
