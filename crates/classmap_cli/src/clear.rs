//! `--action clear`: delete the cache artifact.

use classmap_cache::clear_artifact;

use crate::action::ActionRegistry;
use crate::Cli;

/// Deletes the artifact. Succeeds whether or not one existed.
pub fn run(cli: &Cli, _registry: &ActionRegistry) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = cli.settings()?;
    let path = cli.artifact_path(&settings);
    if clear_artifact(&path)? {
        println!("Class path cache {} was deleted", path.display());
    } else {
        println!("No class path cache at {}", path.display());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn clear_removes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("var/cache/classPathCache.bin");
        std::fs::create_dir_all(artifact.parent().unwrap()).unwrap();
        std::fs::write(&artifact, b"stale").unwrap();

        let base = dir.path().display().to_string();
        let cli = Cli::parse_from([
            "classmap",
            "--action",
            "clear",
            "--base-dir",
            base.as_str(),
        ]);
        let registry = ActionRegistry::standard();
        assert_eq!(run(&cli, &registry).unwrap(), 0);
        assert!(!artifact.exists());
        assert_eq!(run(&cli, &registry).unwrap(), 0);
    }
}
