//! Configuration types deserialized from `classmap.toml`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The top-level configuration parsed from `classmap.toml`.
///
/// Every section is optional; a missing file or section yields the defaults
/// of a conventional application layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassmapConfig {
    /// Explicit base directory. Takes priority over the bootstrap
    /// environment when set.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    /// Source scanning settings.
    #[serde(default)]
    pub scan: ScanConfig,
    /// Persisted cache location.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Runtime resolver settings.
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Settings controlling which files the scanner visits.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Source file extension without the dot, matched case-insensitively.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Relative path prefixes whose files never contribute entries.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    /// Whether symbolic links to directories are descended into.
    #[serde(default)]
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            exclude: default_exclude(),
            follow_links: false,
        }
    }
}

/// Location of the persisted class path cache.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Artifact file, relative to the base directory unless absolute.
    #[serde(default = "default_cache_file")]
    pub file: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            file: default_cache_file(),
        }
    }
}

impl CacheConfig {
    /// Returns the absolute artifact path for the given base directory.
    pub fn path_under(&self, base_dir: &Path) -> PathBuf {
        if self.file.is_absolute() {
            self.file.clone()
        } else {
            base_dir.join(&self.file)
        }
    }
}

/// Settings for the runtime resolver's fallback search.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Ordered include directories searched when a type is not cached.
    /// Relative entries are resolved against the base directory.
    #[serde(default = "default_include_paths")]
    pub include_paths: Vec<PathBuf>,
    /// Name of the active lookup scope.
    #[serde(default = "default_scope")]
    pub scope: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            include_paths: default_include_paths(),
            scope: default_scope(),
        }
    }
}

impl ResolverConfig {
    /// Returns the include directories as absolute paths under `base_dir`.
    pub fn include_dirs_under(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.include_paths
            .iter()
            .map(|p| {
                if p.is_absolute() {
                    p.clone()
                } else {
                    base_dir.join(p)
                }
            })
            .collect()
    }
}

fn default_extension() -> String {
    "php".to_string()
}

fn default_exclude() -> Vec<String> {
    vec!["shell".to_string(), "var".to_string(), ".modman".to_string()]
}

fn default_cache_file() -> PathBuf {
    PathBuf::from("var/cache/classPathCache.bin")
}

fn default_include_paths() -> Vec<PathBuf> {
    [
        "app/code/local",
        "app/code/community",
        "app/code/core",
        "lib",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

fn default_scope() -> String {
    "default".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClassmapConfig::default();
        assert_eq!(config.scan.extension, "php");
        assert_eq!(config.scan.exclude, vec!["shell", "var", ".modman"]);
        assert!(!config.scan.follow_links);
        assert_eq!(config.resolver.scope, "default");
        assert_eq!(config.resolver.include_paths.len(), 4);
        assert!(config.base_dir.is_none());
    }

    #[test]
    fn cache_path_relative_to_base() {
        let cache = CacheConfig::default();
        assert_eq!(
            cache.path_under(Path::new("/srv/shop")),
            PathBuf::from("/srv/shop/var/cache/classPathCache.bin")
        );
    }

    #[test]
    fn cache_path_absolute_is_kept() {
        let cache = CacheConfig {
            file: PathBuf::from("/tmp/cpc.bin"),
        };
        assert_eq!(
            cache.path_under(Path::new("/srv/shop")),
            PathBuf::from("/tmp/cpc.bin")
        );
    }

    #[test]
    fn include_dirs_resolved_in_order() {
        let resolver = ResolverConfig {
            include_paths: vec![PathBuf::from("lib"), PathBuf::from("/opt/php/lib")],
            scope: default_scope(),
        };
        let dirs = resolver.include_dirs_under(Path::new("/srv/shop"));
        assert_eq!(
            dirs,
            vec![PathBuf::from("/srv/shop/lib"), PathBuf::from("/opt/php/lib")]
        );
    }
}
