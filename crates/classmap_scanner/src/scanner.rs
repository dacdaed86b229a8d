//! Source tree traversal.
//!
//! Walks the base directory recursively and yields every file with the
//! configured extension whose relative path does not begin with one of the
//! excluded prefixes. Directories whose relative path already begins with an
//! excluded prefix are pruned without being read.

use std::path::{Path, PathBuf};

use classmap_config::ScanConfig;
use walkdir::WalkDir;

/// A source file found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Absolute (base-joined) path used to read the file.
    pub absolute: PathBuf,
    /// Path relative to the base directory, `/`-separated.
    pub relative: String,
}

/// Recursive source file enumerator rooted at a base directory.
///
/// [`files`](Self::files) can be called any number of times; each call
/// walks the tree afresh. No ordering is guaranteed beyond the
/// filesystem's traversal order.
#[derive(Debug, Clone)]
pub struct Scanner {
    base_dir: PathBuf,
    extension: String,
    exclude: Vec<String>,
    follow_links: bool,
}

impl Scanner {
    /// Creates a scanner for files ending in `.{extension}` under `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        Self {
            base_dir: base_dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
            exclude: Vec::new(),
            follow_links: false,
        }
    }

    /// Creates a scanner from the `[scan]` configuration section.
    pub fn from_config(base_dir: &Path, config: &ScanConfig) -> Self {
        Self::new(base_dir, config.extension.as_str())
            .with_excludes(config.exclude.iter().cloned())
            .follow_links(config.follow_links)
    }

    /// Adds relative path prefixes that never contribute files.
    pub fn with_excludes(mut self, prefixes: impl IntoIterator<Item = String>) -> Self {
        self.exclude
            .extend(prefixes.into_iter().filter(|p| !p.is_empty()));
        self
    }

    /// Sets whether symbolic links to directories are followed.
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Returns the base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the configured extension (without the dot).
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns `true` if a `/`-separated relative path begins with any
    /// excluded prefix.
    ///
    /// Matching is a plain string prefix test, so the prefix `var` also
    /// excludes `various/Foo.php`.
    pub fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|prefix| relative.starts_with(prefix.as_str()))
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }

    /// Walks the tree and yields every matching, non-excluded file.
    ///
    /// Unreadable directory entries are logged and skipped.
    pub fn files(&self) -> impl Iterator<Item = ScannedFile> + '_ {
        WalkDir::new(&self.base_dir)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_entry(move |entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                match relative_path(&self.base_dir, entry.path()) {
                    Some(rel) if self.is_excluded(&rel) => {
                        tracing::trace!(dir = %rel, "pruning excluded directory");
                        false
                    }
                    _ => true,
                }
            })
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable directory entry");
                    None
                }
            })
            .filter(move |entry| !entry.file_type().is_dir() && self.has_extension(entry.path()))
            .filter_map(move |entry| {
                let relative = relative_path(&self.base_dir, entry.path())?;
                if self.is_excluded(&relative) {
                    tracing::trace!(file = %relative, "skipping excluded file");
                    return None;
                }
                Some(ScannedFile {
                    absolute: entry.into_path(),
                    relative,
                })
            })
    }
}

/// Returns `path` relative to `base` with `/` separators, or `None` if
/// `path` is not under `base`.
pub fn relative_path(base: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
