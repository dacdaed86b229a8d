//! Filesystem fallback search.

use std::path::{Path, PathBuf};

/// Finds a file by relative name somewhere on a search path.
pub trait PathSearcher: Send + Sync {
    /// Returns the path of the first match for `file_name`, if any.
    fn search(&self, file_name: &str) -> Option<PathBuf>;
}

/// Searches an ordered list of include directories.
#[derive(Debug, Clone)]
pub struct IncludePathSearcher {
    dirs: Vec<PathBuf>,
}

impl IncludePathSearcher {
    /// Creates a searcher over `dirs`, searched in order.
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// The include directories, in search order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl PathSearcher for IncludePathSearcher {
    fn search(&self, file_name: &str) -> Option<PathBuf> {
        let relative = Path::new(file_name);
        self.dirs
            .iter()
            .map(|dir| dir.join(relative))
            .find(|candidate| candidate.is_file())
    }
}
