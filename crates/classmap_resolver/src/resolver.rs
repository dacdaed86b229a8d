//! The runtime resolver.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError, RwLock};

use classmap_cache::{load_artifact, LookupTable};
use classmap_common::file_name_for_type;
use classmap_config::{load_settings, ClassmapConfig, ResolverConfig};
use classmap_scanner::relative_path;

use crate::error::ResolverError;
use crate::search::{IncludePathSearcher, PathSearcher};
use crate::stats::ResolverStats;

/// The answer to a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The declaring file, relative to the base directory. A fallback match
    /// outside the base directory is returned as its full path.
    Found(String),
    /// No file declares the type.
    NotFound,
}

impl Resolution {
    /// The found path, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Resolution::Found(path) => Some(path),
            Resolution::NotFound => None,
        }
    }

    /// Returns `true` for [`Resolution::Found`].
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

/// Where a resolver is in its lifecycle.
///
/// A [`ResolverBuilder`] is the uninitialized state; building it yields a
/// scoped resolver, and the first lookup (or [`Resolver::load_cache`])
/// moves it to `CacheLoaded` whether or not an artifact was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    /// Base directory and scope fixed; persisted cache not yet read.
    Scoped,
    /// The persisted cache has been read (or found absent).
    CacheLoaded {
        /// Entries adopted from the artifact; zero when none was usable.
        persisted_entries: usize,
    },
}

/// Configures a [`Resolver`].
pub struct ResolverBuilder {
    base_dir: PathBuf,
    scope: String,
    cache_file: Option<PathBuf>,
    extension: String,
    include_dirs: Option<Vec<PathBuf>>,
    searcher: Option<Box<dyn PathSearcher>>,
}

impl ResolverBuilder {
    /// Sets the initial scope name.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Sets the artifact location. Relative paths are taken under the base
    /// directory.
    pub fn cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_file = Some(path.into());
        self
    }

    /// Sets the source file extension used for fallback file names.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sets the include directories searched by the default searcher.
    pub fn include_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.include_dirs = Some(dirs);
        self
    }

    /// Replaces the fallback searcher entirely.
    pub fn searcher(mut self, searcher: impl PathSearcher + 'static) -> Self {
        self.searcher = Some(Box::new(searcher));
        self
    }

    /// Finishes configuration.
    pub fn build(self) -> Resolver {
        let cache_file = match self.cache_file {
            Some(path) if path.is_absolute() => path,
            Some(path) => self.base_dir.join(path),
            None => ClassmapConfig::default().cache.path_under(&self.base_dir),
        };
        let searcher = match self.searcher {
            Some(searcher) => searcher,
            None => {
                let dirs = self.include_dirs.unwrap_or_else(|| {
                    ResolverConfig::default().include_dirs_under(&self.base_dir)
                });
                Box::new(IncludePathSearcher::new(dirs))
            }
        };
        tracing::debug!(
            base_dir = %self.base_dir.display(),
            scope = %self.scope,
            cache_file = %cache_file.display(),
            "resolver scoped"
        );
        Resolver {
            base_dir: self.base_dir,
            scope: RwLock::new(self.scope),
            cache_file,
            extension: self.extension,
            searcher,
            persisted: OnceLock::new(),
            memo: Mutex::new(HashMap::new()),
            stats: ResolverStats::default(),
        }
    }
}

/// Resolves type names to declaring files.
///
/// The persisted artifact is read at most once, on first use. Lookups that
/// miss it go to the fallback searcher and the outcome, found or not, is
/// remembered in process memory. The resolver is `Sync`; concurrent
/// fallback lookups for the same name may both search, and the first
/// recorded result wins.
pub struct Resolver {
    base_dir: PathBuf,
    scope: RwLock<String>,
    cache_file: PathBuf,
    extension: String,
    searcher: Box<dyn PathSearcher>,
    persisted: OnceLock<Option<LookupTable>>,
    memo: Mutex<HashMap<String, Resolution>>,
    stats: ResolverStats,
}

impl Resolver {
    /// Starts configuring a resolver rooted at `base_dir`.
    pub fn builder(base_dir: impl Into<PathBuf>) -> ResolverBuilder {
        ResolverBuilder {
            base_dir: base_dir.into(),
            scope: ResolverConfig::default().scope,
            cache_file: None,
            extension: ClassmapConfig::default().scan.extension,
            include_dirs: None,
            searcher: None,
        }
    }

    /// Starts configuring a resolver from a loaded configuration.
    pub fn from_config(base_dir: &Path, config: &ClassmapConfig) -> ResolverBuilder {
        Self::builder(base_dir)
            .scope(config.resolver.scope.clone())
            .cache_file(config.cache.path_under(base_dir))
            .extension(config.scan.extension.clone())
            .include_dirs(config.resolver.include_dirs_under(base_dir))
    }

    /// Resolves the base directory and configuration the standard way and
    /// builds a resolver from them.
    pub fn open(explicit_base: Option<&Path>) -> Result<Resolver, ResolverError> {
        let settings = load_settings(explicit_base, None)?;
        Ok(Self::from_config(&settings.base_dir, &settings.config).build())
    }

    /// The base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The artifact location.
    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }

    /// Makes `code` the active scope.
    pub fn register_scope(&self, code: impl Into<String>) {
        let code = code.into();
        tracing::debug!(scope = %code, "scope registered");
        *self.scope.write().unwrap_or_else(PoisonError::into_inner) = code;
    }

    /// The active scope.
    pub fn scope(&self) -> String {
        self.scope
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The current lifecycle state.
    pub fn state(&self) -> ResolverState {
        match self.persisted.get() {
            None => ResolverState::Scoped,
            Some(table) => ResolverState::CacheLoaded {
                persisted_entries: table.as_ref().map_or(0, LookupTable::len),
            },
        }
    }

    /// Reads the persisted artifact if that has not happened yet.
    ///
    /// Returns `true` if a usable artifact was adopted.
    pub fn load_cache(&self) -> bool {
        self.persisted().is_some()
    }

    fn persisted(&self) -> Option<&LookupTable> {
        self.persisted
            .get_or_init(|| load_artifact(&self.cache_file).map(|cache| cache.table))
            .as_ref()
    }

    /// Looks up the file declaring `type_name`.
    pub fn lookup(&self, type_name: &str) -> Resolution {
        if let Some(path) = self.persisted().and_then(|table| table.get(type_name)) {
            self.stats.record_cache_hit();
            return Resolution::Found(path.to_string());
        }

        if let Some(known) = self.memoized(type_name) {
            if known.is_found() {
                self.stats.record_cache_hit();
            } else {
                self.stats.record_miss();
            }
            return known;
        }

        let resolution = self.search(type_name);
        let mut memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);
        memo.entry(type_name.to_string())
            .or_insert(resolution)
            .clone()
    }

    /// Looks up `type_name` and returns the declaring file's full path.
    pub fn locate(&self, type_name: &str) -> Option<PathBuf> {
        match self.lookup(type_name) {
            Resolution::Found(path) => Some(self.base_dir.join(path)),
            Resolution::NotFound => None,
        }
    }

    /// Lookup counters.
    pub fn stats(&self) -> &ResolverStats {
        &self.stats
    }

    fn memoized(&self, type_name: &str) -> Option<Resolution> {
        self.memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
            .cloned()
    }

    fn search(&self, type_name: &str) -> Resolution {
        let file_name = file_name_for_type(type_name, &self.extension);
        self.stats.record_search();
        match self.searcher.search(&file_name) {
            Some(found) => {
                let path = relative_path(&self.base_dir, &found)
                    .unwrap_or_else(|| found.to_string_lossy().into_owned());
                tracing::debug!(type_name, path = %path, "fallback search found type");
                self.stats.record_fallback_hit();
                Resolution::Found(path)
            }
            None => {
                tracing::debug!(type_name, file_name = %file_name, "type not found");
                self.stats.record_miss();
                Resolution::NotFound
            }
        }
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("base_dir", &self.base_dir)
            .field("scope", &self.scope())
            .field("cache_file", &self.cache_file)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
