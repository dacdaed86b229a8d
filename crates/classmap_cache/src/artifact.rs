//! Binary artifact format for a persisted class path cache.
//!
//! Layout: a 4-byte little-endian header length, the bincode-encoded
//! [`ArtifactHeader`], the body of bincode-encoded entries, then a fixed
//! trailer holding the entry count (u32 little-endian) and the content hash
//! of the body. The header names the variant, so the reader knows which
//! container to build before the first entry arrives. The trailer lets a
//! truncated or interrupted write be told apart from a complete one.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use classmap_common::{ContentHash, ContentHasher};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::container::LookupTable;
use crate::error::CacheError;
use crate::key::CacheKey;
use crate::variant::CacheVariant;

/// Magic bytes identifying a class path cache artifact.
const ARTIFACT_MAGIC: [u8; 4] = *b"CPCA";

/// Current artifact format version. Increment on breaking changes to
/// the header, body or trailer.
const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Entry count plus body hash.
const TRAILER_LEN: usize = 4 + 16;

/// Upper bound on bytes a header decode may claim. The header is read before
/// any integrity check, so a corrupted length prefix must fail here instead
/// of sizing an allocation.
const HEADER_DECODE_LIMIT: usize = 64 * 1024;

/// Upper bound on bytes one entry decode may claim.
const ENTRY_DECODE_LIMIT: usize = 1024 * 1024;

/// Header at the start of every artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactHeader {
    /// Magic bytes: must be `b"CPCA"`.
    pub magic: [u8; 4],

    /// Artifact format version.
    pub format_version: u32,

    /// Version of the generator that wrote this artifact.
    pub generator_version: String,

    /// Container and key scheme of the body.
    pub variant: CacheVariant,
}

#[derive(Serialize)]
struct EntryRef<'a> {
    key: &'a CacheKey,
    path: &'a str,
}

#[derive(Deserialize)]
struct ArtifactEntry {
    key: CacheKey,
    path: String,
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CacheError> {
    bincode::serde::encode_to_vec(value, bincode::config::standard()).map_err(|e| {
        CacheError::Serialization {
            reason: e.to_string(),
        }
    })
}

fn decode_bounded<T: DeserializeOwned, const LIMIT: usize>(
    bytes: &[u8],
) -> Result<(T, usize), bincode::error::DecodeError> {
    bincode::serde::decode_from_slice(bytes, bincode::config::standard().with_limit::<LIMIT>())
}

/// Streams entries into an artifact file.
///
/// The target file is created (truncating any previous artifact) when the
/// writer is created. [`ArtifactWriter::finish`] appends the trailer; a
/// writer dropped without finishing leaves an artifact the reader rejects.
/// [`ArtifactWriter::abort`] removes the partial file.
pub struct ArtifactWriter {
    path: PathBuf,
    out: BufWriter<File>,
    hasher: ContentHasher,
    entries: u32,
}

impl ArtifactWriter {
    /// Creates the artifact at `path` and writes its header.
    ///
    /// Missing parent directories are created.
    pub fn create(
        path: &Path,
        variant: CacheVariant,
        generator_version: &str,
    ) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CacheError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let header = ArtifactHeader {
            magic: ARTIFACT_MAGIC,
            format_version: ARTIFACT_FORMAT_VERSION,
            generator_version: generator_version.to_string(),
            variant,
        };
        let header_bytes = encode(&header)?;

        let file = File::create(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut writer = Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            hasher: ContentHasher::new(),
            entries: 0,
        };
        writer.write_raw(&(header_bytes.len() as u32).to_le_bytes())?;
        writer.write_raw(&header_bytes)?;
        Ok(writer)
    }

    /// The file being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry to the body.
    pub fn write_entry(&mut self, key: &CacheKey, path: &str) -> Result<(), CacheError> {
        let bytes = encode(&EntryRef { key, path })?;
        self.hasher.update(&bytes);
        self.write_raw(&bytes)?;
        self.entries += 1;
        Ok(())
    }

    /// Writes the trailer and flushes, returning the number of entries.
    pub fn finish(mut self) -> Result<u32, CacheError> {
        let hash = self.hasher.finish();
        let count = self.entries;
        self.write_raw(&count.to_le_bytes())?;
        self.write_raw(hash.as_bytes())?;
        self.out.flush().map_err(|e| CacheError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(count)
    }

    /// Discards the partial artifact.
    pub fn abort(self) -> Result<(), CacheError> {
        let Self { path, out, .. } = self;
        drop(out);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io { path, source: e }),
        }
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<(), CacheError> {
        self.out.write_all(bytes).map_err(|e| CacheError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// A fully loaded artifact.
#[derive(Debug, Clone)]
pub struct PersistedCache {
    /// The artifact's header.
    pub header: ArtifactHeader,
    /// All entries, in the variant's container.
    pub table: LookupTable,
}

/// Reads and validates the artifact at `path`.
pub fn read_artifact(path: &Path) -> Result<PersistedCache, CacheError> {
    let raw = std::fs::read(path).map_err(|e| CacheError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let invalid = |reason: &str| CacheError::InvalidHeader {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };
    let corrupt = |reason: String| CacheError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    if raw.len() < 4 {
        return Err(invalid("file too short for header length"));
    }
    let header_len = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize;
    let body_start = 4usize
        .checked_add(header_len)
        .filter(|&start| start <= raw.len())
        .ok_or_else(|| invalid("header length exceeds file size"))?;

    let (header, _) = decode_bounded::<ArtifactHeader, HEADER_DECODE_LIMIT>(&raw[4..body_start])
        .map_err(|e| invalid(&e.to_string()))?;

    if header.magic != ARTIFACT_MAGIC {
        return Err(invalid("missing magic bytes"));
    }
    if header.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(CacheError::VersionMismatch {
            path: path.to_path_buf(),
            expected: ARTIFACT_FORMAT_VERSION,
            actual: header.format_version,
        });
    }

    if raw.len() < body_start + TRAILER_LEN {
        return Err(corrupt("missing trailer".to_string()));
    }
    let trailer_start = raw.len() - TRAILER_LEN;
    let body = &raw[body_start..trailer_start];
    let trailer = &raw[trailer_start..];
    let count = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    let mut stored = [0u8; 16];
    stored.copy_from_slice(&trailer[4..]);
    let expected = ContentHash::from_raw(stored);

    let actual = ContentHash::from_bytes(body);
    if actual != expected {
        return Err(CacheError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }

    let mut table = LookupTable::new(header.variant);
    let mut offset = 0usize;
    for i in 0..count {
        let (entry, used) = decode_bounded::<ArtifactEntry, ENTRY_DECODE_LIMIT>(&body[offset..])
            .map_err(|e| corrupt(format!("entry {i}: {e}")))?;
        offset += used;
        table.insert(entry.key, entry.path)?;
    }
    if offset != body.len() {
        return Err(corrupt(format!(
            "{} trailing bytes after {count} entries",
            body.len() - offset
        )));
    }

    Ok(PersistedCache { header, table })
}

/// Reads the artifact at `path`, treating any failure as "no cache".
///
/// A missing file is the normal state before the first generation and is
/// logged at debug level; anything else is a warning.
pub fn load_artifact(path: &Path) -> Option<PersistedCache> {
    match read_artifact(path) {
        Ok(cache) => {
            tracing::debug!(
                path = %path.display(),
                variant = %cache.header.variant,
                entries = cache.table.len(),
                "class path cache loaded"
            );
            Some(cache)
        }
        Err(CacheError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no class path cache present");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unusable class path cache");
            None
        }
    }
}

/// Deletes the artifact at `path`.
///
/// Returns `false` if there was nothing to delete.
pub fn clear_artifact(path: &Path) -> Result<bool, CacheError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "class path cache cleared");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
