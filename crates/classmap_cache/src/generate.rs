//! One generation run: scan, encode, persist.

use std::path::{Path, PathBuf};

use classmap_common::ClassMap;
use classmap_scanner::{build_class_map, ScanReport, Scanner};

use crate::artifact::ArtifactWriter;
use crate::error::CacheError;
use crate::key::KeyEncoder;
use crate::variant::CacheVariant;

/// Generator version recorded in every artifact header.
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Summary of a successful generation run.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// Variant the artifact was written with.
    pub variant: CacheVariant,
    /// Where the artifact was written.
    pub output: PathBuf,
    /// Entries persisted.
    pub entries: u32,
    /// Scan counters.
    pub scan: ScanReport,
}

/// Writes every entry of `map` to a fresh artifact at `output`.
///
/// Entries are streamed in the map's first-seen order. On any failure,
/// including a checksum collision under a hashed variant, the partial
/// artifact is deleted so no cache is left behind.
pub fn write_class_map(
    map: &ClassMap,
    variant: CacheVariant,
    output: &Path,
) -> Result<u32, CacheError> {
    let mut encoder = KeyEncoder::new(variant.scheme());
    let mut writer = ArtifactWriter::create(output, variant, GENERATOR_VERSION)?;

    for entry in map {
        let written = encoder
            .encode(&entry.name)
            .and_then(|key| writer.write_entry(&key, &entry.path));
        if let Err(err) = written {
            tracing::warn!(
                error = %err,
                output = %output.display(),
                "generation aborted, removing partial artifact"
            );
            if let Err(cleanup) = writer.abort() {
                tracing::warn!(error = %cleanup, "failed to remove partial cache artifact");
            }
            return Err(err);
        }
    }

    writer.finish()
}

/// Scans the tree behind `scanner` and persists it as `variant` at `output`.
pub fn generate(
    scanner: &Scanner,
    variant: CacheVariant,
    output: &Path,
) -> Result<GenerateReport, CacheError> {
    let (map, scan) = build_class_map(scanner);
    tracing::debug!(variant = %variant, entries = map.len(), "writing class path cache");
    let entries = write_class_map(&map, variant, output)?;
    tracing::info!(
        output = %output.display(),
        variant = %variant,
        entries,
        "class path cache generated"
    );
    Ok(GenerateReport {
        variant,
        output: output.to_path_buf(),
        entries,
        scan,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::read_artifact;
    use classmap_common::TypeChecksum;
    use std::collections::HashMap;

    fn colliding_pair() -> (String, String) {
        let mut seen: HashMap<u32, String> = HashMap::new();
        for i in 0u32.. {
            let name = format!("Type{i}");
            if let Some(first) = seen.insert(TypeChecksum::of(&name).as_raw(), name.clone()) {
                return (first, name);
            }
        }
        unreachable!("u32 range exhausted without a collision")
    }

    #[test]
    fn writes_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("cpc.bin");
        let mut map = ClassMap::new();
        map.insert("Mage", "app/Mage.php");
        map.insert("Mage_Core_Model_App", "app/code/core/Mage/Core/Model/App.php");

        assert_eq!(write_class_map(&map, CacheVariant::MapHashed, &out).unwrap(), 2);
        let cache = read_artifact(&out).unwrap();
        assert_eq!(
            cache.table.get("Mage_Core_Model_App"),
            Some("app/code/core/Mage/Core/Model/App.php")
        );
    }

    #[test]
    fn collision_leaves_no_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("cpc.bin");
        let (a, b) = colliding_pair();
        let mut map = ClassMap::new();
        map.insert(a.as_str(), "A.php");
        map.insert(b.as_str(), "B.php");

        let err = write_class_map(&map, CacheVariant::TrieHashed, &out).unwrap_err();
        assert!(matches!(err, CacheError::KeyCollision { .. }));
        assert!(!out.exists());

        assert_eq!(write_class_map(&map, CacheVariant::TrieString, &out).unwrap(), 2);
        assert!(out.exists());
    }

    #[test]
    fn generate_scans_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("lib/Varien")).unwrap();
        std::fs::write(
            dir.path().join("lib/Varien/Object.php"),
            "<?php\nclass Varien_Object {}\n",
        )
        .unwrap();
        let out = dir.path().join("var/cache/cpc.bin");

        let scanner = Scanner::new(dir.path(), "php");
        let report = generate(&scanner, CacheVariant::MapString, &out).unwrap();
        assert_eq!(report.entries, 1);
        assert_eq!(report.scan.files_scanned, 1);
        assert_eq!(report.output, out);
        let cache = read_artifact(&out).unwrap();
        assert_eq!(cache.table.get("Varien_Object"), Some("lib/Varien/Object.php"));
    }
}
