//! Building a [`ClassMap`] from a scanned source tree.

use classmap_common::{file_name_for_type, ClassMap};

use crate::extract::extract_declarations;
use crate::scanner::Scanner;

/// Counters describing one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Files read and tokenized.
    pub files_scanned: usize,
    /// Files that matched but could not be read.
    pub files_unreadable: usize,
    /// Declarations found, including duplicates.
    pub declarations: usize,
    /// Declarations that replaced an earlier path for the same name.
    pub overwritten: usize,
    /// Declarations whose file is not at the conventional derived path.
    pub unconventional: usize,
    /// Lexer error tokens across all files.
    pub lex_errors: usize,
}

/// Scans every file yielded by `scanner` and maps each declared type name
/// to the declaring file's relative path.
///
/// A name declared in more than one file keeps the path of the last file
/// scanned. Unreadable files are logged and skipped.
pub fn build_class_map(scanner: &Scanner) -> (ClassMap, ScanReport) {
    let mut map = ClassMap::new();
    let mut report = ScanReport::default();

    for file in scanner.files() {
        let bytes = match std::fs::read(&file.absolute) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(file = %file.relative, error = %err, "cannot read source file");
                report.files_unreadable += 1;
                continue;
            }
        };
        report.files_scanned += 1;

        let source = String::from_utf8_lossy(&bytes);
        let extraction = extract_declarations(&source);
        if extraction.lex_errors > 0 {
            tracing::debug!(
                file = %file.relative,
                errors = extraction.lex_errors,
                "lexer errors in source file"
            );
            report.lex_errors += extraction.lex_errors;
        }

        for decl in extraction.declarations {
            report.declarations += 1;
            if !is_conventional(&file.relative, &decl.name, scanner.extension()) {
                tracing::trace!(
                    name = %decl.name,
                    file = %file.relative,
                    "declaration outside its conventional path"
                );
                report.unconventional += 1;
            }
            if let Some(previous) = map.insert(decl.name.as_str(), file.relative.as_str()) {
                if previous != file.relative {
                    tracing::debug!(
                        name = %decl.name,
                        previous = %previous,
                        file = %file.relative,
                        "duplicate declaration, keeping the later file"
                    );
                    report.overwritten += 1;
                }
            }
        }
    }

    tracing::info!(
        files = report.files_scanned,
        types = map.len(),
        "source scan complete"
    );
    (map, report)
}

/// Returns `true` if `relative` ends with the path derived from `type_name`
/// at a directory boundary.
fn is_conventional(relative: &str, type_name: &str, extension: &str) -> bool {
    let expected = file_name_for_type(type_name, extension);
    relative == expected
        || relative
            .strip_suffix(expected.as_str())
            .is_some_and(|prefix| prefix.ends_with('/'))
}
