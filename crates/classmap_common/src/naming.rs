//! Canonical type-name to relative-path derivation.
//!
//! A type name is split on its segment delimiters; every segment has its
//! first character upper-cased and the segments become directory components,
//! with the final segment as the file stem. `Mage_Core_Model_App` becomes
//! `Mage/Core/Model/App.php`.
//!
//! The scanner uses this to flag declarations that live outside their
//! conventional location and the runtime resolver uses it to derive fallback
//! search targets. Both sides must go through this one function.

/// Characters that separate the segments of a type name.
pub const NAME_DELIMITERS: [char; 2] = ['_', '\\'];

/// Derives the conventional relative file name for a type.
///
/// Segments are joined with `/` regardless of platform. Only the first
/// character of each segment is changed (ASCII upper-casing); the remainder
/// keeps its casing.
/// Empty segments (from doubled delimiters) are preserved as empty path
/// components. `extension` is appended without its leading dot.
pub fn file_name_for_type(type_name: &str, extension: &str) -> String {
    let mut out = String::with_capacity(type_name.len() + extension.len() + 1);
    for (i, segment) in type_name.split(NAME_DELIMITERS).enumerate() {
        if i > 0 {
            out.push('/');
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    if !extension.is_empty() {
        out.push('.');
        out.push_str(extension.trim_start_matches('.'));
    }
    out
}
