//! Offline source scanning and type declaration extraction.
//!
//! The [`Scanner`] enumerates source files under a base directory, the
//! [`lexer`] tokenizes each file, and the [`extract`] pass picks out declared
//! type names. [`build_class_map`] ties them together into a
//! [`ClassMap`](classmap_common::ClassMap) ready for serialization.

#![warn(missing_docs)]

pub mod collect;
pub mod extract;
pub mod lexer;
pub mod scanner;
pub mod token;

pub use collect::{build_class_map, ScanReport};
pub use extract::{extract_declarations, Declaration, DeclarationKind, Extraction};
pub use lexer::lex;
pub use scanner::{relative_path, ScannedFile, Scanner};
pub use token::{PhpToken, Span, Token};
