//! Type declaration extraction from a token stream.
//!
//! Scans for `class`, `interface` and `trait` keywords and captures the next
//! identifier token as the declared name. Tokens between the keyword and the
//! name are skipped; a keyword with no identifier before end of input is
//! ignored. Scanning resumes after each captured name, so one file may
//! declare several types. `new class` (an anonymous class) declares nothing.

use crate::lexer::lex;
use crate::token::{PhpToken, Span, Token};

/// The kind of type a declaration introduces.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DeclarationKind {
    /// `class Name`
    Class,
    /// `interface Name`
    Interface,
    /// `trait Name`
    Trait,
}

/// A type declaration found in a source text.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Declaration {
    /// The declared type name.
    pub name: String,
    /// Which keyword introduced it.
    pub kind: DeclarationKind,
    /// Span of the name token.
    pub span: Span,
}

/// Result of extracting declarations from one source text.
#[derive(Clone, Debug, Default)]
pub struct Extraction {
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
    /// Number of [`PhpToken::Error`] tokens the lexer produced.
    pub lex_errors: usize,
}

/// Lexes `source` and extracts every named type declaration.
pub fn extract_declarations(source: &str) -> Extraction {
    let tokens = lex(source);
    Extraction {
        declarations: declarations_in(source, &tokens),
        lex_errors: tokens.iter().filter(|t| t.kind == PhpToken::Error).count(),
    }
}

/// Extracts declarations from an already-lexed token stream.
pub fn declarations_in(source: &str, tokens: &[Token]) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        if !token.kind.is_type_declaration() || is_anonymous_class(source, tokens, i) {
            i += 1;
            continue;
        }
        let kind = match token.kind {
            PhpToken::Class => DeclarationKind::Class,
            PhpToken::Interface => DeclarationKind::Interface,
            _ => DeclarationKind::Trait,
        };

        let name = tokens[i + 1..]
            .iter()
            .position(|t| t.kind == PhpToken::Identifier)
            .map(|offset| i + 1 + offset);
        match name {
            Some(j) => {
                declarations.push(Declaration {
                    name: tokens[j].span.text(source).to_string(),
                    kind,
                    span: tokens[j].span,
                });
                i = j + 1;
            }
            None => break,
        }
    }
    declarations
}

/// Returns `true` if the `class` keyword at `at` follows `new`, allowing
/// modifiers and attribute groups in between (`new readonly class`,
/// `new #[Attr] class`).
fn is_anonymous_class(source: &str, tokens: &[Token], at: usize) -> bool {
    if tokens[at].kind != PhpToken::Class {
        return false;
    }
    let mut j = at;
    while j > 0 {
        j -= 1;
        let token = tokens[j];
        match token.kind {
            PhpToken::New => return true,
            PhpToken::Final | PhpToken::Abstract => {}
            PhpToken::Keyword if token.span.text(source).eq_ignore_ascii_case("readonly") => {}
            PhpToken::RightBracket => match attribute_start(tokens, j) {
                Some(start) => j = start,
                None => return false,
            },
            _ => return false,
        }
    }
    false
}

/// Finds the `#[` opening the attribute group that closes at `close`.
fn attribute_start(tokens: &[Token], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for j in (0..=close).rev() {
        match tokens[j].kind {
            PhpToken::RightBracket => depth += 1,
            PhpToken::LeftBracket | PhpToken::AttributeStart => {
                depth -= 1;
                if depth == 0 {
                    return (tokens[j].kind == PhpToken::AttributeStart).then_some(j);
                }
            }
            _ => {}
        }
    }
    None
}
