//! Token types for the PHP source lexer.
//!
//! Defines the [`PhpToken`] enum covering the keywords the class extractor
//! cares about, names, literals, open/close tags and punctuation, plus the
//! [`Token`] struct pairing a token kind with its byte [`Span`].

/// A byte offset range within one source text. `start` is inclusive and
/// `end` is exclusive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Span {
    /// Byte offset of the start of the span (inclusive).
    pub start: u32,
    /// Byte offset of the end of the span (exclusive).
    pub end: u32,
}

impl Span {
    /// Creates a new span covering `start..end`.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` if this span has zero length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the slice of `source` this span covers.
    ///
    /// Returns an empty string if the span does not fall on character
    /// boundaries of `source`.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source
            .get(self.start as usize..self.end as usize)
            .unwrap_or("")
    }
}

/// A PHP token kind.
///
/// Keywords are case-insensitive in PHP. Literal values are not stored in
/// the token; they are retrieved from the source text using the span.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PhpToken {
    // === Declaration and structure keywords ===
    /// `abstract`
    Abstract,
    /// `class`
    Class,
    /// `extends`
    Extends,
    /// `final`
    Final,
    /// `function`
    Function,
    /// `implements`
    Implements,
    /// `interface`
    Interface,
    /// `namespace`
    Namespace,
    /// `new`
    New,
    /// `trait`
    Trait,
    /// `use`
    Use,
    /// Any other reserved word (`if`, `return`, `echo`, ...).
    Keyword,

    // === Names ===
    /// A bare name: type, function, constant, label or member name.
    Identifier,
    /// A variable such as `$app`.
    Variable,

    // === Literals ===
    /// Integer or floating point literal.
    Number,
    /// Single-quoted, double-quoted or backtick string.
    StringLiteral,
    /// Heredoc or nowdoc body including its delimiters.
    Heredoc,

    // === Tags ===
    /// Text outside PHP tags.
    InlineHtml,
    /// `<?php` or a short `<?` open tag.
    OpenTag,
    /// `<?=`
    OpenTagWithEcho,
    /// `?>`
    CloseTag,

    // === Punctuation ===
    /// `\` namespace separator
    Backslash,
    /// `::`
    DoubleColon,
    /// `->`
    Arrow,
    /// `?->`
    NullsafeArrow,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `#[` attribute opener
    AttributeStart,
    /// Any other operator character.
    Operator,

    // === Special ===
    /// A lexical error such as an unterminated string or comment.
    Error,
    /// End of input.
    Eof,
}

impl PhpToken {
    /// Returns `true` for keywords that introduce a named type declaration.
    pub fn is_type_declaration(self) -> bool {
        matches!(self, PhpToken::Class | PhpToken::Interface | PhpToken::Trait)
    }
}

/// A lexed token with its kind and source location.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Token {
    /// The kind of this token.
    pub kind: PhpToken,
    /// The source span covering this token's text.
    pub span: Span,
}

/// Looks up a keyword from an identifier string.
///
/// Returns `Some(PhpToken)` if the string is a PHP reserved word, or `None`
/// if it is a regular identifier. Matching ignores ASCII case.
pub fn lookup_keyword(s: &str) -> Option<PhpToken> {
    if s.len() > 15 {
        return None;
    }
    let lower = s.to_ascii_lowercase();
    let kind = match lower.as_str() {
        "abstract" => PhpToken::Abstract,
        "class" => PhpToken::Class,
        "extends" => PhpToken::Extends,
        "final" => PhpToken::Final,
        "function" => PhpToken::Function,
        "implements" => PhpToken::Implements,
        "interface" => PhpToken::Interface,
        "namespace" => PhpToken::Namespace,
        "new" => PhpToken::New,
        "trait" => PhpToken::Trait,
        "use" => PhpToken::Use,
        "__halt_compiler" | "and" | "array" | "as" | "break" | "callable" | "case" | "catch"
        | "clone" | "const" | "continue" | "declare" | "default" | "die" | "do" | "echo"
        | "else" | "elseif" | "empty" | "enddeclare" | "endfor" | "endforeach" | "endif"
        | "endswitch" | "endwhile" | "eval" | "exit" | "fn" | "for" | "foreach" | "global"
        | "goto" | "if" | "include" | "include_once" | "instanceof" | "insteadof" | "isset"
        | "list" | "match" | "or" | "print" | "private" | "protected" | "public"
        | "readonly" | "require" | "require_once" | "return" | "static" | "switch"
        | "throw" | "try" | "unset" | "var" | "while" | "xor" | "yield" => PhpToken::Keyword,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_ignore_case() {
        assert_eq!(lookup_keyword("class"), Some(PhpToken::Class));
        assert_eq!(lookup_keyword("CLASS"), Some(PhpToken::Class));
        assert_eq!(lookup_keyword("Interface"), Some(PhpToken::Interface));
        assert_eq!(lookup_keyword("return"), Some(PhpToken::Keyword));
    }

    #[test]
    fn names_are_not_keywords() {
        assert_eq!(lookup_keyword("Mage_Core_Model_App"), None);
        assert_eq!(lookup_keyword("classes"), None);
        assert_eq!(lookup_keyword("a_very_long_identifier_name"), None);
    }

    #[test]
    fn declaration_keywords() {
        assert!(PhpToken::Class.is_type_declaration());
        assert!(PhpToken::Interface.is_type_declaration());
        assert!(PhpToken::Trait.is_type_declaration());
        assert!(!PhpToken::Function.is_type_declaration());
        assert!(!PhpToken::Identifier.is_type_declaration());
    }

    #[test]
    fn span_text() {
        let source = "class Foo {}";
        let span = Span::new(6, 9);
        assert_eq!(span.text(source), "Foo");
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());
        assert_eq!(Span::new(0, 99).text(source), "");
    }
}
