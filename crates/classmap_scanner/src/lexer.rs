//! Lexical analyzer for PHP source text.
//!
//! Converts source text into a sequence of [`Token`]s. Text outside PHP tags
//! becomes [`PhpToken::InlineHtml`]; inside tags the lexer handles
//! case-insensitive keywords, variables, numbers, single/double/backtick
//! strings with escapes, heredoc and nowdoc bodies, and line (`//`, `#`) and
//! block comments. Whitespace and comments are skipped. Unterminated
//! constructs produce [`PhpToken::Error`] tokens instead of failing, since
//! the caller only needs to locate declarations.
//!
//! A word following `->`, `?->`, `::` or `function` is always lexed as an
//! [`PhpToken::Identifier`], so member names such as `Foo::class` or
//! `$node->interface` never look like keywords.

use crate::token::{lookup_keyword, PhpToken, Span, Token};

/// Lexes the given PHP source text into a vector of tokens.
///
/// The returned vector always ends with a [`PhpToken::Eof`] token.
pub fn lex(source: &str) -> Vec<Token> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
        in_php: false,
        member_name_next: false,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    in_php: bool,
    member_name_next: bool,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            if !self.in_php {
                let (html_end, tag) = self.find_open_tag(self.pos);
                if html_end > self.pos {
                    let start = self.pos;
                    self.pos = html_end;
                    tokens.push(self.token(PhpToken::InlineHtml, start));
                }
                match tag {
                    Some((len, kind)) => {
                        let start = self.pos;
                        self.pos += len;
                        self.in_php = true;
                        tokens.push(self.token(kind, start));
                    }
                    None => break,
                }
                continue;
            }

            if let Some(error) = self.skip_whitespace_and_comments() {
                tokens.push(error);
            }
            if self.pos >= self.source.len() {
                break;
            }
            let token = self.next_token();
            tokens.push(token);
        }
        tokens.push(Token {
            kind: PhpToken::Eof,
            span: Span::new(self.source.len() as u32, self.source.len() as u32),
        });
        tokens
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        let idx = self.pos + offset;
        if idx < self.source.len() {
            self.source[idx]
        } else {
            0
        }
    }

    fn token(&self, kind: PhpToken, start: usize) -> Token {
        Token {
            kind,
            span: Span::new(start as u32, self.pos as u32),
        }
    }

    /// Finds the next open tag at or after `from`.
    ///
    /// Returns the offset where inline text ends and, if a tag was found,
    /// its length (including one trailing newline or space) and kind.
    fn find_open_tag(&self, from: usize) -> (usize, Option<(usize, PhpToken)>) {
        let src = self.source;
        let mut i = from;
        while i + 1 < src.len() {
            if src[i] == b'<' && src[i + 1] == b'?' {
                let rest = &src[i + 2..];
                if rest.len() >= 3 && rest[..3].eq_ignore_ascii_case(b"php") {
                    let after = i + 5;
                    if after >= src.len() {
                        return (i, Some((5, PhpToken::OpenTag)));
                    }
                    if src[after].is_ascii_whitespace() {
                        return (i, Some((5 + newline_len(src, after), PhpToken::OpenTag)));
                    }
                } else if rest.first() == Some(&b'=') {
                    return (i, Some((3, PhpToken::OpenTagWithEcho)));
                } else if rest.first().is_some_and(|b| b.is_ascii_whitespace()) {
                    return (i, Some((2 + newline_len(src, i + 2), PhpToken::OpenTag)));
                }
            }
            i += 1;
        }
        (src.len(), None)
    }

    /// Skips whitespace and comments, returning an error token for an
    /// unterminated block comment.
    fn skip_whitespace_and_comments(&mut self) -> Option<Token> {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos >= self.source.len() {
                return None;
            }
            let b = self.peek();
            let line_comment = (b == b'/' && self.peek_at(1) == b'/')
                || (b == b'#' && self.peek_at(1) != b'[');
            if line_comment {
                // A line comment ends at the newline or just before `?>`.
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    if self.peek() == b'?' && self.peek_at(1) == b'>' {
                        break;
                    }
                    self.pos += 1;
                }
                continue;
            }
            if b == b'/' && self.peek_at(1) == b'*' {
                let start = self.pos;
                self.pos += 2;
                loop {
                    if self.pos >= self.source.len() {
                        return Some(self.token(PhpToken::Error, start));
                    }
                    if self.source[self.pos] == b'*' && self.peek_at(1) == b'/' {
                        self.pos += 2;
                        break;
                    }
                    self.pos += 1;
                }
                continue;
            }
            return None;
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let b = self.peek();

        if is_ident_start(b) {
            return self.lex_word(start);
        }

        let member_name_next = std::mem::take(&mut self.member_name_next);

        if b == b'$' && is_ident_start(self.peek_at(1)) {
            self.pos += 1;
            self.eat_ident_chars();
            return self.token(PhpToken::Variable, start);
        }

        if b.is_ascii_digit() || (b == b'.' && self.peek_at(1).is_ascii_digit()) {
            return self.lex_number(start);
        }

        match b {
            b'\'' | b'"' | b'`' => return self.lex_quoted(start, b),
            b'<' if self.peek_at(1) == b'<' && self.peek_at(2) == b'<' => {
                if let Some(token) = self.lex_heredoc(start) {
                    return token;
                }
            }
            _ => {}
        }

        self.lex_punctuation(start, member_name_next)
    }

    fn lex_word(&mut self, start: usize) -> Token {
        self.eat_ident_chars();
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or("");

        let kind = if std::mem::take(&mut self.member_name_next) {
            PhpToken::Identifier
        } else {
            lookup_keyword(text).unwrap_or(PhpToken::Identifier)
        };
        if kind == PhpToken::Function {
            self.member_name_next = true;
        }
        self.token(kind, start)
    }

    fn eat_ident_chars(&mut self) {
        while self.pos < self.source.len() && is_ident_char(self.source[self.pos]) {
            self.pos += 1;
        }
    }

    fn lex_number(&mut self, start: usize) -> Token {
        while self.pos < self.source.len() {
            let ch = self.source[self.pos];
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.pos += 1;
            } else if ch == b'.' && self.peek_at(1).is_ascii_digit() {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.token(PhpToken::Number, start)
    }

    /// Lexes a single-quoted, double-quoted or backtick string.
    ///
    /// PHP strings may span lines; only end of input terminates them early.
    fn lex_quoted(&mut self, start: usize, quote: u8) -> Token {
        self.pos += 1; // skip opening quote
        loop {
            if self.pos >= self.source.len() {
                return self.token(PhpToken::Error, start);
            }
            let ch = self.source[self.pos];
            if ch == b'\\' {
                self.pos = (self.pos + 2).min(self.source.len());
                continue;
            }
            self.pos += 1;
            if ch == quote {
                return self.token(PhpToken::StringLiteral, start);
            }
        }
    }

    /// Lexes a heredoc (`<<<ID`, `<<<"ID"`) or nowdoc (`<<<'ID'`) body.
    ///
    /// Returns `None` without consuming anything when the text after `<<<`
    /// is not a valid heredoc header.
    fn lex_heredoc(&mut self, start: usize) -> Option<Token> {
        let src = self.source;
        let mut p = start + 3;
        while p < src.len() && (src[p] == b' ' || src[p] == b'\t') {
            p += 1;
        }
        let quote = match src.get(p) {
            Some(&q) if q == b'\'' || q == b'"' => {
                p += 1;
                Some(q)
            }
            _ => None,
        };
        if !src.get(p).copied().is_some_and(is_ident_start) {
            return None;
        }
        let label_start = p;
        while p < src.len() && is_ident_char(src[p]) {
            p += 1;
        }
        let label = &src[label_start..p];
        if let Some(q) = quote {
            if src.get(p) != Some(&q) {
                return None;
            }
            p += 1;
        }
        let header_newline = newline_len(src, p);
        if header_newline == 0 {
            return None;
        }

        let mut line_start = p + header_newline;
        loop {
            let mut k = line_start;
            while k < src.len() && (src[k] == b' ' || src[k] == b'\t') {
                k += 1;
            }
            let end = k + label.len();
            if src.get(k..end) == Some(label) && !src.get(end).copied().is_some_and(is_ident_char)
            {
                self.pos = end;
                return Some(self.token(PhpToken::Heredoc, start));
            }
            match src[line_start.min(src.len())..].iter().position(|&b| b == b'\n') {
                Some(offset) => line_start += offset + 1,
                None => {
                    self.pos = src.len();
                    return Some(self.token(PhpToken::Error, start));
                }
            }
        }
    }

    fn lex_punctuation(&mut self, start: usize, member_name_next: bool) -> Token {
        let b = self.peek();
        let next = self.peek_at(1);
        let (kind, len) = match b {
            b'?' if next == b'>' => (PhpToken::CloseTag, 2),
            b'?' if next == b'-' && self.peek_at(2) == b'>' => (PhpToken::NullsafeArrow, 3),
            b'-' if next == b'>' => (PhpToken::Arrow, 2),
            b':' if next == b':' => (PhpToken::DoubleColon, 2),
            b'#' if next == b'[' => (PhpToken::AttributeStart, 2),
            b'\\' => (PhpToken::Backslash, 1),
            b'(' => (PhpToken::LeftParen, 1),
            b')' => (PhpToken::RightParen, 1),
            b'{' => (PhpToken::LeftBrace, 1),
            b'}' => (PhpToken::RightBrace, 1),
            b'[' => (PhpToken::LeftBracket, 1),
            b']' => (PhpToken::RightBracket, 1),
            b';' => (PhpToken::Semicolon, 1),
            b',' => (PhpToken::Comma, 1),
            _ => (PhpToken::Operator, 1),
        };
        self.pos += len;

        match kind {
            PhpToken::CloseTag => {
                self.pos += newline_len(self.source, self.pos);
                self.in_php = false;
            }
            PhpToken::Arrow | PhpToken::NullsafeArrow | PhpToken::DoubleColon => {
                self.member_name_next = true;
            }
            // `function &name()` keeps the name context across the `&`.
            PhpToken::Operator if b == b'&' => {
                self.member_name_next = member_name_next;
            }
            _ => {}
        }
        self.token(kind, start)
    }
}

/// Returns the length of a newline (`\n` or `\r\n`) at `pos`, or a single
/// space or tab, or 0.
fn newline_len(src: &[u8], pos: usize) -> usize {
    match src.get(pos) {
        Some(b'\n') | Some(b' ') | Some(b'\t') => 1,
        Some(b'\r') if src.get(pos + 1) == Some(&b'\n') => 2,
        Some(b'\r') => 1,
        _ => 0,
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_char(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<PhpToken> {
        lex(source).iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<&str> {
        lex(source).iter().map(|t| t.span.text(source)).collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(kinds(""), vec![PhpToken::Eof]);
    }

    #[test]
    fn inline_html_only() {
        assert_eq!(
            kinds("<html>class Foo {}</html>"),
            vec![PhpToken::InlineHtml, PhpToken::Eof]
        );
    }

    #[test]
    fn open_tag_then_class() {
        assert_eq!(
            kinds("<?php\nclass Foo {}"),
            vec![
                PhpToken::OpenTag,
                PhpToken::Class,
                PhpToken::Identifier,
                PhpToken::LeftBrace,
                PhpToken::RightBrace,
                PhpToken::Eof,
            ]
        );
    }

    #[test]
    fn open_tag_case_insensitive_and_at_eof() {
        assert_eq!(kinds("<?PHP"), vec![PhpToken::OpenTag, PhpToken::Eof]);
    }

    #[test]
    fn echo_and_short_tags() {
        assert_eq!(
            kinds("<p><?= $title ?></p>"),
            vec![
                PhpToken::InlineHtml,
                PhpToken::OpenTagWithEcho,
                PhpToken::Variable,
                PhpToken::CloseTag,
                PhpToken::InlineHtml,
                PhpToken::Eof,
            ]
        );
        assert_eq!(
            kinds("<? echo 1;"),
            vec![
                PhpToken::OpenTag,
                PhpToken::Keyword,
                PhpToken::Number,
                PhpToken::Semicolon,
                PhpToken::Eof,
            ]
        );
    }

    #[test]
    fn xml_declaration_is_not_a_tag() {
        assert_eq!(
            kinds("<?xml version=\"1.0\"?><root/>"),
            vec![PhpToken::InlineHtml, PhpToken::Eof]
        );
    }

    #[test]
    fn keywords_case_insensitive() {
        assert_eq!(
            kinds("<?php CLASS Interface trait"),
            vec![
                PhpToken::OpenTag,
                PhpToken::Class,
                PhpToken::Interface,
                PhpToken::Trait,
                PhpToken::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        let source = "<?php\n// class A\n# class B\n/* class C */\n/** class D */\nclass E {}";
        assert_eq!(
            texts(source),
            vec!["<?php\n", "class", "E", "{", "}", ""]
        );
    }

    #[test]
    fn hash_bracket_is_attribute() {
        assert_eq!(
            kinds("<?php #[Entity] class A {}")[1],
            PhpToken::AttributeStart
        );
    }

    #[test]
    fn line_comment_stops_before_close_tag() {
        assert_eq!(
            kinds("<?php // note ?>class Foo"),
            vec![
                PhpToken::OpenTag,
                PhpToken::CloseTag,
                PhpToken::InlineHtml,
                PhpToken::Eof,
            ]
        );
    }

    #[test]
    fn strings_hide_keywords() {
        let source = r#"<?php $a = 'class A'; $b = "class \"B\""; $c = `class C`;"#;
        let k = kinds(source);
        assert!(!k.contains(&PhpToken::Class));
        assert_eq!(
            k.iter().filter(|&&t| t == PhpToken::StringLiteral).count(),
            3
        );
    }

    #[test]
    fn escaped_quote_in_single_quoted_string() {
        let source = r"<?php 'it\'s' x";
        assert_eq!(texts(source)[1], r"'it\'s'");
        assert_eq!(kinds(source)[2], PhpToken::Identifier);
    }

    #[test]
    fn heredoc_and_nowdoc() {
        let source =
            "<?php\n$a = <<<EOT\nclass A {}\nEOT;\n$b = <<<'RAW'\ninterface B {}\n  RAW;\nclass C {}";
        let tokens = lex(source);
        let k: Vec<PhpToken> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(k.iter().filter(|&&t| t == PhpToken::Heredoc).count(), 2);
        assert_eq!(k.iter().filter(|&&t| t == PhpToken::Class).count(), 1);
        assert!(!k.contains(&PhpToken::Interface));
    }

    #[test]
    fn heredoc_label_prefix_does_not_close() {
        let source = "<?php <<<EOT\nEOTX\nEOT;\n";
        let tokens = lex(source);
        assert_eq!(tokens[1].kind, PhpToken::Heredoc);
        assert_eq!(tokens[1].span.text(source), "<<<EOT\nEOTX\nEOT");
    }

    #[test]
    fn shift_operator_is_not_heredoc() {
        assert_eq!(
            kinds("<?php 1 <<< 2;"),
            vec![
                PhpToken::OpenTag,
                PhpToken::Number,
                PhpToken::Operator,
                PhpToken::Operator,
                PhpToken::Operator,
                PhpToken::Number,
                PhpToken::Semicolon,
                PhpToken::Eof,
            ]
        );
    }

    #[test]
    fn member_names_are_identifiers() {
        let k = kinds("<?php Foo::class; $x->interface; $y?->trait; function new() {}");
        assert!(!k.contains(&PhpToken::Class));
        assert!(!k.contains(&PhpToken::Interface));
        assert!(!k.contains(&PhpToken::Trait));
        assert!(!k.contains(&PhpToken::New));
        assert!(k.contains(&PhpToken::DoubleColon));
        assert!(k.contains(&PhpToken::Arrow));
        assert!(k.contains(&PhpToken::NullsafeArrow));
    }

    #[test]
    fn function_by_reference_name_is_identifier() {
        let k = kinds("<?php function &class() {}");
        assert_eq!(k[1], PhpToken::Function);
        assert_eq!(k[2], PhpToken::Operator);
        assert_eq!(k[3], PhpToken::Identifier);
    }

    #[test]
    fn variables_and_numbers() {
        assert_eq!(
            kinds("<?php $class = 0x1F + 1.5e3 + .5;"),
            vec![
                PhpToken::OpenTag,
                PhpToken::Variable,
                PhpToken::Operator,
                PhpToken::Number,
                PhpToken::Operator,
                PhpToken::Number,
                PhpToken::Operator,
                PhpToken::Number,
                PhpToken::Semicolon,
                PhpToken::Eof,
            ]
        );
    }

    #[test]
    fn namespace_separator() {
        assert_eq!(
            texts("<?php new \\Foo\\Bar;"),
            vec!["<?php ", "new", "\\", "Foo", "\\", "Bar", ";", ""]
        );
    }

    #[test]
    fn close_tag_swallows_one_newline() {
        let source = "<?php ?>\nclass X";
        let tokens = lex(source);
        assert_eq!(tokens[1].kind, PhpToken::CloseTag);
        assert_eq!(tokens[2].kind, PhpToken::InlineHtml);
        assert_eq!(tokens[2].span.text(source), "class X");
    }

    #[test]
    fn unterminated_string_error() {
        let k = kinds("<?php 'never closed");
        assert!(k.contains(&PhpToken::Error));
        assert_eq!(*k.last().unwrap(), PhpToken::Eof);
    }

    #[test]
    fn unterminated_block_comment_error() {
        let k = kinds("<?php /* unterminated");
        assert_eq!(k, vec![PhpToken::OpenTag, PhpToken::Error, PhpToken::Eof]);
    }

    #[test]
    fn unterminated_heredoc_error() {
        let k = kinds("<?php <<<EOT\nclass A {}\n");
        assert!(k.contains(&PhpToken::Error));
        assert!(!k.contains(&PhpToken::Class));
    }

    #[test]
    fn utf8_identifiers_keep_boundaries() {
        let source = "<?php class Größe {}";
        assert_eq!(texts(source)[2], "Größe");
    }

    #[test]
    fn spans_are_correct() {
        let tokens = lex("<?php class Foo");
        assert_eq!(tokens[1].span, Span::new(6, 11));
        assert_eq!(tokens[2].span, Span::new(12, 15));
    }
}
