//! The lexer.
//!
//! `Lexer` is a lazy iterator over the tokens of one source text. It yields
//! `Ok(token)` for each token, ending with a single `EndOfFileToken`, or
//! stops after the first `Err`. Trivia (whitespace, `//` and `/* */`
//! comments, a leading `#!` line) is skipped; line breaks inside trivia are
//! recorded on the following token.

use std::iter::FusedIterator;

use tsyn_ast::syntax_kind::SyntaxKind;
use tsyn_ast::types::{KeywordSet, TokenFlags};
use tsyn_core::text::{find_line_break, Position};

use crate::char_codes::*;
use crate::error::{LexError, LexErrorKind};
use crate::token::Token;

/// Start lexing `source` with the default keyword set.
pub fn tokenize(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}

pub struct Lexer<'src> {
    source: &'src str,
    /// Byte offset of the next unread character.
    pos: usize,
    /// 1-based line of `col_pos`.
    line: u32,
    /// 1-based column of `col_pos`.
    column: u32,
    /// The offset the line/column counters were last synced to.
    col_pos: usize,
    keywords: KeywordSet,
    done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_keywords(source, KeywordSet::default())
    }

    /// Lex with a custom reserved-word set. Words left out of `keywords`
    /// come back as identifiers.
    pub fn with_keywords(source: &'src str, keywords: KeywordSet) -> Self {
        let mut lexer = Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            col_pos: 0,
            keywords,
            done: false,
        };
        lexer.skip_shebang();
        lexer
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    fn skip_shebang(&mut self) {
        if self.source.starts_with("#!") {
            self.pos = find_line_break(self.bytes()).map_or(self.source.len(), |(at, _)| at);
        }
    }

    // ========================================================================
    // Cursor helpers
    // ========================================================================

    #[inline]
    fn bytes(&self) -> &'src [u8] {
        self.source.as_bytes()
    }

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes().get(self.pos + offset).copied()
    }

    #[inline]
    fn new_line(&mut self, line_start: usize) {
        self.line += 1;
        self.column = 1;
        self.col_pos = line_start;
    }

    /// Line and column of `offset`, which must not precede the last
    /// synced offset.
    fn position_at(&mut self, offset: usize) -> Position {
        self.column += self.source[self.col_pos..offset].chars().count() as u32;
        self.col_pos = offset;
        Position::new(offset as u32, self.line, self.column)
    }

    /// Count line breaks in `from..to` without moving `pos`.
    fn mark_line_breaks(&mut self, from: usize, to: usize) -> bool {
        let bytes = &self.bytes()[..to];
        let mut found = false;
        let mut i = from;
        while let Some((at, width)) = find_line_break(&bytes[i..]) {
            i += at + width;
            self.new_line(i);
            found = true;
        }
        found
    }

    /// Skip whitespace and comments. Returns whether a line break was seen.
    fn skip_trivia(&mut self) -> bool {
        let mut line_break = false;
        while let Some(ch) = self.current_char() {
            match ch {
                '\r' => {
                    self.pos += 1;
                    if self.byte_at(0) == Some(b'\n') {
                        self.pos += 1;
                    }
                    self.new_line(self.pos);
                    line_break = true;
                }
                '\n' | '\u{2028}' | '\u{2029}' => {
                    self.pos += ch.len_utf8();
                    self.new_line(self.pos);
                    line_break = true;
                }
                '/' if self.byte_at(1) == Some(b'/') => {
                    let rest = &self.bytes()[self.pos..];
                    self.pos += find_line_break(rest).map_or(rest.len(), |(at, _)| at);
                }
                '/' if self.byte_at(1) == Some(b'*') => {
                    let body = self.pos + 2;
                    // An unclosed block comment runs to end of input.
                    let end = memchr::memmem::find(&self.bytes()[body..], b"*/")
                        .map_or(self.source.len(), |i| body + i + 2);
                    line_break |= self.mark_line_breaks(body, end);
                    self.pos = end;
                }
                c if is_white_space_single_line(c) => self.pos += c.len_utf8(),
                _ => break,
            }
        }
        line_break
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Scan the next token.
    pub fn scan(&mut self) -> Result<Token, LexError> {
        let line_break = self.skip_trivia();
        let start = self.pos;
        let position = self.position_at(start);
        let mut flags = if line_break {
            TokenFlags::PRECEDING_LINE_BREAK
        } else {
            TokenFlags::NONE
        };

        let Some(ch) = self.current_char() else {
            return Ok(Token {
                kind: SyntaxKind::EndOfFileToken,
                text: String::new(),
                position,
                end: start as u32,
                flags,
            });
        };

        let kind = match ch {
            '{' => self.single(SyntaxKind::OpenBraceToken),
            '}' => self.single(SyntaxKind::CloseBraceToken),
            '(' => self.single(SyntaxKind::OpenParenToken),
            ')' => self.single(SyntaxKind::CloseParenToken),
            '[' => self.single(SyntaxKind::OpenBracketToken),
            ']' => self.single(SyntaxKind::CloseBracketToken),
            ';' => self.single(SyntaxKind::SemicolonToken),
            ',' => self.single(SyntaxKind::CommaToken),
            ':' => self.single(SyntaxKind::ColonToken),
            '~' => self.single(SyntaxKind::TildeToken),
            '^' => self.single(SyntaxKind::CaretToken),
            '%' => self.single(SyntaxKind::PercentToken),
            // Always a lone `>` so that `A<B<C>>` closes twice; the parser
            // joins `>` `=` into `>=` in expressions.
            '>' => self.single(SyntaxKind::GreaterThanToken),

            '.' => self.scan_dot(),
            '?' => self.scan_question(),
            '<' => self.munch(&[("<=", SyntaxKind::LessThanEqualsToken)], SyntaxKind::LessThanToken),
            '=' => self.scan_equals(),
            '!' => self.munch(
                &[
                    ("!==", SyntaxKind::ExclamationEqualsEqualsToken),
                    ("!=", SyntaxKind::ExclamationEqualsToken),
                ],
                SyntaxKind::ExclamationToken,
            ),
            '+' => self.munch(&[("+=", SyntaxKind::PlusEqualsToken)], SyntaxKind::PlusToken),
            '-' => self.munch(&[("-=", SyntaxKind::MinusEqualsToken)], SyntaxKind::MinusToken),
            '*' => self.munch(&[("*=", SyntaxKind::AsteriskEqualsToken)], SyntaxKind::AsteriskToken),
            '/' => self.munch(&[("/=", SyntaxKind::SlashEqualsToken)], SyntaxKind::SlashToken),
            '&' => self.munch(&[("&&", SyntaxKind::AmpersandAmpersandToken)], SyntaxKind::AmpersandToken),
            '|' => self.munch(&[("||", SyntaxKind::BarBarToken)], SyntaxKind::BarToken),

            '"' | '\'' => {
                if self.scan_string_literal(ch, position)? {
                    flags |= TokenFlags::CONTAINS_ESCAPE;
                }
                SyntaxKind::StringLiteral
            }
            c if is_digit(c) => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(start),
            other => {
                return Err(LexError::new(LexErrorKind::UnexpectedChar(other), position));
            }
        };

        Ok(Token {
            kind,
            text: self.source[start..self.pos].to_string(),
            position,
            end: self.pos as u32,
            flags,
        })
    }

    #[inline]
    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    /// Take the longest of `longer` that matches here, or a one-byte
    /// `single`. `longer` must be ordered longest first.
    fn munch(&mut self, longer: &[(&str, SyntaxKind)], single: SyntaxKind) -> SyntaxKind {
        let rest = &self.source[self.pos..];
        for &(text, kind) in longer {
            if rest.starts_with(text) {
                self.pos += text.len();
                return kind;
            }
        }
        self.single(single)
    }

    fn scan_dot(&mut self) -> SyntaxKind {
        if self.byte_at(1).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
            self.skip_digits();
            return SyntaxKind::NumericLiteral;
        }
        self.munch(&[("...", SyntaxKind::DotDotDotToken)], SyntaxKind::DotToken)
    }

    fn scan_question(&mut self) -> SyntaxKind {
        // `a?.5:b` is a conditional, not an optional chain.
        if self.byte_at(1) == Some(b'.') && !self.byte_at(2).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 2;
            return SyntaxKind::QuestionDotToken;
        }
        self.munch(&[("??", SyntaxKind::QuestionQuestionToken)], SyntaxKind::QuestionToken)
    }

    fn scan_equals(&mut self) -> SyntaxKind {
        self.munch(
            &[
                ("===", SyntaxKind::EqualsEqualsEqualsToken),
                ("==", SyntaxKind::EqualsEqualsToken),
                ("=>", SyntaxKind::EqualsGreaterThanToken),
            ],
            SyntaxKind::EqualsToken,
        )
    }

    fn skip_digits(&mut self) {
        while self.byte_at(0).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    /// Digits with at most one decimal point. A sign is never part of the
    /// literal.
    fn scan_number(&mut self) -> SyntaxKind {
        self.skip_digits();
        if self.byte_at(0) == Some(b'.') && self.byte_at(1).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
            self.skip_digits();
        }
        SyntaxKind::NumericLiteral
    }

    /// Scan a quoted string. Returns whether it contained an escape.
    fn scan_string_literal(&mut self, quote: char, start: Position) -> Result<bool, LexError> {
        let unterminated = || LexError::new(LexErrorKind::UnterminatedString, start);
        self.pos += 1;
        let mut escaped = false;
        loop {
            let ch = self.current_char().ok_or_else(unterminated)?;
            match ch {
                c if c == quote => {
                    self.pos += 1;
                    return Ok(escaped);
                }
                '\\' => {
                    escaped = true;
                    self.pos += 1;
                    match self.current_char().ok_or_else(unterminated)? {
                        '\r' => {
                            self.pos += 1;
                            if self.byte_at(0) == Some(b'\n') {
                                self.pos += 1;
                            }
                            self.new_line(self.pos);
                        }
                        c @ ('\n' | '\u{2028}' | '\u{2029}') => {
                            self.pos += c.len_utf8();
                            self.new_line(self.pos);
                        }
                        c => self.pos += c.len_utf8(),
                    }
                }
                '\n' | '\r' => return Err(unterminated()),
                c => self.pos += c.len_utf8(),
            }
        }
    }

    fn scan_identifier(&mut self, start: usize) -> SyntaxKind {
        while let Some(ch) = self.current_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        self.keywords
            .lookup(&self.source[start..self.pos])
            .unwrap_or(SyntaxKind::Identifier)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.scan();
        self.done = match &result {
            Ok(token) => token.kind == SyntaxKind::EndOfFileToken,
            Err(_) => true,
        };
        Some(result)
    }
}

impl FusedIterator for Lexer<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_simple_tokens() {
        let mut lexer = Lexer::new("( ) { } [ ] ; , :");
        assert_eq!(Lexer::scan(&mut lexer).unwrap().kind, SyntaxKind::OpenParenToken);
        assert_eq!(Lexer::scan(&mut lexer).unwrap().kind, SyntaxKind::CloseParenToken);
        assert_eq!(Lexer::scan(&mut lexer).unwrap().kind, SyntaxKind::OpenBraceToken);
        assert_eq!(Lexer::scan(&mut lexer).unwrap().kind, SyntaxKind::CloseBraceToken);
        assert_eq!(Lexer::scan(&mut lexer).unwrap().kind, SyntaxKind::OpenBracketToken);
        assert_eq!(Lexer::scan(&mut lexer).unwrap().kind, SyntaxKind::CloseBracketToken);
        assert_eq!(Lexer::scan(&mut lexer).unwrap().kind, SyntaxKind::SemicolonToken);
        assert_eq!(Lexer::scan(&mut lexer).unwrap().kind, SyntaxKind::CommaToken);
        assert_eq!(Lexer::scan(&mut lexer).unwrap().kind, SyntaxKind::ColonToken);
        assert_eq!(Lexer::scan(&mut lexer).unwrap().kind, SyntaxKind::EndOfFileToken);
    }

    #[test]
    fn test_scan_string() {
        let mut lexer = Lexer::new(r#""hello \"world\"""#);
        let token = Lexer::scan(&mut lexer).unwrap();
        assert_eq!(token.kind, SyntaxKind::StringLiteral);
        assert_eq!(token.text, r#""hello \"world\"""#);
        assert_eq!(token.string_value().as_deref(), Some("hello \"world\""));
    }

    #[test]
    fn test_scan_number() {
        let mut lexer = Lexer::new("42 3.14 .5 1.");
        assert_eq!(Lexer::scan(&mut lexer).unwrap().text, "42");
        assert_eq!(Lexer::scan(&mut lexer).unwrap().text, "3.14");
        assert_eq!(Lexer::scan(&mut lexer).unwrap().text, ".5");
        let one = Lexer::scan(&mut lexer).unwrap();
        assert_eq!((one.kind, one.text.as_str()), (SyntaxKind::NumericLiteral, "1"));
        assert_eq!(Lexer::scan(&mut lexer).unwrap().kind, SyntaxKind::DotToken);
    }

    #[test]
    fn test_scan_keywords() {
        let mut lexer = Lexer::new("const let function interface");
        assert_eq!(Lexer::scan(&mut lexer).unwrap().kind, SyntaxKind::ConstKeyword);
        assert_eq!(Lexer::scan(&mut lexer).unwrap().kind, SyntaxKind::Identifier);
        assert_eq!(Lexer::scan(&mut lexer).unwrap().kind, SyntaxKind::FunctionKeyword);
        assert_eq!(Lexer::scan(&mut lexer).unwrap().kind, SyntaxKind::InterfaceKeyword);
    }

    #[test]
    fn test_line_break_flag() {
        let mut lexer = Lexer::new("a\nb /* x\n */ c d");
        assert!(!Lexer::scan(&mut lexer).unwrap().has_preceding_line_break());
        assert!(Lexer::scan(&mut lexer).unwrap().has_preceding_line_break());
        let c = Lexer::scan(&mut lexer).unwrap();
        assert!(c.has_preceding_line_break());
        assert_eq!(c.position, Position::new(13, 3, 5));
        assert!(!Lexer::scan(&mut lexer).unwrap().has_preceding_line_break());
    }

    #[test]
    fn test_iterator_fuses_after_error() {
        let mut lexer = tokenize("a @ b");
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
    }
}
