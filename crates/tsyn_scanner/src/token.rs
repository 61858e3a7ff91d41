//! Tokens produced by the lexer.

use serde::Serialize;
use tsyn_ast::syntax_kind::{SyntaxKind, TokenClass};
use tsyn_ast::types::TokenFlags;
use tsyn_core::text::{Position, TextPos, TextRange};

/// A lexed token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: SyntaxKind,
    /// The raw lexeme, quotes included for strings.
    pub text: String,
    /// Where the lexeme starts.
    pub position: Position,
    /// Byte offset just past the lexeme.
    pub end: TextPos,
    #[serde(skip)]
    pub flags: TokenFlags,
}

impl Token {
    #[inline]
    pub fn pos(&self) -> TextPos {
        self.position.offset
    }

    #[inline]
    pub fn range(&self) -> TextRange {
        TextRange::new(self.position.offset, self.end)
    }

    /// The coarse class of this token.
    pub fn class(&self) -> TokenClass {
        self.kind.token_class().unwrap_or(TokenClass::Punctuation)
    }

    #[inline]
    pub fn is(&self, kind: SyntaxKind) -> bool {
        self.kind == kind
    }

    /// Whether this is an identifier spelled exactly `text`. Used for
    /// contextual words like `from`, `as`, `let` and `extends`.
    #[inline]
    pub fn is_contextual(&self, text: &str) -> bool {
        self.kind == SyntaxKind::Identifier && self.text == text
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    /// The unescaped contents of a string literal token.
    pub fn string_value(&self) -> Option<String> {
        if self.kind != SyntaxKind::StringLiteral || self.text.len() < 2 {
            return None;
        }
        let inner = &self.text[1..self.text.len() - 1];
        if self.flags.contains(TokenFlags::CONTAINS_ESCAPE) {
            Some(unescape(inner))
        } else {
            Some(inner.to_string())
        }
    }
}

/// Resolve backslash escapes in the body of a string literal.
/// Malformed escapes keep the escaped character as-is.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(esc) = chars.next() else {
            break;
        };
        match esc {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            '0' => out.push('\0'),
            // line continuation
            '\r' => {
                chars.next_if_eq(&'\n');
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex, 'x');
            }
            'u' => {
                let hex: String = if chars.next_if_eq(&'{').is_some() {
                    chars.by_ref().take_while(|&c| c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                push_code_point(&mut out, &hex, 'u');
            }
            other => out.push(other),
        }
    }
    out
}

fn push_code_point(out: &mut String, hex: &str, marker: char) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => {
            out.push(marker);
            out.push_str(hex);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(unescape(r"\x41B\u{43}"), "ABC");
        assert_eq!(unescape(r"\q"), "q");
        assert_eq!(unescape("line\\\ncontinued"), "linecontinued");
    }
}
