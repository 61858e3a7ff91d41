use std::fmt;

use tsyn_core::text::{Position, TextRange};
use tsyn_diagnostics::{messages, Diagnostic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A string literal hit end of input or a raw line break before its
    /// closing quote.
    UnterminatedString,
    /// A character that cannot start any token.
    UnexpectedChar(char),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            LexErrorKind::UnexpectedChar(ch) => write!(f, "unexpected character {:?}", ch),
        }
    }
}

/// The first lexical error in a source. For an unterminated string the
/// position is that of the opening quote.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {position}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

impl LexError {
    pub fn new(kind: LexErrorKind, position: Position) -> Self {
        Self { kind, position }
    }

    /// The offending text: the bad character, or the opening quote.
    pub fn range(&self) -> TextRange {
        let width = match self.kind {
            LexErrorKind::UnterminatedString => 1,
            LexErrorKind::UnexpectedChar(ch) => ch.len_utf8() as u32,
        };
        TextRange::new(self.position.offset, self.position.offset + width)
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let message = match self.kind {
            LexErrorKind::UnterminatedString => &messages::UNTERMINATED_STRING_LITERAL,
            LexErrorKind::UnexpectedChar(_) => &messages::INVALID_CHARACTER,
        };
        Diagnostic::new(message, &[]).at(self.position, self.range())
    }
}
