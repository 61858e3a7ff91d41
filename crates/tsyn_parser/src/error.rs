//! Parse errors.
//!
//! Parsing stops at the first error. A `SyntaxError` is either the lexer's
//! error, surfaced when the parser first needed the failing token, or a
//! `ParseError` describing what was expected and what was found instead.

use std::fmt;

use tsyn_ast::syntax_kind::SyntaxKind;
use tsyn_core::text::{Position, TextRange};
use tsyn_diagnostics::{messages, Diagnostic};
use tsyn_scanner::{LexError, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A type was required: after `:`, `=` in a type alias, or around `|`/`&`.
    ExpectedType,
    /// A name was required: declaration names, members, parameters.
    ExpectedIdentifier,
    UnexpectedToken,
    /// Input ended where more was required.
    UnexpectedEndOfInput,
    /// Types or expressions nested deeper than the configured limit.
    NestingLimitExceeded { limit: u32 },
}

/// The construct the parser was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Token(SyntaxKind),
    /// A contextual word such as `from` or `as`.
    Word(&'static str),
    Identifier,
    Type,
    Expression,
    Declaration,
}

impl Expected {
    /// Capitalized noun used in diagnostics ("Type expected.").
    fn title(self) -> String {
        match self {
            Expected::Token(kind) => format!("'{}'", kind),
            Expected::Word(word) => format!("'{}'", word),
            Expected::Identifier => "Identifier".to_string(),
            Expected::Type => "Type".to_string(),
            Expected::Expression => "Expression".to_string(),
            Expected::Declaration => "Declaration or statement".to_string(),
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "'{}'", kind),
            Expected::Word(word) => write!(f, "'{}'", word),
            Expected::Identifier => write!(f, "identifier"),
            Expected::Type => write!(f, "type"),
            Expected::Expression => write!(f, "expression"),
            Expected::Declaration => write!(f, "declaration or statement"),
        }
    }
}

/// The token found where something else was expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    pub kind: SyntaxKind,
    pub text: String,
    pub range: TextRange,
}

impl Found {
    pub fn from_token(token: &Token) -> Self {
        Self {
            kind: token.kind,
            text: token.text.clone(),
            range: token.range(),
        }
    }

    pub fn is_end_of_input(&self) -> bool {
        self.kind == SyntaxKind::EndOfFileToken
    }
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end_of_input() {
            write!(f, "end of input")
        } else {
            write!(f, "'{}'", self.text)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub expected: Expected,
    pub found: Found,
    /// Where the found token starts.
    pub position: Position,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, expected: Expected, token: &Token) -> Self {
        Self {
            kind,
            expected,
            found: Found::from_token(token),
            position: token.position,
        }
    }

    pub fn range(&self) -> TextRange {
        self.found.range
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = match self.kind {
            ParseErrorKind::ExpectedType => Diagnostic::new(&messages::TYPE_EXPECTED, &[]),
            ParseErrorKind::ExpectedIdentifier => {
                Diagnostic::new(&messages::IDENTIFIER_EXPECTED, &[])
            }
            ParseErrorKind::UnexpectedToken => match self.expected {
                Expected::Token(kind) => {
                    Diagnostic::new(&messages::_0_EXPECTED, &[&kind.to_string()])
                }
                Expected::Word(word) => Diagnostic::new(&messages::_0_EXPECTED, &[word]),
                other => Diagnostic::new(
                    &messages::UNEXPECTED_TOKEN_0_EXPECTED,
                    &[&self.found.text, &other.title()],
                ),
            },
            ParseErrorKind::UnexpectedEndOfInput => {
                Diagnostic::new(&messages::UNEXPECTED_END_OF_TEXT, &[])
            }
            ParseErrorKind::NestingLimitExceeded { limit } => {
                Diagnostic::new(&messages::NESTING_LIMIT_0_EXCEEDED, &[&limit.to_string()])
            }
        };
        diagnostic.at(self.position, self.range())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParseErrorKind::ExpectedType => write!(f, "type expected, found {}", self.found)?,
            ParseErrorKind::ExpectedIdentifier => {
                write!(f, "identifier expected, found {}", self.found)?
            }
            ParseErrorKind::UnexpectedToken => {
                write!(f, "unexpected {}, expected {}", self.found, self.expected)?
            }
            ParseErrorKind::UnexpectedEndOfInput => {
                write!(f, "unexpected end of input, expected {}", self.expected)?
            }
            ParseErrorKind::NestingLimitExceeded { limit } => {
                write!(f, "{} nested deeper than {} levels", self.expected, limit)?
            }
        }
        write!(f, " at {}", self.position)
    }
}

impl std::error::Error for ParseError {}

/// The first error in a source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    pub fn position(&self) -> Position {
        match self {
            SyntaxError::Lex(err) => err.position,
            SyntaxError::Parse(err) => err.position,
        }
    }

    pub fn range(&self) -> TextRange {
        match self {
            SyntaxError::Lex(err) => err.range(),
            SyntaxError::Parse(err) => err.range(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SyntaxError::Lex(err) => err.to_diagnostic(),
            SyntaxError::Parse(err) => err.to_diagnostic(),
        }
    }

    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            SyntaxError::Parse(err) => Some(err),
            SyntaxError::Lex(_) => None,
        }
    }

    /// Whether the error holds no matter which production is tried at
    /// this point: a lexical error or the nesting limit.
    pub fn is_final(&self) -> bool {
        match self {
            SyntaxError::Lex(_) => true,
            SyntaxError::Parse(err) => matches!(err.kind, ParseErrorKind::NestingLimitExceeded { .. }),
        }
    }
}

pub type ParseResult<T> = Result<T, SyntaxError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tsyn_scanner::tokenize;

    fn first_token(source: &str) -> Token {
        tokenize(source).next().unwrap().unwrap()
    }

    #[test]
    fn test_expected_token_diagnostic() {
        let err = ParseError::new(
            ParseErrorKind::UnexpectedToken,
            Expected::Token(SyntaxKind::SemicolonToken),
            &first_token("x"),
        );
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, 1005);
        assert_eq!(diag.message_text, "';' expected.");
        assert_eq!(diag.range, Some(TextRange::new(0, 1)));
    }

    #[test]
    fn test_unexpected_token_diagnostic() {
        let err = ParseError::new(
            ParseErrorKind::UnexpectedToken,
            Expected::Type,
            &first_token(">"),
        );
        assert_eq!(err.to_diagnostic().message_text, "Unexpected token '>'. Type expected.");
        assert_eq!(err.to_string(), "unexpected '>', expected type at 1:1");
    }

    #[test]
    fn test_end_of_input_display() {
        let err = ParseError::new(
            ParseErrorKind::ExpectedType,
            Expected::Type,
            &first_token(""),
        );
        assert_eq!(err.to_string(), "type expected, found end of input at 1:1");
        assert_eq!(err.to_diagnostic().code, 1110);
    }

    #[test]
    fn test_nesting_limit_diagnostic() {
        let err = ParseError::new(
            ParseErrorKind::NestingLimitExceeded { limit: 8 },
            Expected::Expression,
            &first_token("("),
        );
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, 1200);
        assert_eq!(diag.message_text, "Maximum nesting depth of 8 exceeded.");
    }

    #[test]
    fn test_syntax_error_wraps_lex_error() {
        let lex = tokenize("'abc").find_map(Result::err).unwrap();
        let err = SyntaxError::from(lex.clone());
        assert_eq!(err.position(), lex.position);
        assert_eq!(err.to_diagnostic().code, 1002);
        assert!(err.as_parse_error().is_none());
        assert!(err.is_final());
    }

    #[test]
    fn test_only_lex_and_nesting_errors_are_final() {
        let nesting = ParseError::new(
            ParseErrorKind::NestingLimitExceeded { limit: 2 },
            Expected::Type,
            &first_token("A"),
        );
        let unexpected = ParseError::new(ParseErrorKind::UnexpectedToken, Expected::Type, &first_token(">"));
        assert!(SyntaxError::from(nesting).is_final());
        assert!(!SyntaxError::from(unexpected).is_final());
    }
}
