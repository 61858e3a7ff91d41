//! tsyn_diagnostics: user-facing error reports.
//!
//! Lexer and parser errors are typed values; this crate turns them into
//! numbered, formatted diagnostics for tools that print or collect them.

use std::fmt;

use tsyn_core::text::{Position, TextRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A message template with a stable code.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub severity: Severity,
    /// May contain `{0}`, `{1}`, ... placeholders.
    pub template: &'static str,
}

impl DiagnosticMessage {
    pub const fn error(code: u32, template: &'static str) -> Self {
        Self {
            code,
            severity: Severity::Error,
            template,
        }
    }
}

/// A realized diagnostic with resolved text and an optional location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: u32,
    pub severity: Severity,
    pub message_text: String,
    pub file: Option<String>,
    /// Line and column of `range.pos`, when known.
    pub position: Option<Position>,
    pub range: Option<TextRange>,
}

impl Diagnostic {
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            code: message.code,
            severity: message.severity,
            message_text: format_message(message.template, args),
            file: None,
            position: None,
            range: None,
        }
    }

    /// Attach the location of the offending text.
    pub fn at(self, position: Position, range: TextRange) -> Self {
        Self {
            position: Some(position),
            range: Some(range),
            ..self
        }
    }

    pub fn in_file(self, file: impl Into<String>) -> Self {
        Self {
            file: Some(file.into()),
            ..self
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// `file(line,col): error TS1110: Type expected.`; the location prefix is
/// omitted when no file is attached.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.position) {
            (Some(file), Some(pos)) => write!(f, "{}({},{}): ", file, pos.line, pos.column)?,
            (Some(file), None) => write!(f, "{}: ", file)?,
            (None, _) => {}
        }
        write!(f, "{} TS{}: {}", self.severity.as_str(), self.code, self.message_text)
    }
}

/// Substitute `{n}` placeholders in `template` with `args[n]`. A
/// placeholder without a matching argument is kept as written.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let arg = after
            .find('}')
            .and_then(|close| Some((after[..close].parse::<usize>().ok()?, close)))
            .and_then(|(index, close)| Some((*args.get(index)?, close)));
        match arg {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Diagnostics gathered across several source files.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    items: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosticCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub mod messages {
    use super::DiagnosticMessage;

    // Lexical errors
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage =
        DiagnosticMessage::error(1002, "Unterminated string literal.");
    pub const INVALID_CHARACTER: DiagnosticMessage = DiagnosticMessage::error(1127, "Invalid character.");

    // Syntax errors
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = DiagnosticMessage::error(1003, "Identifier expected.");
    pub const _0_EXPECTED: DiagnosticMessage = DiagnosticMessage::error(1005, "'{0}' expected.");
    pub const UNEXPECTED_TOKEN_0_EXPECTED: DiagnosticMessage =
        DiagnosticMessage::error(1012, "Unexpected token '{0}'. {1} expected.");
    pub const TYPE_EXPECTED: DiagnosticMessage = DiagnosticMessage::error(1110, "Type expected.");
    pub const UNEXPECTED_END_OF_TEXT: DiagnosticMessage = DiagnosticMessage::error(1126, "Unexpected end of text.");
    pub const NESTING_LIMIT_0_EXCEEDED: DiagnosticMessage =
        DiagnosticMessage::error(1200, "Maximum nesting depth of {0} exceeded.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        assert_eq!(format_message("'{0}' expected.", &[";"]), "';' expected.");
        assert_eq!(
            format_message("Unexpected token '{0}'. {1} expected.", &["+", "Type"]),
            "Unexpected token '+'. Type expected."
        );
    }

    #[test]
    fn test_format_message_keeps_unmatched_braces() {
        assert_eq!(format_message("'{0}' and {1}", &["}"]), "'}' and {1}");
        assert_eq!(format_message("{x} {", &[]), "{x} {");
    }

    #[test]
    fn test_display_with_location() {
        let diag = Diagnostic::new(&messages::TYPE_EXPECTED, &[])
            .at(Position::new(12, 1, 13), TextRange::new(12, 12))
            .in_file("main.ts");
        assert_eq!(diag.to_string(), "main.ts(1,13): error TS1110: Type expected.");
    }

    #[test]
    fn test_display_without_file() {
        let diag = Diagnostic::new(&messages::UNTERMINATED_STRING_LITERAL, &[]);
        assert_eq!(diag.to_string(), "error TS1002: Unterminated string literal.");
    }

    #[test]
    fn test_collection_counts_errors() {
        let mut collection = DiagnosticCollection::new();
        assert!(!collection.has_errors());
        collection.add(Diagnostic::new(&messages::TYPE_EXPECTED, &[]).in_file("b.ts"));
        collection.add(Diagnostic::new(&messages::IDENTIFIER_EXPECTED, &[]).in_file("a.ts"));
        assert_eq!(collection.error_count(), 2);
        let files: Vec<_> = collection.iter().filter_map(|d| d.file.as_deref()).collect();
        assert_eq!(files, vec!["b.ts", "a.ts"]);
    }
}
