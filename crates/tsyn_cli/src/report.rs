//! Rendering syntax errors.
//!
//! Fancy mode wraps a `SyntaxError` in a miette diagnostic so the offending
//! text is shown in a labelled snippet. Plain mode prints the numbered
//! one-line form from `tsyn_diagnostics`.

use std::fmt;
use std::io::IsTerminal;

use miette::{Diagnostic, LabeledSpan, NamedSource, Report, SourceSpan};
use tsyn_core::text::TextSpan;
use tsyn_parser::{ParseErrorKind, SyntaxError};

const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// A syntax error bundled with the source it was found in.
#[derive(Debug)]
pub struct SourceError {
    message: String,
    code: u32,
    label: String,
    span: SourceSpan,
    source_code: NamedSource<String>,
}

impl SourceError {
    pub fn new(file: &str, source: &str, error: &SyntaxError) -> Self {
        let diagnostic = error.to_diagnostic();
        let span = TextSpan::from(error.range());
        let span = SourceSpan::new((span.start as usize).into(), span.length as usize);
        Self {
            message: diagnostic.message_text,
            code: diagnostic.code,
            label: label_for(error),
            span,
            source_code: NamedSource::new(file, source.to_string()),
        }
    }
}

fn label_for(error: &SyntaxError) -> String {
    match error {
        SyntaxError::Lex(err) => err.kind.to_string(),
        SyntaxError::Parse(err) => match err.kind {
            ParseErrorKind::NestingLimitExceeded { limit } => format!("nesting limit of {limit} reached here"),
            ParseErrorKind::UnexpectedEndOfInput => "input ends here".to_string(),
            _ => format!("found {}", err.found),
        },
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SourceError {}

impl Diagnostic for SourceError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("TS{}", self.code)))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source_code)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(Some(self.label.clone()), self.span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// How errors reach the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Fancy,
    Plain,
}

/// Format a syntax error found in `file`.
pub fn render(style: Style, file: &str, source: &str, error: &SyntaxError) -> String {
    match style {
        Style::Plain => error.to_diagnostic().in_file(file).to_string(),
        Style::Fancy => format!("{:?}", Report::new(SourceError::new(file, source, error))),
    }
}

/// An error that is not tied to a source location.
pub fn print_error(msg: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}
