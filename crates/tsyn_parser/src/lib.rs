//! tsyn_parser: recursive descent parser for typed script sources.
//!
//! Consumes tokens from `tsyn_scanner` and builds the owned syntax tree in
//! `tsyn_ast`. Parsing stops at the first error: the result is either a
//! complete tree or a single `SyntaxError`, never both.
//!
//! Function bodies are not parsed; they are skipped by brace counting and
//! recorded as `FunctionBody` spans.

mod builder;
mod error;
mod expressions;
mod parser;
mod precedence;
mod types;
mod utilities;

pub use error::{Expected, Found, ParseError, ParseErrorKind, ParseResult, SyntaxError};
pub use parser::{Context, Parser};
pub use tsyn_options::ParseOptions;

use tsyn_ast::node::{Expression, Program, TypeExpr};

/// Parse a whole source file with default options.
pub fn parse_program(source: &str) -> Result<Program, SyntaxError> {
    parse_program_with(source, &ParseOptions::default())
}

pub fn parse_program_with(source: &str, options: &ParseOptions) -> Result<Program, SyntaxError> {
    Parser::new(source, options).parse_program()
}

/// Parse a source consisting of exactly one type.
pub fn parse_type(source: &str) -> Result<TypeExpr, SyntaxError> {
    Parser::new(source, &ParseOptions::default()).parse_standalone_type()
}

/// Parse a source consisting of exactly one expression.
pub fn parse_expression(source: &str) -> Result<Expression, SyntaxError> {
    Parser::new(source, &ParseOptions::default()).parse_standalone_expression()
}
