//! The recursive descent parser: token management, speculation, and
//! statements and declarations.
//!
//! Types live in `types.rs` and expressions in `expressions.rs`; all three
//! are `impl` blocks on the same `Parser`. Parsing stops at the first
//! error and no partial tree is returned.

use tsyn_ast::node::*;
use tsyn_ast::syntax_kind::SyntaxKind;
use tsyn_core::text::TextPos;
use tsyn_options::ParseOptions;
use tsyn_scanner::{Mark, Token, TokenStream};

use crate::builder::{identifier_from_token, string_literal_from_token};
use crate::error::{Expected, ParseError, ParseErrorKind, ParseResult, SyntaxError};
use crate::utilities::can_start_expression;

/// Which grammar a `<` belongs to.
///
/// In `Type` context a `<` after a name always opens a type-argument list.
/// In `Expression` context it is a comparison unless a speculative
/// type-argument parse is confirmed by the token after the closing `>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Type,
    Expression,
}

/// Parser state saved before a speculative parse.
#[derive(Debug, Clone, Copy)]
struct Snapshot {
    mark: Mark,
    prev_end: TextPos,
    depth: u32,
}

/// Parses one source text. Construct a new parser per source.
pub struct Parser<'src> {
    pub(crate) stream: TokenStream<'src>,
    pub(crate) options: ParseOptions,
    /// Current type/expression nesting.
    pub(crate) depth: u32,
    /// End of the last consumed token.
    pub(crate) prev_end: TextPos,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, options: &ParseOptions) -> Self {
        Self {
            stream: TokenStream::with_keywords(source, options.keywords),
            options: *options,
            depth: 0,
            prev_end: 0,
        }
    }

    pub fn source(&self) -> &'src str {
        self.stream.source()
    }

    pub fn parse_program(mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        while !self.at(SyntaxKind::EndOfFileToken)? {
            statements.push(self.parse_statement()?);
        }
        let end = self.source().len() as TextPos;
        Ok(Program {
            data: NodeData::new(SyntaxKind::Program, 0, end),
            statements,
        })
    }

    /// Parse input that must be exactly one type.
    pub fn parse_standalone_type(mut self) -> ParseResult<TypeExpr> {
        let ty = self.parse_type()?;
        self.expect_end_of_input()?;
        Ok(ty)
    }

    /// Parse input that must be exactly one expression.
    pub fn parse_standalone_expression(mut self) -> ParseResult<Expression> {
        let expression = self.parse_expression()?;
        self.expect_end_of_input()?;
        Ok(expression)
    }

    fn expect_end_of_input(&mut self) -> ParseResult<()> {
        if self.at(SyntaxKind::EndOfFileToken)? {
            Ok(())
        } else {
            Err(self.error_at_current(
                ParseErrorKind::UnexpectedToken,
                Expected::Token(SyntaxKind::EndOfFileToken),
            ))
        }
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    pub(crate) fn current(&mut self) -> ParseResult<&Token> {
        Ok(self.stream.peek(0)?)
    }

    #[inline]
    pub(crate) fn current_kind(&mut self) -> ParseResult<SyntaxKind> {
        Ok(self.stream.peek_kind(0)?)
    }

    #[inline]
    pub(crate) fn nth_kind(&mut self, offset: usize) -> ParseResult<SyntaxKind> {
        Ok(self.stream.peek_kind(offset)?)
    }

    #[inline]
    pub(crate) fn token_pos(&mut self) -> ParseResult<TextPos> {
        Ok(self.current()?.pos())
    }

    #[inline]
    pub(crate) fn at(&mut self, kind: SyntaxKind) -> ParseResult<bool> {
        Ok(self.current_kind()? == kind)
    }

    /// Whether the current token is the identifier `word`.
    #[inline]
    pub(crate) fn at_contextual(&mut self, word: &str) -> ParseResult<bool> {
        Ok(self.current()?.is_contextual(word))
    }

    /// Kind of the current token and whether a line break precedes it.
    pub(crate) fn current_kind_and_break(&mut self) -> ParseResult<(SyntaxKind, bool)> {
        let token = self.current()?;
        Ok((token.kind, token.has_preceding_line_break()))
    }

    /// Consume the current token. At end of input this returns the
    /// end-of-file token without moving.
    pub(crate) fn bump(&mut self) -> ParseResult<Token> {
        let token = self.stream.advance()?;
        if token.kind != SyntaxKind::EndOfFileToken {
            self.prev_end = token.end;
        }
        Ok(token)
    }

    pub(crate) fn optional_token(&mut self, kind: SyntaxKind) -> ParseResult<Option<Token>> {
        if self.at(kind)? {
            self.bump().map(Some)
        } else {
            Ok(None)
        }
    }

    pub(crate) fn expect_token(&mut self, kind: SyntaxKind) -> ParseResult<Token> {
        if self.at(kind)? {
            self.bump()
        } else {
            Err(self.unexpected(Expected::Token(kind)))
        }
    }

    pub(crate) fn expect_contextual(&mut self, word: &'static str) -> ParseResult<Token> {
        if self.at_contextual(word)? {
            self.bump()
        } else {
            Err(self.unexpected(Expected::Word(word)))
        }
    }

    /// Whether a statement may end before the current token.
    pub(crate) fn can_parse_semicolon(&mut self) -> ParseResult<bool> {
        let (kind, line_break) = self.current_kind_and_break()?;
        Ok(matches!(
            kind,
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || line_break)
    }

    /// Consume `;`, or accept an automatic break: a line break before the
    /// next token, a `}`, or end of input.
    pub(crate) fn parse_semicolon(&mut self) -> ParseResult<()> {
        if self.optional_token(SyntaxKind::SemicolonToken)?.is_some() {
            return Ok(());
        }
        if self.can_parse_semicolon()? {
            Ok(())
        } else {
            Err(self.unexpected(Expected::Token(SyntaxKind::SemicolonToken)))
        }
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// An error pointing at the current token. If that token cannot be
    /// lexed, the lexer's error wins.
    pub(crate) fn error_at_current(&mut self, kind: ParseErrorKind, expected: Expected) -> SyntaxError {
        match self.stream.peek(0) {
            Ok(token) => ParseError::new(kind, expected, token).into(),
            Err(err) => err.into(),
        }
    }

    /// `UnexpectedToken`, or `UnexpectedEndOfInput` when input has run out.
    pub(crate) fn unexpected(&mut self, expected: Expected) -> SyntaxError {
        let kind = match self.stream.peek_kind(0) {
            Ok(SyntaxKind::EndOfFileToken) => ParseErrorKind::UnexpectedEndOfInput,
            _ => ParseErrorKind::UnexpectedToken,
        };
        self.error_at_current(kind, expected)
    }

    pub(crate) fn expected_identifier(&mut self) -> SyntaxError {
        match self.stream.peek_kind(0) {
            Ok(SyntaxKind::EndOfFileToken) => self.unexpected(Expected::Identifier),
            _ => self.error_at_current(ParseErrorKind::ExpectedIdentifier, Expected::Identifier),
        }
    }

    // ========================================================================
    // Nesting and speculation
    // ========================================================================

    /// Run `f` one nesting level deeper, failing once the configured limit
    /// is reached.
    pub(crate) fn nested<T>(
        &mut self,
        what: Expected,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.chained(|p| {
            p.deepen(what)?;
            f(p)
        })
    }

    /// Take one more nesting level without returning from it. Loops that
    /// wrap a node around the previous one (`A[][]`, `a.b.c`, `a + b + c`)
    /// call this once per wrap, inside `chained`.
    pub(crate) fn deepen(&mut self, what: Expected) -> ParseResult<()> {
        let limit = self.options.max_nesting_depth;
        if self.depth >= limit {
            return Err(self.error_at_current(ParseErrorKind::NestingLimitExceeded { limit }, what));
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `f` and give back every level it took with `deepen`.
    pub(crate) fn chained<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let depth = self.depth;
        let result = f(self);
        self.depth = depth;
        result
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            mark: self.stream.checkpoint(),
            prev_end: self.prev_end,
            depth: self.depth,
        }
    }

    fn rewind(&mut self, snapshot: Snapshot) {
        self.stream.restore(snapshot.mark);
        self.prev_end = snapshot.prev_end;
        self.depth = snapshot.depth;
    }

    /// Try a production. Its tokens stay consumed only if it yields a
    /// value. On `None` or a syntax error the parser is put back where it
    /// was and the error is dropped, leaving the caller's fallback to report
    /// whatever is really wrong. Lexical errors and the nesting limit hold
    /// on every path, so those are returned as is.
    pub(crate) fn speculate<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<Option<T>>,
    ) -> ParseResult<Option<T>> {
        let snapshot = self.snapshot();
        match f(self) {
            Ok(Some(value)) => Ok(Some(value)),
            Err(err) if err.is_final() => Err(err),
            Ok(None) | Err(_) => {
                self.rewind(snapshot);
                Ok(None)
            }
        }
    }

    // ========================================================================
    // Names
    // ========================================================================

    pub(crate) fn parse_identifier(&mut self) -> ParseResult<Identifier> {
        if self.at(SyntaxKind::Identifier)? {
            let token = self.bump()?;
            Ok(identifier_from_token(&token))
        } else {
            Err(self.expected_identifier())
        }
    }

    /// A name where reserved words are allowed too: members, properties,
    /// and import or export specifiers.
    pub(crate) fn parse_identifier_name(&mut self) -> ParseResult<Identifier> {
        if self.current_kind()?.is_identifier_or_keyword() {
            let token = self.bump()?;
            Ok(identifier_from_token(&token))
        } else {
            Err(self.expected_identifier())
        }
    }

    // ========================================================================
    // Statement parsing
    // ========================================================================

    pub(crate) fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.current_kind()? {
            SyntaxKind::ImportKeyword => self.parse_import_declaration().map(Statement::Import),
            SyntaxKind::ExportKeyword => self.parse_export_declaration().map(Statement::Export),
            SyntaxKind::InterfaceKeyword => {
                self.parse_interface_declaration().map(Statement::Interface)
            }
            SyntaxKind::TypeKeyword => self.parse_type_alias_declaration().map(Statement::TypeAlias),
            SyntaxKind::FunctionKeyword => {
                self.parse_function_declaration().map(Statement::Function)
            }
            SyntaxKind::ConstKeyword => self
                .parse_variable_declaration(DeclarationKind::Const)
                .map(Statement::Variable),
            SyntaxKind::Identifier if self.is_let_declaration()? => self
                .parse_variable_declaration(DeclarationKind::Let)
                .map(Statement::Variable),
            SyntaxKind::ReturnKeyword => self.parse_return_statement().map(Statement::Return),
            SyntaxKind::SemicolonToken => {
                let start = self.token_pos()?;
                self.bump()?;
                Ok(Statement::Empty(EmptyStatement {
                    data: self.finish(SyntaxKind::EmptyStatement, start),
                }))
            }
            _ => self.parse_expression_statement().map(Statement::Expression),
        }
    }

    /// `let` followed by a name. A bare `let` is an ordinary identifier.
    fn is_let_declaration(&mut self) -> ParseResult<bool> {
        Ok(self.at_contextual("let")? && self.nth_kind(1)? == SyntaxKind::Identifier)
    }

    fn parse_expression_statement(&mut self) -> ParseResult<ExpressionStatement> {
        let start = self.token_pos()?;
        if !can_start_expression(self.current_kind()?) {
            return Err(self.unexpected(Expected::Declaration));
        }
        let expression = self.parse_expression()?;
        self.parse_semicolon()?;
        Ok(ExpressionStatement {
            data: self.finish(SyntaxKind::ExpressionStatement, start),
            expression,
        })
    }

    fn parse_return_statement(&mut self) -> ParseResult<ReturnStatement> {
        let start = self.token_pos()?;
        self.expect_token(SyntaxKind::ReturnKeyword)?;
        let expression = if self.can_parse_semicolon()? {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.parse_semicolon()?;
        Ok(ReturnStatement {
            data: self.finish(SyntaxKind::ReturnStatement, start),
            expression,
        })
    }

    fn parse_variable_declaration(
        &mut self,
        declaration_kind: DeclarationKind,
    ) -> ParseResult<VariableDeclaration> {
        let start = self.token_pos()?;
        // `const` keyword or the `let` identifier
        self.bump()?;
        let name = self.parse_identifier()?;
        let type_annotation = self.parse_type_annotation()?;
        let initializer = if self.optional_token(SyntaxKind::EqualsToken)?.is_some() {
            Some(self.parse_assignment_expression()?)
        } else if declaration_kind == DeclarationKind::Const {
            return Err(self.unexpected(Expected::Token(SyntaxKind::EqualsToken)));
        } else {
            None
        };
        self.parse_semicolon()?;
        Ok(VariableDeclaration {
            data: self.finish(SyntaxKind::VariableDeclaration, start),
            declaration_kind,
            name,
            type_annotation,
            initializer,
        })
    }

    /// `: Type`, if present.
    pub(crate) fn parse_type_annotation(&mut self) -> ParseResult<Option<TypeExpr>> {
        if self.optional_token(SyntaxKind::ColonToken)?.is_some() {
            self.parse_type().map(Some)
        } else {
            Ok(None)
        }
    }

    // ========================================================================
    // Modules
    // ========================================================================

    fn parse_import_declaration(&mut self) -> ParseResult<ImportDeclaration> {
        let start = self.token_pos()?;
        self.expect_token(SyntaxKind::ImportKeyword)?;

        let mut default_binding = None;
        let mut namespace_binding = None;
        let mut named_bindings = Vec::new();

        if !self.at(SyntaxKind::StringLiteral)? {
            let mut needs_clause = true;
            if self.at(SyntaxKind::Identifier)? {
                default_binding = Some(self.parse_identifier()?);
                needs_clause = self.optional_token(SyntaxKind::CommaToken)?.is_some();
            }
            if needs_clause {
                match self.current_kind()? {
                    SyntaxKind::OpenBraceToken => {
                        named_bindings = self.parse_named_specifiers(SyntaxKind::ImportSpecifier)?;
                    }
                    SyntaxKind::AsteriskToken => {
                        self.bump()?;
                        self.expect_contextual("as")?;
                        namespace_binding = Some(self.parse_identifier()?);
                    }
                    _ => return Err(self.expected_identifier()),
                }
            }
            self.expect_contextual("from")?;
        }

        let source = self.parse_module_specifier()?;
        self.parse_semicolon()?;
        Ok(ImportDeclaration {
            data: self.finish(SyntaxKind::ImportDeclaration, start),
            default_binding,
            namespace_binding,
            named_bindings,
            source,
        })
    }

    fn parse_module_specifier(&mut self) -> ParseResult<StringLiteral> {
        let token = self.expect_token(SyntaxKind::StringLiteral)?;
        Ok(string_literal_from_token(&token))
    }

    /// `{ a, b as c }`, trailing comma allowed.
    fn parse_named_specifiers(&mut self, kind: SyntaxKind) -> ParseResult<Vec<ImportSpecifier>> {
        self.expect_token(SyntaxKind::OpenBraceToken)?;
        let mut specifiers = Vec::new();
        while !self.at(SyntaxKind::CloseBraceToken)? {
            let start = self.token_pos()?;
            let first = self.parse_identifier_name()?;
            let (property_name, name) = if self.at_contextual("as")? {
                self.bump()?;
                (Some(first), self.parse_identifier_name()?)
            } else {
                (None, first)
            };
            specifiers.push(ImportSpecifier {
                data: self.finish(kind, start),
                property_name,
                name,
            });
            if self.optional_token(SyntaxKind::CommaToken)?.is_none() {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseBraceToken)?;
        Ok(specifiers)
    }

    fn parse_export_declaration(&mut self) -> ParseResult<ExportDeclaration> {
        let start = self.token_pos()?;
        self.expect_token(SyntaxKind::ExportKeyword)?;

        let clause = match self.current_kind()? {
            SyntaxKind::OpenBraceToken => {
                let specifiers = self.parse_named_specifiers(SyntaxKind::ExportSpecifier)?;
                let source = if self.at_contextual("from")? {
                    self.bump()?;
                    Some(self.parse_module_specifier()?)
                } else {
                    None
                };
                self.parse_semicolon()?;
                ExportClause::Named { specifiers, source }
            }
            SyntaxKind::Identifier if self.at_contextual("default")? => {
                self.bump()?;
                let expression = self.parse_assignment_expression()?;
                self.parse_semicolon()?;
                ExportClause::Default(expression)
            }
            SyntaxKind::InterfaceKeyword
            | SyntaxKind::TypeKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ConstKeyword => ExportClause::Declaration(Box::new(self.parse_statement()?)),
            SyntaxKind::Identifier if self.is_let_declaration()? => {
                ExportClause::Declaration(Box::new(self.parse_statement()?))
            }
            _ => return Err(self.unexpected(Expected::Declaration)),
        };

        Ok(ExportDeclaration {
            data: self.finish(SyntaxKind::ExportDeclaration, start),
            clause,
        })
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn parse_interface_declaration(&mut self) -> ParseResult<InterfaceDeclaration> {
        let start = self.token_pos()?;
        self.expect_token(SyntaxKind::InterfaceKeyword)?;
        let name = self.parse_identifier()?;
        let type_parameters = self.parse_type_parameters()?;

        let mut extends = Vec::new();
        if self.at_contextual("extends")? {
            self.bump()?;
            loop {
                extends.push(TypeExpr::Named(self.parse_type_reference()?));
                if self.optional_token(SyntaxKind::CommaToken)?.is_none() {
                    break;
                }
            }
        }

        let members = self.parse_type_members()?;
        Ok(InterfaceDeclaration {
            data: self.finish(SyntaxKind::InterfaceDeclaration, start),
            name,
            type_parameters,
            extends,
            members,
        })
    }

    fn parse_type_alias_declaration(&mut self) -> ParseResult<TypeAliasDeclaration> {
        let start = self.token_pos()?;
        self.expect_token(SyntaxKind::TypeKeyword)?;
        let name = self.parse_identifier()?;
        let type_parameters = self.parse_type_parameters()?;
        self.expect_token(SyntaxKind::EqualsToken)?;
        let type_expr = self.parse_type()?;
        self.parse_semicolon()?;
        Ok(TypeAliasDeclaration {
            data: self.finish(SyntaxKind::TypeAliasDeclaration, start),
            name,
            type_parameters,
            type_expr,
        })
    }

    fn parse_function_declaration(&mut self) -> ParseResult<FunctionDeclaration> {
        let start = self.token_pos()?;
        self.expect_token(SyntaxKind::FunctionKeyword)?;
        let name = self.parse_identifier()?;
        let type_parameters = self.parse_type_parameters()?;
        let parameters = self.parse_parameter_list(true)?;
        let return_type = self.parse_type_annotation()?;

        let body = if self.at(SyntaxKind::OpenBraceToken)? {
            Some(self.parse_function_body()?)
        } else if self.can_parse_semicolon()? {
            // overload signature
            self.parse_semicolon()?;
            None
        } else {
            return Err(self.unexpected(Expected::Token(SyntaxKind::OpenBraceToken)));
        };

        Ok(FunctionDeclaration {
            data: self.finish(SyntaxKind::FunctionDeclaration, start),
            name,
            type_parameters,
            parameters,
            return_type,
            body,
        })
    }

    /// Skip a `{ ... }` body by brace counting. Nothing inside is parsed,
    /// but every token is still lexed, so lexical errors in a body are
    /// reported.
    pub(crate) fn parse_function_body(&mut self) -> ParseResult<FunctionBody> {
        let start = self.token_pos()?;
        self.expect_token(SyntaxKind::OpenBraceToken)?;
        let mark = self.stream.checkpoint();
        let mut depth = 1u32;
        loop {
            match self.current_kind()? {
                SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseBraceToken => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                SyntaxKind::EndOfFileToken => {
                    return Err(self.unexpected(Expected::Token(SyntaxKind::CloseBraceToken)));
                }
                _ => {}
            }
            self.bump()?;
        }
        let token_count = self.stream.consumed_since(mark) as u32;
        self.bump()?;
        Ok(FunctionBody {
            data: self.finish(SyntaxKind::FunctionBody, start),
            token_count,
        })
    }

    /// `<T, U extends C = D>`, if present.
    pub(crate) fn parse_type_parameters(&mut self) -> ParseResult<Vec<TypeParameter>> {
        let mut parameters = Vec::new();
        if self.optional_token(SyntaxKind::LessThanToken)?.is_none() {
            return Ok(parameters);
        }
        loop {
            let start = self.token_pos()?;
            let name = self.parse_identifier()?;
            let constraint = if self.at_contextual("extends")? {
                self.bump()?;
                Some(self.parse_type()?)
            } else {
                None
            };
            let default = if self.optional_token(SyntaxKind::EqualsToken)?.is_some() {
                Some(self.parse_type()?)
            } else {
                None
            };
            parameters.push(TypeParameter {
                data: self.finish(SyntaxKind::TypeParameter, start),
                name,
                constraint,
                default,
            });
            if self.optional_token(SyntaxKind::CommaToken)?.is_none()
                || self.at(SyntaxKind::GreaterThanToken)?
            {
                break;
            }
        }
        self.expect_token(SyntaxKind::GreaterThanToken)?;
        Ok(parameters)
    }

    /// `(a, b?: T, ...rest: U[])`. Default values are only accepted where
    /// `allow_initializers` is set; signatures in types have none.
    pub(crate) fn parse_parameter_list(
        &mut self,
        allow_initializers: bool,
    ) -> ParseResult<Vec<Parameter>> {
        self.expect_token(SyntaxKind::OpenParenToken)?;
        let mut parameters = Vec::new();
        while !self.at(SyntaxKind::CloseParenToken)? {
            parameters.push(self.parse_parameter(allow_initializers)?);
            if self.optional_token(SyntaxKind::CommaToken)?.is_none() {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseParenToken)?;
        Ok(parameters)
    }

    fn parse_parameter(&mut self, allow_initializer: bool) -> ParseResult<Parameter> {
        let start = self.token_pos()?;
        let rest = self.optional_token(SyntaxKind::DotDotDotToken)?.is_some();
        let name = self.parse_identifier()?;
        let optional = self.optional_token(SyntaxKind::QuestionToken)?.is_some();
        let type_annotation = self.parse_type_annotation()?;
        let initializer =
            if allow_initializer && self.optional_token(SyntaxKind::EqualsToken)?.is_some() {
                Some(self.parse_assignment_expression()?)
            } else {
                None
            };
        Ok(Parameter {
            data: self.finish(SyntaxKind::Parameter, start),
            rest,
            name,
            optional,
            type_annotation,
            initializer,
        })
    }
}
