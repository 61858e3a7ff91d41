//! Type expressions.
//!
//! ```text
//! type         := union
//! union        := ['|'] intersection ('|' intersection)*
//! intersection := ['&'] postfix ('&' postfix)*
//! postfix      := primary ('[' ']')*
//! primary      := name ['<' type (',' type)* '>'] | literal | primitive
//!               | '(' type ')' | function | '{' members '}' | '[' types ']'
//! ```

use tsyn_ast::node::*;
use tsyn_ast::syntax_kind::SyntaxKind;

use crate::builder::{identifier_from_token, literal_from_token};
use crate::error::{Expected, ParseErrorKind, ParseResult};
use crate::parser::{Context, Parser};
use crate::utilities::{can_follow_type_arguments, can_start_type};

impl Parser<'_> {
    pub fn parse_type(&mut self) -> ParseResult<TypeExpr> {
        self.nested(Expected::Type, Self::parse_union_type)
    }

    fn parse_union_type(&mut self) -> ParseResult<TypeExpr> {
        self.parse_list_type(SyntaxKind::BarToken, Self::parse_intersection_type)
    }

    fn parse_intersection_type(&mut self) -> ParseResult<TypeExpr> {
        self.parse_list_type(SyntaxKind::AmpersandToken, Self::parse_postfix_type)
    }

    /// Members separated by `operator`, flattened into one node. A single
    /// member is returned as is.
    fn parse_list_type(
        &mut self,
        operator: SyntaxKind,
        parse_member: fn(&mut Self) -> ParseResult<TypeExpr>,
    ) -> ParseResult<TypeExpr> {
        let start = self.token_pos()?;
        self.optional_token(operator)?;
        let first = parse_member(self)?;
        if !self.at(operator)? {
            return Ok(first);
        }
        let mut types = vec![first];
        while self.optional_token(operator)?.is_some() {
            types.push(parse_member(self)?);
        }
        Ok(self.finish_list_type(operator, start, types))
    }

    fn parse_postfix_type(&mut self) -> ParseResult<TypeExpr> {
        let start = self.token_pos()?;
        let mut ty = self.parse_primary_type()?;
        self.chained(|p| {
            loop {
                let (kind, line_break) = p.current_kind_and_break()?;
                if kind != SyntaxKind::OpenBracketToken
                    || line_break
                    || p.nth_kind(1)? != SyntaxKind::CloseBracketToken
                {
                    break;
                }
                p.deepen(Expected::Type)?;
                p.bump()?;
                p.bump()?;
                ty = TypeExpr::Array(ArrayType {
                    data: p.finish(SyntaxKind::ArrayType, start),
                    element: Box::new(ty),
                });
            }
            Ok(ty)
        })
    }

    fn parse_primary_type(&mut self) -> ParseResult<TypeExpr> {
        match self.current_kind()? {
            SyntaxKind::Identifier => self.parse_identifier_type(),
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => self.parse_literal_type(),
            SyntaxKind::OpenParenToken => {
                if self.is_start_of_function_type()? {
                    self.parse_function_type()
                } else {
                    self.parse_parenthesized_type()
                }
            }
            SyntaxKind::LessThanToken => self.parse_function_type(),
            SyntaxKind::OpenBraceToken => {
                let start = self.token_pos()?;
                let members = self.parse_type_members()?;
                Ok(TypeExpr::TypeLiteral(TypeLiteral {
                    data: self.finish(SyntaxKind::TypeLiteral, start),
                    members,
                }))
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            _ => Err(self.error_at_current(ParseErrorKind::ExpectedType, Expected::Type)),
        }
    }

    /// A name in type position: `null`/`true`/`false`, a primitive, or a
    /// reference.
    fn parse_identifier_type(&mut self) -> ParseResult<TypeExpr> {
        let token = self.current()?;
        let is_literal = matches!(token.text.as_str(), "null" | "true" | "false");
        let primitive = PrimitiveType::from_text(&token.text);

        if is_literal {
            return self.parse_literal_type();
        }
        if let Some(keyword) = primitive {
            if self.nth_kind(1)? != SyntaxKind::DotToken {
                let token = self.bump()?;
                return Ok(TypeExpr::Keyword(KeywordType {
                    data: self.finish(SyntaxKind::KeywordType, token.pos()),
                    keyword,
                }));
            }
        }
        self.parse_type_reference().map(TypeExpr::Named)
    }

    fn parse_literal_type(&mut self) -> ParseResult<TypeExpr> {
        let token = self.bump()?;
        match literal_from_token(&token) {
            Some(literal) => Ok(TypeExpr::Literal(LiteralType {
                data: self.finish(SyntaxKind::LiteralType, token.pos()),
                literal,
            })),
            None => Err(self.error_at_current(ParseErrorKind::ExpectedType, Expected::Type)),
        }
    }

    /// `Name`, `Ns.Name`, optionally followed by type arguments.
    pub(crate) fn parse_type_reference(&mut self) -> ParseResult<TypeReference> {
        let start = self.token_pos()?;
        if !self.at(SyntaxKind::Identifier)? {
            return Err(self.error_at_current(ParseErrorKind::ExpectedType, Expected::Type));
        }
        let first = self.bump()?;
        let mut name = identifier_from_token(&first);
        while self.at(SyntaxKind::DotToken)? && self.nth_kind(1)?.is_identifier_or_keyword() {
            self.bump()?;
            let part = self.bump()?;
            name.text.push('.');
            name.text.push_str(&part.text);
            name.data = self.finish(SyntaxKind::Identifier, start);
        }
        let type_arguments = self.parse_type_arguments_in(Context::Type)?;
        Ok(TypeReference {
            data: self.finish(SyntaxKind::TypeReference, start),
            name,
            type_arguments,
        })
    }

    /// Type arguments at a `<`, if present.
    ///
    /// In type context the list is required once `<` is seen. In expression
    /// context it is parsed speculatively and kept only when the token after
    /// `>` is `(` or cannot continue a comparison; otherwise nothing is
    /// consumed and `<` is left for the binary operator parser. A `>`
    /// directly followed by `=` never closes the list there.
    pub(crate) fn parse_type_arguments_in(
        &mut self,
        context: Context,
    ) -> ParseResult<Option<Vec<TypeExpr>>> {
        if !self.at(SyntaxKind::LessThanToken)? {
            return Ok(None);
        }
        match context {
            Context::Type => self.parse_type_argument_list().map(Some),
            Context::Expression => self.speculate(|p| {
                let arguments = p.parse_type_argument_list()?;
                let (kind, line_break) = p.current_kind_and_break()?;
                // `a < b >= c`: a `>` touching `=` is the comparison `>=`
                if kind == SyntaxKind::EqualsToken && p.token_pos()? == p.prev_end {
                    return Ok(None);
                }
                let confirmed = kind == SyntaxKind::OpenParenToken
                    || can_follow_type_arguments(kind, line_break);
                Ok(confirmed.then_some(arguments))
            }),
        }
    }

    /// `<A, B>`; at least one argument and no trailing comma.
    fn parse_type_argument_list(&mut self) -> ParseResult<Vec<TypeExpr>> {
        self.expect_token(SyntaxKind::LessThanToken)?;
        let mut arguments = Vec::new();
        loop {
            if !can_start_type(self.current_kind()?) {
                return Err(self.unexpected(Expected::Type));
            }
            arguments.push(self.parse_type()?);
            if self.optional_token(SyntaxKind::CommaToken)?.is_none() {
                break;
            }
        }
        self.expect_token(SyntaxKind::GreaterThanToken)?;
        Ok(arguments)
    }

    /// At `(`: whether this opens a function type's parameter list rather
    /// than a parenthesized type.
    fn is_start_of_function_type(&mut self) -> ParseResult<bool> {
        let next = self.nth_kind(1)?;
        if matches!(next, SyntaxKind::CloseParenToken | SyntaxKind::DotDotDotToken) {
            return Ok(true);
        }
        if next != SyntaxKind::Identifier {
            return Ok(false);
        }
        Ok(match self.nth_kind(2)? {
            SyntaxKind::ColonToken
            | SyntaxKind::CommaToken
            | SyntaxKind::QuestionToken
            | SyntaxKind::EqualsToken => true,
            SyntaxKind::CloseParenToken => {
                self.nth_kind(3)? == SyntaxKind::EqualsGreaterThanToken
            }
            _ => false,
        })
    }

    /// `<T>(a: T) => R` or `(a: A) => R`.
    fn parse_function_type(&mut self) -> ParseResult<TypeExpr> {
        let start = self.token_pos()?;
        let type_parameters = self.parse_type_parameters()?;
        let parameters = self.parse_parameter_list(false)?;
        self.expect_token(SyntaxKind::EqualsGreaterThanToken)?;
        let return_type = self.parse_type()?;
        Ok(TypeExpr::Function(FunctionType {
            data: self.finish(SyntaxKind::FunctionType, start),
            type_parameters,
            parameters,
            return_type: Box::new(return_type),
        }))
    }

    fn parse_parenthesized_type(&mut self) -> ParseResult<TypeExpr> {
        let start = self.token_pos()?;
        self.expect_token(SyntaxKind::OpenParenToken)?;
        let inner = self.parse_type()?;
        self.expect_token(SyntaxKind::CloseParenToken)?;
        Ok(TypeExpr::Parenthesized(ParenthesizedType {
            data: self.finish(SyntaxKind::ParenthesizedType, start),
            inner: Box::new(inner),
        }))
    }

    fn parse_tuple_type(&mut self) -> ParseResult<TypeExpr> {
        let start = self.token_pos()?;
        self.expect_token(SyntaxKind::OpenBracketToken)?;
        let mut elements = Vec::new();
        while !self.at(SyntaxKind::CloseBracketToken)? {
            if !can_start_type(self.current_kind()?) {
                return Err(self.unexpected(Expected::Type));
            }
            elements.push(self.parse_type()?);
            if self.optional_token(SyntaxKind::CommaToken)?.is_none() {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseBracketToken)?;
        Ok(TypeExpr::Tuple(TupleType {
            data: self.finish(SyntaxKind::TupleType, start),
            elements,
        }))
    }

    // ========================================================================
    // Members of interfaces and type literals
    // ========================================================================

    /// `{ member* }`, members separated by `;`, `,` or a line break.
    pub(crate) fn parse_type_members(&mut self) -> ParseResult<Vec<TypeMember>> {
        self.expect_token(SyntaxKind::OpenBraceToken)?;
        let mut members = Vec::new();
        loop {
            match self.current_kind()? {
                SyntaxKind::CloseBraceToken => break,
                SyntaxKind::EndOfFileToken => {
                    return Err(self.unexpected(Expected::Token(SyntaxKind::CloseBraceToken)));
                }
                _ => {}
            }
            members.push(self.parse_type_member()?);

            let (kind, line_break) = self.current_kind_and_break()?;
            match kind {
                SyntaxKind::SemicolonToken | SyntaxKind::CommaToken => {
                    self.bump()?;
                }
                SyntaxKind::CloseBraceToken => {}
                _ if line_break => {}
                _ => return Err(self.unexpected(Expected::Token(SyntaxKind::SemicolonToken))),
            }
        }
        self.expect_token(SyntaxKind::CloseBraceToken)?;
        Ok(members)
    }

    fn parse_type_member(&mut self) -> ParseResult<TypeMember> {
        let start = self.token_pos()?;
        let name = self.parse_identifier_name()?;
        let optional = self.optional_token(SyntaxKind::QuestionToken)?.is_some();

        if matches!(
            self.current_kind()?,
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            let type_parameters = self.parse_type_parameters()?;
            let parameters = self.parse_parameter_list(false)?;
            let return_type = self.parse_type_annotation()?;
            return Ok(TypeMember::Method(MethodSignature {
                data: self.finish(SyntaxKind::MethodSignature, start),
                name,
                optional,
                type_parameters,
                parameters,
                return_type,
            }));
        }

        let type_annotation = self.parse_type_annotation()?;
        Ok(TypeMember::Property(PropertySignature {
            data: self.finish(SyntaxKind::PropertySignature, start),
            name,
            optional,
            type_annotation,
        }))
    }
}
