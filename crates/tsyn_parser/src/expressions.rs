//! Expressions.
//!
//! Assignment is right-associative and sits above the conditional
//! operator; binary operators are parsed by precedence climbing. `<` after
//! a callee goes through `parse_type_arguments_in(Context::Expression)`,
//! which either commits to type arguments or leaves the `<` untouched for
//! the comparison parser.

use tsyn_ast::node::*;
use tsyn_ast::syntax_kind::SyntaxKind;
use tsyn_core::text::TextPos;

use crate::builder::{identifier_from_token, literal_from_token};
use crate::error::{Expected, ParseResult};
use crate::parser::{Context, Parser};
use crate::precedence::{get_binary_operator_precedence, OperatorPrecedence};
use crate::utilities::is_prefix_unary_operator;

/// Outcome of scanning ahead from a `(` for an arrow function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrowLookahead {
    /// `(...) =>`
    Arrow,
    /// `(...) :` is either a return type or the `:` of a conditional.
    Ambiguous,
    NotArrow,
}

impl Parser<'_> {
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_assignment_expression()
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> ParseResult<Expression> {
        self.nested(Expected::Expression, Self::parse_assignment_expression_worker)
    }

    fn parse_assignment_expression_worker(&mut self) -> ParseResult<Expression> {
        if let Some(arrow) = self.parse_arrow_function_if_present()? {
            return Ok(Expression::Arrow(arrow));
        }
        let start = self.token_pos()?;
        let left = self.parse_conditional_expression()?;
        let operator = self.current_kind()?;
        if !operator.is_assignment_operator() {
            return Ok(left);
        }
        self.bump()?;
        let right = self.parse_assignment_expression()?;
        Ok(self.finish_binary(start, left, operator, right))
    }

    fn parse_conditional_expression(&mut self) -> ParseResult<Expression> {
        let start = self.token_pos()?;
        let condition = self.parse_binary_expression(OperatorPrecedence::Conditional)?;
        if self.optional_token(SyntaxKind::QuestionToken)?.is_none() {
            return Ok(condition);
        }
        let when_true = self.parse_assignment_expression()?;
        self.expect_token(SyntaxKind::ColonToken)?;
        let when_false = self.parse_assignment_expression()?;
        Ok(Expression::Conditional(ConditionalExpression {
            data: self.finish(SyntaxKind::ConditionalExpression, start),
            condition: Box::new(condition),
            when_true: Box::new(when_true),
            when_false: Box::new(when_false),
        }))
    }

    /// Operands joined by operators binding tighter than `min_precedence`.
    /// Operators of equal precedence associate to the left.
    fn parse_binary_expression(
        &mut self,
        min_precedence: OperatorPrecedence,
    ) -> ParseResult<Expression> {
        let start = self.token_pos()?;
        let mut left = self.parse_unary_expression()?;
        self.chained(|p| {
            while let Some((operator, width)) = p.peek_binary_operator()? {
                let precedence = get_binary_operator_precedence(operator);
                if precedence <= min_precedence {
                    break;
                }
                p.deepen(Expected::Expression)?;
                for _ in 0..width {
                    p.bump()?;
                }
                let right = p.parse_binary_expression(precedence)?;
                left = p.finish_binary(start, left, operator, right);
            }
            Ok(left)
        })
    }

    /// The binary operator at the cursor and how many tokens spell it.
    /// The lexer never produces `>=`; a `>` directly followed by `=` is
    /// joined here.
    fn peek_binary_operator(&mut self) -> ParseResult<Option<(SyntaxKind, usize)>> {
        let token = self.current()?;
        let (kind, end) = (token.kind, token.end);
        if kind == SyntaxKind::GreaterThanToken {
            let next = self.stream.peek(1)?;
            if next.kind == SyntaxKind::EqualsToken && next.pos() == end {
                return Ok(Some((SyntaxKind::GreaterThanEqualsToken, 2)));
            }
        }
        if get_binary_operator_precedence(kind).is_binary() {
            Ok(Some((kind, 1)))
        } else {
            Ok(None)
        }
    }

    fn parse_unary_expression(&mut self) -> ParseResult<Expression> {
        let operator = self.current_kind()?;
        if !is_prefix_unary_operator(operator) {
            return self.parse_left_hand_side_expression();
        }
        let start = self.token_pos()?;
        self.bump()?;
        let operand = self.nested(Expected::Expression, Self::parse_unary_expression)?;
        Ok(Expression::PrefixUnary(PrefixUnaryExpression {
            data: self.finish(SyntaxKind::PrefixUnaryExpression, start),
            operator,
            operand: Box::new(operand),
        }))
    }

    fn parse_left_hand_side_expression(&mut self) -> ParseResult<Expression> {
        let start = self.token_pos()?;
        let expression = if self.at(SyntaxKind::NewKeyword)? {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        self.parse_member_suffix(start, expression, true)
    }

    /// Property access, element access and, when `allow_calls` is set,
    /// calls, generic calls and instantiations, applied left to right.
    /// Each one wraps the expression so far and counts as a nesting level.
    fn parse_member_suffix(
        &mut self,
        start: TextPos,
        expression: Expression,
        allow_calls: bool,
    ) -> ParseResult<Expression> {
        self.chained(|p| p.parse_member_suffix_worker(start, expression, allow_calls))
    }

    fn parse_member_suffix_worker(
        &mut self,
        start: TextPos,
        mut expression: Expression,
        allow_calls: bool,
    ) -> ParseResult<Expression> {
        loop {
            match self.current_kind()? {
                kind @ (SyntaxKind::DotToken | SyntaxKind::QuestionDotToken) => {
                    self.deepen(Expected::Expression)?;
                    self.bump()?;
                    let name = self.parse_identifier_name()?;
                    expression = Expression::PropertyAccess(PropertyAccessExpression {
                        data: self.finish(SyntaxKind::PropertyAccessExpression, start),
                        object: Box::new(expression),
                        name,
                        optional: kind == SyntaxKind::QuestionDotToken,
                    });
                }
                SyntaxKind::OpenBracketToken => {
                    self.deepen(Expected::Expression)?;
                    self.bump()?;
                    let index = self.parse_expression()?;
                    self.expect_token(SyntaxKind::CloseBracketToken)?;
                    expression = Expression::ElementAccess(ElementAccessExpression {
                        data: self.finish(SyntaxKind::ElementAccessExpression, start),
                        object: Box::new(expression),
                        index: Box::new(index),
                    });
                }
                SyntaxKind::OpenParenToken if allow_calls => {
                    self.deepen(Expected::Expression)?;
                    let arguments = self.parse_argument_list()?;
                    expression = Expression::Call(CallExpression {
                        data: self.finish(SyntaxKind::CallExpression, start),
                        callee: Box::new(expression),
                        type_arguments: None,
                        arguments,
                    });
                }
                SyntaxKind::LessThanToken if allow_calls => {
                    let Some(type_arguments) = self.parse_type_arguments_in(Context::Expression)?
                    else {
                        break;
                    };
                    self.deepen(Expected::Expression)?;
                    expression = if self.at(SyntaxKind::OpenParenToken)? {
                        let arguments = self.parse_argument_list()?;
                        Expression::Call(CallExpression {
                            data: self.finish(SyntaxKind::CallExpression, start),
                            callee: Box::new(expression),
                            type_arguments: Some(type_arguments),
                            arguments,
                        })
                    } else {
                        Expression::Instantiation(InstantiationExpression {
                            data: self.finish(SyntaxKind::InstantiationExpression, start),
                            expression: Box::new(expression),
                            type_arguments,
                        })
                    };
                }
                _ => break,
            }
        }
        Ok(expression)
    }

    /// `new C`, `new C<T>(args)`, `new a.b.C(args)`.
    fn parse_new_expression(&mut self) -> ParseResult<Expression> {
        let start = self.token_pos()?;
        self.expect_token(SyntaxKind::NewKeyword)?;
        let callee_start = self.token_pos()?;
        let callee = if self.at(SyntaxKind::NewKeyword)? {
            self.nested(Expected::Expression, Self::parse_new_expression)?
        } else {
            self.parse_primary_expression()?
        };
        let callee = self.parse_member_suffix(callee_start, callee, false)?;
        let type_arguments = self.parse_type_arguments_in(Context::Expression)?;
        let arguments = if self.at(SyntaxKind::OpenParenToken)? {
            Some(self.parse_argument_list()?)
        } else {
            None
        };
        Ok(Expression::New(NewExpression {
            data: self.finish(SyntaxKind::NewExpression, start),
            callee: Box::new(callee),
            type_arguments,
            arguments,
        }))
    }

    fn parse_argument_list(&mut self) -> ParseResult<Vec<Expression>> {
        self.expect_token(SyntaxKind::OpenParenToken)?;
        let mut arguments = Vec::new();
        while !self.at(SyntaxKind::CloseParenToken)? {
            arguments.push(self.parse_assignment_expression()?);
            if self.optional_token(SyntaxKind::CommaToken)?.is_none() {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseParenToken)?;
        Ok(arguments)
    }

    fn parse_primary_expression(&mut self) -> ParseResult<Expression> {
        match self.current_kind()? {
            SyntaxKind::Identifier | SyntaxKind::NumericLiteral | SyntaxKind::StringLiteral => {
                let token = self.bump()?;
                Ok(match literal_from_token(&token) {
                    Some(literal) => Expression::Literal(literal),
                    None => Expression::Identifier(identifier_from_token(&token)),
                })
            }
            SyntaxKind::OpenParenToken => self.parse_parenthesized_expression(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            _ => Err(self.unexpected(Expected::Expression)),
        }
    }

    fn parse_parenthesized_expression(&mut self) -> ParseResult<Expression> {
        let start = self.token_pos()?;
        self.expect_token(SyntaxKind::OpenParenToken)?;
        let expression = self.parse_expression()?;
        self.expect_token(SyntaxKind::CloseParenToken)?;
        Ok(Expression::Parenthesized(ParenthesizedExpression {
            data: self.finish(SyntaxKind::ParenthesizedExpression, start),
            expression: Box::new(expression),
        }))
    }

    fn parse_object_literal(&mut self) -> ParseResult<Expression> {
        let start = self.token_pos()?;
        self.expect_token(SyntaxKind::OpenBraceToken)?;
        let mut properties = Vec::new();
        while !self.at(SyntaxKind::CloseBraceToken)? {
            properties.push(self.parse_object_property()?);
            if self.optional_token(SyntaxKind::CommaToken)?.is_none() {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseBraceToken)?;
        Ok(Expression::Object(ObjectLiteral {
            data: self.finish(SyntaxKind::ObjectLiteralExpression, start),
            properties,
        }))
    }

    /// `key: value` or shorthand `key`. Keys may be names, reserved words,
    /// strings or numbers; only a plain identifier may be shorthand.
    fn parse_object_property(&mut self) -> ParseResult<ObjectProperty> {
        let start = self.token_pos()?;
        let kind = self.current_kind()?;
        let key = if kind.is_identifier_or_keyword() {
            PropertyKey::Identifier(self.parse_identifier_name()?)
        } else if matches!(kind, SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral) {
            let token = self.bump()?;
            match literal_from_token(&token) {
                Some(literal) => PropertyKey::Literal(literal),
                None => return Err(self.expected_identifier()),
            }
        } else {
            return Err(self.expected_identifier());
        };

        if self.optional_token(SyntaxKind::ColonToken)?.is_some() {
            let value = self.parse_assignment_expression()?;
            return Ok(ObjectProperty::Assignment(PropertyAssignment {
                data: self.finish(SyntaxKind::PropertyAssignment, start),
                key,
                value,
            }));
        }
        match key {
            PropertyKey::Identifier(name) if kind == SyntaxKind::Identifier => {
                Ok(ObjectProperty::Shorthand(ShorthandProperty {
                    data: self.finish(SyntaxKind::ShorthandPropertyAssignment, start),
                    name,
                }))
            }
            _ => Err(self.unexpected(Expected::Token(SyntaxKind::ColonToken))),
        }
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expression> {
        let start = self.token_pos()?;
        self.expect_token(SyntaxKind::OpenBracketToken)?;
        let mut elements = Vec::new();
        while !self.at(SyntaxKind::CloseBracketToken)? {
            elements.push(self.parse_assignment_expression()?);
            if self.optional_token(SyntaxKind::CommaToken)?.is_none() {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseBracketToken)?;
        Ok(Expression::Array(ArrayLiteral {
            data: self.finish(SyntaxKind::ArrayLiteralExpression, start),
            elements,
        }))
    }

    // ========================================================================
    // Arrow functions
    // ========================================================================

    fn parse_arrow_function_if_present(&mut self) -> ParseResult<Option<ArrowFunction>> {
        match self.current_kind()? {
            SyntaxKind::Identifier if self.nth_kind(1)? == SyntaxKind::EqualsGreaterThanToken => {
                self.parse_simple_arrow_function().map(Some)
            }
            SyntaxKind::OpenParenToken => match self.arrow_lookahead() {
                ArrowLookahead::Arrow => self.parse_parenthesized_arrow_function().map(Some),
                ArrowLookahead::Ambiguous => {
                    self.speculate(|p| p.parse_parenthesized_arrow_function().map(Some))
                }
                ArrowLookahead::NotArrow => Ok(None),
            },
            _ => Ok(None),
        }
    }

    /// At `(`: find the matching `)` and look at the token after it. A
    /// lexical error ahead ends the scan; the ordinary parse reports it.
    fn arrow_lookahead(&mut self) -> ArrowLookahead {
        let mut depth = 0usize;
        let mut offset = 0;
        loop {
            match self.stream.peek_kind(offset) {
                Ok(SyntaxKind::OpenParenToken) => depth += 1,
                Ok(SyntaxKind::CloseParenToken) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Ok(SyntaxKind::EndOfFileToken) | Err(_) => return ArrowLookahead::NotArrow,
                Ok(_) => {}
            }
            offset += 1;
        }
        match self.stream.peek_kind(offset + 1) {
            Ok(SyntaxKind::EqualsGreaterThanToken) => ArrowLookahead::Arrow,
            Ok(SyntaxKind::ColonToken) => ArrowLookahead::Ambiguous,
            _ => ArrowLookahead::NotArrow,
        }
    }

    /// `x => body`
    fn parse_simple_arrow_function(&mut self) -> ParseResult<ArrowFunction> {
        let start = self.token_pos()?;
        let token = self.bump()?;
        let parameter = Parameter {
            data: NodeData::new(SyntaxKind::Parameter, token.pos(), token.end),
            rest: false,
            name: identifier_from_token(&token),
            optional: false,
            type_annotation: None,
            initializer: None,
        };
        self.expect_token(SyntaxKind::EqualsGreaterThanToken)?;
        let body = self.parse_arrow_body()?;
        Ok(ArrowFunction {
            data: self.finish(SyntaxKind::ArrowFunction, start),
            parameters: vec![parameter],
            return_type: None,
            body,
        })
    }

    /// `(params)[: R] => body`
    fn parse_parenthesized_arrow_function(&mut self) -> ParseResult<ArrowFunction> {
        let start = self.token_pos()?;
        let parameters = self.parse_parameter_list(true)?;
        let return_type = self.parse_type_annotation()?;
        self.expect_token(SyntaxKind::EqualsGreaterThanToken)?;
        let body = self.parse_arrow_body()?;
        Ok(ArrowFunction {
            data: self.finish(SyntaxKind::ArrowFunction, start),
            parameters,
            return_type,
            body,
        })
    }

    fn parse_arrow_body(&mut self) -> ParseResult<ArrowBody> {
        if self.at(SyntaxKind::OpenBraceToken)? {
            self.parse_function_body().map(ArrowBody::Block)
        } else {
            self.parse_assignment_expression()
                .map(|e| ArrowBody::Expression(Box::new(e)))
        }
    }
}
