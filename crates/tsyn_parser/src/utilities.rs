//! Token classification used by the parser's lookahead decisions.

use tsyn_ast::syntax_kind::SyntaxKind;

use crate::precedence::get_binary_operator_precedence;

/// Whether a token of this kind can begin a type.
pub fn can_start_type(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Identifier
            | SyntaxKind::NumericLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::OpenParenToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::LessThanToken
            | SyntaxKind::BarToken
            | SyntaxKind::AmpersandToken
    )
}

/// Whether a token of this kind can begin an expression.
pub fn can_start_expression(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Identifier
            | SyntaxKind::NumericLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::OpenParenToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::NewKeyword
            | SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
    )
}

/// Whether `f<T>` followed by a token of this kind reads as an
/// instantiation expression. `preceded_by_line_break` is the token's
/// line-break flag.
///
/// A token that could begin an operand (`a < b > c`) or is ambiguous as
/// an operator (`<`, `>`, `+`, `-`) makes the `<` a comparison instead.
pub fn can_follow_type_arguments(kind: SyntaxKind, preceded_by_line_break: bool) -> bool {
    match kind {
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::PlusToken
        | SyntaxKind::MinusToken => false,
        _ => {
            preceded_by_line_break
                || get_binary_operator_precedence(kind).is_binary()
                || !can_start_expression(kind)
        }
    }
}

/// Prefix operators accepted by the unary expression parser.
pub fn is_prefix_unary_operator(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::ExclamationToken
            | SyntaxKind::MinusToken
            | SyntaxKind::PlusToken
            | SyntaxKind::TildeToken
    )
}
