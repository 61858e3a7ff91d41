//! Binary operator precedence.

use tsyn_ast::syntax_kind::SyntaxKind;

/// Precedence levels from lowest to highest. Only the binary levels are
/// consulted by the climbing loop; the others order the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperatorPrecedence {
    Lowest = 0,
    Assignment = 1,
    Conditional = 2,
    NullishCoalescing = 3,
    LogicalOr = 4,
    LogicalAnd = 5,
    BitwiseOr = 6,
    BitwiseXor = 7,
    BitwiseAnd = 8,
    Equality = 9,
    Relational = 10,
    Additive = 11,
    Multiplicative = 12,
    Invalid = 255,
}

impl OperatorPrecedence {
    #[inline]
    pub fn is_binary(self) -> bool {
        self > OperatorPrecedence::Conditional && self != OperatorPrecedence::Invalid
    }
}

/// Precedence of `kind` as a binary operator, or `Invalid`.
pub fn get_binary_operator_precedence(kind: SyntaxKind) -> OperatorPrecedence {
    match kind {
        SyntaxKind::QuestionQuestionToken => OperatorPrecedence::NullishCoalescing,
        SyntaxKind::BarBarToken => OperatorPrecedence::LogicalOr,
        SyntaxKind::AmpersandAmpersandToken => OperatorPrecedence::LogicalAnd,
        SyntaxKind::BarToken => OperatorPrecedence::BitwiseOr,
        SyntaxKind::CaretToken => OperatorPrecedence::BitwiseXor,
        SyntaxKind::AmpersandToken => OperatorPrecedence::BitwiseAnd,
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken => OperatorPrecedence::Equality,
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken => OperatorPrecedence::Relational,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => OperatorPrecedence::Additive,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => {
            OperatorPrecedence::Multiplicative
        }
        _ => OperatorPrecedence::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        let ops = [
            SyntaxKind::QuestionQuestionToken,
            SyntaxKind::BarBarToken,
            SyntaxKind::AmpersandAmpersandToken,
            SyntaxKind::BarToken,
            SyntaxKind::CaretToken,
            SyntaxKind::AmpersandToken,
            SyntaxKind::EqualsEqualsEqualsToken,
            SyntaxKind::LessThanToken,
            SyntaxKind::PlusToken,
            SyntaxKind::AsteriskToken,
        ];
        for pair in ops.windows(2) {
            assert!(
                get_binary_operator_precedence(pair[0]) < get_binary_operator_precedence(pair[1]),
                "{:?} should bind looser than {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_non_operators() {
        assert_eq!(
            get_binary_operator_precedence(SyntaxKind::EqualsToken),
            OperatorPrecedence::Invalid
        );
        assert!(!get_binary_operator_precedence(SyntaxKind::CommaToken).is_binary());
        assert!(get_binary_operator_precedence(SyntaxKind::PercentToken).is_binary());
    }
}
