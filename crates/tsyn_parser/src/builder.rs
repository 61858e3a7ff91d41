//! Node construction.
//!
//! Nodes are built bottom-up as productions complete. A node's range runs
//! from the start of its first token to the end of the last token consumed
//! for it, which the parser tracks as `prev_end`.

use tsyn_ast::node::*;
use tsyn_ast::syntax_kind::SyntaxKind;
use tsyn_core::text::TextPos;
use tsyn_scanner::Token;

use crate::parser::Parser;

impl Parser<'_> {
    /// Close a node that started at `start`.
    #[inline]
    pub(crate) fn finish(&self, kind: SyntaxKind, start: TextPos) -> NodeData {
        NodeData::new(kind, start, self.prev_end.max(start))
    }

    /// Join members parsed around `|` or `&` into one n-ary node.
    pub(crate) fn finish_list_type(
        &self,
        operator: SyntaxKind,
        start: TextPos,
        types: Vec<TypeExpr>,
    ) -> TypeExpr {
        if operator == SyntaxKind::BarToken {
            TypeExpr::Union(UnionType {
                data: self.finish(SyntaxKind::UnionType, start),
                types,
            })
        } else {
            TypeExpr::Intersection(IntersectionType {
                data: self.finish(SyntaxKind::IntersectionType, start),
                types,
            })
        }
    }

    pub(crate) fn finish_binary(
        &self,
        start: TextPos,
        left: Expression,
        operator: SyntaxKind,
        right: Expression,
    ) -> Expression {
        Expression::Binary(BinaryExpression {
            data: self.finish(SyntaxKind::BinaryExpression, start),
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }
}

pub(crate) fn identifier_from_token(token: &Token) -> Identifier {
    Identifier {
        data: NodeData::new(SyntaxKind::Identifier, token.pos(), token.end),
        text: token.text.clone(),
    }
}

/// A literal for string and numeric tokens and for the words `true`,
/// `false` and `null`.
pub(crate) fn literal_from_token(token: &Token) -> Option<Literal> {
    let (kind, value) = match token.kind {
        SyntaxKind::StringLiteral => (
            SyntaxKind::StringLiteral,
            LiteralValue::String(token.string_value().unwrap_or_default()),
        ),
        SyntaxKind::NumericLiteral => (
            SyntaxKind::NumericLiteral,
            LiteralValue::Number(token.text.clone()),
        ),
        SyntaxKind::Identifier => match token.text.as_str() {
            "true" => (SyntaxKind::TrueLiteral, LiteralValue::Boolean(true)),
            "false" => (SyntaxKind::FalseLiteral, LiteralValue::Boolean(false)),
            "null" => (SyntaxKind::NullLiteral, LiteralValue::Null),
            _ => return None,
        },
        _ => return None,
    };
    Some(Literal {
        data: NodeData::new(kind, token.pos(), token.end),
        value,
    })
}

pub(crate) fn string_literal_from_token(token: &Token) -> StringLiteral {
    StringLiteral {
        data: NodeData::new(SyntaxKind::StringLiteral, token.pos(), token.end),
        value: token.string_value().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsyn_scanner::tokenize;

    fn token(source: &str) -> Token {
        tokenize(source).next().unwrap().unwrap()
    }

    #[test]
    fn test_keyword_literals() {
        let lit = literal_from_token(&token("null")).unwrap();
        assert_eq!(lit.kind(), SyntaxKind::NullLiteral);
        assert_eq!(lit.value, LiteralValue::Null);
        let lit = literal_from_token(&token("false")).unwrap();
        assert_eq!(lit.value, LiteralValue::Boolean(false));
        assert!(literal_from_token(&token("nullish")).is_none());
    }

    #[test]
    fn test_string_literal_is_unescaped() {
        let lit = string_literal_from_token(&token(r#""a\tb""#));
        assert_eq!(lit.value, "a\tb");
        assert_eq!(lit.range().len(), 6);
    }

    #[test]
    fn test_number_keeps_source_text() {
        let lit = literal_from_token(&token("1.50")).unwrap();
        assert_eq!(lit.value, LiteralValue::Number("1.50".to_string()));
    }
}
