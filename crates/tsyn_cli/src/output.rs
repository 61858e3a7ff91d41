//! What the CLI prints for a successfully parsed file.

use std::fmt::Write;

use tsyn_ast::types::KeywordSet;
use tsyn_ast::visitor::{walk_expression, walk_statement, walk_type, Visitor};
use tsyn_ast::{AstNode, Expression, Program, Statement, SyntaxKind, TypeExpr};
use tsyn_core::text::LineMap;
use tsyn_scanner::{LexError, Lexer};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// One line per declaration, with node counts.
    Outline,
    /// The full syntax tree as JSON.
    Json,
    /// The token sequence, without parsing.
    Tokens,
}

// ============================================================================
// Outline
// ============================================================================

struct Outline<'a> {
    source: &'a str,
    line_map: LineMap,
    depth: usize,
    lines: Vec<String>,
    types: usize,
    expressions: usize,
}

impl Visitor for Outline<'_> {
    fn visit_statement(&mut self, stmt: &Statement) {
        let position = self.line_map.position_of(self.source, stmt.range().pos);
        let mut line = format!(
            "{:indent$}{}:{} {:?}",
            "",
            position.line,
            position.column,
            stmt.kind(),
            indent = 2 * (self.depth + 1)
        );
        match stmt {
            Statement::Import(import) => {
                let _ = write!(line, " {:?}", import.source.value);
            }
            // The exported declaration gets its own line.
            Statement::Export(_) => {}
            _ => {
                if let Some(name) = stmt.declared_name() {
                    let _ = write!(line, " {}", name.text);
                }
            }
        }
        self.lines.push(line);

        self.depth += 1;
        walk_statement(self, stmt);
        self.depth -= 1;
    }

    fn visit_type(&mut self, ty: &TypeExpr) {
        self.types += 1;
        walk_type(self, ty);
    }

    fn visit_expression(&mut self, expr: &Expression) {
        self.expressions += 1;
        walk_expression(self, expr);
    }
}

/// A short listing of the statements in `program`.
pub fn outline(file: &str, source: &str, program: &Program) -> String {
    let mut outline = Outline {
        source,
        line_map: LineMap::new(source),
        depth: 0,
        lines: Vec::new(),
        types: 0,
        expressions: 0,
    };
    outline.visit_program(program);

    let mut out = format!(
        "{}: {} statements, {} types, {} expressions\n",
        file,
        program.statements.len(),
        outline.types,
        outline.expressions
    );
    for line in &outline.lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

// ============================================================================
// Tokens
// ============================================================================

/// One line per token: position, kind, and lexeme. Stops at the first
/// lexical error.
pub fn tokens(source: &str, keywords: KeywordSet) -> Result<String, LexError> {
    let mut out = String::new();
    for token in Lexer::with_keywords(source, keywords) {
        let token = token?;
        if token.kind == SyntaxKind::EndOfFileToken {
            let _ = writeln!(out, "{} {:?}", token.position, token.kind);
        } else {
            let _ = writeln!(out, "{} {:?} {}", token.position, token.kind, token.text);
        }
    }
    Ok(out)
}

// ============================================================================
// JSON
// ============================================================================

/// `{"file": ..., "program": ...}` for one parsed file.
pub fn json(file: &str, program: &Program) -> serde_json::Result<serde_json::Value> {
    Ok(serde_json::json!({
        "file": file,
        "program": serde_json::to_value(program)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Program {
        tsyn_parser::parse_program(source).unwrap()
    }

    #[test]
    fn test_outline_lists_declarations() {
        let source = "import \"x\";\ninterface A { b: B }\nexport type T = A | null;\nf(1);\n";
        let text = outline("a.ts", source, &parse(source));
        assert_eq!(
            text,
            "a.ts: 4 statements, 4 types, 3 expressions\n\
             \x20 1:1 ImportDeclaration \"x\"\n\
             \x20 2:1 InterfaceDeclaration A\n\
             \x20 3:1 ExportDeclaration\n\
             \x20   3:8 TypeAliasDeclaration T\n\
             \x20 4:1 ExpressionStatement\n"
        );
    }

    #[test]
    fn test_tokens_dump() {
        let text = tokens("let a = 1", KeywordSet::default()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "1:1 Identifier let",
                "1:5 Identifier a",
                "1:7 EqualsToken =",
                "1:9 NumericLiteral 1",
                "1:10 EndOfFileToken",
            ]
        );
    }

    #[test]
    fn test_tokens_stop_at_lex_error() {
        let err = tokens("a # b", KeywordSet::default()).unwrap_err();
        assert_eq!(err.position.offset, 2);
    }

    #[test]
    fn test_json_carries_file_and_kind() {
        let value = json("a.ts", &parse("let a = 1;")).unwrap();
        assert_eq!(value["file"], "a.ts");
        assert_eq!(value["program"]["kind"], "Program");
        assert_eq!(value["program"]["statements"][0]["kind"], "VariableDeclaration");
    }
}
