//! Parser integration tests.
//!
//! Verifies the tree shapes the parser builds, how it resolves `<`, and
//! the single error it reports for malformed input.

use pretty_assertions::assert_eq;
use tsyn_ast::node::*;
use tsyn_ast::syntax_kind::SyntaxKind;
use tsyn_ast::types::KeywordSet;
use tsyn_ast::visitor::verify_spans;
use tsyn_core::text::Position;
use tsyn_parser::{
    parse_expression, parse_program, parse_program_with, parse_type, Expected, ParseError,
    ParseErrorKind, ParseOptions, SyntaxError,
};
use tsyn_scanner::LexErrorKind;

const FIXTURE: &str = include_str!("fixtures/main.ts");

fn parse_ok(source: &str) -> Program {
    match parse_program(source) {
        Ok(program) => program,
        Err(err) => panic!("failed to parse {:?}: {}", source, err),
    }
}

fn parse_err(source: &str) -> ParseError {
    match parse_program(source) {
        Err(SyntaxError::Parse(err)) => err,
        other => panic!("expected a parse error for {:?}, got {:?}", source, other),
    }
}

fn named(ty: &TypeExpr) -> &TypeReference {
    ty.as_named()
        .unwrap_or_else(|| panic!("expected a named type, got {:?}", ty))
}

fn names(types: &[TypeExpr]) -> Vec<&str> {
    types.iter().map(|t| named(t).name.text.as_str()).collect()
}

// ============================================================================
// Type expressions
// ============================================================================

#[test]
fn test_union_of_three_names() {
    let TypeExpr::Union(union) = parse_type("A | B | C").unwrap() else {
        panic!("expected a union");
    };
    assert_eq!(names(&union.types), vec!["A", "B", "C"]);
}

#[test]
fn test_generic_argument_holding_union_of_array() {
    let ty = parse_type("A<B[] | C>").unwrap();
    let reference = named(&ty);
    assert_eq!(reference.name.text, "A");
    let arguments = reference.type_arguments.as_ref().unwrap();
    assert_eq!(arguments.len(), 1);
    let TypeExpr::Union(ref union) = arguments[0] else {
        panic!("expected a union argument");
    };
    let TypeExpr::Array(ref array) = union.types[0] else {
        panic!("expected an array member");
    };
    assert_eq!(named(&array.element).name.text, "B");
    assert_eq!(named(&union.types[1]).name.text, "C");
}

#[test]
fn test_nested_generics_close_with_separate_tokens() {
    let ty = parse_type("Map<string, Array<Set<T>>>").unwrap();
    let outer = named(&ty).type_arguments.as_ref().unwrap();
    assert_eq!(outer.len(), 2);
    assert_eq!(named(&outer[1]).name.text, "Array");
}

#[test]
fn test_literal_types() {
    let TypeExpr::Union(union) = parse_type(r#""a" | 1 | true | null"#).unwrap() else {
        panic!("expected a union");
    };
    let values: Vec<_> = union
        .types
        .iter()
        .map(|t| match t {
            TypeExpr::Literal(lit) => lit.literal.value.clone(),
            other => panic!("expected a literal type, got {:?}", other),
        })
        .collect();
    assert_eq!(
        values,
        vec![
            LiteralValue::String("a".to_string()),
            LiteralValue::Number("1".to_string()),
            LiteralValue::Boolean(true),
            LiteralValue::Null,
        ]
    );
}

#[test]
fn test_trailing_union_operator() {
    let err = parse_err("type T = A |");
    assert_eq!(err.kind, ParseErrorKind::ExpectedType);
    assert_eq!(err.expected, Expected::Type);
    assert_eq!(err.position, Position::new(12, 1, 13));
    assert!(err.found.is_end_of_input());
}

#[test]
fn test_trailing_intersection_operator() {
    let err = parse_err("let x: A & ;");
    assert_eq!(err.kind, ParseErrorKind::ExpectedType);
    assert_eq!(err.found.text, ";");
}

#[test]
fn test_empty_type_argument_list() {
    let Err(SyntaxError::Parse(err)) = parse_type("A<>") else {
        panic!("expected a parse error");
    };
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    assert_eq!(err.expected, Expected::Type);
    assert_eq!(err.found.kind, SyntaxKind::GreaterThanToken);
}

#[test]
fn test_dangling_comma_in_type_arguments() {
    let Err(SyntaxError::Parse(err)) = parse_type("A<B,>") else {
        panic!("expected a parse error");
    };
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    assert_eq!(err.expected, Expected::Type);
    assert_eq!(err.found.text, ">");
    assert_eq!(err.position.offset, 4);
}

#[test]
fn test_type_annotation_followed_by_equals() {
    let program = parse_ok("let x: Array<number>= [];");
    let Statement::Variable(ref decl) = program.statements[0] else {
        panic!("expected a variable");
    };
    assert!(decl.type_annotation.is_some());
    assert!(matches!(decl.initializer, Some(Expression::Array(_))));
}

// ============================================================================
// Expressions and the `<` ambiguity
// ============================================================================

#[test]
fn test_less_than_inside_call_is_comparison() {
    let Expression::Call(call) = parse_expression("console.log(React < SomeType)").unwrap() else {
        panic!("expected a call");
    };
    assert!(call.type_arguments.is_none());
    let Expression::PropertyAccess(ref callee) = *call.callee else {
        panic!("expected a property access callee");
    };
    assert_eq!(callee.name.text, "log");
    assert_eq!(call.arguments.len(), 1);
    let Expression::Binary(ref comparison) = call.arguments[0] else {
        panic!("expected a binary argument");
    };
    assert_eq!(comparison.operator, SyntaxKind::LessThanToken);
}

#[test]
fn test_greater_than_equals_after_less_than_is_comparison() {
    let Expression::Binary(outer) = parse_expression("a < b >= c").unwrap() else {
        panic!("expected a binary expression");
    };
    assert_eq!(outer.operator, SyntaxKind::GreaterThanEqualsToken);
    let Expression::Binary(ref inner) = *outer.left else {
        panic!("expected a comparison on the left");
    };
    assert_eq!(inner.operator, SyntaxKind::LessThanToken);
    assert!(matches!(*outer.right, Expression::Identifier(ref id) if id.text == "c"));
}

#[test]
fn test_generic_call_with_union_argument() {
    let Expression::Call(call) =
        parse_expression("React.useState<SomeType[] | null>(null)").unwrap()
    else {
        panic!("expected a call");
    };
    let type_arguments = call.type_arguments.as_ref().unwrap();
    assert_eq!(type_arguments.len(), 1);
    let TypeExpr::Union(ref union) = type_arguments[0] else {
        panic!("expected a union type argument");
    };
    assert!(matches!(union.types[0], TypeExpr::Array(ref a) if named(&a.element).name.text == "SomeType"));
    assert!(matches!(union.types[1], TypeExpr::Literal(ref l) if l.literal.value == LiteralValue::Null));
    assert_eq!(call.arguments.len(), 1);
    assert!(matches!(call.arguments[0], Expression::Literal(ref l) if l.value == LiteralValue::Null));
}

#[test]
fn test_generic_call_statement() {
    let program = parse_ok("something<SomeType[] | OtherType, string>(1, 2);");
    let Statement::Expression(ref stmt) = program.statements[0] else {
        panic!("expected an expression statement");
    };
    let Expression::Call(ref call) = stmt.expression else {
        panic!("expected a call");
    };
    assert_eq!(call.type_arguments.as_ref().map(Vec::len), Some(2));
    assert_eq!(call.arguments.len(), 2);
}

#[test]
fn test_instantiation_before_semicolon() {
    let program = parse_ok("const make = createBox<string>;");
    let Statement::Variable(ref decl) = program.statements[0] else {
        panic!("expected a variable");
    };
    assert!(matches!(decl.initializer, Some(Expression::Instantiation(_))));
}

#[test]
fn test_arrow_function_with_block_body() {
    let program = parse_ok("const b = () => {\n  return 1;\n};");
    let Statement::Variable(ref decl) = program.statements[0] else {
        panic!("expected a variable");
    };
    let Some(Expression::Arrow(ref arrow)) = decl.initializer else {
        panic!("expected an arrow function");
    };
    assert!(arrow.parameters.is_empty());
    let ArrowBody::Block(ref body) = arrow.body else {
        panic!("expected a block body");
    };
    assert_eq!(body.token_count, 3);
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_import_forms() {
    let program = parse_ok(
        "import a from \"b\";\n\
         import { c, d as e } from './f';\n\
         import * as ns from 'g';\n\
         import h, { i } from 'j';\n\
         import 'side-effect';",
    );
    let imports: Vec<_> = program
        .statements
        .iter()
        .map(|s| match s {
            Statement::Import(import) => import,
            other => panic!("expected an import, got {:?}", other),
        })
        .collect();
    assert_eq!(imports[0].default_binding.as_ref().unwrap().text, "a");
    assert_eq!(imports[0].source.value, "b");
    assert_eq!(imports[1].named_bindings.len(), 2);
    assert_eq!(
        imports[1].named_bindings[1].property_name.as_ref().unwrap().text,
        "d"
    );
    assert_eq!(imports[1].named_bindings[1].name.text, "e");
    assert_eq!(imports[2].namespace_binding.as_ref().unwrap().text, "ns");
    assert_eq!(imports[3].named_bindings.len(), 1);
    assert!(imports[3].default_binding.is_some());
    assert_eq!(imports[4].source.value, "side-effect");
}

#[test]
fn test_import_requires_from() {
    let err = parse_err("import a \"b\";");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    assert_eq!(err.expected, Expected::Word("from"));
}

#[test]
fn test_export_forms() {
    let program = parse_ok(
        "export type A = string;\n\
         export { a, b as c };\n\
         export { d } from './e';\n\
         export default a;\n\
         export function f(): void {}",
    );
    let clauses: Vec<_> = program
        .statements
        .iter()
        .map(|s| match s {
            Statement::Export(export) => &export.clause,
            other => panic!("expected an export, got {:?}", other),
        })
        .collect();
    assert!(matches!(clauses[0], ExportClause::Declaration(d) if matches!(**d, Statement::TypeAlias(_))));
    assert!(matches!(clauses[1], ExportClause::Named { specifiers, source: None } if specifiers.len() == 2));
    assert!(matches!(clauses[2], ExportClause::Named { source: Some(_), .. }));
    assert!(matches!(clauses[3], ExportClause::Default(Expression::Identifier(_))));
    assert_eq!(
        program.statements[4].declared_name().map(|n| n.text.as_str()),
        Some("f")
    );
}

#[test]
fn test_interface_declaration() {
    let program = parse_ok(
        "interface Props<T> extends Base, ns.Other<T> {\n\
           name: string\n\
           age?: number,\n\
           render(item: T): void;\n\
         }",
    );
    let Statement::Interface(ref decl) = program.statements[0] else {
        panic!("expected an interface");
    };
    assert_eq!(decl.name.text, "Props");
    assert_eq!(decl.type_parameters.len(), 1);
    assert_eq!(names(&decl.extends), vec!["Base", "ns.Other"]);
    assert_eq!(decl.members.len(), 3);
    assert!(matches!(decl.members[1], TypeMember::Property(ref p) if p.optional));
    assert!(matches!(decl.members[2], TypeMember::Method(ref m) if m.parameters.len() == 1));
}

#[test]
fn test_interface_member_without_name() {
    let err = parse_err("interface A { : string }");
    assert_eq!(err.kind, ParseErrorKind::ExpectedIdentifier);
    assert_eq!(err.found.text, ":");
    assert_eq!(err.position, Position::new(14, 1, 15));
}

#[test]
fn test_interface_members_on_one_line_need_separators() {
    let err = parse_err("interface A { a: string b: number }");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    assert_eq!(err.expected, Expected::Token(SyntaxKind::SemicolonToken));
}

#[test]
fn test_unclosed_interface() {
    let err = parse_err("interface A { a: string;");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedEndOfInput);
    assert_eq!(err.expected, Expected::Token(SyntaxKind::CloseBraceToken));
}

#[test]
fn test_function_declaration() {
    let program =
        parse_ok("function pick<T extends object, K = keyof>(obj: T, ...keys: K[]): T { return obj; }");
    let Statement::Function(ref decl) = program.statements[0] else {
        panic!("expected a function");
    };
    assert_eq!(decl.type_parameters.len(), 2);
    assert!(decl.type_parameters[0].constraint.is_some());
    assert!(decl.type_parameters[1].default.is_some());
    assert_eq!(decl.parameters.len(), 2);
    assert!(decl.parameters[1].rest);
    assert!(decl.return_type.is_some());
    assert!(decl.body.is_some());
}

#[test]
fn test_function_parameter_defaults_and_optionals() {
    let program = parse_ok("function f(a?: string, b = { x: 1 }) {}");
    let Statement::Function(ref decl) = program.statements[0] else {
        panic!("expected a function");
    };
    assert!(decl.parameters[0].optional);
    assert!(matches!(decl.parameters[1].initializer, Some(Expression::Object(_))));
}

#[test]
fn test_overload_signature_has_no_body() {
    let program = parse_ok("function f(a: string): void;\nfunction f(a) {}");
    let bodies: Vec<_> = program
        .statements
        .iter()
        .map(|s| match s {
            Statement::Function(f) => f.body.is_some(),
            other => panic!("expected a function, got {:?}", other),
        })
        .collect();
    assert_eq!(bodies, vec![false, true]);
}

#[test]
fn test_return_and_empty_statements() {
    let program = parse_ok(";return\nreturn a + 1;");
    assert!(matches!(program.statements[0], Statement::Empty(_)));
    assert!(matches!(program.statements[1], Statement::Return(ReturnStatement { expression: None, .. })));
    assert!(matches!(program.statements[2], Statement::Return(ReturnStatement { expression: Some(_), .. })));
}

#[test]
fn test_statement_cannot_start_with_operator() {
    let err = parse_err("} x");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    assert_eq!(err.expected, Expected::Declaration);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unterminated_string_is_a_lex_error() {
    let Err(SyntaxError::Lex(err)) = parse_program("const x = \"abc") else {
        panic!("expected a lexical error");
    };
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.position, Position::new(10, 1, 11));
}

#[test]
fn test_lex_error_inside_skipped_body() {
    let Err(SyntaxError::Lex(err)) = parse_program("function f() { @ }") else {
        panic!("expected a lexical error");
    };
    assert_eq!(err.kind, LexErrorKind::UnexpectedChar('@'));
}

#[test]
fn test_earlier_parse_error_wins_over_later_lex_error() {
    let err = parse_err("const = 'abc");
    assert_eq!(err.kind, ParseErrorKind::ExpectedIdentifier);
    assert_eq!(err.found.text, "=");
}

#[test]
fn test_error_converts_to_diagnostic() {
    let Err(err) = parse_program("type T = A |") else {
        panic!("expected an error");
    };
    let diagnostic = err.to_diagnostic().in_file("main.ts");
    assert_eq!(diagnostic.to_string(), "main.ts(1,13): error TS1110: Type expected.");
}

#[test]
fn test_nesting_limit() {
    let options = ParseOptions::default().with_max_nesting_depth(10);
    let deep = format!("const x = {}1{};", "(".repeat(20), ")".repeat(20));
    let Err(SyntaxError::Parse(err)) = parse_program_with(&deep, &options) else {
        panic!("expected a parse error");
    };
    assert_eq!(err.kind, ParseErrorKind::NestingLimitExceeded { limit: 10 });

    let shallow = format!("const x = {}1{};", "(".repeat(5), ")".repeat(5));
    assert!(parse_program_with(&shallow, &options).is_ok());
}

#[test]
fn test_nesting_limit_applies_to_types() {
    let options = ParseOptions::default().with_max_nesting_depth(4);
    let source = "type T = A<A<A<A<A<A<B>>>>>>;";
    let Err(SyntaxError::Parse(err)) = parse_program_with(source, &options) else {
        panic!("expected a parse error");
    };
    assert_eq!(err.expected, Expected::Type);
}

#[test]
fn test_nesting_limit_inside_type_arguments_of_call() {
    let options = ParseOptions::default().with_max_nesting_depth(4);
    let source = "f<A<A<A<A<A<B>>>>>>(x);";
    let Err(SyntaxError::Parse(err)) = parse_program_with(source, &options) else {
        panic!("expected a parse error");
    };
    assert_eq!(err.kind, ParseErrorKind::NestingLimitExceeded { limit: 4 });
}

fn nesting_limit_of(source: &str, limit: u32) -> Option<u32> {
    let options = ParseOptions::default().with_max_nesting_depth(limit);
    match parse_program_with(source, &options) {
        Err(SyntaxError::Parse(err)) => match err.kind {
            ParseErrorKind::NestingLimitExceeded { limit } => Some(limit),
            _ => panic!("expected a nesting error for {:?}, got {}", source, err),
        },
        Err(err) => panic!("expected a nesting error for {:?}, got {}", source, err),
        Ok(_) => None,
    }
}

#[test]
fn test_array_type_suffixes_count_toward_nesting() {
    let long = format!("type T = A{};", "[]".repeat(40));
    assert_eq!(nesting_limit_of(&long, 20), Some(20));
    let short = format!("type T = A{};", "[]".repeat(10));
    assert_eq!(nesting_limit_of(&short, 20), None);
}

#[test]
fn test_member_chains_count_toward_nesting() {
    let long = format!("const x = a{};", ".b".repeat(40));
    assert_eq!(nesting_limit_of(&long, 20), Some(20));
    let calls = format!("f{};", "()".repeat(40));
    assert_eq!(nesting_limit_of(&calls, 20), Some(20));
    let short = format!("const x = a{};", ".b".repeat(10));
    assert_eq!(nesting_limit_of(&short, 20), None);
}

#[test]
fn test_binary_chains_count_toward_nesting() {
    let long = format!("const x = a{};", " + a".repeat(40));
    assert_eq!(nesting_limit_of(&long, 20), Some(20));
    let short = format!("const x = a{};", " + a".repeat(10));
    assert_eq!(nesting_limit_of(&short, 20), None);
}

#[test]
fn test_very_long_chains_stop_at_default_limit() {
    let limit = ParseOptions::default().max_nesting_depth;
    for source in [
        format!("type T = A{};", "[]".repeat(100_000)),
        format!("a{};", ".b".repeat(100_000)),
        format!("a{};", " + a".repeat(100_000)),
    ] {
        assert_eq!(nesting_limit_of(&source, limit), Some(limit));
    }
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_removed_keyword_is_an_identifier() {
    let options = ParseOptions::default().with_keywords(KeywordSet::default() - KeywordSet::TYPE);
    let program = parse_program_with("const type = 1;", &options).unwrap();
    assert_eq!(
        program.statements[0].declared_name().map(|n| n.text.as_str()),
        Some("type")
    );
    assert!(parse_program("const type = 1;").is_err());
}

// ============================================================================
// Whole files
// ============================================================================

#[test]
fn test_fixture_parses() {
    let program = parse_ok(FIXTURE);
    assert_eq!(program.statements.len(), 12);
    let declared: Vec<_> = program
        .statements
        .iter()
        .filter_map(|s| s.declared_name())
        .map(|n| n.text.as_str())
        .collect();
    assert_eq!(
        declared,
        vec!["b", "SomeType", "OtherType", "something", "nothing", "c", "b"]
    );
}

#[test]
fn test_fixture_spans_nest() {
    let program = parse_ok(FIXTURE);
    assert_eq!(program.range().len() as usize, FIXTURE.len());
    if let Err(violation) = verify_spans(&program) {
        panic!("{}", violation);
    }
}

#[test]
fn test_parsing_is_deterministic() {
    assert_eq!(parse_program(FIXTURE), parse_program(FIXTURE));
    let broken = "interface A { x: }";
    assert_eq!(parse_program(broken), parse_program(broken));
}

#[test]
fn test_spans_cover_statement_text() {
    let source = "const c: SomeType<ABC> & OtherType = { name: \"hello\" };";
    let program = parse_ok(source);
    let Statement::Variable(ref decl) = program.statements[0] else {
        panic!("expected a variable");
    };
    assert_eq!(decl.range().slice(source), Some(source));
    let annotation = decl.type_annotation.as_ref().unwrap();
    assert_eq!(
        annotation.range().slice(source),
        Some("SomeType<ABC> & OtherType")
    );
}
