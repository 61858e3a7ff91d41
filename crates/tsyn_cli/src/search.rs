//! `--find`: top-level functions whose name matches a pattern.
//!
//! Only the statements of the program body are looked at, with `export`
//! unwrapped. A function is either a `function` declaration or a variable
//! initialized with an arrow function.

use std::fmt::{self, Write};
use std::ops::Range;

use regex::Regex;
use tsyn_ast::{ExportClause, ExportDeclaration, Expression, Identifier, Program, Statement};
use tsyn_core::text::{LineMap, Position};

const YELLOW: &str = "\x1b[93m";
const RESET: &str = "\x1b[0m";

/// Which declarations `--kind` keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FunctionKind {
    /// `function name() {}`
    Function,
    /// `const name = () => ...`
    Arrow,
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FunctionKind::Function => "function",
            FunctionKind::Arrow => "arrow",
        })
    }
}

/// A declaration whose name matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    pub name: String,
    pub kind: FunctionKind,
    /// Where the name starts.
    pub position: Position,
    /// Byte range of the match within `name`.
    pub matched: Range<usize>,
}

fn function_of(stmt: &Statement) -> Option<(&Identifier, FunctionKind)> {
    match stmt {
        Statement::Function(function) => Some((&function.name, FunctionKind::Function)),
        Statement::Variable(variable) => match variable.initializer {
            Some(Expression::Arrow(_)) => Some((&variable.name, FunctionKind::Arrow)),
            _ => None,
        },
        Statement::Export(ExportDeclaration {
            clause: ExportClause::Declaration(inner),
            ..
        }) => function_of(inner),
        _ => None,
    }
}

/// Functions declared at the top of `program` whose name matches
/// `pattern`, in source order. `kind` narrows the search to one form.
pub fn find_functions(
    program: &Program,
    source: &str,
    pattern: &Regex,
    kind: Option<FunctionKind>,
) -> Vec<Found> {
    let line_map = LineMap::new(source);
    program
        .statements
        .iter()
        .filter_map(function_of)
        .filter(|&(_, found_kind)| kind.map_or(true, |k| k == found_kind))
        .filter_map(|(name, found_kind)| {
            let matched = pattern.find(&name.text)?;
            Some(Found {
                name: name.text.clone(),
                kind: found_kind,
                position: line_map.position_of(source, name.data.range.pos),
                matched: matched.range(),
            })
        })
        .collect()
}

/// The matches of one file, one per line, under the file name. Prints
/// nothing for a file without matches.
pub fn render(file: &str, found: &[Found], color: bool) -> String {
    let mut out = String::new();
    if found.is_empty() {
        return out;
    }
    let _ = writeln!(out, "{}:", file);
    for item in found {
        let (before, rest) = item.name.split_at(item.matched.start);
        let (hit, after) = rest.split_at(item.matched.len());
        let _ = write!(out, "  {} [{}]: {}", item.kind, item.position, before);
        if color {
            let _ = write!(out, "{YELLOW}{hit}{RESET}");
        } else {
            out.push_str(hit);
        }
        let _ = writeln!(out, "{}", after);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn search(source: &str, pattern: &str, kind: Option<FunctionKind>) -> Vec<Found> {
        let program = tsyn_parser::parse_program(source).unwrap();
        find_functions(&program, source, &Regex::new(pattern).unwrap(), kind)
    }

    fn names(found: &[Found]) -> Vec<(&str, FunctionKind)> {
        found.iter().map(|f| (f.name.as_str(), f.kind)).collect()
    }

    const SOURCE: &str = "function getUser(id: number) {}\n\
                          const getItems = (n: number) => [];\n\
                          export const getAll = () => null;\n\
                          const getCount = 3;\n\
                          export function setUser() {}\n";

    #[test]
    fn test_finds_declarations_and_arrow_bindings() {
        let found = search(SOURCE, "^get", None);
        assert_eq!(
            names(&found),
            vec![
                ("getUser", FunctionKind::Function),
                ("getItems", FunctionKind::Arrow),
                ("getAll", FunctionKind::Arrow),
            ]
        );
        assert_eq!(found[0].position, Position::new(9, 1, 10));
        assert_eq!(found[1].position.line, 2);
        assert_eq!(found[1].position.column, 7);
    }

    #[test]
    fn test_kind_filter() {
        assert_eq!(
            names(&search(SOURCE, "User", Some(FunctionKind::Function))),
            vec![("getUser", FunctionKind::Function), ("setUser", FunctionKind::Function)]
        );
        assert_eq!(
            names(&search(SOURCE, "User", Some(FunctionKind::Arrow))),
            Vec::<(&str, FunctionKind)>::new()
        );
    }

    #[test]
    fn test_nested_functions_are_not_searched() {
        let found = search("function outer() { function inner() {} }", "inner", None);
        assert!(found.is_empty());
    }

    #[test]
    fn test_render_marks_match() {
        let found = search(SOURCE, "Items", None);
        assert_eq!(render("a.ts", &found, false), "a.ts:\n  arrow [2:7]: getItems\n");
        assert_eq!(
            render("a.ts", &found, true),
            format!("a.ts:\n  arrow [2:7]: get{YELLOW}Items{RESET}\n")
        );
        assert_eq!(render("a.ts", &[], false), "");
    }
}
