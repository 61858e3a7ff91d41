//! End-to-end tests that run the `tsyn` binary.

use std::path::PathBuf;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn tsyn(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tsyn"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tsyn")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_outline_of_valid_file() {
    let path = fixture("valid.ts");
    let output = tsyn(&[path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("5 statements"));
    assert!(text.contains("1:1 ImportDeclaration \"react\""));
    assert!(text.contains("3:8 InterfaceDeclaration Props"));
    assert!(text.contains("8:1 TypeAliasDeclaration Key"));
    assert!(text.contains("10:1 FunctionDeclaration pick"));
    assert!(text.contains("14:1 VariableDeclaration state"));
}

#[test]
fn test_plain_error_line_and_exit_code() {
    let broken = fixture("broken.ts");
    let valid = fixture("valid.ts");
    let output = tsyn(&["--plain", broken.to_str().unwrap(), valid.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));

    let errors = stderr(&output);
    assert!(errors.contains("broken.ts(3,1): error TS1110: Type expected."), "{errors}");
    assert!(errors.contains("Found 1 error."));
    // The other file is still processed.
    assert!(stdout(&output).contains("ImportDeclaration"));
}

#[test]
fn test_fancy_error_shows_code() {
    let broken = fixture("broken.ts");
    let output = tsyn(&[broken.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("TS1110"));
}

#[test]
fn test_json_format() {
    let path = fixture("valid.ts");
    let output = tsyn(&["--format", "json", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let program = &value[0]["program"];
    assert_eq!(program["kind"], "Program");
    assert_eq!(program["statements"].as_array().map(Vec::len), Some(5));
    assert_eq!(program["statements"][2]["name"]["text"], "Key");
}

#[test]
fn test_tokens_format() {
    let path = fixture("deep.ts");
    let output = tsyn(&["--format", "tokens", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().skip(1).take(3).collect();
    assert_eq!(lines, vec!["1:1 TypeKeyword type", "1:6 Identifier Deep", "1:11 EqualsToken ="]);
    // `>>>>>>` is lexed as six separate tokens.
    assert_eq!(text.matches("GreaterThanToken").count(), 6);
}

#[test]
fn test_project_file() {
    let project = fixture("tsyn.json");
    let output = tsyn(&["--project", project.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("valid.ts: 5 statements"));
    assert!(text.contains("deep.ts: 1 statements"));
}

#[test]
fn test_max_depth_flag_overrides_project() {
    let project = fixture("tsyn.json");
    let output = tsyn(&["--plain", "--max-depth", "3", "-p", project.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("deep.ts(1,"));
    assert!(stderr(&output).contains("TS1200"));
}

#[test]
fn test_missing_file() {
    let output = tsyn(&["does-not-exist.ts"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot read 'does-not-exist.ts'"));
}

#[test]
fn test_bad_project_file_is_a_usage_error() {
    let output = tsyn(&["--project", "does-not-exist/tsyn.json"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_find_functions_by_pattern() {
    let path = fixture("search.ts");
    let output = tsyn(&["--find", "^fetch", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().skip(1).collect();
    assert_eq!(lines, vec!["  function [3:17]: fetchUser", "  arrow [7:7]: fetchOrders"]);
    assert!(text.lines().next().unwrap().ends_with("search.ts:"));
}

#[test]
fn test_find_with_kind_filter() {
    let path = fixture("search.ts");
    let output = tsyn(&["--find", "User", "--kind", "arrow", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("  arrow [9:14]: formatUser"), "{text}");
    assert!(!text.contains("fetchUser"));
}

#[test]
fn test_find_reports_nothing_found() {
    let path = fixture("search.ts");
    let output = tsyn(&["--find", "^missing$", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "Nothing found\n");
}

#[test]
fn test_find_with_invalid_pattern_is_a_usage_error() {
    let path = fixture("search.ts");
    let output = tsyn(&["--find", "fetch(", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("invalid search pattern"));
}

#[test]
fn test_find_still_reports_syntax_errors() {
    let broken = fixture("broken.ts");
    let path = fixture("search.ts");
    let output = tsyn(&["--plain", "--find", "Orders", broken.to_str().unwrap(), path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("TS1110"));
    assert!(stdout(&output).contains("arrow [7:7]: fetchOrders"));
}

#[test]
fn test_max_depth_above_cap_is_rejected() {
    let path = fixture("valid.ts");
    let output = tsyn(&["--max-depth", "1001", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    let output = tsyn(&["--max-depth", "1000", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
}
