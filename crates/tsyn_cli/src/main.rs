//! tsyn: parse typed script sources and report what was found.
//!
//! Usage:
//!   tsyn [options] [file...]
//!
//! Each file is parsed independently; the first syntax error in a file is
//! reported and the remaining files are still processed.

mod driver;
mod logging;
mod output;
mod report;
mod search;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser as ClapParser;
use tsyn_diagnostics::DiagnosticCollection;
use tsyn_options::{OptionsError, ParseOptions, ProjectConfig, MAX_NESTING_DEPTH};
use tsyn_parser::SyntaxError;

use crate::driver::FileResult;
use crate::output::Format;
use crate::report::Style;
use crate::search::FunctionKind;

const PROJECT_FILE: &str = "tsyn.json";

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

#[derive(ClapParser, Debug)]
#[command(name = "tsyn", version, about = "Parse typed script sources into syntax trees")]
struct Cli {
    /// Source files to parse.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Path to a tsyn.json project file.
    #[arg(short = 'p', long = "project", value_name = "PATH")]
    project: Option<PathBuf>,

    /// What to print for each file.
    #[arg(short = 'f', long, value_enum, default_value_t = Format::Outline)]
    format: Format,

    /// List top-level functions whose name matches this regular expression
    /// instead of printing a format.
    #[arg(long, value_name = "PATTERN", conflicts_with = "format")]
    find: Option<String>,

    /// Only report functions of this form when searching.
    #[arg(long, value_enum, requires = "find")]
    kind: Option<FunctionKind>,

    /// Print errors as single `file(line,col): error TS<code>: message` lines.
    #[arg(long)]
    plain: bool,

    /// Maximum nesting depth of types and expressions (at most 1000).
    #[arg(
        long = "max-depth",
        value_name = "N",
        value_parser = clap::value_parser!(u32).range(1..=MAX_NESTING_DEPTH as i64)
    )]
    max_depth: Option<u32>,

    /// Number of worker threads (defaults to one per core).
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Increase logging verbosity (-v INFO, -vv DEBUG, -vvv TRACE).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr.
    #[arg(long = "json-logs")]
    json_logs: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error("no input files; pass files or --project")]
    NoInput,
    #[error("failed to start worker threads: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("failed to serialize syntax tree: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    match run(&cli) {
        Ok(summary) if summary.is_clean() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(err) => {
            report::print_error(&err.to_string());
            ExitCode::from(2)
        }
    }
}

/// Failures seen across all files.
#[derive(Default)]
struct Summary {
    diagnostics: DiagnosticCollection,
    unreadable: usize,
}

impl Summary {
    fn is_clean(&self) -> bool {
        !self.diagnostics.has_errors() && self.unreadable == 0
    }
}

fn run(cli: &Cli) -> Result<Summary, CliError> {
    let start = Instant::now();
    let (paths, options) = resolve_inputs(cli)?;
    if paths.is_empty() {
        return Err(CliError::NoInput);
    }
    tracing::info!(files = paths.len(), max_depth = options.max_nesting_depth, "parsing");

    let style = if cli.plain { Style::Plain } else { Style::Fancy };
    let mut summary = Summary::default();

    if let Some(ref pattern) = cli.find {
        let pattern = regex::Regex::new(pattern)?;
        tracing::debug!(pattern = %pattern, kind = ?cli.kind, "searching");
        let results = driver::process_files(&paths, cli.jobs, |source| {
            tsyn_parser::parse_program_with(source, &options)
                .map(|program| search::find_functions(&program, source, &pattern, cli.kind))
        })?;
        let color = std::io::stdout().is_terminal();
        let mut any = false;
        for result in &results {
            if let Some((_, found)) = settle(result, style, &mut summary) {
                any |= !found.is_empty();
                print!("{}", search::render(&result.display_name(), found, color));
            }
        }
        if !any {
            println!("Nothing found");
        }
        print_summary(&summary);
        return Ok(summary);
    }

    match cli.format {
        Format::Tokens => {
            let results = driver::process_files(&paths, cli.jobs, |source| {
                output::tokens(source, options.keywords).map_err(SyntaxError::from)
            })?;
            for result in &results {
                if let Some((_, dump)) = settle(result, style, &mut summary) {
                    println!("{}:", result.display_name());
                    print!("{dump}");
                }
            }
        }
        Format::Outline => {
            let results = driver::process_files(&paths, cli.jobs, |source| {
                tsyn_parser::parse_program_with(source, &options)
            })?;
            for result in &results {
                if let Some((source, program)) = settle(result, style, &mut summary) {
                    print!("{}", output::outline(&result.display_name(), source, program));
                }
            }
        }
        Format::Json => {
            let results = driver::process_files(&paths, cli.jobs, |source| {
                tsyn_parser::parse_program_with(source, &options)
            })?;
            let mut trees = Vec::new();
            for result in &results {
                if let Some((_, program)) = settle(result, style, &mut summary) {
                    trees.push(output::json(&result.display_name(), program)?);
                }
            }
            println!("{}", serde_json::to_string_pretty(&trees)?);
        }
    }

    print_summary(&summary);
    tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "done");
    Ok(summary)
}

/// Report a failed file and return the output of a successful one.
fn settle<'r, T>(
    result: &'r FileResult<Result<T, SyntaxError>>,
    style: Style,
    summary: &mut Summary,
) -> Option<(&'r str, &'r T)> {
    let name = result.display_name();
    match result.outcome {
        Err(ref err) => {
            report::print_error(&format!("cannot read '{}': {}", name, err));
            summary.unreadable += 1;
            None
        }
        Ok(ref processed) => match processed.output {
            Ok(ref output) => Some((processed.source.as_str(), output)),
            Err(ref err) => {
                tracing::debug!(file = %name, error = %err, "syntax error");
                eprintln!("{}", report::render(style, &name, &processed.source, err));
                summary.diagnostics.add(err.to_diagnostic().in_file(name));
                None
            }
        },
    }
}

fn print_summary(summary: &Summary) {
    let count = summary.diagnostics.error_count() + summary.unreadable;
    if count == 0 {
        return;
    }
    let text = format!("Found {} error{}.", count, if count == 1 { "" } else { "s" });
    if std::io::stderr().is_terminal() {
        eprintln!("\n{}{}{}", RED, text, RESET);
    } else {
        eprintln!("\n{}", text);
    }
}

/// Files to parse and the options to parse them with. An explicit
/// `--project` wins; otherwise a `tsyn.json` in the working directory is
/// used when no files were given. Command-line flags override the file.
fn resolve_inputs(cli: &Cli) -> Result<(Vec<PathBuf>, ParseOptions), CliError> {
    let project = match cli.project {
        Some(ref path) => Some(load_project(path)?),
        None if cli.files.is_empty() && Path::new(PROJECT_FILE).exists() => {
            Some(load_project(Path::new(PROJECT_FILE))?)
        }
        None => None,
    };

    let (mut paths, mut options) = match project {
        Some((config, root)) => (config.file_paths(&root), config.resolve_options()?),
        None => (Vec::new(), ParseOptions::default()),
    };
    paths.extend(cli.files.iter().cloned());

    if let Some(depth) = cli.max_depth {
        options = options.with_max_nesting_depth(depth);
    }
    Ok((paths, options))
}

fn load_project(path: &Path) -> Result<(ProjectConfig, PathBuf), OptionsError> {
    tracing::debug!(project = %path.display(), "loading project file");
    let config = tsyn_options::parse_config_file(path)?;
    let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok((config, root))
}
