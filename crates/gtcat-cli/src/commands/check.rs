//! Implementation of the `gtcat check` command.

use std::fs::read;
use std::path::PathBuf;

use gtcat::{FormatKind, Localization};
use miette::{IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::output::report_format_error;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Files to check (.po, .pot, .mo, .json)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for a checked file.
#[derive(Debug, Serialize)]
struct CheckResult {
    file: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    messages: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
}

impl CheckResult {
    fn failed(file: String, error: String, line: Option<usize>) -> Self {
        CheckResult {
            file,
            valid: false,
            messages: None,
            error: Some(error),
            line,
        }
    }
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<i32> {
    let mut results = Vec::with_capacity(args.files.len());
    let mut exit = exitcode::OK;

    for path in &args.files {
        let name = path.display().to_string();
        let Some(kind) = FormatKind::from_path(path) else {
            if !args.json {
                eprintln!("{name}: unknown catalog extension");
            }
            results.push(CheckResult::failed(name, "unknown catalog extension".into(), None));
            exit = exitcode::DATAERR;
            continue;
        };
        let bytes = match read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                if !args.json {
                    eprintln!("{name}: {e}");
                }
                results.push(CheckResult::failed(name, e.to_string(), None));
                exit = exitcode::IOERR;
                continue;
            }
        };

        let mut catalog = Localization::new();
        match catalog.read_with(kind.codec(), &bytes[..], true) {
            Ok(()) => {
                tracing::debug!(file = %name, messages = catalog.count(), "catalog is valid");
                if !args.json {
                    println!("{} {name} ({} messages)", "ok".green(), catalog.count());
                }
                results.push(CheckResult {
                    file: name,
                    valid: true,
                    messages: Some(catalog.count()),
                    error: None,
                    line: None,
                });
            }
            Err(e) => {
                let code = if args.json {
                    exitcode::DATAERR
                } else {
                    let content = (!kind.is_binary()).then(|| String::from_utf8_lossy(&bytes));
                    report_format_error(&name, content.as_deref(), &e)
                };
                if exit == exitcode::OK {
                    exit = code;
                }
                results.push(CheckResult::failed(name, e.to_string(), e.line()));
            }
        }
    }

    if args.json {
        let output = serde_json::to_string_pretty(&results).into_diagnostic()?;
        println!("{output}");
    }
    Ok(exit)
}
