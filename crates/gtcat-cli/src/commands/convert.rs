//! Implementation of the `gtcat convert` command.

use std::fs::File;
use std::io::{stdin, stdout, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use gtcat::{FormatKind, Localization};
use miette::{miette, Result};

use crate::output::report_format_error;

/// Arguments for the convert command.
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Input catalog. Reads standard input when omitted.
    pub input: Option<PathBuf>,

    /// Output catalog. Writes standard output when omitted.
    pub output: Option<PathBuf>,

    /// Input format (po, mo, json). Defaults to the input file's extension.
    #[arg(long, value_parser = str::parse::<FormatKind>)]
    pub from: Option<FormatKind>,

    /// Output format (po, mo, json). Defaults to the output file's extension.
    #[arg(long, value_parser = str::parse::<FormatKind>)]
    pub to: Option<FormatKind>,

    /// Drop comments, flags and previous-message data.
    #[arg(long)]
    pub no_comments: bool,
}

/// Pick the format from an explicit flag or else the file extension.
fn resolve(flag: Option<FormatKind>, path: Option<&Path>, role: &str) -> Result<FormatKind> {
    if let Some(kind) = flag {
        return Ok(kind);
    }
    match path {
        Some(path) => FormatKind::from_path(path).ok_or_else(|| {
            miette!(
                "cannot tell the {role} format from '{}'; pass --{}",
                path.display(),
                if role == "input" { "from" } else { "to" }
            )
        }),
        None => Err(miette!(
            "{role} is a standard stream; pass --{} to name its format",
            if role == "input" { "from" } else { "to" }
        )),
    }
}

/// Run the convert command.
pub fn run_convert(args: ConvertArgs) -> Result<i32> {
    let comments = !args.no_comments;
    let (from, to) = match (
        resolve(args.from, args.input.as_deref(), "input"),
        resolve(args.to, args.output.as_deref(), "output"),
    ) {
        (Ok(from), Ok(to)) => (from, to),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("{e:?}");
            return Ok(exitcode::USAGE);
        }
    };

    let input: Box<dyn Read> = match &args.input {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => {
                eprintln!("cannot open '{}': {e}", path.display());
                return Ok(exitcode::NOINPUT);
            }
        },
        None => Box::new(stdin().lock()),
    };

    let mut catalog = Localization::new();
    if let Err(e) = catalog.read_with(from.codec(), input, comments) {
        let name = args
            .input
            .as_deref()
            .map_or_else(|| "<stdin>".to_string(), |path| path.display().to_string());
        return Ok(report_format_error(&name, None, &e));
    }
    tracing::info!(from = %from, to = %to, messages = catalog.count(), "converting catalog");

    let mut output: Box<dyn Write> = match &args.output {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(e) => {
                eprintln!("cannot create '{}': {e}", path.display());
                return Ok(exitcode::CANTCREAT);
            }
        },
        None => Box::new(stdout().lock()),
    };

    match catalog
        .write_with(to.codec(), &mut output, comments)
        .and_then(|()| output.flush().map_err(Into::into))
    {
        Ok(()) => Ok(exitcode::OK),
        Err(e) => {
            eprintln!("write failed: {e}");
            Ok(exitcode::IOERR)
        }
    }
}
