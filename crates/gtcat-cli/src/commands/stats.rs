//! Implementation of the `gtcat stats` command.

use std::path::PathBuf;

use clap::Args;
use gtcat::{LoadError, Localization};
use miette::{IntoDiagnostic, Result};

use crate::output::report_format_error;
use crate::output::table::{format_stats_table, CatalogStats};

/// Arguments for the stats command.
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Catalog files to summarize.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Run the stats command.
pub fn run_stats(args: StatsArgs) -> Result<i32> {
    let mut stats = Vec::with_capacity(args.files.len());

    for path in &args.files {
        let name = path.display().to_string();
        let mut catalog = Localization::new();
        match catalog.load_file(path, true) {
            Ok(()) => stats.push(CatalogStats::collect(name, &catalog)),
            Err(LoadError::Format { source, .. }) => {
                return Ok(report_format_error(&name, None, &source));
            }
            Err(e @ LoadError::UnknownFormat { .. }) => {
                eprintln!("{e}");
                return Ok(exitcode::USAGE);
            }
            Err(e @ LoadError::Io { .. }) => {
                eprintln!("{e}");
                return Ok(exitcode::NOINPUT);
            }
        }
    }

    if args.json {
        let output = serde_json::to_string_pretty(&stats).into_diagnostic()?;
        println!("{output}");
    } else {
        println!("{}", format_stats_table(&stats));
    }
    Ok(exitcode::OK)
}
