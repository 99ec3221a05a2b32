//! gtcat CLI entry point.
//!
//! Provides command-line tools for working with gettext catalogs:
//! - `gtcat convert` - Convert between PO, MO and JSON
//! - `gtcat check` - Validate catalog files
//! - `gtcat stats` - Summarize catalog contents
//! - `gtcat eval` - Evaluate a plural-forms expression

mod commands;
mod output;

use std::io::stderr;
use std::process::exit;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{
    run_check, run_convert, run_eval, run_stats, CheckArgs, ConvertArgs, EvalArgs, StatsArgs,
};
use tracing_subscriber::EnvFilter;

/// gettext catalog tools.
#[derive(Debug, Parser)]
#[command(name = "gtcat")]
#[command(about = "gettext catalog tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Color output control
    #[arg(long, value_enum, env = "GTCAT_COLOR", default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// When to use colored output.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a catalog between formats
    Convert(ConvertArgs),
    /// Check catalog files for format errors
    Check(CheckArgs),
    /// Show message statistics for catalogs
    Stats(StatsArgs),
    /// Evaluate a plural-forms expression
    Eval(EvalArgs),
}

/// Set up color output based on user preference.
fn setup_colors(color_when: ColorWhen) {
    match color_when {
        ColorWhen::Auto => {
            // owo-colors checks TTY, NO_COLOR and FORCE_COLOR itself
        }
        ColorWhen::Always => {
            owo_colors::set_override(true);
        }
        ColorWhen::Never => {
            owo_colors::set_override(false);
        }
    }
}

/// Install the log subscriber. `RUST_LOG` wins over `-v`.
fn setup_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(stderr)
        .with_target(false)
        .init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_colors(cli.color);
    setup_tracing(cli.verbose);

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let result = match cli.command {
        Commands::Convert(args) => run_convert(args),
        Commands::Check(args) => run_check(args),
        Commands::Stats(args) => run_stats(args),
        Commands::Eval(args) => run_eval(args),
    };

    match result {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{e:?}");
            exit(exitcode::SOFTWARE);
        }
    }
}
