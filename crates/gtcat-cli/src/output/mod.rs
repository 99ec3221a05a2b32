//! Output formatting for CLI commands.

pub mod diagnostic;
pub mod table;

pub use diagnostic::CatalogDiagnostic;

use gtcat::FormatError;
use miette::Report;

/// Print a format error for `name` and return the matching exit code.
///
/// With `content`, text formats get a source snippet pointing at the error.
pub fn report_format_error(name: &str, content: Option<&str>, err: &FormatError) -> i32 {
    if let FormatError::Io(io) = err {
        eprintln!("{name}: {io}");
        return exitcode::IOERR;
    }
    let diagnostic = CatalogDiagnostic::from_format_error(name, content.unwrap_or_default(), err);
    eprintln!("{:?}", Report::new(diagnostic));
    exitcode::DATAERR
}
