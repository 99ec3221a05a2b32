//! Miette diagnostic wrapper for catalog format errors.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![expect(unused_assignments)]

use gtcat::FormatError;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A miette-compatible diagnostic for a catalog that failed to parse.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(gtcat::format))]
pub struct CatalogDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: Option<SourceSpan>,

    message: String,

    #[help]
    help: Option<String>,
}

impl CatalogDiagnostic {
    /// Create a diagnostic from a FormatError, pointing into `content` when
    /// the error carries a position.
    pub fn from_format_error(name: &str, content: &str, err: &FormatError) -> Self {
        let position = match err {
            FormatError::Po { line, .. } => Some((*line, 1)),
            FormatError::Json { line, column, .. } => Some((*line, *column)),
            _ => None,
        };

        let span = position.map(|(line, column)| {
            // Sum of (line_length + 1) for lines before the error line, plus column.
            let offset = content
                .split('\n')
                .take(line.saturating_sub(1))
                .map(|l| l.len() + 1)
                .sum::<usize>()
                + column.saturating_sub(1);

            // Clamp to content length to avoid a miette panic
            let offset = offset.min(content.len());
            let length = content
                .get(offset..)
                .and_then(|rest| rest.lines().next())
                .map_or(1, str::len);
            SourceSpan::from((offset, length.min(content.len() - offset)))
        });

        let help = match err {
            FormatError::Po { .. } => {
                Some("PO entries use msgctxt, msgid, msgid_plural and msgstr with quoted strings".into())
            }
            FormatError::MoMagic { .. } => Some("this does not look like a compiled MO file".into()),
            _ => None,
        };

        CatalogDiagnostic {
            src: NamedSource::new(name, content.to_string()),
            span,
            message: err.to_string(),
            help,
        }
    }
}
