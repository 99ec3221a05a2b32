//! Error types for catalog headers and file loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::FormatError;
use crate::plural::ExpressionError;

/// A header value that could not be applied to a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// `Plural-Forms` has no `nplurals=` part.
    #[error("Plural-Forms header has no nplurals")]
    MissingPluralCount,

    /// `nplurals` is not a positive integer.
    #[error("invalid nplurals value '{value}'")]
    InvalidPluralCount { value: String },

    /// `Plural-Forms` has no `plural=` part.
    #[error("Plural-Forms header has no plural expression")]
    MissingPluralExpression,

    /// The plural expression failed to compile.
    #[error("invalid plural expression: {source}")]
    InvalidPluralExpression {
        #[source]
        source: ExpressionError,
    },
}

/// Errors from loading or saving a catalog file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or created.
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file contents were not a valid catalog.
    #[error("{path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    /// No codec handles the file's extension.
    #[error("no catalog format for '{path}' (expected .po, .pot, .mo or .json)")]
    UnknownFormat { path: PathBuf },
}
