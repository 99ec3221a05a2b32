//! Error type shared by the catalog codecs.

use std::io;

use thiserror::Error;

use crate::catalog::HeaderError;

/// A failure while reading or writing a catalog stream.
///
/// Any of these aborts the current read; the catalog being filled may hold
/// part of the input and should be discarded.
#[derive(Debug, Error)]
pub enum FormatError {
    /// PO syntax error on a 1-based line.
    #[error("PO syntax error on line {line}: {message}")]
    Po { line: usize, message: String },

    /// The stream does not start with the MO magic number.
    #[error("not a valid MO file: bad magic number {found:#010x}")]
    MoMagic { found: u32 },

    /// MO format revision other than 0.
    #[error("unsupported MO revision {revision}")]
    MoRevision { revision: u32 },

    /// A table or string extends past the end of the MO data.
    #[error("MO data truncated: offset {offset} is out of range")]
    MoTruncated { offset: u64 },

    /// JSON syntax or shape error.
    #[error("JSON format error: {message} (line {line}, column {column})")]
    Json {
        line: usize,
        column: usize,
        message: String,
    },

    /// A string in the stream is not valid UTF-8.
    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: u64 },

    /// A header in the stream could not be applied.
    #[error(transparent)]
    Header(#[from] HeaderError),

    /// Error from the underlying stream.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl FormatError {
    /// The 1-based line the error was found on, for text formats.
    pub fn line(&self) -> Option<usize> {
        match self {
            FormatError::Po { line, .. } | FormatError::Json { line, .. } => Some(*line),
            _ => None,
        }
    }
}
