//! Catalog codecs: PO, MO and JSON.

mod error;
mod json;
mod mo;
mod po;

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

pub use error::FormatError;
pub use json::JsonFormat;
pub use mo::MoFormat;
pub use po::PoFormat;

use crate::catalog::Localization;
use crate::types::Message;

/// A serialization of [`Localization`] catalogs.
///
/// Reading merges into the given catalog: headers are applied and messages
/// are added, replacing messages with the same key.
pub trait Format {
    /// File extensions handled by this codec, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Read a catalog from `input`. Comments, flags and previous-message
    /// data are kept only when `load_comments` is set.
    fn read(
        &self,
        catalog: &mut Localization,
        input: &mut dyn Read,
        load_comments: bool,
    ) -> Result<(), FormatError>;

    /// Write `catalog` to `output`. Formats that cannot hold comments
    /// ignore `write_comments`.
    fn write(
        &self,
        catalog: &Localization,
        output: &mut dyn Write,
        write_comments: bool,
    ) -> Result<(), FormatError>;
}

/// The catalog formats known to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Po,
    Mo,
    Json,
}

static PO: PoFormat = PoFormat;
static MO: MoFormat = MoFormat;
static JSON: JsonFormat = JsonFormat;

impl FormatKind {
    pub const ALL: [FormatKind; 3] = [FormatKind::Po, FormatKind::Mo, FormatKind::Json];

    /// The format for a file extension (`po`, `pot`, `mo` or `json`, any case).
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.');
        Self::ALL.into_iter().find(|kind| {
            kind.codec()
                .extensions()
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension))
        })
    }

    /// The format for a path, judged by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|extension| extension.to_str())
            .and_then(Self::from_extension)
    }

    /// The codec implementing this format.
    pub fn codec(self) -> &'static dyn Format {
        match self {
            FormatKind::Po => &PO,
            FormatKind::Mo => &MO,
            FormatKind::Json => &JSON,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FormatKind::Po => "po",
            FormatKind::Mo => "mo",
            FormatKind::Json => "json",
        }
    }

    /// Whether the format stores binary data rather than text.
    pub fn is_binary(self) -> bool {
        matches!(self, FormatKind::Mo)
    }
}

impl Display for FormatKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

impl FromStr for FormatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| format!("unknown format '{s}' (expected po, mo or json)"))
    }
}

/// Whether a message can be stored beside the header entry of PO and MO
/// files. A message with an empty id and no context would collide with it
/// and is skipped with a warning.
pub(crate) fn has_writable_key(message: &Message) -> bool {
    let writable = !message.key().is_empty();
    if !writable {
        tracing::warn!("skipping message with an empty id and no context");
    }
    writable
}
