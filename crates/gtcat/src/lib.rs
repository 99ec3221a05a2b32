//! gettext message catalogs: an in-memory model plus PO, MO and JSON codecs
//! and a compiler for `Plural-Forms` expressions.
//!
//! ```
//! use gtcat::{Localization, MoFormat, PoFormat};
//!
//! let po = "msgid \"\"\n\
//!           msgstr \"Plural-Forms: nplurals=2; plural=(n != 1);\\n\"\n\
//!           \"Language: de\"\n\
//!           \n\
//!           msgid \"One file\"\n\
//!           msgid_plural \"{0} files\"\n\
//!           msgstr[0] \"Eine Datei\"\n\
//!           msgstr[1] \"{0} Dateien\"\n";
//!
//! let catalog = Localization::from_str_with(&PoFormat, po, true).unwrap();
//! assert_eq!(catalog.language(), "de");
//! assert_eq!(catalog.ngettext("One file", "{0} files", 5, None), "{0} Dateien");
//!
//! let mut compiled = Vec::new();
//! catalog.write_with(&MoFormat, &mut compiled, false).unwrap();
//! ```

pub mod catalog;
pub mod format;
pub mod plural;
pub mod types;

pub use catalog::{HeaderError, LoadError, Localization, MessageMut, Translations};
pub use format::{Format, FormatError, FormatKind, JsonFormat, MoFormat, PoFormat};
pub use plural::{ExpressionError, PluralExpression, PluralForms};
pub use types::{Flags, HeaderMap, Message, message_key};
