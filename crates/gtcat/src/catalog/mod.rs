mod error;
mod localization;
mod translations;

pub use error::{HeaderError, LoadError};
pub use localization::{LANGUAGE_HEADER, Localization, MessageMut, PLURAL_FORMS_HEADER};
pub use translations::Translations;
