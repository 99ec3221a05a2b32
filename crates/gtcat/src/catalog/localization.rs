//! The catalog aggregate: messages, headers and plural metadata.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::ops::Deref;
use std::path::Path;

use indexmap::IndexMap;

use crate::catalog::error::{HeaderError, LoadError};
use crate::format::{Format, FormatError, FormatKind};
use crate::plural::PluralForms;
use crate::types::{Flags, HeaderMap, Message, message_key};

/// Name of the header holding the plural count and formula.
pub const PLURAL_FORMS_HEADER: &str = "Plural-Forms";

/// Name of the header holding the catalog language.
pub const LANGUAGE_HEADER: &str = "Language";

const DEFAULT_LANGUAGE: &str = "en";

/// A message catalog for one language.
///
/// Messages are indexed by their composite key (see
/// [`message_key`](crate::message_key)) and kept in insertion order, which is
/// the order text formats write them in. Adding a message whose key is
/// already present replaces the earlier one in place.
///
/// Two headers are stored as typed values rather than strings:
/// `Plural-Forms` (see [`PluralForms`]) and `Language`. Every other header
/// passes through untouched. Header names are case-insensitive.
///
/// # Example
///
/// ```
/// use gtcat::{Localization, Message};
///
/// let mut catalog = Localization::new();
/// catalog.set_header("Plural-Forms", "nplurals=3; plural=n==1 ? 0 : n==2 ? 1 : 2;").unwrap();
///
/// let mut message = Message::with_context("Open", "menu");
/// message.translations = vec!["Öffnen".to_string()];
/// catalog.add(message);
///
/// assert!(catalog.contains("Open", Some("menu")));
/// assert!(!catalog.contains("Open", None));
/// assert_eq!(catalog.num_plurals(), 3);
/// assert_eq!(catalog.gettext("Open", Some("menu")), "Öffnen");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localization {
    messages: IndexMap<String, Message>,
    /// Pass-through headers. The typed headers keep an empty entry here
    /// only to remember their position.
    headers: HeaderMap,
    plural_forms: PluralForms,
    language: String,
}

impl Default for Localization {
    fn default() -> Self {
        Self {
            messages: IndexMap::new(),
            headers: HeaderMap::new(),
            plural_forms: PluralForms::default(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Localization {
    /// An empty catalog: English, `nplurals=2; plural=(n != 1);`.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Messages
    // =========================================================================

    /// Insert a message, replacing and returning any message with the same
    /// key. A replaced message keeps its position.
    pub fn add(&mut self, message: Message) -> Option<Message> {
        self.messages.insert(message.key(), message)
    }

    pub fn get(&self, id: &str, context: Option<&str>) -> Option<&Message> {
        self.messages.get(&message_key(id, context.unwrap_or_default()))
    }

    /// A mutable handle to a message. Changing the id or context through
    /// the handle re-keys the message inside this catalog.
    pub fn get_mut(&mut self, id: &str, context: Option<&str>) -> Option<MessageMut<'_>> {
        let index = self
            .messages
            .get_index_of(&message_key(id, context.unwrap_or_default()))?;
        Some(MessageMut {
            catalog: self,
            index,
        })
    }

    pub fn contains(&self, id: &str, context: Option<&str>) -> bool {
        self.get(id, context).is_some()
    }

    /// Remove and return a message. The order of the remaining messages is
    /// preserved.
    pub fn remove(&mut self, id: &str, context: Option<&str>) -> Option<Message> {
        self.messages
            .shift_remove(&message_key(id, context.unwrap_or_default()))
    }

    /// Remove the message with the same identity as `message`.
    pub fn remove_message(&mut self, message: &Message) -> Option<Message> {
        self.messages.shift_remove(&message.key())
    }

    /// Number of messages, not counting the header entry.
    pub fn count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages in catalog order.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.values()
    }

    /// Messages ordered by their composite key, as MO files store them.
    pub fn sorted_messages(&self) -> Vec<&Message> {
        let mut entries: Vec<(&String, &Message)> = self.messages.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, message)| message).collect()
    }

    /// Messages whose first translation equals `value`.
    ///
    /// When `language` is given and differs from this catalog's language,
    /// nothing matches. When `context` is given, only messages with exactly
    /// that context match. This is a linear scan.
    pub fn find_by_translation(
        &self,
        value: &str,
        language: Option<&str>,
        context: Option<&str>,
    ) -> Vec<&Message> {
        if language.is_some_and(|language| !language.eq_ignore_ascii_case(&self.language)) {
            return Vec::new();
        }
        self.messages
            .values()
            .filter(|message| message.translation(0) == value)
            .filter(|message| context.is_none_or(|context| message.context() == context))
            .collect()
    }

    /// Remove all messages and headers and restore the default language and
    /// plural forms.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Move the message at `index` to the key matching its current identity.
    ///
    /// Called whenever a message's id or context changes while it is in the
    /// catalog. A different message already stored under the new key is
    /// replaced. Returns the message's new index.
    fn notify_rekey(&mut self, index: usize) -> usize {
        let Some((old_key, message)) = self.messages.shift_remove_index(index) else {
            return index;
        };
        let new_key = message.key();
        let mut index = index;
        if new_key != old_key {
            if let Some(existing) = self.messages.get_index_of(&new_key) {
                self.messages.shift_remove_index(existing);
                if existing < index {
                    index -= 1;
                }
            }
        }
        self.messages.shift_insert(index, new_key, message);
        index
    }

    // =========================================================================
    // Headers
    // =========================================================================

    /// Set a header. `Plural-Forms` is parsed and compiled; `Language` is
    /// stored as the catalog language. On error the catalog is unchanged.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        let name = name.trim();
        if is_header(name, PLURAL_FORMS_HEADER) {
            self.plural_forms = PluralForms::parse(value)?;
            self.headers.insert(name, String::new());
        } else if is_header(name, LANGUAGE_HEADER) {
            self.language = value.trim().to_string();
            self.headers.insert(name, String::new());
        } else {
            self.headers.insert(name, value);
        }
        Ok(())
    }

    /// The value of a header. `Plural-Forms` and `Language` always have one.
    pub fn get_header(&self, name: &str) -> Option<String> {
        let name = name.trim();
        if is_header(name, PLURAL_FORMS_HEADER) {
            Some(self.plural_forms.to_string())
        } else if is_header(name, LANGUAGE_HEADER) {
            Some(self.language.clone())
        } else {
            self.headers.get(name).map(str::to_string)
        }
    }

    /// Whether a header was set on this catalog, as opposed to holding its
    /// default. Unlike [`get_header`](Self::get_header) this is false for
    /// `Plural-Forms` and `Language` until they are set.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains(name)
    }

    /// Remove a header. Removing `Plural-Forms` or `Language` restores its
    /// default.
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        let previous = self.get_header(name);
        let name = name.trim();
        if is_header(name, PLURAL_FORMS_HEADER) {
            self.plural_forms = PluralForms::default();
        } else if is_header(name, LANGUAGE_HEADER) {
            self.language = DEFAULT_LANGUAGE.to_string();
        }
        self.headers.remove(name);
        previous
    }

    /// A snapshot of all headers in order, always including `Plural-Forms`
    /// and `Language`. Typed headers never set explicitly come first.
    pub fn get_headers(&self) -> HeaderMap {
        let mut snapshot = HeaderMap::new();
        if !self.headers.contains(PLURAL_FORMS_HEADER) {
            snapshot.insert(PLURAL_FORMS_HEADER, self.plural_forms.to_string());
        }
        if !self.headers.contains(LANGUAGE_HEADER) {
            snapshot.insert(LANGUAGE_HEADER, self.language.clone());
        }
        for (name, value) in self.headers.iter() {
            let value = self.get_header(name).unwrap_or_else(|| value.to_string());
            snapshot.insert(name, value);
        }
        snapshot
    }

    /// Headers as `name: value` lines joined by `\n`, the form stored in the
    /// header entry of PO and MO files.
    pub fn header_block(&self) -> String {
        self.get_headers()
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Apply a header block: one `name: value` per line, split on the first
    /// `:`. Lines without a `:` are skipped.
    pub fn apply_header_block(&mut self, block: &str) -> Result<(), HeaderError> {
        for line in block.trim().split('\n') {
            let Some((name, value)) = line.split_once(':') else {
                if !line.trim().is_empty() {
                    tracing::warn!(line, "skipping header line without ':'");
                }
                continue;
            };
            self.set_header(name.trim(), value.trim())?;
        }
        Ok(())
    }

    pub fn plural_forms(&self) -> &PluralForms {
        &self.plural_forms
    }

    pub fn set_plural_forms(&mut self, plural_forms: PluralForms) {
        self.plural_forms = plural_forms;
    }

    /// Declared number of plural forms (`nplurals`).
    pub fn num_plurals(&self) -> usize {
        self.plural_forms.count()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// The translation of `id`, or `id` itself when there is no non-empty
    /// translation.
    pub fn gettext<'a>(&'a self, id: &'a str, context: Option<&str>) -> &'a str {
        self.get(id, context)
            .map(|message| message.translation(0))
            .filter(|translation| !translation.is_empty())
            .unwrap_or(id)
    }

    /// The plural form of `id` selected for `n` by `Plural-Forms`.
    ///
    /// Without a usable translation this falls back to `id` when `n == 1`
    /// and to `plural` otherwise. An index outside the translations counts
    /// as no translation.
    pub fn ngettext<'a>(
        &'a self,
        id: &'a str,
        plural: &'a str,
        n: i64,
        context: Option<&str>,
    ) -> &'a str {
        let translated = self.get(id, context).and_then(|message| {
            let index = usize::try_from(self.plural_forms.index(n)).ok()?;
            message.translations.get(index).map(String::as_str)
        });
        match translated {
            Some(translation) if !translation.is_empty() => translation,
            _ if n == 1 => id,
            _ => plural,
        }
    }

    // =========================================================================
    // Reading and Writing
    // =========================================================================

    /// Parse a catalog from a string with the given codec.
    ///
    /// ```
    /// use gtcat::{Localization, PoFormat};
    ///
    /// let catalog = Localization::from_str_with(
    ///     &PoFormat,
    ///     "msgid \"Hello\"\nmsgstr \"Hallo\"\n",
    ///     false,
    /// )
    /// .unwrap();
    /// assert_eq!(catalog.gettext("Hello", None), "Hallo");
    /// ```
    pub fn from_str_with(
        format: &dyn Format,
        text: &str,
        load_comments: bool,
    ) -> Result<Self, FormatError> {
        let mut catalog = Self::new();
        catalog.read_with(format, text.as_bytes(), load_comments)?;
        Ok(catalog)
    }

    /// Read messages and headers from `input` into this catalog.
    pub fn read_with(
        &mut self,
        format: &dyn Format,
        mut input: impl Read,
        load_comments: bool,
    ) -> Result<(), FormatError> {
        format.read(self, &mut input, load_comments)
    }

    /// Serialize this catalog to `output`.
    pub fn write_with(
        &self,
        format: &dyn Format,
        mut output: impl Write,
        write_comments: bool,
    ) -> Result<(), FormatError> {
        format.write(self, &mut output, write_comments)
    }

    /// Serialize this catalog with a text codec.
    pub fn to_string_with(
        &self,
        format: &dyn Format,
        write_comments: bool,
    ) -> Result<String, FormatError> {
        let mut buffer = Vec::new();
        self.write_with(format, &mut buffer, write_comments)?;
        String::from_utf8(buffer).map_err(|e| FormatError::InvalidUtf8 {
            offset: e.utf8_error().valid_up_to() as u64,
        })
    }

    /// Load a file into this catalog, choosing the codec by extension.
    pub fn load_file(&mut self, path: impl AsRef<Path>, load_comments: bool) -> Result<(), LoadError> {
        let path = path.as_ref();
        let kind = FormatKind::from_path(path).ok_or_else(|| LoadError::UnknownFormat {
            path: path.to_path_buf(),
        })?;
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.read_with(kind.codec(), BufReader::new(file), load_comments)
            .map_err(|source| LoadError::Format {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Save this catalog to a file, choosing the codec by extension.
    pub fn save_file(&self, path: impl AsRef<Path>, write_comments: bool) -> Result<(), LoadError> {
        let path = path.as_ref();
        let kind = FormatKind::from_path(path).ok_or_else(|| LoadError::UnknownFormat {
            path: path.to_path_buf(),
        })?;
        let file = File::create(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.write_with(kind.codec(), &mut writer, write_comments)
            .and_then(|()| writer.flush().map_err(FormatError::from))
            .map_err(|source| LoadError::Format {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn is_header(name: &str, header: &str) -> bool {
    name.eq_ignore_ascii_case(header)
}

/// Mutable access to a message stored in a [`Localization`].
///
/// Reads go through `Deref<Target = Message>`. Identity changes via
/// [`set_id`](Self::set_id) and [`set_context`](Self::set_context) re-key the
/// message in its catalog immediately, so lookups stay consistent after
/// every step.
///
/// ```
/// use gtcat::{Localization, Message};
///
/// let mut catalog = Localization::new();
/// catalog.add(Message::new("Test"));
///
/// catalog.get_mut("Test", None).unwrap().set_context("menu");
/// assert!(!catalog.contains("Test", None));
/// assert!(catalog.contains("Test", Some("menu")));
/// ```
#[derive(Debug)]
pub struct MessageMut<'a> {
    catalog: &'a mut Localization,
    index: usize,
}

impl MessageMut<'_> {
    fn message_mut(&mut self) -> &mut Message {
        &mut self.catalog.messages[self.index]
    }

    /// Change the id and re-key the message.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.message_mut().set_id(id.into());
        self.index = self.catalog.notify_rekey(self.index);
    }

    /// Change the context (empty for none) and re-key the message.
    pub fn set_context(&mut self, context: impl Into<String>) {
        self.message_mut().set_context(context.into());
        self.index = self.catalog.notify_rekey(self.index);
    }

    pub fn set_plural(&mut self, plural: Option<String>) {
        self.message_mut().plural = plural;
    }

    pub fn translations_mut(&mut self) -> &mut Vec<String> {
        &mut self.message_mut().translations
    }

    pub fn comments_mut(&mut self) -> &mut Vec<String> {
        &mut self.message_mut().comments
    }

    pub fn translator_comments_mut(&mut self) -> &mut Vec<String> {
        &mut self.message_mut().translator_comments
    }

    pub fn references_mut(&mut self) -> &mut Vec<String> {
        &mut self.message_mut().references
    }

    pub fn flags_mut(&mut self) -> &mut Flags {
        &mut self.message_mut().flags
    }

    pub fn set_previous_id(&mut self, previous_id: Option<String>) {
        self.message_mut().previous_id = previous_id;
    }

    pub fn set_previous_context(&mut self, previous_context: Option<String>) {
        self.message_mut().previous_context = previous_context;
    }
}

impl Deref for MessageMut<'_> {
    type Target = Message;

    fn deref(&self) -> &Message {
        &self.catalog.messages[self.index]
    }
}
