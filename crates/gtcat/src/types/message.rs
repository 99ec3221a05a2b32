use bon::Builder;

use super::Flags;

/// Separator between context and id in composite keys and MO originals.
pub const CONTEXT_SEPARATOR: char = '\u{4}';

/// Separator between singular and plural ids, and between plural
/// translations, in MO strings.
pub const PLURAL_SEPARATOR: char = '\0';

/// Build the composite key a message is indexed under: `context\u{4}id`
/// when the context is non-empty, otherwise just `id`.
///
/// ```
/// use gtcat::message_key;
///
/// assert_eq!(message_key("Open", ""), "Open");
/// assert_eq!(message_key("Open", "menu"), "menu\u{4}Open");
/// ```
pub fn message_key(id: &str, context: &str) -> String {
    if context.is_empty() {
        id.to_string()
    } else {
        let mut key = String::with_capacity(context.len() + 1 + id.len());
        key.push_str(context);
        key.push(CONTEXT_SEPARATOR);
        key.push_str(id);
        key
    }
}

/// One translation unit: a source string, its optional plural and context,
/// its translations and the comments and flags attached to it.
///
/// `id` and `context` form the message's identity inside a catalog and have
/// no public setters; a message already added to a
/// [`Localization`](crate::Localization) is renamed through
/// [`MessageMut`](crate::MessageMut) so the catalog index stays consistent.
///
/// # Example
///
/// ```
/// use gtcat::Message;
///
/// let message = Message::builder()
///     .id("One file")
///     .plural("{0} files")
///     .translations(vec!["Eine Datei".to_string(), "{0} Dateien".to_string()])
///     .build();
///
/// assert_eq!(message.key(), "One file");
/// assert_eq!(message.translation(1), "{0} Dateien");
/// assert_eq!(message.translation(5), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct Message {
    #[builder(into)]
    id: String,

    /// Empty means "no context".
    #[builder(into, default)]
    context: String,

    /// Plural source string; present iff the message has plural variants.
    #[builder(into)]
    pub plural: Option<String>,

    /// One entry per plural form, or a single entry without a plural.
    #[builder(default = vec![String::new()])]
    pub translations: Vec<String>,

    /// Extracted comments (`#.`).
    #[builder(default)]
    pub comments: Vec<String>,

    /// Translator comments (`# `).
    #[builder(default)]
    pub translator_comments: Vec<String>,

    /// Source references (`#:`).
    #[builder(default)]
    pub references: Vec<String>,

    #[builder(default)]
    pub flags: Flags,

    /// Previous id recorded by `#| msgid`.
    #[builder(into)]
    pub previous_id: Option<String>,

    /// Previous context recorded by `#| msgctxt`.
    #[builder(into)]
    pub previous_context: Option<String>,
}

impl Message {
    /// A message with no context and a single empty translation.
    pub fn new(id: impl Into<String>) -> Self {
        Message::builder().id(id).build()
    }

    /// A message with a context and a single empty translation.
    pub fn with_context(id: impl Into<String>, context: impl Into<String>) -> Self {
        Message::builder().id(id).context(context).build()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn has_context(&self) -> bool {
        !self.context.is_empty()
    }

    /// The composite key this message is indexed under.
    pub fn key(&self) -> String {
        message_key(&self.id, &self.context)
    }

    /// The translation at `index`, or `""` if there is none.
    pub fn translation(&self, index: usize) -> &str {
        self.translations.get(index).map_or("", String::as_str)
    }

    /// Whether any translation is non-empty.
    pub fn is_translated(&self) -> bool {
        self.translations.iter().any(|t| !t.is_empty())
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.contains("fuzzy")
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.id = id;
    }

    pub(crate) fn set_context(&mut self, context: String) {
        self.context = context;
    }
}
