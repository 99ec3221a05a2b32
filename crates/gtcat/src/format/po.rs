//! The gettext PO text format.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::mem;

use winnow::ascii::digit1;
use winnow::combinator::{alt, delimited};
use winnow::prelude::*;

use super::{Format, FormatError, has_writable_key};
use crate::catalog::Localization;
use crate::types::{Flags, Message};

/// Reads and writes `.po` and `.pot` files.
///
/// Output is deterministic: headers first, then messages in catalog order,
/// so a catalog read with comments and written back reproduces the input
/// when the input was produced by this writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoFormat;

impl Format for PoFormat {
    fn extensions(&self) -> &'static [&'static str] {
        &["po", "pot"]
    }

    fn read(
        &self,
        catalog: &mut Localization,
        input: &mut dyn Read,
        load_comments: bool,
    ) -> Result<(), FormatError> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes).map_err(|e| FormatError::InvalidUtf8 {
            offset: e.utf8_error().valid_up_to() as u64,
        })?;

        let mut reader = Reader::new(catalog, load_comments);
        for (index, line) in text.lines().enumerate() {
            reader.line(index + 1, line)?;
        }
        reader.finish()?;

        tracing::debug!(
            messages = reader.added,
            lines = text.lines().count(),
            "read PO catalog"
        );
        Ok(())
    }

    fn write(
        &self,
        catalog: &Localization,
        output: &mut dyn Write,
        write_comments: bool,
    ) -> Result<(), FormatError> {
        let mut out = String::new();

        out.push_str("msgid \"\"\nmsgstr \"\"\n\"");
        let headers: Vec<String> = catalog
            .get_headers()
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        out.push_str(&headers.join("\\n\"\n\""));
        out.push_str("\"\n\n");

        let blocks: Vec<String> = catalog
            .messages()
            .filter(|message| has_writable_key(message))
            .map(|message| message_block(message, catalog.num_plurals(), write_comments))
            .collect();
        out.push_str(&blocks.join("\n"));

        output.write_all(out.as_bytes())?;
        output.flush()?;
        tracing::debug!(messages = catalog.count(), "wrote PO catalog");
        Ok(())
    }
}

// =========================================================================
// Writing
// =========================================================================

fn message_block(message: &Message, num_plurals: usize, write_comments: bool) -> String {
    let mut block = String::new();

    if write_comments {
        for comment in &message.translator_comments {
            block.push_str(&format!("#  {comment}\n"));
        }
        for comment in &message.comments {
            block.push_str(&format!("#. {comment}\n"));
        }
        for reference in &message.references {
            block.push_str(&format!("#: {reference}\n"));
        }
        if !message.flags.is_empty() {
            block.push_str(&format!("#, {}\n", message.flags));
        }
        if let Some(previous) = non_empty(message.previous_context.as_deref()) {
            block.push_str(&format!("#| msgctxt \"{}\"\n", escape_inline(previous)));
        }
        if let Some(previous) = non_empty(message.previous_id.as_deref()) {
            block.push_str(&format!("#| msgid \"{}\"\n", escape_inline(previous)));
        }
    }

    if message.has_context() {
        block.push_str(&format!("msgctxt \"{}\"\n", escape(message.context())));
    }
    block.push_str(&format!("msgid \"{}\"\n", escape(message.id())));

    let plural = non_empty(message.plural.as_deref());
    if let Some(plural) = plural {
        block.push_str(&format!("msgid_plural \"{}\"\n", escape(plural)));
    }

    if plural.is_some() && num_plurals > 1 {
        let count = num_plurals.max(message.translations.len());
        for index in 0..count {
            block.push_str(&format!(
                "msgstr[{index}] \"{}\"\n",
                escape(message.translation(index))
            ));
        }
    } else {
        block.push_str(&format!("msgstr \"{}\"\n", escape(message.translation(0))));
    }

    block
}

/// Split embedded newlines onto continuation lines. Nothing else is escaped.
fn escape(text: &str) -> String {
    text.replace('\n', "\\n\"\n\"")
}

/// Escape newlines as `\n` for strings that must stay on one comment line.
fn escape_inline(text: &str) -> String {
    text.replace('\n', "\\n")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

// =========================================================================
// Reading
// =========================================================================

/// The directive a string belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Context,
    Id,
    Plural,
    Translation(usize),
}

/// Fields collected for the message being read.
#[derive(Debug, Default)]
struct Entry {
    id: String,
    context: String,
    plural: Option<String>,
    translations: BTreeMap<usize, String>,
    comments: Vec<String>,
    translator_comments: Vec<String>,
    references: Vec<String>,
    flags: Flags,
    previous_id: Option<String>,
    previous_context: Option<String>,
}

/// `msgstr[N]` indices at or above this are rejected.
const MAX_PLURAL_INDEX: usize = 256;

struct Reader<'c> {
    catalog: &'c mut Localization,
    load_comments: bool,
    entry: Entry,
    /// The directive being accumulated and its text so far.
    current: Option<(Command, String)>,
    added: usize,
}

impl<'c> Reader<'c> {
    fn new(catalog: &'c mut Localization, load_comments: bool) -> Self {
        Self {
            catalog,
            load_comments,
            entry: Entry::default(),
            current: None,
            added: 0,
        }
    }

    fn line(&mut self, number: usize, line: &str) -> Result<(), FormatError> {
        let line = line.trim();
        if line.is_empty() {
            return self.finish();
        }
        if line.starts_with('#') {
            if self.load_comments {
                self.comment(line);
            }
            return Ok(());
        }

        let mut input = line;
        let command = match directive(&mut input) {
            Ok(Command::Translation(index)) if index >= MAX_PLURAL_INDEX => {
                return Err(syntax_error(number, "plural index out of range"));
            }
            Ok(command) => Some(command),
            Err(_) if line.starts_with('"') => None,
            Err(_) => return Err(syntax_error(number, "unknown keyword")),
        };
        let payload = quoted(line)
            .map(unescape)
            .ok_or_else(|| syntax_error(number, "expected a quoted string"))?;

        let Some(command) = command else {
            return match &mut self.current {
                Some((_, text)) => {
                    text.push_str(&payload);
                    Ok(())
                }
                None => Err(syntax_error(
                    number,
                    "string continuation without a preceding keyword",
                )),
            };
        };

        match &mut self.current {
            Some((last, text)) if *last == command => text.push_str(&payload),
            _ => {
                self.flush();
                self.current = Some((command, payload));
            }
        }
        Ok(())
    }

    fn comment(&mut self, line: &str) {
        let entry = &mut self.entry;
        if let Some(rest) = line.strip_prefix("#.") {
            entry.comments.push(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("#:") {
            entry.references.push(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("#,") {
            entry.flags.extend(
                rest.split(',')
                    .map(str::trim)
                    .filter(|flag| !flag.is_empty())
                    .map(str::to_string),
            );
        } else if let Some(rest) = line.strip_prefix("#|") {
            let rest = rest.trim();
            if rest.starts_with("msgid_plural") {
                // Previous plurals are not kept.
            } else if rest.starts_with("msgid") {
                if let Some(previous) = quoted(rest) {
                    entry.previous_id = Some(unescape(previous));
                }
            } else if rest.starts_with("msgctxt") {
                if let Some(previous) = quoted(rest) {
                    entry.previous_context = Some(unescape(previous));
                }
            }
        } else if line.starts_with("#~") {
            // Obsolete entries are dropped.
        } else {
            entry.translator_comments.push(line[1..].trim().to_string());
        }
    }

    /// Store the accumulated string in the entry.
    fn flush(&mut self) {
        let Some((command, text)) = self.current.take() else {
            return;
        };
        match command {
            Command::Context => self.entry.context = text,
            Command::Id => self.entry.id = text,
            Command::Plural => self.entry.plural = Some(text),
            Command::Translation(index) => {
                self.entry.translations.insert(index, text);
            }
        }
    }

    /// Complete the current entry: apply it as the header block or add it
    /// as a message. Does nothing before the first directive of an entry.
    fn finish(&mut self) -> Result<(), FormatError> {
        if self.current.is_none() {
            return Ok(());
        }
        self.flush();
        let entry = mem::take(&mut self.entry);

        if entry.id.is_empty() && entry.context.is_empty() {
            if let Some(block) = entry.translations.get(&0) {
                self.catalog.apply_header_block(block)?;
            }
            return Ok(());
        }

        let translations = match entry.translations.keys().next_back() {
            Some(&max) => {
                let mut translations = vec![String::new(); max.saturating_add(1)];
                for (index, text) in entry.translations {
                    translations[index] = text;
                }
                translations
            }
            None => vec![String::new()],
        };

        let message = Message::builder()
            .id(entry.id)
            .context(entry.context)
            .maybe_plural(entry.plural)
            .translations(translations)
            .comments(entry.comments)
            .translator_comments(entry.translator_comments)
            .references(entry.references)
            .flags(entry.flags)
            .maybe_previous_id(entry.previous_id)
            .maybe_previous_context(entry.previous_context)
            .build();
        self.catalog.add(message);
        self.added += 1;
        Ok(())
    }
}

fn syntax_error(line: usize, message: &str) -> FormatError {
    FormatError::Po {
        line,
        message: message.to_string(),
    }
}

/// The keyword at the start of a line. `msgstr[N]` carries its index.
fn directive(input: &mut &str) -> ModalResult<Command> {
    alt((
        "msgid_plural".value(Command::Plural),
        "msgid".value(Command::Id),
        "msgctxt".value(Command::Context),
        delimited("msgstr[", digit1, "]")
            .map(|digits: &str| Command::Translation(digits.parse().unwrap_or(usize::MAX))),
        "msgstr".value(Command::Translation(0)),
    ))
    .parse_next(input)
}

/// The text between the first and the last `"` on a line.
fn quoted(line: &str) -> Option<&str> {
    let start = line.find('"')?;
    let end = line.rfind('"')?;
    (end > start).then(|| &line[start + 1..end])
}

/// Resolve backslash escapes. `\n` is a newline; any other escaped
/// character stands for itself.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    out
}
