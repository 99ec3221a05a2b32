//! A JSON rendering of catalogs.
//!
//! The document has two top-level objects, `Headers` (name to value) and
//! `Messages` (composite key to message object). Both keep catalog order.

use std::io::{self, Read, Write};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Format, FormatError};
use crate::catalog::Localization;
use crate::types::Message;

/// Reads and writes `.json` catalogs.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonCatalog {
    #[serde(rename = "Headers", default)]
    headers: IndexMap<String, String>,
    #[serde(rename = "Messages", default)]
    messages: IndexMap<String, JsonMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JsonMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    translator_comments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    references: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    previous_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    previous_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    plural: Option<String>,
    #[serde(default)]
    translations: Vec<String>,
}

impl JsonMessage {
    fn from_message(message: &Message, write_comments: bool) -> Self {
        let comments = |list: &Vec<String>| write_comments.then(|| list.clone());
        Self {
            translator_comments: comments(&message.translator_comments),
            comments: comments(&message.comments),
            references: comments(&message.references),
            flags: write_comments.then(|| message.flags.iter().map(str::to_string).collect()),
            previous_context: write_comments
                .then(|| non_empty(message.previous_context.as_deref()))
                .flatten(),
            previous_id: write_comments
                .then(|| non_empty(message.previous_id.as_deref()))
                .flatten(),
            context: non_empty(Some(message.context())),
            id: message.id().to_string(),
            plural: non_empty(message.plural.as_deref()),
            translations: message.translations.clone(),
        }
    }

    fn into_message(self, load_comments: bool) -> Message {
        let translations = if self.translations.is_empty() {
            vec![String::new()]
        } else {
            self.translations
        };
        let mut message = Message::builder()
            .id(self.id)
            .context(self.context.unwrap_or_default())
            .maybe_plural(self.plural)
            .translations(translations)
            .build();
        if load_comments {
            message.translator_comments = self.translator_comments.unwrap_or_default();
            message.comments = self.comments.unwrap_or_default();
            message.references = self.references.unwrap_or_default();
            message.flags = self.flags.unwrap_or_default().into_iter().collect();
            message.previous_context = self.previous_context;
            message.previous_id = self.previous_id;
        }
        message
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|value| !value.is_empty()).map(str::to_string)
}

impl Format for JsonFormat {
    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn read(
        &self,
        catalog: &mut Localization,
        input: &mut dyn Read,
        load_comments: bool,
    ) -> Result<(), FormatError> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        let document: JsonCatalog = serde_json::from_slice(&bytes).map_err(json_error)?;

        for (name, value) in &document.headers {
            catalog.set_header(name, value)?;
        }
        let count = document.messages.len();
        for message in document.messages.into_values() {
            catalog.add(message.into_message(load_comments));
        }

        tracing::debug!(messages = count, "read JSON catalog");
        Ok(())
    }

    fn write(
        &self,
        catalog: &Localization,
        output: &mut dyn Write,
        write_comments: bool,
    ) -> Result<(), FormatError> {
        let document = JsonCatalog {
            headers: catalog
                .get_headers()
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            messages: catalog
                .messages()
                .map(|message| (message.key(), JsonMessage::from_message(message, write_comments)))
                .collect(),
        };

        serde_json::to_writer(&mut *output, &document).map_err(io::Error::from)?;
        output.flush()?;
        tracing::debug!(messages = catalog.count(), "wrote JSON catalog");
        Ok(())
    }
}

fn json_error(error: serde_json::Error) -> FormatError {
    let mut message = error.to_string();
    if let Some(position) = message.rfind(" at line ") {
        message.truncate(position);
    }
    FormatError::Json {
        line: error.line(),
        column: error.column(),
        message,
    }
}
