//! Table formatting utilities for CLI output.

use comfy_table::{presets, CellAlignment, ContentArrangement, Table};
use gtcat::Localization;
use serde::Serialize;

/// Message counts for a single catalog file.
#[derive(Debug, Serialize)]
pub struct CatalogStats {
    /// File the catalog was loaded from.
    pub file: String,
    /// Value of the `Language` header.
    pub language: String,
    /// Number of plural forms declared by `Plural-Forms`.
    pub nplurals: usize,
    pub messages: usize,
    /// Messages with a plural source string.
    pub plural: usize,
    pub fuzzy: usize,
    /// Messages with no non-empty translation.
    pub untranslated: usize,
}

impl CatalogStats {
    pub fn collect(file: String, catalog: &Localization) -> Self {
        let mut stats = CatalogStats {
            file,
            language: catalog.language().to_string(),
            nplurals: catalog.num_plurals(),
            messages: catalog.count(),
            plural: 0,
            fuzzy: 0,
            untranslated: 0,
        };
        for message in catalog.messages() {
            stats.plural += usize::from(message.plural.is_some());
            stats.fuzzy += usize::from(message.is_fuzzy());
            stats.untranslated += usize::from(!message.is_translated());
        }
        stats
    }
}

/// Format catalog statistics as an ASCII table.
pub fn format_stats_table(stats: &[CatalogStats]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "File",
        "Language",
        "Plurals",
        "Messages",
        "Plural",
        "Fuzzy",
        "Untranslated",
    ]);

    for entry in stats {
        table.add_row(vec![
            entry.file.clone(),
            entry.language.clone(),
            entry.nplurals.to_string(),
            entry.messages.to_string(),
            entry.plural.to_string(),
            entry.fuzzy.to_string(),
            entry.untranslated.to_string(),
        ]);
    }
    for index in 2..7 {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    table
}

/// Format plural-expression results as a two-column table.
pub fn format_eval_table(results: &[(i64, i64)]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_header(vec!["n", "form"]);
    for (n, form) in results {
        table.add_row(vec![n.to_string(), form.to_string()]);
    }
    table
}
