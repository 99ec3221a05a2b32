//! A registry of catalogs for several languages.

use std::fs;
use std::path::Path;

use bon::Builder;
use indexmap::IndexMap;

use crate::catalog::error::LoadError;
use crate::catalog::localization::{LANGUAGE_HEADER, Localization};

/// Catalogs for several languages plus a working language to fall back to.
///
/// Language codes are matched case-insensitively. The working language
/// always has a catalog, possibly an empty one, so lookups for languages
/// that were never loaded end up returning the untranslated source text.
///
/// # Example
///
/// ```
/// use gtcat::{Localization, PoFormat, Translations};
///
/// let mut translations = Translations::builder().working_language("en").build();
/// let german = Localization::from_str_with(
///     &PoFormat,
///     "msgid \"\"\nmsgstr \"Language: de\"\n\nmsgid \"Hello\"\nmsgstr \"Hallo\"\n",
///     false,
/// )
/// .unwrap();
/// translations.insert(german);
///
/// assert_eq!(translations.gettext("Hello", Some("DE"), None), "Hallo");
/// assert_eq!(translations.gettext("Hello", Some("fr"), None), "Hello");
/// ```
#[derive(Debug, Builder)]
#[builder(on(String, into))]
pub struct Translations {
    /// Language used when a requested language has no catalog.
    #[builder(default = "en".to_string())]
    working_language: String,

    /// Catalogs keyed by lowercased language code, in load order.
    #[builder(skip = working_catalog(&working_language))]
    catalogs: IndexMap<String, Localization>,
}

impl Default for Translations {
    fn default() -> Self {
        Translations::builder().build()
    }
}

impl Translations {
    /// A registry with English as the working language.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn working_language(&self) -> &str {
        &self.working_language
    }

    /// Register a catalog under its own language.
    ///
    /// Returns `false`, leaving the registry unchanged, when that language
    /// already has a non-empty catalog. An empty placeholder for the working
    /// language can be replaced.
    pub fn insert(&mut self, catalog: Localization) -> bool {
        let language = catalog.language().to_string();
        self.insert_as(&language, catalog)
    }

    fn insert_as(&mut self, language: &str, catalog: Localization) -> bool {
        let key = normalize(language);
        if self.catalogs.get(&key).is_some_and(|existing| !existing.is_empty()) {
            return false;
        }
        self.catalogs.insert(key, catalog);
        true
    }

    /// Load every `*.po` file in `dir`.
    ///
    /// Each catalog is registered under its `Language` header, or under the
    /// file stem when the header is missing or empty. Catalogs without
    /// messages are skipped, and the first catalog loaded for a language
    /// wins. Returns the number of catalogs registered.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, LoadError> {
        let dir = dir.as_ref();
        let io_error = |source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            let is_po = path
                .extension()
                .is_some_and(|extension| extension.eq_ignore_ascii_case("po"));
            if is_po && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let mut catalog = Localization::new();
            catalog.load_file(&path, true)?;
            if catalog.is_empty() {
                tracing::debug!(path = %path.display(), "skipping catalog without messages");
                continue;
            }

            let language = if catalog.has_header(LANGUAGE_HEADER) && !catalog.language().is_empty()
            {
                catalog.language().to_string()
            } else {
                let stem = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                catalog.set_language(stem.clone());
                stem
            };

            if self.insert_as(&language, catalog) {
                tracing::debug!(path = %path.display(), %language, "registered catalog");
                loaded += 1;
            } else {
                tracing::warn!(
                    path = %path.display(),
                    %language,
                    "language already registered, ignoring catalog"
                );
            }
        }

        Ok(loaded)
    }

    /// The catalog for `language`, if one is registered.
    pub fn get(&self, language: &str) -> Option<&Localization> {
        self.catalogs.get(&normalize(language))
    }

    pub fn get_mut(&mut self, language: &str) -> Option<&mut Localization> {
        self.catalogs.get_mut(&normalize(language))
    }

    pub fn contains_language(&self, language: &str) -> bool {
        self.catalogs.contains_key(&normalize(language))
    }

    /// Registered language codes, lowercased, in load order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }

    /// Translate `id` in `language`, falling back to the working language
    /// and finally to `id` itself.
    pub fn gettext<'a>(
        &'a self,
        id: &'a str,
        language: Option<&str>,
        context: Option<&str>,
    ) -> &'a str {
        match self.resolve(language) {
            Some(catalog) => catalog.gettext(id, context),
            None => id,
        }
    }

    /// Plural counterpart of [`gettext`](Self::gettext). Without a
    /// translation, `id` is returned for `n == 1` and `plural` otherwise.
    pub fn ngettext<'a>(
        &'a self,
        id: &'a str,
        plural: &'a str,
        n: i64,
        language: Option<&str>,
        context: Option<&str>,
    ) -> &'a str {
        match self.resolve(language) {
            Some(catalog) => catalog.ngettext(id, plural, n, context),
            None if n == 1 => id,
            None => plural,
        }
    }

    fn resolve(&self, language: Option<&str>) -> Option<&Localization> {
        language
            .and_then(|language| self.get(language))
            .or_else(|| self.get(&self.working_language))
    }
}

/// The initial registry: an empty catalog for the working language.
fn working_catalog(working_language: &str) -> IndexMap<String, Localization> {
    let mut catalog = Localization::new();
    catalog.set_language(working_language);
    IndexMap::from([(normalize(working_language), catalog)])
}

fn normalize(language: &str) -> String {
    language.trim().to_lowercase()
}
