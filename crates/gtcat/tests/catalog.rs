//! Integration tests for the catalog model: identity, headers and lookups.

use gtcat::{HeaderError, Localization, Message, PluralForms, message_key};

fn translated(id: &str, translations: &[&str]) -> Message {
    Message::builder()
        .id(id)
        .translations(translations.iter().map(|t| t.to_string()).collect())
        .build()
}

// =============================================================================
// Messages
// =============================================================================

#[test]
fn new_catalog_is_empty_english() {
    let catalog = Localization::new();
    assert!(catalog.is_empty());
    assert_eq!(catalog.count(), 0);
    assert_eq!(catalog.language(), "en");
    assert_eq!(catalog.num_plurals(), 2);
}

#[test]
fn add_then_get_returns_message() {
    let mut catalog = Localization::new();
    let message = translated("Hello", &["Hallo"]);
    assert!(catalog.add(message.clone()).is_none());

    assert_eq!(catalog.get("Hello", None), Some(&message));
    assert_eq!(catalog.count(), 1);
}

#[test]
fn add_with_same_identity_overwrites() {
    let mut catalog = Localization::new();
    catalog.add(translated("Hello", &["Hallo"]));
    catalog.add(translated("Bye", &["Tschüss"]));

    let previous = catalog.add(translated("Hello", &["Servus"]));
    assert_eq!(previous.map(|m| m.translations), Some(vec!["Hallo".to_string()]));
    assert_eq!(catalog.count(), 2);
    assert_eq!(catalog.gettext("Hello", None), "Servus");

    let order: Vec<&str> = catalog.messages().map(Message::id).collect();
    assert_eq!(order, ["Hello", "Bye"]);
}

#[test]
fn empty_context_is_distinct_from_any_context() {
    let mut catalog = Localization::new();
    catalog.add(Message::new("Open"));
    catalog.add(Message::with_context("Open", "menu"));

    assert_eq!(catalog.count(), 2);
    assert!(catalog.contains("Open", None));
    assert!(catalog.contains("Open", Some("")));
    assert!(catalog.contains("Open", Some("menu")));
    assert!(!catalog.contains("Open", Some("file")));
}

#[test]
fn composite_key_uses_context_separator() {
    assert_eq!(message_key("Open", "menu"), "menu\u{4}Open");
    assert_eq!(Message::with_context("Open", "menu").key(), "menu\u{4}Open");
    assert_eq!(Message::new("Open").key(), "Open");
}

#[test]
fn remove_makes_contains_false() {
    let mut catalog = Localization::new();
    catalog.add(Message::new("a"));
    catalog.add(Message::with_context("b", "ctx"));
    catalog.add(Message::new("c"));

    let removed = catalog.remove("b", Some("ctx")).unwrap();
    assert_eq!(removed.id(), "b");
    assert!(!catalog.contains("b", Some("ctx")));
    assert!(catalog.remove("b", Some("ctx")).is_none());

    let order: Vec<&str> = catalog.messages().map(Message::id).collect();
    assert_eq!(order, ["a", "c"]);
}

#[test]
fn remove_message_uses_identity() {
    let mut catalog = Localization::new();
    let message = Message::with_context("x", "y");
    catalog.add(message.clone());

    assert!(catalog.remove_message(&message).is_some());
    assert!(catalog.is_empty());
}

#[test]
fn renaming_keeps_lookups_consistent() {
    let mut catalog = Localization::new();
    catalog.add(Message::new("Test"));
    assert!(catalog.contains("Test", None));

    catalog.get_mut("Test", None).unwrap().set_id("23");
    assert!(!catalog.contains("Test", None));
    assert!(catalog.contains("23", None));

    catalog.get_mut("23", None).unwrap().set_context("context");
    assert!(!catalog.contains("23", None));
    assert!(catalog.contains("23", Some("context")));

    catalog.get_mut("23", Some("context")).unwrap().set_id("Test");
    assert!(catalog.contains("Test", Some("context")));

    catalog.get_mut("Test", Some("context")).unwrap().set_context("");
    assert!(catalog.contains("Test", None));
    assert_eq!(catalog.count(), 1);
}

#[test]
fn renaming_through_one_handle_tracks_every_step() {
    let mut catalog = Localization::new();
    catalog.add(Message::new("first"));
    catalog.add(Message::new("Test"));
    catalog.add(Message::new("last"));

    let mut message = catalog.get_mut("Test", None).unwrap();
    message.set_id("23");
    message.set_context("context");
    message.translations_mut()[0] = "dreiundzwanzig".to_string();
    assert_eq!(message.key(), "context\u{4}23");

    assert_eq!(catalog.gettext("23", Some("context")), "dreiundzwanzig");
    let order: Vec<&str> = catalog.messages().map(Message::id).collect();
    assert_eq!(order, ["first", "23", "last"]);
}

#[test]
fn renaming_onto_existing_key_replaces_it() {
    let mut catalog = Localization::new();
    catalog.add(translated("a", &["A"]));
    catalog.add(translated("b", &["B"]));

    catalog.get_mut("b", None).unwrap().set_id("a");
    assert_eq!(catalog.count(), 1);
    assert_eq!(catalog.gettext("a", None), "B");
}

#[test]
fn sorted_messages_follow_composite_key() {
    let mut catalog = Localization::new();
    catalog.add(Message::new("b"));
    catalog.add(Message::with_context("a", "z"));
    catalog.add(Message::new("a"));

    let keys: Vec<String> = catalog.sorted_messages().iter().map(|m| m.key()).collect();
    assert_eq!(keys, ["a", "b", "z\u{4}a"]);
}

// =============================================================================
// Headers
// =============================================================================

#[test]
fn default_headers_are_synthesized() {
    let catalog = Localization::new();
    let headers = catalog.get_headers();
    let pairs: Vec<(&str, &str)> = headers.iter().collect();
    assert_eq!(
        pairs,
        [
            ("Plural-Forms", "nplurals=2; plural=(n != 1);"),
            ("Language", "en"),
        ]
    );
}

#[test]
fn plural_forms_header_is_compiled() {
    let mut catalog = Localization::new();
    catalog
        .set_header("plural-forms", "nplurals=3; plural=n==1 ? 0 : n==2 ? 1 : 2;")
        .unwrap();

    assert_eq!(catalog.num_plurals(), 3);
    assert_eq!(catalog.plural_forms().index(2), 1);
    assert_eq!(
        catalog.get_header("Plural-Forms").as_deref(),
        Some("nplurals=3; plural=n==1 ? 0 : n==2 ? 1 : 2;")
    );
}

#[test]
fn invalid_plural_forms_leaves_catalog_unchanged() {
    let mut catalog = Localization::new();
    let error = catalog
        .set_header("Plural-Forms", "nplurals=2; plural=n : 1;")
        .unwrap_err();
    assert!(matches!(error, HeaderError::InvalidPluralExpression { .. }));
    assert_eq!(catalog.plural_forms(), &PluralForms::default());
    assert!(!catalog.has_header("Plural-Forms"));
}

#[test]
fn language_header_is_typed() {
    let mut catalog = Localization::new();
    catalog.set_header("LANGUAGE", "de_DE").unwrap();
    assert_eq!(catalog.language(), "de_DE");
    assert_eq!(catalog.get_header("language").as_deref(), Some("de_DE"));
}

#[test]
fn pass_through_headers_keep_order_and_spelling() {
    let mut catalog = Localization::new();
    catalog.set_header("Project-Id-Version", "demo 1.0").unwrap();
    catalog.set_header("Language", "fr").unwrap();
    catalog.set_header("Content-Type", "text/plain; charset=UTF-8").unwrap();
    catalog.set_header("project-id-version", "demo 2.0").unwrap();

    let headers = catalog.get_headers();
    let pairs: Vec<(&str, &str)> = headers.iter().collect();
    assert_eq!(
        pairs,
        [
            ("Plural-Forms", "nplurals=2; plural=(n != 1);"),
            ("Project-Id-Version", "demo 2.0"),
            ("Language", "fr"),
            ("Content-Type", "text/plain; charset=UTF-8"),
        ]
    );
    assert_eq!(catalog.get_header("content-type").as_deref(), Some("text/plain; charset=UTF-8"));
    assert_eq!(catalog.get_header("X-Missing"), None);
}

#[test]
fn remove_header_restores_typed_defaults() {
    let mut catalog = Localization::new();
    catalog.set_header("Language", "pl").unwrap();
    catalog.set_header("X-Generator", "gtcat").unwrap();

    assert_eq!(catalog.remove_header("language").as_deref(), Some("pl"));
    assert_eq!(catalog.language(), "en");
    assert_eq!(catalog.remove_header("X-Generator").as_deref(), Some("gtcat"));
    assert_eq!(catalog.get_headers().len(), 2);
}

#[test]
fn header_block_skips_lines_without_colon() {
    let mut catalog = Localization::new();
    catalog
        .apply_header_block("Language: cs\nbroken line\nX-Note: a: b\n")
        .unwrap();
    assert_eq!(catalog.language(), "cs");
    assert_eq!(catalog.get_header("X-Note").as_deref(), Some("a: b"));
    assert_eq!(
        catalog.header_block(),
        "Plural-Forms: nplurals=2; plural=(n != 1);\nLanguage: cs\nX-Note: a: b"
    );
}

#[test]
fn clear_resets_everything() {
    let mut catalog = Localization::new();
    catalog.set_header("Language", "de").unwrap();
    catalog.set_header("Plural-Forms", "nplurals=1; plural=0;").unwrap();
    catalog.add(Message::new("x"));

    catalog.clear();
    assert!(catalog.is_empty());
    assert_eq!(catalog, Localization::new());
}

// =============================================================================
// Lookups
// =============================================================================

#[test]
fn gettext_falls_back_to_id() {
    let mut catalog = Localization::new();
    catalog.add(Message::new("Untranslated"));
    catalog.add(translated("Hello", &["Hallo"]));

    assert_eq!(catalog.gettext("Hello", None), "Hallo");
    assert_eq!(catalog.gettext("Untranslated", None), "Untranslated");
    assert_eq!(catalog.gettext("Missing", None), "Missing");
    assert_eq!(catalog.gettext("Hello", Some("ctx")), "Hello");
}

#[test]
fn ngettext_selects_plural_form() {
    let mut catalog = Localization::new();
    catalog
        .set_header(
            "Plural-Forms",
            "nplurals=3; plural=n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2;",
        )
        .unwrap();
    catalog.add(
        Message::builder()
            .id("file")
            .plural("files")
            .translations(vec!["файл".into(), "файла".into(), "файлов".into()])
            .build(),
    );

    assert_eq!(catalog.ngettext("file", "files", 1, None), "файл");
    assert_eq!(catalog.ngettext("file", "files", 3, None), "файла");
    assert_eq!(catalog.ngettext("file", "files", 11, None), "файлов");
    assert_eq!(catalog.ngettext("file", "files", 21, None), "файл");
}

#[test]
fn ngettext_falls_back_on_missing_or_out_of_range_form() {
    let mut catalog = Localization::new();
    catalog
        .set_header("Plural-Forms", "nplurals=2; plural=n == 1 ? 0 : 7;")
        .unwrap();
    catalog.add(
        Message::builder()
            .id("day")
            .plural("days")
            .translations(vec!["Tag".into(), "Tage".into()])
            .build(),
    );

    assert_eq!(catalog.ngettext("day", "days", 1, None), "Tag");
    assert_eq!(catalog.ngettext("day", "days", 2, None), "days");
    assert_eq!(catalog.ngettext("week", "weeks", 1, None), "week");
    assert_eq!(catalog.ngettext("week", "weeks", 0, None), "weeks");
}

#[test]
fn find_by_translation_scans_first_translation() {
    let mut catalog = Localization::new();
    catalog.set_header("Language", "de").unwrap();
    catalog.add(translated("home", &["Startseite"]));
    catalog.add(
        Message::builder()
            .id("home")
            .context("nav")
            .translations(vec!["Startseite".to_string()])
            .build(),
    );
    catalog.add(translated("about", &["Über uns"]));

    let ids: Vec<&str> = catalog
        .find_by_translation("Startseite", None, None)
        .into_iter()
        .map(Message::context)
        .collect();
    assert_eq!(ids, ["", "nav"]);

    assert_eq!(catalog.find_by_translation("Startseite", Some("DE"), Some("nav")).len(), 1);
    assert!(catalog.find_by_translation("Startseite", Some("fr"), None).is_empty());
    assert!(catalog.find_by_translation("Home", None, None).is_empty());
}
