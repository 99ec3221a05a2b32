//! Integration tests for the JSON catalog format.

use gtcat::{FormatError, JsonFormat, Localization, Message, PoFormat};

fn sample() -> Localization {
    let mut catalog = Localization::new();
    catalog.set_header("Language", "de").unwrap();
    let mut welcome = Message::builder()
        .id("Welcome")
        .context("start")
        .translations(vec!["Willkommen".to_string()])
        .comments(vec!["Shown once".to_string()])
        .references(vec!["main.rs:10".to_string()])
        .previous_id("Hello")
        .build();
    welcome.flags.insert("fuzzy");
    catalog.add(welcome);
    catalog.add(
        Message::builder()
            .id("One apple")
            .plural("{0} apples")
            .translations(vec!["Ein Apfel".to_string(), "{0} Äpfel".to_string()])
            .build(),
    );
    catalog
}

#[test]
fn writes_compact_document() {
    let text = sample().to_string_with(&JsonFormat, false).unwrap();
    insta::assert_snapshot!(text, @r#"{"Headers":{"Plural-Forms":"nplurals=2; plural=(n != 1);","Language":"de"},"Messages":{"start\u0004Welcome":{"Context":"start","Id":"Welcome","Translations":["Willkommen"]},"One apple":{"Id":"One apple","Plural":"{0} apples","Translations":["Ein Apfel","{0} Äpfel"]}}}"#);
}

#[test]
fn comments_are_written_on_request() {
    let text = sample().to_string_with(&JsonFormat, true).unwrap();
    assert!(text.contains(
        r#""TranslatorComments":[],"Comments":["Shown once"],"References":["main.rs:10"],"Flags":["fuzzy"],"PreviousId":"Hello","Context":"start""#
    ));
}

#[test]
fn round_trip_preserves_catalog() {
    let original = sample();
    let text = original.to_string_with(&JsonFormat, true).unwrap();
    let reread = Localization::from_str_with(&JsonFormat, &text, true).unwrap();

    assert!(reread.messages().eq(original.messages()));
    assert_eq!(reread.get_headers(), original.get_headers());
    assert_eq!(
        reread.to_string_with(&PoFormat, true).unwrap(),
        original.to_string_with(&PoFormat, true).unwrap()
    );
}

#[test]
fn comments_are_dropped_unless_requested() {
    let text = sample().to_string_with(&JsonFormat, true).unwrap();
    let reread = Localization::from_str_with(&JsonFormat, &text, false).unwrap();
    let welcome = reread.get("Welcome", Some("start")).unwrap();
    assert!(welcome.comments.is_empty());
    assert!(welcome.flags.is_empty());
    assert_eq!(welcome.previous_id, None);
    assert_eq!(welcome.translation(0), "Willkommen");
}

#[test]
fn headers_are_applied() {
    let catalog = Localization::from_str_with(
        &JsonFormat,
        r#"{"Headers":{"Plural-Forms":"nplurals=1; plural=0;","Language":"ja"},"Messages":{}}"#,
        false,
    )
    .unwrap();
    assert_eq!(catalog.language(), "ja");
    assert_eq!(catalog.num_plurals(), 1);
    assert!(catalog.is_empty());
}

#[test]
fn missing_sections_default_to_empty() {
    let catalog = Localization::from_str_with(&JsonFormat, "{}", false).unwrap();
    assert!(catalog.is_empty());

    let catalog = Localization::from_str_with(
        &JsonFormat,
        r#"{"Messages":{"x":{"Id":"x"}}}"#,
        false,
    )
    .unwrap();
    assert_eq!(catalog.get("x", None).unwrap().translations, [""]);
}

#[test]
fn unknown_top_level_key_is_an_error() {
    let error =
        Localization::from_str_with(&JsonFormat, r#"{"Entries":{}}"#, false).unwrap_err();
    assert!(matches!(error, FormatError::Json { line: 1, .. }), "{error:?}");
}

#[test]
fn syntax_error_reports_position() {
    let error = Localization::from_str_with(&JsonFormat, "{\n  \"Headers\": {\n    \"a\" 1\n", false)
        .unwrap_err();
    let FormatError::Json { line, column, .. } = error else {
        panic!("expected a JSON error, got {error:?}");
    };
    assert_eq!(line, 3);
    assert!(column > 0);
}
