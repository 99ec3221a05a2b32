//! Integration tests for reading and writing MO files.

use gtcat::{FormatError, Localization, Message, MoFormat};

fn sample() -> Localization {
    let mut catalog = Localization::new();
    catalog
        .set_header("Plural-Forms", "nplurals=3; plural=n==1 ? 0 : n==2 ? 1 : 2;")
        .unwrap();
    catalog.set_header("Language", "ga").unwrap();
    catalog.set_header("X-Generator", "gtcat").unwrap();

    catalog.add(
        Message::builder()
            .id("{0} file")
            .context("dialog")
            .plural("{0} files")
            .translations(vec!["{0} chomhad".into(), "{0} chomhad".into(), "{0} comhad".into()])
            .build(),
    );
    catalog.add(
        Message::builder()
            .id("Open")
            .translations(vec!["Oscail".to_string()])
            .build(),
    );
    catalog.add(
        Message::builder()
            .id("Close")
            .context("menu")
            .translations(vec!["Dún".to_string()])
            .build(),
    );
    catalog.add(Message::new("Untranslated"));
    catalog
}

fn write(catalog: &Localization) -> Vec<u8> {
    let mut bytes = Vec::new();
    catalog.write_with(&MoFormat, &mut bytes, false).unwrap();
    bytes
}

fn read(bytes: &[u8]) -> Result<Localization, FormatError> {
    let mut catalog = Localization::new();
    catalog.read_with(&MoFormat, bytes, false)?;
    Ok(catalog)
}

fn word(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

/// Offset and contents of entry `index` in the table at `table`.
fn entry(bytes: &[u8], table: usize, index: usize) -> (usize, &[u8]) {
    let length = word(bytes, table + 8 * index) as usize;
    let offset = word(bytes, table + 8 * index + 4) as usize;
    (offset, &bytes[offset..offset + length])
}

// =============================================================================
// Round trips
// =============================================================================

#[test]
fn write_read_write_is_byte_identical() {
    let first = write(&sample());
    let reread = read(&first).unwrap();
    assert_eq!(write(&reread), first);
}

#[test]
fn messages_survive_round_trip() {
    let catalog = read(&write(&sample())).unwrap();
    assert_eq!(catalog.count(), 4);
    assert_eq!(catalog.language(), "ga");
    assert_eq!(catalog.num_plurals(), 3);
    assert_eq!(catalog.get_header("X-Generator").as_deref(), Some("gtcat"));

    let files = catalog.get("{0} file", Some("dialog")).unwrap();
    assert_eq!(files.plural.as_deref(), Some("{0} files"));
    assert_eq!(files.translations.len(), 3);
    assert_eq!(catalog.ngettext("{0} file", "{0} files", 5, Some("dialog")), "{0} comhad");

    assert_eq!(catalog.gettext("Close", Some("menu")), "Dún");
    assert_eq!(catalog.gettext("Untranslated", None), "Untranslated");
}

/// A five-entry catalog laid out by hand: header, three plain messages
/// (one untranslated) and a message with context and plural.
fn assembled() -> Vec<u8> {
    [
        // magic, revision, count, originals at 28, translations at 68, no hash table
        &b"\xde\x12\x04\x95\x00\x00\x00\x00\x05\x00\x00\x00\x1c\x00\x00\x00\
           \x44\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00"[..],
        // originals: (length, offset) for "", "Cancel", "Quit", "Save", "menu\x04File\0Files"
        &b"\x00\x00\x00\x00\x6c\x00\x00\x00\x06\x00\x00\x00\x6d\x00\x00\x00\
           \x04\x00\x00\x00\x74\x00\x00\x00\x04\x00\x00\x00\x79\x00\x00\x00\
           \x0f\x00\x00\x00\x7e\x00\x00\x00"[..],
        // translations: header block, "Abbrechen", "", "Speichern", "Datei\0Dateien"
        &b"\x37\x00\x00\x00\x8e\x00\x00\x00\x09\x00\x00\x00\xc6\x00\x00\x00\
           \x00\x00\x00\x00\xd0\x00\x00\x00\x09\x00\x00\x00\xd1\x00\x00\x00\
           \x0d\x00\x00\x00\xdb\x00\x00\x00"[..],
        // string pool
        &b"\x00Cancel\x00Quit\x00Save\x00menu\x04File\x00Files\x00"[..],
        &b"Plural-Forms: nplurals=2; plural=(n != 1);\nLanguage: de\x00"[..],
        &b"Abbrechen\x00\x00Speichern\x00Datei\x00Dateien\x00"[..],
    ]
    .concat()
}

#[test]
fn assembled_file_is_read() {
    let bytes = assembled();
    assert_eq!(bytes.len(), 233);

    let catalog = read(&bytes).unwrap();
    assert_eq!(catalog.count(), 4);
    assert_eq!(catalog.language(), "de");
    assert_eq!(catalog.num_plurals(), 2);
    assert_eq!(catalog.gettext("Cancel", None), "Abbrechen");
    assert_eq!(catalog.gettext("Save", None), "Speichern");
    assert_eq!(catalog.gettext("Quit", None), "Quit");

    let file = catalog.get("File", Some("menu")).unwrap();
    assert_eq!(file.plural.as_deref(), Some("Files"));
    assert_eq!(file.translations, ["Datei", "Dateien"]);
}

#[test]
fn assembled_file_is_rewritten_byte_for_byte() {
    let bytes = assembled();
    assert_eq!(write(&read(&bytes).unwrap()), bytes);
}

#[test]
fn message_with_empty_key_is_not_written() {
    let mut catalog = sample();
    catalog.add(
        Message::builder()
            .id("")
            .translations(vec!["leer".to_string()])
            .build(),
    );
    assert_eq!(catalog.count(), 5);

    let bytes = write(&catalog);
    assert_eq!(word(&bytes, 8), 5);
    assert_eq!(bytes, write(&sample()));
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn header_fields_and_tables() {
    let bytes = write(&sample());
    let count = 5;

    assert_eq!(&bytes[0..4], &[0xde, 0x12, 0x04, 0x95]);
    assert_eq!(word(&bytes, 4), 0);
    assert_eq!(word(&bytes, 8), count);
    assert_eq!(word(&bytes, 12), 28);
    assert_eq!(word(&bytes, 16), 28 + 8 * count);
    assert_eq!(word(&bytes, 20), 0);
    assert_eq!(word(&bytes, 24), 0);

    // Header pseudo-entry: empty original at the start of the pool.
    let pool = 28 + 16 * count;
    assert_eq!(word(&bytes, 28), 0);
    assert_eq!(word(&bytes, 32), pool);
}

#[test]
fn strings_are_sorted_and_contiguous() {
    let bytes = write(&sample());
    let count = word(&bytes, 8) as usize;
    let original_table = word(&bytes, 12) as usize;
    let translated_table = word(&bytes, 16) as usize;

    let originals: Vec<&[u8]> = (0..count).map(|i| entry(&bytes, original_table, i).1).collect();
    assert_eq!(
        originals,
        [
            &b""[..],
            &b"Open"[..],
            &b"Untranslated"[..],
            &b"dialog\x04{0} file\x00{0} files"[..],
            &b"menu\x04Close"[..],
        ]
    );

    let (header_offset, header) = entry(&bytes, translated_table, 0);
    assert!(header.starts_with(b"Plural-Forms: nplurals=3; plural=n==1 ? 0 : n==2 ? 1 : 2;\nLanguage: ga"));
    let (last_original_offset, last_original) = entry(&bytes, original_table, count - 1);
    assert_eq!(header_offset, last_original_offset + last_original.len() + 1);

    let (_, plural) = entry(&bytes, translated_table, 3);
    assert_eq!(plural, b"{0} chomhad\x00{0} chomhad\x00{0} comhad");

    let (offset, last) = entry(&bytes, translated_table, count - 1);
    assert_eq!(offset + last.len() + 1, bytes.len());
    assert_eq!(bytes[bytes.len() - 1], 0);
}

#[test]
fn big_endian_files_are_read() {
    let little = write(&sample());
    let count = word(&little, 8) as usize;

    let mut big = little.clone();
    for word_index in 0..(7 + 4 * count) {
        let start = word_index * 4;
        big[start..start + 4].reverse();
    }

    let catalog = read(&big).unwrap();
    assert_eq!(catalog, read(&little).unwrap());
    assert_eq!(write(&catalog), little);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn bad_magic_reads_no_entries() {
    let mut bytes = write(&sample());
    bytes[0] = 0;

    let mut catalog = Localization::new();
    let error = catalog.read_with(&MoFormat, &bytes[..], false).unwrap_err();
    assert!(matches!(error, FormatError::MoMagic { .. }), "{error:?}");
    assert!(catalog.is_empty());
}

#[test]
fn text_input_is_not_an_mo_file() {
    let error = read(b"msgid \"a\"\nmsgstr \"b\"\n").unwrap_err();
    assert!(matches!(error, FormatError::MoMagic { found: 0x6967_736d }), "{error:?}");
}

#[test]
fn unsupported_revision() {
    let mut bytes = write(&sample());
    bytes[4] = 1;
    assert!(matches!(
        read(&bytes).unwrap_err(),
        FormatError::MoRevision { revision: 1 }
    ));
}

#[test]
fn truncated_data() {
    let bytes = write(&sample());
    assert!(matches!(
        read(&bytes[..bytes.len() - 5]).unwrap_err(),
        FormatError::MoTruncated { .. }
    ));
    assert!(matches!(read(&bytes[..2]).unwrap_err(), FormatError::MoTruncated { offset: 0 }));
}

#[test]
fn invalid_utf8_in_pool() {
    let mut bytes = write(&sample());
    let original_table = word(&bytes, 12) as usize;
    let offset = word(&bytes, original_table + 8 + 4) as usize;
    bytes[offset] = 0xff;
    assert!(matches!(
        read(&bytes).unwrap_err(),
        FormatError::InvalidUtf8 { .. }
    ));
}
