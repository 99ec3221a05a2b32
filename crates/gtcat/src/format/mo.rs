//! The gettext MO binary format.
//!
//! Layout: a 28-byte header (magic, revision, entry count, offsets of the
//! original and translated tables, two unused hash-table fields), the two
//! tables of `(length, offset)` pairs, then a pool of NUL-terminated
//! strings. Entry 0 is the header block, keyed by the empty string.

use std::io::{self, Read, Write};
use std::iter;
use std::str;

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};

use super::{Format, FormatError, has_writable_key};
use crate::catalog::Localization;
use crate::types::{CONTEXT_SEPARATOR, Message, PLURAL_SEPARATOR};

/// Magic number at offset 0, as read in the file's own byte order.
pub const MO_MAGIC: u32 = 0x9504_12de;

const HEADER_SIZE: u32 = 28;
const TABLE_ENTRY_SIZE: u32 = 8;

/// Reads and writes compiled `.mo` catalogs.
///
/// Files in either byte order are read; files are always written
/// little-endian, with no hash table. Comments are not part of the format.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoFormat;

impl Format for MoFormat {
    fn extensions(&self) -> &'static [&'static str] {
        &["mo"]
    }

    fn read(
        &self,
        catalog: &mut Localization,
        input: &mut dyn Read,
        _load_comments: bool,
    ) -> Result<(), FormatError> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;

        match u32_at::<LittleEndian>(&data, 0)? {
            MO_MAGIC => read_entries::<LittleEndian>(catalog, &data),
            found if found.swap_bytes() == MO_MAGIC => read_entries::<BigEndian>(catalog, &data),
            found => Err(FormatError::MoMagic { found }),
        }
    }

    fn write(
        &self,
        catalog: &Localization,
        output: &mut dyn Write,
        _write_comments: bool,
    ) -> Result<(), FormatError> {
        let messages: Vec<&Message> = catalog
            .sorted_messages()
            .into_iter()
            .filter(|message| has_writable_key(message))
            .collect();

        let originals: Vec<String> = iter::once(String::new())
            .chain(messages.iter().map(|message| original_key(message)))
            .collect();
        let translations: Vec<String> = iter::once(catalog.header_block())
            .chain(
                messages
                    .iter()
                    .map(|message| message.translations.join(&PLURAL_SEPARATOR.to_string())),
            )
            .collect();

        let count = to_u32(originals.len())?;
        let original_table = HEADER_SIZE;
        let translated_table = original_table + count * TABLE_ENTRY_SIZE;
        let pool_start = translated_table + count * TABLE_ENTRY_SIZE;

        let mut data = Vec::new();
        data.write_u32::<LittleEndian>(MO_MAGIC)?;
        data.write_u32::<LittleEndian>(0)?;
        data.write_u32::<LittleEndian>(count)?;
        data.write_u32::<LittleEndian>(original_table)?;
        data.write_u32::<LittleEndian>(translated_table)?;
        data.write_u32::<LittleEndian>(0)?;
        data.write_u32::<LittleEndian>(0)?;

        let mut offset = pool_start;
        for string in originals.iter().chain(&translations) {
            let length = to_u32(string.len())?;
            data.write_u32::<LittleEndian>(length)?;
            data.write_u32::<LittleEndian>(offset)?;
            offset = length
                .checked_add(1)
                .and_then(|size| offset.checked_add(size))
                .ok_or_else(too_large)?;
        }
        for string in originals.iter().chain(&translations) {
            data.extend_from_slice(string.as_bytes());
            data.push(0);
        }

        output.write_all(&data)?;
        output.flush()?;
        tracing::debug!(entries = count, bytes = data.len(), "wrote MO catalog");
        Ok(())
    }
}

/// `context\u{4}id`, followed by `\0plural` when the message has a plural.
fn original_key(message: &Message) -> String {
    let mut key = message.key();
    if let Some(plural) = message.plural.as_deref().filter(|plural| !plural.is_empty()) {
        key.push(PLURAL_SEPARATOR);
        key.push_str(plural);
    }
    key
}

fn read_entries<B: ByteOrder>(catalog: &mut Localization, data: &[u8]) -> Result<(), FormatError> {
    let revision = u32_at::<B>(data, 4)?;
    if revision != 0 {
        return Err(FormatError::MoRevision { revision });
    }
    let count = u32_at::<B>(data, 8)?;
    let original_table = u32_at::<B>(data, 12)?;
    let translated_table = u32_at::<B>(data, 16)?;

    for index in 0..u64::from(count) {
        let original = table_string::<B>(data, u64::from(original_table), index)?;
        let translated = table_string::<B>(data, u64::from(translated_table), index)?;

        if original.is_empty() {
            catalog.apply_header_block(translated)?;
            continue;
        }

        let (key, plural) = match original.split_once(PLURAL_SEPARATOR) {
            Some((key, plural)) => (key, Some(plural.to_string())),
            None => (original, None),
        };
        let (context, id) = key.split_once(CONTEXT_SEPARATOR).unwrap_or(("", key));

        let message = Message::builder()
            .id(id)
            .context(context)
            .maybe_plural(plural)
            .translations(translated.split(PLURAL_SEPARATOR).map(str::to_string).collect())
            .build();
        catalog.add(message);
    }

    tracing::debug!(entries = count, bytes = data.len(), "read MO catalog");
    Ok(())
}

/// The string described by entry `index` of the table at `table`.
fn table_string<B: ByteOrder>(data: &[u8], table: u64, index: u64) -> Result<&str, FormatError> {
    let entry = table + index * u64::from(TABLE_ENTRY_SIZE);
    let length = u32_at::<B>(data, entry)?;
    let offset = u32_at::<B>(data, entry + 4)?;

    let start = u64::from(offset);
    let bytes = slice(data, start, u64::from(length))?;
    str::from_utf8(bytes).map_err(|e| FormatError::InvalidUtf8 {
        offset: start + e.valid_up_to() as u64,
    })
}

fn u32_at<B: ByteOrder>(data: &[u8], offset: u64) -> Result<u32, FormatError> {
    slice(data, offset, 4).map(B::read_u32)
}

fn slice(data: &[u8], offset: u64, length: u64) -> Result<&[u8], FormatError> {
    let truncated = || FormatError::MoTruncated { offset };
    let start = usize::try_from(offset).map_err(|_| truncated())?;
    let end = usize::try_from(offset + length).map_err(|_| truncated())?;
    data.get(start..end).ok_or_else(truncated)
}

fn to_u32(value: usize) -> Result<u32, FormatError> {
    u32::try_from(value).map_err(|_| too_large())
}

fn too_large() -> FormatError {
    FormatError::Io(io::Error::new(
        io::ErrorKind::InvalidInput,
        "catalog is too large for the MO format",
    ))
}
