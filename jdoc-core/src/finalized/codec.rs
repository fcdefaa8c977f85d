// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Byte-level encode/decode primitives for the finalized layout (§4.1).
//!
//! **Key-string disambiguation.** §4.1.1 gives each vtable entry a
//! `raw_type` byte for the *value* it points at, but says nothing about how
//! a reader is meant to know which of the three string-length encodings
//! (§4.1.3) a *key* used, since keys have no vtable entry of their own. This
//! implementation resolves that by making every string region
//! self-describing: a 1-byte raw-type tag (`SmallString`/`String`/
//! `BigString`) precedes the length prefix, for both keys and string
//! values. Values already carry a `raw_type` in their vtable entry, so the
//! tag is redundant there, but using one string encoder/decoder pair for
//! both keys and values is simpler than a second, key-only format. See
//! DESIGN.md for this decision.

use crate::error::{DocError, Result};
use jdoc_types::header::{AggregateHeaderRaw, VTableEntryRaw};
use jdoc_types::pod::{self, U24};
use jdoc_types::{ParseError, RawType};

/// Smallest encoding of `s.len()` that fits, matching §3's three size
/// classes.
pub(crate) fn string_raw_type(len: usize) -> RawType {
    if len <= u8::MAX as usize {
        RawType::SmallString
    } else if len <= u16::MAX as usize {
        RawType::String
    } else {
        RawType::BigString
    }
}

/// Upper bound, in bytes, of the self-describing region §4.1.3 plus the
/// leading raw-type tag: `1 (tag) + len-prefix + bytes + 1 (NUL)`.
pub(crate) fn string_upper_bound(len: usize) -> u64 {
    let len_prefix = match string_raw_type(len) {
        RawType::SmallString => 1,
        RawType::String => 2,
        RawType::BigString => 4,
        _ => unreachable!(),
    };
    1 + len_prefix + len as u64 + 1
}

/// Append a self-describing string region: `[tag][len][bytes][NUL]`.
pub(crate) fn write_string(buf: &mut Vec<u8>, s: &str) {
    let raw_type = string_raw_type(s.len());
    pod::write_u8(buf, u8::from(raw_type));
    match raw_type {
        RawType::SmallString => pod::write_u8(buf, s.len() as u8),
        RawType::String => pod::write_u16(buf, s.len() as u16),
        RawType::BigString => pod::write_u32(buf, s.len() as u32),
        _ => unreachable!(),
    }
    buf.extend_from_slice(s.as_bytes());
    pod::write_u8(buf, 0);
}

/// Read a self-describing string region starting at `*offset`, advancing
/// `*offset` past it (including the NUL terminator). Returns the decoded
/// `&str`.
pub(crate) fn read_string<'a>(offset: &mut usize, data: &'a [u8]) -> Result<&'a str> {
    Ok(parse_str(offset, data)?)
}

/// Like [`read_string`], but returns the bytes *including* the trailing NUL
/// terminator, for callers that need the NUL-terminated borrow of §4.1.3
/// directly (the `str()` reader of §4.6) rather than a plain `&str`.
pub(crate) fn read_string_with_nul<'a>(offset: &mut usize, data: &'a [u8]) -> Result<&'a [u8]> {
    Ok(parse_string_with_nul(offset, data)?)
}

/// Core of [`read_string_with_nul`], returning the native `ParseError`
/// rather than `DocError`, so [`validate_object_root`] can choose its own
/// mapping instead of picking up the blanket `DocError::ParseError` one.
fn parse_string_with_nul<'a>(
    offset: &mut usize,
    data: &'a [u8],
) -> core::result::Result<&'a [u8], ParseError> {
    let tag_byte = pod::parse_u8(offset, data)?;
    let raw_type =
        RawType::try_from(tag_byte).map_err(|_| ParseError::UnknownRawType(tag_byte))?;
    let len = match raw_type {
        RawType::SmallString => pod::parse_u8(offset, data)? as usize,
        RawType::String => pod::parse_le_u16(offset, data)? as usize,
        RawType::BigString => pod::parse_le_u32(offset, data)? as usize,
        _ => return Err(ParseError::UnknownRawType(tag_byte)),
    };
    let start = *offset;
    pod::parse_bytes(offset, data, len)?;
    let nul = pod::parse_u8(offset, data)?;
    if nul != 0 {
        return Err(ParseError::StringNotNullTerminated);
    }
    Ok(data
        .get(start..*offset)
        .expect("range already validated by parse_bytes/parse_u8 above"))
}

/// Core of [`read_string`], returning the native `ParseError` rather than
/// `DocError`.
fn parse_str<'a>(offset: &mut usize, data: &'a [u8]) -> core::result::Result<&'a str, ParseError> {
    let bytes = parse_string_with_nul(offset, data)?;
    core::str::from_utf8(&bytes[..bytes.len() - 1]).map_err(|_| ParseError::StringNotUtf8)
}

/// Read the fixed-size aggregate header at `*offset`.
pub(crate) fn read_aggregate_header(
    offset: &mut usize,
    data: &[u8],
) -> Result<AggregateHeaderRaw> {
    Ok(AggregateHeaderRaw::parse_bytes(offset, data)?)
}

/// Read vtable entry `index` of an aggregate region whose header has
/// already been consumed (i.e. `*offset` is right after the header).
pub(crate) fn read_vtable_entry(region: &[u8], index: usize) -> Result<VTableEntryRaw> {
    let mut offset = AggregateHeaderRaw::ENCODED_SIZE + index * VTableEntryRaw::ENCODED_SIZE;
    Ok(VTableEntryRaw::parse_bytes(&mut offset, region)?)
}

/// Map a wire-level parse failure to the `invalid_argument` kind §6.3
/// requires of the buffer-constructor gate: unlike the normal accessor
/// paths, which let `ParseError` auto-convert into `DocError::ParseError`
/// via `?` (that variant is reserved for text-parser rejection, §7),
/// `validate_object_root` treats every structural defect in an
/// externally-owned buffer as a bad argument, not a parse error.
fn invalid_argument(e: ParseError) -> DocError {
    let detail = match e {
        ParseError::InputTooSmall => "buffer too small to contain a valid header or vtable entry",
        ParseError::RegionTooLarge => "region exceeds the maximum encoded size",
        ParseError::StringNotNullTerminated => "key string is not NUL terminated",
        ParseError::StringNotUtf8 => "key string is not valid UTF-8",
        ParseError::UnknownRawType(_) => "vtable entry has an unknown raw type",
        ParseError::OffsetOutOfBounds => "vtable entry offset is out of bounds",
        ParseError::KeysNotSorted => "object keys are not in ascending order",
    };
    DocError::InvalidArgument(detail)
}

/// Validate that `data` begins a well-formed encoded object region: a
/// readable header whose `total_size` does not exceed `data.len()`, whose
/// `count` vtable entries are all in-bounds, and whose keys are strictly
/// ascending (the precondition object lookup's binary search relies on).
/// Does not recursively validate children; full structural validation
/// happens lazily as values are accessed, matching §6.3's "rejected before
/// any access" promise only for the outermost region.
///
/// Parses the region directly against `jdoc_types::ParseError` rather than
/// going through [`read_aggregate_header`]/[`read_vtable_entry`]/
/// [`read_string`] (whose `DocError` return type has already applied the
/// blanket `ParseError -> DocError::ParseError` conversion by the time it
/// reaches its caller), so every failure here can be remapped to
/// `invalid_argument` instead.
pub(crate) fn validate_object_root(data: &[u8]) -> Result<()> {
    if data.is_empty() {
        return Err(DocError::InvalidArgument("buffer is empty"));
    }
    let mut offset = 0usize;
    let header = AggregateHeaderRaw::parse_bytes(&mut offset, data).map_err(invalid_argument)?;
    let total_size = header.total_size as usize;
    if total_size > data.len() {
        return Err(DocError::InvalidArgument(
            "object total_size exceeds buffer length",
        ));
    }
    let vtable_end = offset
        .checked_add(header.count as usize * VTableEntryRaw::ENCODED_SIZE)
        .ok_or(DocError::InvalidArgument("vtable size overflow"))?;
    if vtable_end > total_size {
        return Err(DocError::InvalidArgument("vtable extends past total_size"));
    }
    let region = &data[..total_size];
    let mut previous_key: Option<&str> = None;
    for index in 0..header.count as usize {
        let mut entry_offset = HEADER_SIZE + index * ENTRY_SIZE;
        let entry = VTableEntryRaw::parse_bytes(&mut entry_offset, region).map_err(invalid_argument)?;
        let key_offset = entry.offset.get() as usize;
        if key_offset >= total_size {
            return Err(invalid_argument(ParseError::OffsetOutOfBounds));
        }
        RawType::try_from(entry.raw_type)
            .map_err(|_| invalid_argument(ParseError::UnknownRawType(entry.raw_type)))?;

        // The object vtable is only a valid binary-search index (§4.1.7) if
        // its keys are strictly ascending; check that here rather than at
        // first lookup, so a malformed externally-wrapped buffer (§6.3) is
        // rejected before any access instead of silently mis-searching.
        let mut key_cursor = key_offset;
        let key = parse_str(&mut key_cursor, region).map_err(invalid_argument)?;
        if let Some(previous) = previous_key {
            if previous >= key {
                return Err(invalid_argument(ParseError::KeysNotSorted));
            }
        }
        previous_key = Some(key);
    }
    Ok(())
}

/// Byte span of the value region starting at `offset` within `region`,
/// given its `raw_type`. For aggregates this is `total_size` (read from the
/// region's own header); for primitives it is the fixed-width or
/// self-describing string length.
pub(crate) fn region_len_at(region: &[u8], raw_type: RawType, offset: usize) -> Result<usize> {
    match raw_type {
        RawType::Null => Ok(0),
        RawType::Boolean => Ok(1),
        RawType::ShortInteger => Ok(2),
        RawType::Integer | RawType::Decimal => Ok(4),
        RawType::LongInteger | RawType::LongDecimal => Ok(8),
        RawType::SmallString | RawType::String | RawType::BigString => {
            let mut cursor = offset;
            read_string(&mut cursor, region)?;
            Ok(cursor - offset)
        }
        RawType::Object | RawType::Array => {
            let mut cursor = offset;
            let header = read_aggregate_header(&mut cursor, region)?;
            Ok(header.total_size as usize)
        }
    }
}

/// Round `offset` up to the alignment `raw_type` requires.
pub(crate) fn align_for(offset: usize, raw_type: RawType) -> usize {
    pod::align_up(offset, raw_type.align_of())
}

/// Append trailing zero padding so `buf.len()` is a multiple of `align`.
pub(crate) fn pad(buf: &mut Vec<u8>, align: usize) {
    pod::pad_to(buf, align);
}

pub(crate) const HEADER_SIZE: usize = AggregateHeaderRaw::ENCODED_SIZE;
pub(crate) const ENTRY_SIZE: usize = VTableEntryRaw::ENCODED_SIZE;

pub(crate) fn write_u24_checked(value: u64) -> Result<U24> {
    let narrowed: u32 = u32::try_from(value).map_err(|_| DocError::LengthError {
        size: value,
        max: jdoc_types::MAX_AGGREGATE_SIZE,
    })?;
    U24::try_from(narrowed).map_err(|_| DocError::LengthError {
        size: value,
        max: U24::MAX as u64,
    })
}
