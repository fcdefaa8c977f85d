// Copyright 2024 the jdoc authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Fixed-size header structs for the finalized binary layout (§4.1).
//!
//! These are the only parts of the wire format with a static, C-struct-like
//! shape; everything else (keys, string bytes, nested regions) is variable
//! length and is walked by hand in `jdoc-core`. The `#[derive(RawLayout)]`
//! macro (from `jdoc-derive`) generates the little-endian `parse_bytes` /
//! `write_bytes` pair for each of these so the three shapes below don't each
//! hand-roll the same byte shuffling `jdoc-core`'s `pod` module already
//! centralizes elsewhere.

use crate::pod::U24;
#[cfg(feature = "derive")]
use jdoc_derive::RawLayout;

/// `[ total_size : u32 ][ count : u32 ]`
///
/// Shared shape for both object and array regions (§4.1.1, §4.1.2); the two
/// are otherwise distinguished by the raw type byte in the *parent's*
/// vtable entry, not by anything in this header.
#[cfg_attr(feature = "derive", derive(RawLayout))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AggregateHeaderRaw {
    /// Total byte span of the region, including the header, vtable, all
    /// children, and trailing alignment padding.
    pub total_size: u32,
    /// Number of vtable entries (children) in the region.
    pub count: u32,
}

/// `{ raw_type : u8, offset : u24 }`
///
/// For an object vtable this is `(raw_type, key_offset)`; for an array
/// vtable it is `(raw_type, value_offset)`. Offsets are always measured
/// from the start of the aggregate region that owns this vtable.
#[cfg_attr(feature = "derive", derive(RawLayout))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VTableEntryRaw {
    pub raw_type: u8,
    pub offset: U24,
}

#[cfg(all(test, feature = "derive"))]
mod tests {
    use super::*;

    #[test]
    fn aggregate_header_roundtrip() {
        let header = AggregateHeaderRaw {
            total_size: 0x1234_5678,
            count: 7,
        };
        let mut buf = alloc::vec::Vec::new();
        header.write_bytes(&mut buf);
        assert_eq!(buf.len(), AggregateHeaderRaw::ENCODED_SIZE);

        let mut offset = 0;
        let parsed = AggregateHeaderRaw::parse_bytes(&mut offset, &buf).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(offset, AggregateHeaderRaw::ENCODED_SIZE);
    }

    #[test]
    fn vtable_entry_roundtrip() {
        let entry = VTableEntryRaw {
            raw_type: 0x0b,
            offset: U24::new(0x00ab_cdef).unwrap(),
        };
        let mut buf = alloc::vec::Vec::new();
        entry.write_bytes(&mut buf);
        assert_eq!(buf.len(), VTableEntryRaw::ENCODED_SIZE);

        let mut offset = 0;
        let parsed = VTableEntryRaw::parse_bytes(&mut offset, &buf).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn vtable_entry_rejects_oversized_offset() {
        assert!(U24::new(0x0100_0000).is_none());
    }
}
