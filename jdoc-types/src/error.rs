// Copyright 2024 the jdoc authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use core::fmt::{Display, Formatter};

/// An error encountered while parsing bytes of the finalized wire layout.
///
/// This is the `no_std`-compatible, low-level counterpart to
/// [`jdoc_core::error::DocError`](../../jdoc_core/error/enum.DocError.html):
/// it describes failures that can occur purely from looking at a byte slice,
/// before any higher-level notion of "object"/"array"/"string" value is
/// attached to the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Data structure cannot be parsed because not enough input data was provided.
    InputTooSmall,
    /// A region's declared size does not fit within the 2^32-1 byte limit.
    RegionTooLarge,
    /// A string region lacked its required NUL terminator.
    StringNotNullTerminated,
    /// A string region's bytes are not valid UTF-8.
    StringNotUtf8,
    /// A raw type byte did not correspond to any known [`crate::raw_type::RawType`].
    UnknownRawType(u8),
    /// A vtable entry's key offset or value offset pointed outside the region.
    OffsetOutOfBounds,
    /// An object's vtable keys are not in strictly ascending order.
    KeysNotSorted,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InputTooSmall => f.write_str("input too small"),
            Self::RegionTooLarge => f.write_str("region exceeds the maximum encoded size"),
            Self::StringNotNullTerminated => f.write_str("string data is not NUL terminated"),
            Self::StringNotUtf8 => f.write_str("string data is not valid UTF-8"),
            Self::UnknownRawType(b) => write!(f, "unknown raw type byte {b:#04x}"),
            Self::OffsetOutOfBounds => f.write_str("vtable entry offset is out of bounds"),
            Self::KeysNotSorted => f.write_str("object keys are not in ascending order"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}
