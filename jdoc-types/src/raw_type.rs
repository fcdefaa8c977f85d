// Copyright 2024 the jdoc authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The finalized-representation type discriminator.
///
/// This is narrower than [`UserKind`] only in the sense that it distinguishes
/// storage variants (`small_string` vs. `big_string`, `short_integer` vs.
/// `long_integer`, ...) that the public API collapses into a single user
/// kind. It is what is actually stored in a vtable entry's `raw_type` byte.
///
/// The discriminant values below are this implementation's own choice of
/// wire constant (the spec requires *an* implementation to fix and document
/// one, not to match any particular external format).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum RawType {
    Null = 0x00,
    Boolean = 0x01,
    ShortInteger = 0x02,
    Integer = 0x03,
    LongInteger = 0x04,
    Decimal = 0x05,
    LongDecimal = 0x06,
    SmallString = 0x07,
    String = 0x08,
    BigString = 0x09,
    Array = 0x0a,
    Object = 0x0b,
}

impl RawType {
    /// The user-visible kind this raw type is reported as through the
    /// public introspection surface (`is_object`, `is_integer`, ...).
    pub const fn user_kind(self) -> UserKind {
        match self {
            RawType::Null => UserKind::Null,
            RawType::Boolean => UserKind::Boolean,
            RawType::ShortInteger | RawType::Integer | RawType::LongInteger => UserKind::Integer,
            RawType::Decimal | RawType::LongDecimal => UserKind::Decimal,
            RawType::SmallString | RawType::String | RawType::BigString => UserKind::String,
            RawType::Array => UserKind::Array,
            RawType::Object => UserKind::Object,
        }
    }

    /// Whether this raw type's region has a `(count, vtable, children)` shape.
    pub const fn is_aggregate(self) -> bool {
        matches!(self, RawType::Array | RawType::Object)
    }

    /// The natural alignment, in bytes, of a region of this raw type.
    ///
    /// Aggregates are 8-byte aligned (§4.1.5); fixed-width numerics are
    /// aligned to their own size; strings and the zero-byte null payload are
    /// 1-byte aligned.
    pub const fn align_of(self) -> usize {
        match self {
            RawType::Object | RawType::Array => 8,
            RawType::LongInteger | RawType::LongDecimal => 8,
            RawType::Integer | RawType::Decimal => 4,
            RawType::ShortInteger => 2,
            RawType::Boolean | RawType::Null => 1,
            RawType::SmallString | RawType::String | RawType::BigString => 1,
        }
    }
}

/// The seven user-visible value kinds.
///
/// Introspection predicates (`is_object`, `is_array`, ...) are mutually
/// exclusive over these kinds regardless of which representation
/// (heap or finalized) or which [`RawType`] backs a given value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserKind {
    Object,
    Array,
    String,
    Integer,
    Decimal,
    Boolean,
    Null,
}

impl UserKind {
    pub const fn is_aggregate(self) -> bool {
        matches!(self, UserKind::Object | UserKind::Array)
    }

    pub const fn is_primitive(self) -> bool {
        !self.is_aggregate()
    }

    pub const fn is_numeric(self) -> bool {
        matches!(self, UserKind::Integer | UserKind::Decimal)
    }
}
