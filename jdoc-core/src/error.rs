// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The single error surface for `jdoc-core` (§7).
//!
//! Every fallible public operation returns `Result<T, DocError>`. This is
//! the "single consistent style" the specification's closing design note
//! asks for, mapping each of the six error kinds 1:1 onto a variant.

use jdoc_types::raw_type::UserKind;
use thiserror::Error;

/// Errors raised by `jdoc-core` operations.
#[derive(Debug, Error)]
pub enum DocError {
    /// An operation required a value of a specific kind (e.g. object lookup
    /// on a number, `integer()` on a string).
    #[error("expected a {expected:?} value, found a {found:?} value")]
    TypeError {
        expected: UserKind,
        found: UserKind,
    },

    /// An operation requires the value to be finalized/non-finalized and it
    /// is in the other state (e.g. `add_field` on a finalized value).
    #[error("operation requires a {expected} value: {detail}")]
    StateError {
        expected: &'static str,
        detail: &'static str,
    },

    /// The encoded size of a region would exceed `max_aggregate_size`
    /// (2^32 - 1 bytes).
    #[error("encoded size {size} exceeds the maximum aggregate size of {max}")]
    LengthError { size: u64, max: u64 },

    /// `at(idx)` or `at_front`/`at_back` was called on an empty collection or
    /// an out-of-bounds index.
    #[error("index {index} out of range (length {len})")]
    OutOfRange { index: usize, len: usize },

    /// A malformed buffer pointer, or an odd-length key-value pair span, was
    /// passed to a constructor.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The text parser rejected the input.
    #[error("parse error: {0}")]
    ParseError(String),
}

impl DocError {
    pub fn type_error(expected: UserKind, found: UserKind) -> Self {
        Self::TypeError { expected, found }
    }
}

impl From<jdoc_types::ParseError> for DocError {
    fn from(e: jdoc_types::ParseError) -> Self {
        Self::ParseError(e.to_string())
    }
}

pub type Result<T> = core::result::Result<T, DocError>;
