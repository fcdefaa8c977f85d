// Copyright 2024 the jdoc authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![cfg_attr(not(feature = "std"), no_std)]

//! Wire-level types and constants for the jdoc finalized binary layout.
//!
//! This crate defines the byte-level shape of the finalized representation:
//! the fixed-size region headers, the vtable entry shape, the raw type
//! discriminator, and the little-endian primitive readers/writers everything
//! else is built from.
//!
//! # Minimal by Design
//!
//! Like the on-disk-format crate it is modeled after, this crate aims to be
//! the smallest possible description of the byte layout so it can be reused
//! independently of `jdoc-core`'s heap tree, COW discipline, or parser
//! integration. It is `no_std` by default (`alloc` is still required, for
//! the `Vec<u8>`-based writers); the `std` feature only adds
//! `std::error::Error` impls.
//!
//! # Endianness
//!
//! All finalized multi-byte fields are little-endian, regardless of host
//! byte order. [`pod`] is the single place that decision is encoded.

extern crate alloc;

pub mod error;
pub mod header;
pub mod pod;
pub mod raw_type;

pub use error::ParseError;
pub use raw_type::{RawType, UserKind};

/// The maximum byte size of any single encoded aggregate region (§3): the
/// widest value a `u32 total_size` field can hold.
pub const MAX_AGGREGATE_SIZE: u64 = u32::MAX as u64;

/// Strings up to this length (inclusive) are stored inline in a heap value
/// rather than behind a shared allocation (§4.2.5).
pub const SSO_BYTES: usize = 15;

/// Alignment, in bytes, of object and array regions (§4.1.5).
pub const AGGREGATE_ALIGN: usize = 8;
