// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The immutable finalized representation (§4.1, §4.1.7, §4.1.8): a
//! contiguous byte buffer, parameterized over an owning or non-owning
//! buffer handle.

pub mod array_view;
pub mod buffer;
pub(crate) mod codec;
pub mod object_view;
pub mod scalar;

pub use buffer::{Buffer, FinalizedValue};
