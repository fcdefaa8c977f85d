// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `jdoc-core`: a dual-representation JSON-equivalent document library.
//!
//! A document is either a mutable [`heap`] tree — refcounted, copy-on-write,
//! cheap to edit one field at a time — or a [`finalized`] buffer — a single
//! contiguous, self-describing, immutable byte range that can be read
//! without allocating. [`finalizer::finalize`] converts the former into the
//! latter; [`definalizer::lift`] converts back. [`Value`] is a façade over
//! both so callers that only need read access don't have to pick a side.
//!
//! Text-format parsing and serialization live in [`parse`]; cross- and
//! same-representation equality live in [`compare`] and are wired into the
//! `PartialEq` impls on [`heap::HeapValue`] and [`finalized::FinalizedValue`]
//! directly, so callers rarely need to call into that module by name.

pub mod compare;
pub mod definalizer;
pub mod error;
pub mod finalized;
pub mod finalizer;
pub mod heap;
pub mod iter;
pub mod parse;
pub mod value;

pub use error::{DocError, Result};
pub use finalized::{Buffer, FinalizedValue};
pub use finalizer::finalize;
pub use definalizer::lift;
pub use heap::{HeapArray, HeapObject, HeapString, HeapValue};
pub use iter::{EntryIter, KeyIter, ValueIter};
pub use parse::{Parser, ParserOptions};
pub use value::Value;

pub use jdoc_types::UserKind;
