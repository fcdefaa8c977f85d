// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cross-representation comparison (§4.1.8): the single `compare` entry
//! point both `PartialEq` impls below delegate to, per SPEC_FULL.md's
//! supplemented-features note on unifying `==` across heap and finalized
//! values.

use crate::finalized::{Buffer, FinalizedValue};
use crate::heap::HeapValue;
use jdoc_types::UserKind;

/// Finalized-to-finalized equality (§4.1.8): compare raw type, then do a
/// byte-wise compare of the two regions. Canonicalization (sorted keys,
/// narrowest numeric forms, uniform alignment) makes this a sound substitute
/// for deep structural equality as long as both sides came from a
/// finalizer — which, in this crate, is the only way to produce a
/// [`FinalizedValue`].
pub fn finalized_eq<B1: Buffer, B2: Buffer>(a: &FinalizedValue<B1>, b: &FinalizedValue<B2>) -> bool {
    a.raw_type() == b.raw_type() && a.region() == b.region()
}

/// Structural equality between a heap value and a finalized value,
/// traversing both trees in parallel. Any decode error along the way is
/// treated as inequality rather than propagated, matching the fallible-free
/// signature `PartialEq` requires.
pub fn cross_eq<B: Buffer>(heap: &HeapValue, finalized: &FinalizedValue<B>) -> bool {
    cross_eq_inner(heap, finalized).unwrap_or(false)
}

fn cross_eq_inner<B: Buffer>(heap: &HeapValue, finalized: &FinalizedValue<B>) -> crate::error::Result<bool> {
    if heap.kind() != finalized.kind() {
        return Ok(false);
    }
    Ok(match (heap, finalized.kind()) {
        (HeapValue::Null, UserKind::Null) => true,
        (HeapValue::Boolean(v), UserKind::Boolean) => *v == finalized.boolean()?,
        (HeapValue::Integer(v), UserKind::Integer) => *v == finalized.integer()?,
        (HeapValue::Decimal(v), UserKind::Decimal) => *v == finalized.decimal()?,
        (HeapValue::String(v), UserKind::String) => v.as_str() == finalized.strv()?,
        (HeapValue::Array(v), UserKind::Array) => {
            if v.size() != finalized.size() {
                return Ok(false);
            }
            for (index, item) in v.iter().enumerate() {
                let other = finalized.at_index(index)?;
                if !cross_eq_inner(item, &other)? {
                    return Ok(false);
                }
            }
            true
        }
        (HeapValue::Object(v), UserKind::Object) => {
            if v.size() != finalized.size() {
                return Ok(false);
            }
            for (key, value) in v.iter() {
                match finalized.find(key.as_str())? {
                    Some(other) if cross_eq_inner(value, &other)? => {}
                    _ => return Ok(false),
                }
            }
            true
        }
        _ => false,
    })
}
