// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heap → finalized conversion (§4.3): compute an upper bound, then lay out
//! the tree into a single buffer with sorted keys and narrowest numeric
//! forms.
//!
//! The size-bound pre-pass in §4.1.6 exists so a real implementation can
//! allocate one aligned block up front and never resize it while writing.
//! This implementation still runs the pre-pass — both to reject oversized
//! documents with `length_error` before doing any writing work, and because
//! its recursive shape is the natural place to decide each value's narrowed
//! `RawType` once rather than twice — but writes into a plain growable
//! `Vec<u8>` rather than a hand-managed fixed allocation. A `Vec`'s internal
//! reallocation during growth is invisible to every observable contract in
//! §4: the final buffer's bytes, alignment, and length are identical either
//! way.

use crate::error::{DocError, Result};
use crate::finalized::buffer::FinalizedValue;
use crate::finalized::codec;
use crate::heap::{HeapArray, HeapObject, HeapString, HeapValue};
use bytes::Bytes;
use jdoc_types::header::{AggregateHeaderRaw, VTableEntryRaw};
use jdoc_types::pod;
use jdoc_types::{RawType, MAX_AGGREGATE_SIZE};

/// Convert a heap object root into a finalized buffer. Only object roots may
/// be finalized (§4.3 step 1, §9's open question on non-object roots); any
/// other root shape is not representable since [`HeapObject`] is the only
/// root type this function accepts.
pub fn finalize(root: &HeapObject) -> Result<FinalizedValue<Bytes>> {
    let bound = upper_bound_object(root);
    if bound > MAX_AGGREGATE_SIZE {
        log::debug!("finalize: upper bound {bound} exceeds max aggregate size, aborting");
        return Err(DocError::LengthError {
            size: bound,
            max: MAX_AGGREGATE_SIZE,
        });
    }
    let bytes = encode_object(root)?;
    Ok(FinalizedValue::new(RawType::Object, Bytes::from(bytes)))
}

/// Narrowest integer `RawType` that losslessly represents `v`.
fn narrow_integer(v: i64) -> RawType {
    if i16::try_from(v).is_ok() {
        RawType::ShortInteger
    } else if i32::try_from(v).is_ok() {
        RawType::Integer
    } else {
        RawType::LongInteger
    }
}

/// `Decimal` (f32) iff the value round-trips through f32 exactly, else
/// `LongDecimal` (f64), per §4.3's numeric canonicalization rule.
fn narrow_decimal(v: f64) -> RawType {
    if (v as f32) as f64 == v {
        RawType::Decimal
    } else {
        RawType::LongDecimal
    }
}

fn upper_bound_value(value: &HeapValue) -> u64 {
    match value {
        HeapValue::Null => 0,
        HeapValue::Boolean(_) => 1,
        HeapValue::Integer(v) => match narrow_integer(*v) {
            RawType::ShortInteger => 2,
            RawType::Integer => 4,
            _ => 8,
        },
        HeapValue::Decimal(v) => match narrow_decimal(*v) {
            RawType::Decimal => 4,
            _ => 8,
        },
        HeapValue::String(s) => codec::string_upper_bound(s.len()),
        HeapValue::Array(a) => upper_bound_array(a),
        HeapValue::Object(o) => upper_bound_object(o),
    }
}

fn upper_bound_array(arr: &HeapArray) -> u64 {
    let count = arr.size() as u64;
    let mut total = codec::HEADER_SIZE as u64 + codec::ENTRY_SIZE as u64 * (count + 1);
    for child in arr.iter() {
        let align = raw_type_of(child).align_of() as u64;
        total += upper_bound_value(child) + align - 1;
    }
    total
}

fn upper_bound_object(obj: &HeapObject) -> u64 {
    let count = obj.size() as u64;
    let mut total = codec::HEADER_SIZE as u64 + codec::ENTRY_SIZE as u64 * (count + 1);
    for (key, value) in obj.iter() {
        let value_align = raw_type_of(value).align_of() as u64;
        let string_align = RawType::SmallString.align_of() as u64;
        total += codec::string_upper_bound(key.len()) + value_align - 1
            + upper_bound_value(value) + string_align - 1;
    }
    total + 7 // trailing 8-byte alignment pad
}

/// The `RawType` a value will be encoded as, without actually encoding it —
/// shared between the size pre-pass and the writer so the two never
/// disagree about which numeric width was chosen.
fn raw_type_of(value: &HeapValue) -> RawType {
    match value {
        HeapValue::Null => RawType::Null,
        HeapValue::Boolean(_) => RawType::Boolean,
        HeapValue::Integer(v) => narrow_integer(*v),
        HeapValue::Decimal(v) => narrow_decimal(*v),
        HeapValue::String(s) => codec::string_raw_type(s.len()),
        HeapValue::Array(_) => RawType::Array,
        HeapValue::Object(_) => RawType::Object,
    }
}

/// Encode `value`'s own region (no parent padding). Returns the raw type
/// chosen and the exact bytes of that region.
fn encode_value(value: &HeapValue) -> Result<(RawType, Vec<u8>)> {
    let mut out = Vec::new();
    match value {
        HeapValue::Null => {}
        HeapValue::Boolean(b) => pod::write_u8(&mut out, *b as u8),
        HeapValue::Integer(v) => match narrow_integer(*v) {
            RawType::ShortInteger => pod::write_i16(&mut out, *v as i16),
            RawType::Integer => pod::write_i32(&mut out, *v as i32),
            _ => pod::write_i64(&mut out, *v),
        },
        HeapValue::Decimal(v) => match narrow_decimal(*v) {
            RawType::Decimal => pod::write_f32(&mut out, *v as f32),
            _ => pod::write_f64(&mut out, *v),
        },
        HeapValue::String(s) => codec::write_string(&mut out, s.as_str()),
        HeapValue::Array(a) => return Ok((RawType::Array, encode_array(a)?)),
        HeapValue::Object(o) => return Ok((RawType::Object, encode_object(o)?)),
    }
    Ok((raw_type_of(value), out))
}

fn write_header_and_vtable(
    out: &mut [u8],
    total_size: u32,
    entries: &[VTableEntryRaw],
) {
    let header = AggregateHeaderRaw {
        total_size,
        count: entries.len() as u32,
    };
    let mut header_bytes = Vec::new();
    header.write_bytes(&mut header_bytes);
    out[0..codec::HEADER_SIZE].copy_from_slice(&header_bytes);

    for (i, entry) in entries.iter().enumerate() {
        let mut entry_bytes = Vec::new();
        entry.write_bytes(&mut entry_bytes);
        let at = codec::HEADER_SIZE + i * codec::ENTRY_SIZE;
        out[at..at + codec::ENTRY_SIZE].copy_from_slice(&entry_bytes);
    }
}

fn check_total_size(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| DocError::LengthError {
        size: len as u64,
        max: MAX_AGGREGATE_SIZE,
    })
}

fn encode_array(arr: &HeapArray) -> Result<Vec<u8>> {
    let count = arr.size();
    let prefix_len = codec::HEADER_SIZE + count * codec::ENTRY_SIZE;
    let mut out = vec![0u8; prefix_len];
    let mut entries = Vec::with_capacity(count);

    for value in arr.iter() {
        let (raw_type, bytes) = encode_value(value)?;
        codec::pad(&mut out, raw_type.align_of());
        let offset = out.len();
        out.extend_from_slice(&bytes);
        entries.push(VTableEntryRaw {
            raw_type: u8::from(raw_type),
            offset: codec::write_u24_checked(offset as u64)?,
        });
    }
    codec::pad(&mut out, 8);

    let total_size = check_total_size(out.len())?;
    write_header_and_vtable(&mut out, total_size, &entries);
    Ok(out)
}

fn sorted_entries(obj: &HeapObject) -> Vec<(HeapString, HeapValue)> {
    let mut entries: Vec<(HeapString, HeapValue)> =
        obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    entries.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
    entries
}

fn encode_object(obj: &HeapObject) -> Result<Vec<u8>> {
    let entries_sorted = sorted_entries(obj);
    let count = entries_sorted.len();
    let prefix_len = codec::HEADER_SIZE + count * codec::ENTRY_SIZE;
    let mut out = vec![0u8; prefix_len];
    let mut entries = Vec::with_capacity(count);

    for (key, value) in &entries_sorted {
        let key_offset = out.len();
        codec::write_string(&mut out, key.as_str());
        let (raw_type, bytes) = encode_value(value)?;
        codec::pad(&mut out, raw_type.align_of());
        out.extend_from_slice(&bytes);
        entries.push(VTableEntryRaw {
            raw_type: u8::from(raw_type),
            offset: codec::write_u24_checked(key_offset as u64)?,
        });
    }
    codec::pad(&mut out, 8);

    let total_size = check_total_size(out.len())?;
    write_header_and_vtable(&mut out, total_size, &entries);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(pairs: &[(&str, HeapValue)]) -> HeapObject {
        let mut o = HeapObject::new();
        for (k, v) in pairs {
            o.set(*k, v.clone());
        }
        o
    }

    #[test]
    fn finalizes_scalars() {
        let root = obj(&[
            ("n", HeapValue::Integer(42)),
            ("f", HeapValue::Decimal(3.14)),
            ("b", HeapValue::Boolean(true)),
            ("s", HeapValue::String(HeapString::new("hi"))),
            ("z", HeapValue::Null),
        ]);
        let finalized = finalize(&root).unwrap();
        assert_eq!(finalized.at("n").unwrap().integer().unwrap(), 42);
        assert_eq!(finalized.at("f").unwrap().decimal().unwrap(), 3.14);
        assert!(finalized.at("b").unwrap().boolean().unwrap());
        assert_eq!(finalized.at("s").unwrap().strv().unwrap(), "hi");
        assert!(finalized.at("z").unwrap().is_null());
    }

    #[test]
    fn keys_are_sorted_ascending() {
        let root = obj(&[
            ("c", HeapValue::Integer(3)),
            ("a", HeapValue::Integer(1)),
            ("b", HeapValue::Integer(2)),
        ]);
        let finalized = finalize(&root).unwrap();
        assert_eq!(finalized.keys().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn insertion_order_does_not_affect_bytes() {
        let a = obj(&[
            ("a", HeapValue::Integer(1)),
            ("b", HeapValue::Integer(2)),
            ("c", HeapValue::Integer(3)),
        ]);
        let b = obj(&[
            ("c", HeapValue::Integer(3)),
            ("a", HeapValue::Integer(1)),
            ("b", HeapValue::Integer(2)),
        ]);
        let fa = finalize(&a).unwrap();
        let fb = finalize(&b).unwrap();
        assert_eq!(fa.region(), fb.region());
    }

    #[test]
    fn check_total_size_rejects_over_max_aggregate_size() {
        let err = check_total_size(MAX_AGGREGATE_SIZE as usize + 1).unwrap_err();
        assert!(matches!(err, DocError::LengthError { .. }));
    }

}
