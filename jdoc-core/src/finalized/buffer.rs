// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The parameterized owning/non-owning buffer handle (§5, §9).
//!
//! The spec asks for the refcount abstraction to be "parameterized": the
//! core can be instantiated with either an owning sharable pointer or a
//! non-owning view pointer, encoded in the type system rather than behind a
//! runtime check. `bytes::Bytes` is already exactly that owning pointer (an
//! atomically-refcounted, cheaply-sliceable byte buffer), the same role it
//! plays for the teacher's `Block`/`*Parsed` types. The non-owning
//! counterpart is simply `&[u8]`: a borrow that cannot outlive the `Bytes`
//! (or any other byte source) it came from, enforced by the borrow checker
//! rather than a second refcount.
//!
//! [`FinalizedValue<B>`] is generic over `B: Buffer`. `FinalizedValue<Bytes>`
//! is the owning handle; `FinalizedValue<&[u8]>` is the non-owning view,
//! produced from an owning handle via [`FinalizedValue::view`] and
//! statically prevented from outliving it.

use bytes::Bytes;
use jdoc_types::RawType;
use std::ops::Range;

/// A byte source that can be cheaply re-sliced to a sub-region.
///
/// Implemented by [`bytes::Bytes`] (the owning, refcounted handle) and by
/// `&[u8]` (the non-owning, borrowed handle).
pub trait Buffer: Clone {
    fn as_bytes(&self) -> &[u8];
    fn slice(&self, range: Range<usize>) -> Self;
}

impl Buffer for Bytes {
    fn as_bytes(&self) -> &[u8] {
        self.as_ref()
    }

    fn slice(&self, range: Range<usize>) -> Self {
        Bytes::slice(self, range)
    }
}

impl<'a> Buffer for &'a [u8] {
    fn as_bytes(&self) -> &[u8] {
        self
    }

    fn slice(&self, range: Range<usize>) -> Self {
        &self[range]
    }
}

/// A value in the finalized representation: a `(raw_type, buf)` pair, where
/// `buf` is exactly the bytes spanning this value's region (§3).
#[derive(Clone)]
pub struct FinalizedValue<B: Buffer> {
    pub(crate) raw_type: RawType,
    pub(crate) buf: B,
}

impl<B: Buffer> FinalizedValue<B> {
    pub(crate) fn new(raw_type: RawType, buf: B) -> Self {
        FinalizedValue { raw_type, buf }
    }

    pub fn raw_type(&self) -> RawType {
        self.raw_type
    }

    pub fn kind(&self) -> jdoc_types::UserKind {
        self.raw_type.user_kind()
    }

    pub(crate) fn region(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    pub(crate) fn child(&self, raw_type: RawType, range: Range<usize>) -> Self {
        FinalizedValue::new(raw_type, self.buf.slice(range))
    }
}

impl FinalizedValue<Bytes> {
    /// Wrap externally owned bytes as an owning finalized handle without
    /// copying (§6.3). Callers must guarantee `data` begins a valid encoded
    /// object at the returned handle's start and that `data`'s address is
    /// 8-byte aligned if they intend to rely on pointer-aligned access;
    /// this implementation parses by byte offset rather than by
    /// transmuting, so misalignment only affects interop with external
    /// producers, not correctness here.
    pub fn wrap(data: Bytes) -> crate::error::Result<Self> {
        if let Err(e) = crate::finalized::codec::validate_object_root(&data) {
            log::debug!("FinalizedValue::wrap rejected a {}-byte buffer: {e}", data.len());
            return Err(e);
        }
        Ok(FinalizedValue::new(RawType::Object, data))
    }

    /// A copying wrap for callers that cannot guarantee the source buffer
    /// will outlive the returned handle or want an owned copy regardless.
    pub fn wrap_copy(data: &[u8]) -> crate::error::Result<Self> {
        Self::wrap(Bytes::copy_from_slice(data))
    }

    /// Produce a non-owning view over this handle's buffer. The view cannot
    /// outlive `self` (enforced by the `&'a self` borrow below).
    pub fn view(&self) -> FinalizedValue<&[u8]> {
        FinalizedValue::new(self.raw_type, self.buf.as_ref())
    }
}

impl<'a> FinalizedValue<&'a [u8]> {
    /// Wrap a borrowed byte slice as a non-owning finalized handle.
    pub fn wrap_borrowed(data: &'a [u8]) -> crate::error::Result<Self> {
        if let Err(e) = crate::finalized::codec::validate_object_root(data) {
            log::debug!("FinalizedValue::wrap_borrowed rejected a {}-byte buffer: {e}", data.len());
            return Err(e);
        }
        Ok(FinalizedValue::new(RawType::Object, data))
    }
}

impl<B1: Buffer, B2: Buffer> PartialEq<FinalizedValue<B2>> for FinalizedValue<B1> {
    fn eq(&self, other: &FinalizedValue<B2>) -> bool {
        crate::compare::finalized_eq(self, other)
    }
}

impl<B: Buffer> PartialEq<FinalizedValue<B>> for crate::heap::HeapValue {
    fn eq(&self, other: &FinalizedValue<B>) -> bool {
        crate::compare::cross_eq(self, other)
    }
}

impl<B: Buffer> PartialEq<crate::heap::HeapValue> for FinalizedValue<B> {
    fn eq(&self, other: &crate::heap::HeapValue) -> bool {
        crate::compare::cross_eq(other, self)
    }
}

impl<B: Buffer> std::fmt::Display for FinalizedValue<B> {
    /// Renders as JSON text, the finalized-side counterpart of
    /// [`crate::heap::HeapValue`]'s `Display` impl. Walks the buffer
    /// directly rather than lifting to heap first.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        write_finalized_json(self, &mut out).map_err(|_| std::fmt::Error)?;
        f.write_str(&out)
    }
}

fn write_finalized_json<B: Buffer>(value: &FinalizedValue<B>, out: &mut String) -> crate::error::Result<()> {
    use jdoc_types::UserKind;
    match value.kind() {
        UserKind::Null => out.push_str("null"),
        UserKind::Boolean => out.push_str(if value.boolean()? { "true" } else { "false" }),
        UserKind::Integer => out.push_str(&value.integer()?.to_string()),
        UserKind::Decimal => {
            let d = value.decimal()?;
            if d.is_nan() {
                out.push_str("NaN");
            } else if d.is_infinite() {
                out.push_str(if d > 0.0 { "Infinity" } else { "-Infinity" });
            } else {
                out.push_str(&d.to_string());
            }
        }
        UserKind::String => crate::parse::json::write_json_string(value.strv()?, out),
        UserKind::Array => {
            out.push('[');
            for (index, item) in value.iter_array()?.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_finalized_json(item, out)?;
            }
            out.push(']');
        }
        UserKind::Object => {
            out.push('{');
            for (index, (key, child)) in value.iter()?.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                crate::parse::json::write_json_string(key, out);
                out.push(':');
                write_finalized_json(child, out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

impl<B: Buffer> std::fmt::Debug for FinalizedValue<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            jdoc_types::UserKind::Null => write!(f, "null"),
            jdoc_types::UserKind::Boolean => write!(f, "{:?}", self.boolean()),
            jdoc_types::UserKind::Integer => write!(f, "{:?}", self.integer()),
            jdoc_types::UserKind::Decimal => write!(f, "{:?}", self.decimal()),
            jdoc_types::UserKind::String => write!(f, "{:?}", self.strv()),
            jdoc_types::UserKind::Array => f
                .debug_list()
                .entries(self.iter_array().unwrap_or_default())
                .finish(),
            jdoc_types::UserKind::Object => {
                let mut dbg = f.debug_map();
                for (k, v) in self.iter().unwrap_or_default() {
                    dbg.entry(&k, &v);
                }
                dbg.finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocError;
    use crate::heap::{HeapObject, HeapValue};

    #[test]
    fn wrap_roundtrips_a_finalizer_buffer() {
        let mut root = HeapObject::new();
        root.set("a", HeapValue::Integer(1));
        let finalized = crate::finalizer::finalize(&root).unwrap();

        let rewrapped = FinalizedValue::wrap(finalized.buf.clone()).unwrap();
        assert_eq!(rewrapped.at("a").unwrap().integer().unwrap(), 1);
    }

    #[test]
    fn wrap_rejects_an_empty_buffer() {
        let err = FinalizedValue::wrap(Bytes::new()).unwrap_err();
        assert!(matches!(err, DocError::InvalidArgument(_)));
    }

    #[test]
    fn wrap_rejects_a_buffer_with_unsorted_keys() {
        let mut root = HeapObject::new();
        root.set("a", HeapValue::Integer(1));
        root.set("b", HeapValue::Integer(2));
        let finalized = crate::finalizer::finalize(&root).unwrap();

        // Swap the two vtable entries' `raw_type`/`offset` pairs so the
        // stored key order becomes descending without touching the key or
        // value bytes themselves.
        let mut corrupted = finalized.buf.to_vec();
        let entry_start = jdoc_types::header::AggregateHeaderRaw::ENCODED_SIZE;
        let entry_size = jdoc_types::header::VTableEntryRaw::ENCODED_SIZE;
        let (first, second) = corrupted[entry_start..entry_start + 2 * entry_size]
            .split_at_mut(entry_size);
        first.swap_with_slice(second);

        let err = FinalizedValue::wrap(Bytes::from(corrupted)).unwrap_err();
        assert!(matches!(err, DocError::InvalidArgument(_)));
    }

    #[test]
    fn view_does_not_outlive_owner_is_enforced_by_the_borrow_checker() {
        let mut root = HeapObject::new();
        root.set("a", HeapValue::Integer(1));
        let finalized = crate::finalizer::finalize(&root).unwrap();
        let view = finalized.view();
        assert_eq!(view.at("a").unwrap().integer().unwrap(), 1);
    }
}
