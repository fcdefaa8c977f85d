// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The type-erased union facade (§9: "three type-erased façades (mutable,
//! finalized, union)"). [`Value`] is the union: it wraps either a
//! [`HeapValue`] or a [`FinalizedValue<Bytes>`] and forwards the polymorphic
//! access surface (§4.6) to whichever representation it holds, so callers
//! that don't care which representation backs a value can write one code
//! path.

use crate::error::{DocError, Result};
use crate::finalized::{Buffer, FinalizedValue};
use crate::heap::{HeapArray, HeapObject, HeapString, HeapValue};
use crate::iter::{key_value_iters, EntryIter, KeyIter, ValueIter};
use bytes::Bytes;
use jdoc_types::UserKind;

/// A value backed by either the mutable heap representation or the
/// immutable finalized representation.
#[derive(Clone)]
pub enum Value {
    Heap(HeapValue),
    Finalized(FinalizedValue<Bytes>),
}

impl Value {
    pub fn kind(&self) -> UserKind {
        match self {
            Value::Heap(v) => v.kind(),
            Value::Finalized(v) => v.kind(),
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, Value::Finalized(_))
    }

    pub fn is_object(&self) -> bool {
        self.kind() == UserKind::Object
    }
    pub fn is_array(&self) -> bool {
        self.kind() == UserKind::Array
    }
    pub fn is_str(&self) -> bool {
        self.kind() == UserKind::String
    }
    pub fn is_integer(&self) -> bool {
        self.kind() == UserKind::Integer
    }
    pub fn is_decimal(&self) -> bool {
        self.kind() == UserKind::Decimal
    }
    pub fn is_numeric(&self) -> bool {
        self.kind().is_numeric()
    }
    pub fn is_boolean(&self) -> bool {
        self.kind() == UserKind::Boolean
    }
    pub fn is_null(&self) -> bool {
        self.kind() == UserKind::Null
    }
    pub fn is_aggregate(&self) -> bool {
        self.kind().is_aggregate()
    }
    pub fn is_primitive(&self) -> bool {
        self.kind().is_primitive()
    }

    pub fn integer(&self) -> Result<i64> {
        match self {
            Value::Heap(HeapValue::Integer(v)) => Ok(*v),
            Value::Heap(v) => Err(DocError::type_error(UserKind::Integer, v.kind())),
            Value::Finalized(v) => v.integer(),
        }
    }

    pub fn decimal(&self) -> Result<f64> {
        match self {
            Value::Heap(HeapValue::Decimal(v)) => Ok(*v),
            Value::Heap(v) => Err(DocError::type_error(UserKind::Decimal, v.kind())),
            Value::Finalized(v) => v.decimal(),
        }
    }

    pub fn numeric(&self) -> Result<f64> {
        match self {
            Value::Heap(HeapValue::Integer(v)) => Ok(*v as f64),
            Value::Heap(HeapValue::Decimal(v)) => Ok(*v),
            Value::Heap(v) => Err(DocError::type_error(UserKind::Decimal, v.kind())),
            Value::Finalized(v) => v.numeric(),
        }
    }

    pub fn boolean(&self) -> Result<bool> {
        match self {
            Value::Heap(HeapValue::Boolean(v)) => Ok(*v),
            Value::Heap(v) => Err(DocError::type_error(UserKind::Boolean, v.kind())),
            Value::Finalized(v) => v.boolean(),
        }
    }

    pub fn strv(&self) -> Result<&str> {
        match self {
            Value::Heap(HeapValue::String(v)) => Ok(v.as_str()),
            Value::Heap(v) => Err(DocError::type_error(UserKind::String, v.kind())),
            Value::Finalized(v) => v.strv(),
        }
    }

    pub fn integer_or(&self, default: i64) -> i64 {
        self.integer().unwrap_or(default)
    }
    pub fn decimal_or(&self, default: f64) -> f64 {
        self.decimal().unwrap_or(default)
    }
    pub fn numeric_or(&self, default: f64) -> f64 {
        self.numeric().unwrap_or(default)
    }
    pub fn boolean_or(&self, default: bool) -> bool {
        self.boolean().unwrap_or(default)
    }
    pub fn strv_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.strv().unwrap_or(default)
    }

    /// Count of entries, for objects and arrays.
    pub fn size(&self) -> usize {
        match self {
            Value::Heap(HeapValue::Object(o)) => o.size(),
            Value::Heap(HeapValue::Array(a)) => a.size(),
            Value::Heap(_) => 0,
            Value::Finalized(v) => v.size(),
        }
    }

    /// Object field lookup. Returns a null [`Value`] on miss, per §4.6.
    pub fn get(&self, key: &str) -> Value {
        self.find(key).unwrap_or(Value::Heap(HeapValue::Null))
    }

    /// Object field lookup, `None` on miss (the forwarding lookup underlying
    /// [`Self::get`] and [`Self::at`]).
    pub fn find(&self, key: &str) -> Option<Value> {
        match self {
            Value::Heap(HeapValue::Object(o)) => o.find(key).cloned().map(Value::Heap),
            Value::Finalized(v) => v.find(key).ok().flatten().map(Value::Finalized),
            _ => None,
        }
    }

    /// Object field lookup (§4.6 `at`); raises `invalid_argument` on any
    /// missing key, rather than returning null.
    pub fn at(&self, key: &str) -> Result<Value> {
        self.find(key)
            .ok_or(DocError::InvalidArgument("key not present in object"))
    }

    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.find(key).unwrap_or(default)
    }

    /// Array index lookup. Returns a null [`Value`] on out-of-bounds access.
    pub fn at_index(&self, index: usize) -> Result<Value> {
        match self {
            Value::Heap(HeapValue::Array(a)) => a.at(index).cloned().map(Value::Heap),
            Value::Finalized(v) => v.at_index(index).map(Value::Finalized),
            other => Err(DocError::type_error(UserKind::Array, other.kind())),
        }
    }

    pub fn get_index(&self, index: usize) -> Value {
        match self {
            Value::Heap(HeapValue::Array(a)) => a
                .get(index)
                .cloned()
                .map(Value::Heap)
                .unwrap_or(Value::Heap(HeapValue::Null)),
            Value::Finalized(v) => v
                .get_index(index)
                .ok()
                .flatten()
                .map(Value::Finalized)
                .unwrap_or(Value::Heap(HeapValue::Null)),
            _ => Value::Heap(HeapValue::Null),
        }
    }

    /// Splits `path` on `sep` and recursively descends through objects;
    /// intermediate non-objects (or missing keys) yield null. The empty path
    /// returns the receiver (§4.6).
    pub fn get_nested(&self, path: &str, sep: char) -> Value {
        if path.is_empty() {
            return self.clone();
        }
        let mut current = self.clone();
        for segment in path.split(sep) {
            current = current.get(segment);
        }
        current
    }

    /// Object keys, in the backing representation's iteration order
    /// (ascending for finalized, internal map order for heap; §4.5).
    pub fn keys(&self) -> Result<Vec<String>> {
        match self {
            Value::Heap(HeapValue::Object(o)) => {
                Ok(o.keys().into_iter().map(|k| k.as_str().to_owned()).collect())
            }
            Value::Finalized(v) => Ok(v.keys()?.into_iter().map(str::to_owned).collect()),
            other => Err(DocError::type_error(UserKind::Object, other.kind())),
        }
    }

    fn entries(&self) -> Result<Vec<(String, Value)>> {
        match self {
            Value::Heap(HeapValue::Object(o)) => Ok(o
                .iter()
                .map(|(k, v)| (k.as_str().to_owned(), Value::Heap(v.clone())))
                .collect()),
            Value::Finalized(v) => Ok(v
                .iter()?
                .into_iter()
                .map(|(k, child)| (k.to_owned(), Value::Finalized(child)))
                .collect()),
            other => Err(DocError::type_error(UserKind::Object, other.kind())),
        }
    }

    fn array_values(&self) -> Result<Vec<Value>> {
        match self {
            Value::Heap(HeapValue::Array(a)) => {
                Ok(a.iter().map(|v| Value::Heap(v.clone())).collect())
            }
            Value::Finalized(v) => Ok(v
                .iter_array()?
                .into_iter()
                .map(Value::Finalized)
                .collect()),
            other => Err(DocError::type_error(UserKind::Array, other.kind())),
        }
    }

    /// Iterate `(key, value)` pairs of an object (§4.5).
    pub fn iter(&self) -> Result<EntryIter> {
        Ok(EntryIter::new(self.entries()?))
    }

    /// Iterate the elements of an array (§4.5).
    pub fn iter_values(&self) -> Result<ValueIter> {
        Ok(ValueIter::new(self.array_values()?))
    }

    /// `kvbegin`/`kvend`: a pair of key- and value-iterators positioned
    /// identically over an object's entries (§4.5).
    pub fn kv_iter(&self) -> Result<(KeyIter, ValueIter)> {
        Ok(key_value_iters(self.entries()?))
    }

    /// Finalize a heap object into a [`Value::Finalized`]. Errors with
    /// `state_error` if this value isn't a heap object (§4.3 step 1).
    pub fn finalize(&self) -> Result<Value> {
        match self {
            Value::Heap(HeapValue::Object(o)) => {
                Ok(Value::Finalized(crate::finalizer::finalize(o)?))
            }
            _ => Err(DocError::StateError {
                expected: "heap object",
                detail: "only a heap object root may be finalized",
            }),
        }
    }

    /// Lift a finalized value back into an editable heap value (§4.4).
    pub fn lift(&self) -> Result<Value> {
        match self {
            Value::Finalized(v) => Ok(Value::Heap(crate::definalizer::lift(v)?)),
            Value::Heap(_) => Ok(self.clone()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Heap(a), Value::Heap(b)) => a == b,
            (Value::Finalized(a), Value::Finalized(b)) => a == b,
            (Value::Heap(a), Value::Finalized(b)) => a == b,
            (Value::Finalized(a), Value::Heap(b)) => a == b,
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Heap(v) => std::fmt::Debug::fmt(v, f),
            Value::Finalized(v) => std::fmt::Debug::fmt(v, f),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Heap(v) => std::fmt::Display::fmt(v, f),
            Value::Finalized(v) => std::fmt::Display::fmt(v, f),
        }
    }
}

impl From<HeapValue> for Value {
    fn from(v: HeapValue) -> Self {
        Value::Heap(v)
    }
}
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Heap(v.into())
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Heap(v.into())
    }
}
impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Heap(v.into())
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Heap(v.into())
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Heap(v.into())
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Heap(v.into())
    }
}
impl From<HeapString> for Value {
    fn from(v: HeapString) -> Self {
        Value::Heap(v.into())
    }
}
impl From<HeapArray> for Value {
    fn from(v: HeapArray) -> Self {
        Value::Heap(v.into())
    }
}
impl From<HeapObject> for Value {
    fn from(v: HeapObject) -> Self {
        Value::Heap(v.into())
    }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Heap(HeapValue::Null),
        }
    }
}
