// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The heap value tagged sum (§4.2).

use super::array::HeapArray;
use super::object::HeapObject;
use super::string::HeapString;
use jdoc_types::UserKind;
use std::fmt;

/// A value in the mutable heap representation: a tagged sum over empty
/// (null), shared object, shared array, string (inline or shared), i64,
/// f64, and bool.
#[derive(Clone)]
pub enum HeapValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    String(HeapString),
    Array(HeapArray),
    Object(HeapObject),
}

impl HeapValue {
    pub fn kind(&self) -> UserKind {
        match self {
            HeapValue::Null => UserKind::Null,
            HeapValue::Boolean(_) => UserKind::Boolean,
            HeapValue::Integer(_) => UserKind::Integer,
            HeapValue::Decimal(_) => UserKind::Decimal,
            HeapValue::String(_) => UserKind::String,
            HeapValue::Array(_) => UserKind::Array,
            HeapValue::Object(_) => UserKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, HeapValue::Null)
    }
    pub fn is_boolean(&self) -> bool {
        matches!(self, HeapValue::Boolean(_))
    }
    pub fn is_integer(&self) -> bool {
        matches!(self, HeapValue::Integer(_))
    }
    pub fn is_decimal(&self) -> bool {
        matches!(self, HeapValue::Decimal(_))
    }
    pub fn is_numeric(&self) -> bool {
        self.kind().is_numeric()
    }
    pub fn is_str(&self) -> bool {
        matches!(self, HeapValue::String(_))
    }
    pub fn is_array(&self) -> bool {
        matches!(self, HeapValue::Array(_))
    }
    pub fn is_object(&self) -> bool {
        matches!(self, HeapValue::Object(_))
    }
    pub fn is_aggregate(&self) -> bool {
        self.kind().is_aggregate()
    }
    pub fn is_primitive(&self) -> bool {
        self.kind().is_primitive()
    }

    pub fn as_object(&self) -> Option<&HeapObject> {
        match self {
            HeapValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&HeapArray> {
        match self {
            HeapValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeapValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl PartialEq for HeapValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HeapValue::Null, HeapValue::Null) => true,
            (HeapValue::Boolean(a), HeapValue::Boolean(b)) => a == b,
            (HeapValue::Integer(a), HeapValue::Integer(b)) => a == b,
            (HeapValue::Decimal(a), HeapValue::Decimal(b)) => a == b,
            (HeapValue::String(a), HeapValue::String(b)) => a == b,
            (HeapValue::Array(a), HeapValue::Array(b)) => a == b,
            (HeapValue::Object(a), HeapValue::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for HeapValue {
    /// Renders as JSON text (§6.2's serializer), the way every aggregate
    /// type in the retrieval pack implements `Display` in terms of its own
    /// text encoding. Non-finite decimals, which the strict serializer
    /// rejects by default, fall back to `emit_nan_infinity`-style output
    /// here since `Display::fmt` cannot return a `DocError`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = crate::parse::ParserOptions {
            emit_nan_infinity: true,
            ..Default::default()
        };
        let mut out = String::new();
        crate::parse::json::write_value(self, &options, &mut out).map_err(|_| fmt::Error)?;
        f.write_str(&out)
    }
}

impl fmt::Debug for HeapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapValue::Null => write!(f, "null"),
            HeapValue::Boolean(b) => write!(f, "{b}"),
            HeapValue::Integer(n) => write!(f, "{n}"),
            HeapValue::Decimal(n) => write!(f, "{n}"),
            HeapValue::String(s) => write!(f, "{s:?}"),
            HeapValue::Array(a) => fmt::Debug::fmt(a, f),
            HeapValue::Object(o) => fmt::Debug::fmt(o, f),
        }
    }
}

impl From<bool> for HeapValue {
    fn from(v: bool) -> Self {
        HeapValue::Boolean(v)
    }
}
impl From<i64> for HeapValue {
    fn from(v: i64) -> Self {
        HeapValue::Integer(v)
    }
}
impl From<i32> for HeapValue {
    fn from(v: i32) -> Self {
        HeapValue::Integer(v as i64)
    }
}
impl From<f64> for HeapValue {
    fn from(v: f64) -> Self {
        HeapValue::Decimal(v)
    }
}
impl From<&str> for HeapValue {
    fn from(v: &str) -> Self {
        HeapValue::String(HeapString::new(v))
    }
}
impl From<String> for HeapValue {
    fn from(v: String) -> Self {
        HeapValue::String(HeapString::from(v))
    }
}
impl From<HeapString> for HeapValue {
    fn from(v: HeapString) -> Self {
        HeapValue::String(v)
    }
}
impl From<HeapArray> for HeapValue {
    fn from(v: HeapArray) -> Self {
        HeapValue::Array(v)
    }
}
impl From<HeapObject> for HeapValue {
    fn from(v: HeapObject) -> Self {
        HeapValue::Object(v)
    }
}
impl<T: Into<HeapValue>> From<Option<T>> for HeapValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => HeapValue::Null,
        }
    }
}
