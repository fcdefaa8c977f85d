// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Strict scalar readers over a finalized primitive region (§4.6).

use super::buffer::{Buffer, FinalizedValue};
use super::codec;
use crate::error::{DocError, Result};
use jdoc_types::pod;
use jdoc_types::{RawType, UserKind};

impl<B: Buffer> FinalizedValue<B> {
    pub fn is_null(&self) -> bool {
        self.raw_type == RawType::Null
    }

    pub fn is_boolean(&self) -> bool {
        self.raw_type == RawType::Boolean
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

    pub fn is_str(&self) -> bool {
        self.kind() == UserKind::String
    }

    pub fn is_object(&self) -> bool {
        self.raw_type == RawType::Object
    }

    pub fn is_array(&self) -> bool {
        self.raw_type == RawType::Array
    }

    pub fn is_aggregate(&self) -> bool {
        self.kind().is_aggregate()
    }

    pub fn is_primitive(&self) -> bool {
        self.kind().is_primitive()
    }

    pub fn boolean(&self) -> Result<bool> {
        if self.raw_type != RawType::Boolean {
            return Err(DocError::type_error(UserKind::Boolean, self.kind()));
        }
        Ok(self.region().first().copied().unwrap_or(0) != 0)
    }

    pub fn integer(&self) -> Result<i64> {
        let region = self.region();
        let mut offset = 0usize;
        match self.raw_type {
            RawType::ShortInteger => Ok(pod::parse_le_i16(&mut offset, region)? as i64),
            RawType::Integer => Ok(pod::parse_le_i32(&mut offset, region)? as i64),
            RawType::LongInteger => pod::parse_le_i64(&mut offset, region).map_err(Into::into),
            _ => Err(DocError::type_error(UserKind::Integer, self.kind())),
        }
    }

    pub fn decimal(&self) -> Result<f64> {
        let region = self.region();
        let mut offset = 0usize;
        match self.raw_type {
            RawType::Decimal => Ok(pod::parse_le_f32(&mut offset, region)? as f64),
            RawType::LongDecimal => pod::parse_le_f64(&mut offset, region).map_err(Into::into),
            _ => Err(DocError::type_error(UserKind::Decimal, self.kind())),
        }
    }

    /// Accepts either integer or decimal raw types, matching §4.6's
    /// `numeric()`.
    pub fn numeric(&self) -> Result<f64> {
        if self.is_integer() {
            self.integer().map(|v| v as f64)
        } else if self.is_decimal() {
            self.decimal()
        } else {
            Err(DocError::type_error(UserKind::Decimal, self.kind()))
        }
    }

    pub fn strv(&self) -> Result<&str> {
        if !self.is_str() {
            return Err(DocError::type_error(UserKind::String, self.kind()));
        }
        let mut offset = 0usize;
        codec::read_string(&mut offset, self.region())
    }

    /// A NUL-terminated borrow of the string region (§4.6 `str()`), relying
    /// on the trailing NUL every finalized string carries (§4.1.3) to hand
    /// back a [`std::ffi::CStr`] without copying.
    pub fn str(&self) -> Result<&std::ffi::CStr> {
        if !self.is_str() {
            return Err(DocError::type_error(UserKind::String, self.kind()));
        }
        let mut offset = 0usize;
        let with_nul = codec::read_string_with_nul(&mut offset, self.region())?;
        std::ffi::CStr::from_bytes_with_nul(with_nul)
            .map_err(|_| DocError::from(jdoc_types::ParseError::StringNotNullTerminated))
    }

    pub fn boolean_or(&self, default: bool) -> bool {
        self.boolean().unwrap_or(default)
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

    pub fn strv_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.strv().unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use crate::heap::{HeapObject, HeapValue};

    #[test]
    fn str_returns_a_nul_terminated_borrow() {
        let mut root = HeapObject::new();
        root.set("s", HeapValue::String("hello".into()));
        let finalized = crate::finalizer::finalize(&root).unwrap();

        let field = finalized.at("s").unwrap();
        let c = field.str().unwrap();
        assert_eq!(c.to_str().unwrap(), "hello");
        assert_eq!(field.strv().unwrap(), "hello");
    }

    #[test]
    fn str_on_a_non_string_is_a_type_error() {
        let mut root = HeapObject::new();
        root.set("n", HeapValue::Integer(1));
        let finalized = crate::finalizer::finalize(&root).unwrap();
        assert!(finalized.at("n").unwrap().str().is_err());
    }
}
