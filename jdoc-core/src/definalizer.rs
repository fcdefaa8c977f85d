// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Finalized → heap conversion (§4.4): recursively lift a finalized view
//! into an editable heap tree. This is the only way a finalized handle
//! becomes heap-editable again; there is no implicit conversion.

use crate::error::Result;
use crate::finalized::{Buffer, FinalizedValue};
use crate::heap::{HeapArray, HeapObject, HeapValue};
use jdoc_types::UserKind;

/// Lift a finalized value into a heap value, deep-copying every string into
/// refcounted (or inline, if short) heap storage.
pub fn lift<B: Buffer>(value: &FinalizedValue<B>) -> Result<HeapValue> {
    Ok(match value.kind() {
        UserKind::Null => HeapValue::Null,
        UserKind::Boolean => HeapValue::Boolean(value.boolean()?),
        UserKind::Integer => HeapValue::Integer(value.integer()?),
        UserKind::Decimal => HeapValue::Decimal(value.decimal()?),
        UserKind::String => HeapValue::String(value.strv()?.into()),
        UserKind::Array => HeapValue::Array(lift_array(value)?),
        UserKind::Object => HeapValue::Object(lift_object(value)?),
    })
}

fn lift_array<B: Buffer>(value: &FinalizedValue<B>) -> Result<HeapArray> {
    let mut array = HeapArray::new();
    for item in value.iter_array()? {
        array.push_back(lift(&item)?);
    }
    Ok(array)
}

fn lift_object<B: Buffer>(value: &FinalizedValue<B>) -> Result<HeapObject> {
    let mut object = HeapObject::new();
    for (key, child) in value.iter()? {
        object.set(key, lift(&child)?);
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finalizer::finalize;
    use crate::heap::HeapString;

    #[test]
    fn roundtrips_scalars() {
        let mut root = HeapObject::new();
        root.set("n", HeapValue::Integer(42));
        root.set("s", HeapValue::String(HeapString::new("hi")));
        root.set("z", HeapValue::Null);

        let finalized = finalize(&root).unwrap();
        let lifted = lift(&finalized).unwrap();

        match lifted {
            HeapValue::Object(o) => {
                assert_eq!(o.find("n"), Some(&HeapValue::Integer(42)));
                assert_eq!(o.find("z"), Some(&HeapValue::Null));
            }
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn finalize_then_lift_is_idempotent_by_value() {
        let mut root = HeapObject::new();
        root.set("a", HeapValue::Integer(1));
        root.set("b", HeapValue::Array(HeapArray::from_values(vec![
            HeapValue::Integer(1),
            HeapValue::Integer(2),
        ])));

        let once = lift(&finalize(&root).unwrap()).unwrap();
        let object_once = match &once {
            HeapValue::Object(o) => o.clone(),
            _ => panic!("expected object"),
        };
        let twice = lift(&finalize(&object_once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }
}
