// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! YAML parsing, behind the `yaml` feature. Grammar recognition is
//! delegated to `serde_yaml`; this module converts its value tree into a
//! heap tree. YAML anchors/aliases are a Non-goal (SPEC_FULL.md): whatever
//! `serde_yaml` resolves them to on its own is accepted as-is, nothing here
//! adds special handling for them.

use crate::error::{DocError, Result};
use crate::heap::{HeapArray, HeapObject, HeapString, HeapValue};

/// Parse `input` as YAML into a heap tree.
pub fn parse_yaml(input: &str) -> Result<HeapValue> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(input).map_err(|e| DocError::ParseError(e.to_string()))?;
    from_yaml_value(value)
}

fn from_yaml_value(value: serde_yaml::Value) -> Result<HeapValue> {
    Ok(match value {
        serde_yaml::Value::Null => HeapValue::Null,
        serde_yaml::Value::Bool(b) => HeapValue::Boolean(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                HeapValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                HeapValue::Decimal(f)
            } else {
                return Err(DocError::ParseError("unrepresentable YAML number".into()));
            }
        }
        serde_yaml::Value::String(s) => HeapValue::String(HeapString::from(s)),
        serde_yaml::Value::Sequence(items) => {
            let mut array = HeapArray::new();
            for item in items {
                array.push_back(from_yaml_value(item)?);
            }
            HeapValue::Array(array)
        }
        serde_yaml::Value::Mapping(entries) => {
            let mut object = HeapObject::new();
            for (key, value) in entries {
                let key = match key {
                    serde_yaml::Value::String(s) => s,
                    other => {
                        return Err(DocError::ParseError(format!(
                            "YAML mapping key must be a string, found {other:?}"
                        )))
                    }
                };
                object.set(key, from_yaml_value(value)?);
            }
            HeapValue::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml_value(tagged.value)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_mapping() {
        let value = parse_yaml("a: 1\nb: hi\n").unwrap();
        match value {
            HeapValue::Object(o) => {
                assert_eq!(o.find("a"), Some(&HeapValue::Integer(1)));
                assert_eq!(o.find("b"), Some(&HeapValue::String(HeapString::new("hi"))));
            }
            _ => panic!("expected object"),
        }
    }
}
