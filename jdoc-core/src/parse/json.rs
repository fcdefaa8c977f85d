// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON parsing and serialization.
//!
//! Parsing delegates the actual grammar to `serde_json`'s `Deserializer`;
//! [`HeapValueVisitor`] is the event-consuming side (§6.2's "the core
//! consumes them to build a heap tree"), playing the same role `serde`'s
//! `Visitor` trait always plays, just targeting [`HeapValue`] instead of a
//! `#[derive(Deserialize)]` struct. The three permissive knobs that vanilla
//! JSON grammar doesn't support (`permit_comments`, `permit_nan_infinity`,
//! `permit_trailing_commas`) are handled by a text-level preprocessing pass
//! before the sanitized input reaches `serde_json`.

use crate::error::{DocError, Result};
use crate::heap::{HeapArray, HeapObject, HeapString, HeapValue};
use crate::parse::ParserOptions;
use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;

// Markers built from a Private Use Area code point so a legitimate input
// string is vanishingly unlikely to collide with one; JSON strings may not
// contain a raw control character unescaped, which rules out NUL-delimited
// markers here.
const NAN_SENTINEL: &str = "\u{f8ff}jdoc:nan\u{f8ff}";
const POS_INF_SENTINEL: &str = "\u{f8ff}jdoc:+inf\u{f8ff}";
const NEG_INF_SENTINEL: &str = "\u{f8ff}jdoc:-inf\u{f8ff}";

/// Parse `input` as JSON into a heap tree, honoring `options`.
pub fn parse_json(input: &str, options: &ParserOptions) -> Result<HeapValue> {
    let sanitized = sanitize(input, options);
    let wrapper: HeapValueDe = serde_json::from_str(&sanitized)
        .map_err(|e| DocError::ParseError(e.to_string()))?;
    let mut value = wrapper.0;
    if options.permit_nan_infinity {
        substitute_nan_infinity_sentinels(&mut value);
    }
    Ok(value)
}

/// Render `value` as JSON text, honoring `options.emit_nan_infinity`.
pub fn to_json_string(value: &HeapValue, options: &ParserOptions) -> Result<String> {
    let mut out = String::new();
    write_value(value, options, &mut out)?;
    Ok(out)
}

pub(crate) fn write_value(value: &HeapValue, options: &ParserOptions, out: &mut String) -> Result<()> {
    match value {
        HeapValue::Null => out.push_str("null"),
        HeapValue::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        HeapValue::Integer(i) => out.push_str(&i.to_string()),
        HeapValue::Decimal(d) => write_decimal(*d, options, out)?,
        HeapValue::String(s) => write_json_string(s.as_str(), out),
        HeapValue::Array(a) => {
            out.push('[');
            for (index, item) in a.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_value(item, options, out)?;
            }
            out.push(']');
        }
        HeapValue::Object(o) => {
            out.push('{');
            let mut keys: Vec<&HeapString> = o.iter().map(|(k, _)| k).collect();
            keys.sort();
            for (index, key) in keys.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_json_string(key.as_str(), out);
                out.push(':');
                write_value(o.find(key.as_str()).expect("key from this object's own keys()"), options, out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn write_decimal(d: f64, options: &ParserOptions, out: &mut String) -> Result<()> {
    if d.is_nan() {
        if options.emit_nan_infinity {
            out.push_str("NaN");
            Ok(())
        } else {
            Err(DocError::ParseError("cannot serialize NaN as JSON".into()))
        }
    } else if d.is_infinite() {
        if options.emit_nan_infinity {
            out.push_str(if d > 0.0 { "Infinity" } else { "-Infinity" });
            Ok(())
        } else {
            Err(DocError::ParseError(
                "cannot serialize an infinite value as JSON".into(),
            ))
        }
    } else {
        out.push_str(&d.to_string());
        Ok(())
    }
}

pub(crate) fn write_json_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Walk a freshly parsed tree replacing the NaN/Infinity string sentinels
/// substituted in during [`sanitize`] with the decimal values they stand in
/// for.
fn substitute_nan_infinity_sentinels(value: &mut HeapValue) {
    match value {
        HeapValue::String(s) => {
            let replacement = match s.as_str() {
                NAN_SENTINEL => Some(f64::NAN),
                POS_INF_SENTINEL => Some(f64::INFINITY),
                NEG_INF_SENTINEL => Some(f64::NEG_INFINITY),
                _ => None,
            };
            if let Some(d) = replacement {
                *value = HeapValue::Decimal(d);
            }
        }
        HeapValue::Array(a) => {
            for i in 0..a.size() {
                let mut child = a.at(i).expect("index in range").clone();
                substitute_nan_infinity_sentinels(&mut child);
                a.set(i, child).expect("index in range");
            }
        }
        HeapValue::Object(o) => {
            let keys: Vec<HeapString> = o.keys();
            for key in keys {
                let mut child = o.find(key.as_str()).expect("key from own keys()").clone();
                substitute_nan_infinity_sentinels(&mut child);
                o.set(key, child);
            }
        }
        _ => {}
    }
}

/// Text-level preprocessing for the three knobs `serde_json` doesn't
/// support natively. Walks the input once, tracking whether the cursor is
/// inside a string literal so comment/comma/bare-token handling never fires
/// on string contents.
fn sanitize(input: &str, options: &ParserOptions) -> String {
    if !options.permit_comments && !options.permit_trailing_commas && !options.permit_nan_infinity {
        return input.to_string();
    }

    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    while i < bytes.len() {
        let c = bytes[i] as char;

        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        if c == '"' {
            in_string = true;
            out.push(c);
            i += 1;
            continue;
        }

        if options.permit_comments && c == '/' && bytes.get(i + 1) == Some(&b'/') {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }
        if options.permit_comments && c == '/' && bytes.get(i + 1) == Some(&b'*') {
            i += 2;
            while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                i += 1;
            }
            i = (i + 2).min(bytes.len());
            continue;
        }

        if options.permit_trailing_commas && c == ',' {
            let mut j = i + 1;
            while j < bytes.len() && (bytes[j] as char).is_whitespace() {
                j += 1;
            }
            if j < bytes.len() && (bytes[j] == b']' || bytes[j] == b'}') {
                i += 1;
                continue;
            }
        }

        if options.permit_nan_infinity {
            if let Some((token, consumed)) = match_bare_token(&input[i..]) {
                out.push('"');
                out.push_str(token);
                out.push('"');
                i += consumed;
                continue;
            }
        }

        out.push(c);
        i += 1;
    }

    out
}

fn match_bare_token(rest: &str) -> Option<(&'static str, usize)> {
    if rest.starts_with("-Infinity") {
        return Some((NEG_INF_SENTINEL, "-Infinity".len()));
    }
    if rest.starts_with("Infinity") {
        return Some((POS_INF_SENTINEL, "Infinity".len()));
    }
    if rest.starts_with("NaN") {
        return Some((NAN_SENTINEL, "NaN".len()));
    }
    None
}

struct HeapValueDe(HeapValue);

impl<'de> Deserialize<'de> for HeapValueDe {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(HeapValueVisitor).map(HeapValueDe)
    }
}

struct HeapValueVisitor;

impl<'de> Visitor<'de> for HeapValueVisitor {
    type Value = HeapValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> core::result::Result<Self::Value, E> {
        Ok(HeapValue::Boolean(v))
    }

    fn visit_i64<E>(self, v: i64) -> core::result::Result<Self::Value, E> {
        Ok(HeapValue::Integer(v))
    }

    fn visit_u64<E>(self, v: u64) -> core::result::Result<Self::Value, E> {
        match i64::try_from(v) {
            Ok(v) => Ok(HeapValue::Integer(v)),
            Err(_) => Ok(HeapValue::Decimal(v as f64)),
        }
    }

    fn visit_f64<E>(self, v: f64) -> core::result::Result<Self::Value, E> {
        Ok(HeapValue::Decimal(v))
    }

    fn visit_str<E>(self, v: &str) -> core::result::Result<Self::Value, E> {
        Ok(HeapValue::String(HeapString::new(v)))
    }

    fn visit_string<E>(self, v: String) -> core::result::Result<Self::Value, E> {
        Ok(HeapValue::String(HeapString::from(v)))
    }

    fn visit_unit<E>(self) -> core::result::Result<Self::Value, E> {
        Ok(HeapValue::Null)
    }

    fn visit_none<E>(self) -> core::result::Result<Self::Value, E> {
        Ok(HeapValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> core::result::Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> core::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut array = HeapArray::new();
        while let Some(HeapValueDe(item)) = seq.next_element()? {
            array.push_back(item);
        }
        Ok(HeapValue::Array(array))
    }

    fn visit_map<A>(self, mut map: A) -> core::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut object = HeapObject::new();
        while let Some((key, HeapValueDe(value))) = map.next_entry::<String, HeapValueDe>()? {
            object.set(key, value);
        }
        Ok(HeapValue::Object(object))
    }
}
