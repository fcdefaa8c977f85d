// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heap objects: refcounted, copy-on-write maps from string to value (§4.2.1).

use super::map::LinearMap;
use super::string::HeapString;
use super::value::HeapValue;
use crate::error::{DocError, Result};
use std::rc::Rc;

/// A reference-counted, copy-on-write map from heap string to heap value.
///
/// Cloning a [`HeapObject`] is O(1) (an `Rc` bump); the interior map is only
/// deep-cloned the first time a clone is mutated while still shared
/// (§4.2.3). Iteration order is the map's internal probe order and is not
/// meaningful — only the finalizer's sorted-key emission order (§4.1.1) is
/// observable across representations.
#[derive(Clone)]
pub struct HeapObject {
    inner: Rc<LinearMap<HeapString, HeapValue>>,
}

impl Default for HeapObject {
    fn default() -> Self {
        Self::new()
    }
}

impl HeapObject {
    pub fn new() -> Self {
        HeapObject {
            inner: Rc::new(LinearMap::new()),
        }
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Membership test.
    pub fn has_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Iterator-returning lookup; `None` plays the role of `end()`.
    pub fn find(&self, key: &str) -> Option<&HeapValue> {
        self.inner.get(key)
    }

    /// Forwarding lookup used by the polymorphic access surface; returns
    /// `None` on a miss (callers map this to a null value or an error
    /// depending on whether they're the lenient or strict accessor).
    pub fn get(&self, key: &str) -> Option<&HeapValue> {
        self.inner.get(key)
    }

    /// If `k` present: replaces value. Else inserts. Returns the previous
    /// value, if any (so callers that need iterator-like semantics can tell
    /// whether a replace happened).
    pub fn set(&mut self, key: impl Into<HeapString>, value: impl Into<HeapValue>) -> Option<HeapValue> {
        if Rc::strong_count(&self.inner) > 1 {
            log::trace!("HeapObject::set forking a shared map of {} entries", self.inner.len());
        }
        Rc::make_mut(&mut self.inner).insert(key.into(), value.into())
    }

    /// Alias for [`Self::set`], matching the spec's `add_field`/`insert`
    /// naming.
    pub fn add_field(&mut self, key: impl Into<HeapString>, value: impl Into<HeapValue>) -> Option<HeapValue> {
        self.set(key, value)
    }

    /// No-op if absent; otherwise removes and returns the removed value.
    pub fn remove_field(&mut self, key: &str) -> Option<HeapValue> {
        if Rc::strong_count(&self.inner) > 1 {
            log::trace!("HeapObject::remove_field forking a shared map of {} entries", self.inner.len());
        }
        Rc::make_mut(&mut self.inner).remove(key)
    }

    /// Alias for [`Self::remove_field`].
    pub fn erase(&mut self, key: &str) -> Option<HeapValue> {
        self.remove_field(key)
    }

    pub fn clear(&mut self) {
        if Rc::strong_count(&self.inner) > 1 {
            log::trace!("HeapObject::clear forking a shared map of {} entries", self.inner.len());
        }
        Rc::make_mut(&mut self.inner).clear();
    }

    /// Snapshot of keys, in the map's internal (not canonical) order.
    pub fn keys(&self) -> Vec<HeapString> {
        self.inner.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Snapshot of values, in the map's internal (not canonical) order.
    pub fn values(&self) -> Vec<HeapValue> {
        self.inner.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeapString, &HeapValue)> {
        self.inner.iter()
    }

    /// Returns a new object with the union of `self`'s entries and `pairs`;
    /// keys in `pairs` override `self`'s entries. Does not mutate `self`
    /// (§4.2.1).
    pub fn inject<I>(&self, pairs: I) -> HeapObject
    where
        I: IntoIterator<Item = (HeapString, HeapValue)>,
    {
        let mut result = self.clone();
        if Rc::strong_count(&result.inner) > 1 {
            log::trace!("HeapObject::inject forking a shared map of {} entries", result.inner.len());
        }
        let map = Rc::make_mut(&mut result.inner);
        for (k, v) in pairs {
            map.insert(k, v);
        }
        result
    }

    /// Returns a new object containing only the listed keys that exist in
    /// `self`. Does not mutate `self` (§4.2.1).
    pub fn project<'a, I>(&self, keys: I) -> HeapObject
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut result = HeapObject::new();
        for key in keys {
            if let Some(value) = self.find(key) {
                result.set(key, value.clone());
            }
        }
        result
    }

    /// Strong reference count of the interior map, exposed only for the
    /// weak exception-guarantee observation the spec permits in §7: a
    /// failed mutation may have forked the node without changing its value.
    pub fn refcount(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Lenient lookup: returns a null value on a missing key instead of
    /// raising (used by `get_nested`).
    pub(crate) fn get_or_null(&self, key: &str) -> HeapValue {
        self.get(key).cloned().unwrap_or(HeapValue::Null)
    }

    /// Strict lookup: raises `invalid_argument` on any missing key.
    pub(crate) fn at(&self, key: &str) -> Result<&HeapValue> {
        self.find(key)
            .ok_or(DocError::InvalidArgument("key not present in object"))
    }
}

impl PartialEq for HeapObject {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        if self.size() != other.size() {
            return false;
        }
        self.iter().all(|(k, v)| other.find(k.as_str()) == Some(v))
    }
}

impl std::fmt::Debug for HeapObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&HeapString> = self.inner.iter().map(|(k, _)| k).collect();
        keys.sort();
        let mut dbg = f.debug_map();
        for k in keys {
            dbg.entry(&k.as_str(), self.find(k.as_str()).expect("key from this object's own keys()"));
        }
        dbg.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cow_isolation() {
        let mut p = HeapObject::new();
        let mut inner = HeapObject::new();
        inner.set("inner", HeapValue::Integer(1));
        p.set("k", HeapValue::Object(inner));

        let mut q = match p.find("k").unwrap().clone() {
            HeapValue::Object(o) => o,
            _ => panic!("expected object"),
        };
        q.set("inner", HeapValue::Integer(2));

        let p_inner = match p.find("k").unwrap() {
            HeapValue::Object(o) => o.clone(),
            _ => panic!("expected object"),
        };
        assert_eq!(p_inner.find("inner"), Some(&HeapValue::Integer(1)));
        assert_eq!(q.find("inner"), Some(&HeapValue::Integer(2)));
    }

    #[test]
    fn add_field_idempotent_size() {
        let mut o = HeapObject::new();
        o.add_field("k", HeapValue::Integer(1));
        o.add_field("k", HeapValue::Integer(2));
        assert_eq!(o.size(), 1);
        assert_eq!(o.find("k"), Some(&HeapValue::Integer(2)));
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut o = HeapObject::new();
        o.add_field("k", HeapValue::Integer(1));
        assert_eq!(o.remove_field("missing"), None);
        assert_eq!(o.size(), 1);
    }

    #[test]
    fn project_and_inject() {
        let mut o = HeapObject::new();
        o.set("a", HeapValue::Integer(1));
        o.set("b", HeapValue::Integer(2));
        o.set("c", HeapValue::Integer(3));

        let projected = o.project(["a", "c", "missing"]);
        assert_eq!(projected.size(), 2);
        assert_eq!(projected.find("a"), Some(&HeapValue::Integer(1)));

        let injected = o.inject([(HeapString::new("b"), HeapValue::Integer(20))]);
        assert_eq!(injected.find("b"), Some(&HeapValue::Integer(20)));
        assert_eq!(o.find("b"), Some(&HeapValue::Integer(2)));
    }
}
