// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unified key/value iteration over both representations (§4.5).
//!
//! Both heap and finalized aggregates are exposed through the same
//! materialized-then-iterated shape: dereferencing yields an owned
//! `(String, Value)` or `Value` temporary rather than a reference, matching
//! the spec's input-iterator category (§4.5, §9's open question on iterator
//! category) — there is no way to hand back a reference into a heap
//! aggregate's interior map and a finalized region's interior at the same
//! time through one type, so every item here is a copy/decode, never a
//! borrow. `kvbegin`/`kvend` are modeled as the pair of iterators
//! [`key_value_iters`] returns, positioned identically over the same
//! underlying sequence.

use crate::value::Value;

/// Iterates `(key, value)` pairs of an object, in the order its backing
/// representation stores them (ascending for finalized objects per §4.1.1;
/// internal map order for heap objects per §4.5).
pub struct EntryIter {
    inner: std::vec::IntoIter<(String, Value)>,
}

impl EntryIter {
    pub(crate) fn new(entries: Vec<(String, Value)>) -> Self {
        EntryIter {
            inner: entries.into_iter(),
        }
    }
}

impl Iterator for EntryIter {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Iterates the elements of an array, or the values of an object's entries.
pub struct ValueIter {
    inner: std::vec::IntoIter<Value>,
}

impl ValueIter {
    pub(crate) fn new(values: Vec<Value>) -> Self {
        ValueIter {
            inner: values.into_iter(),
        }
    }
}

impl Iterator for ValueIter {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Iterates the keys of an object.
pub struct KeyIter {
    inner: std::vec::IntoIter<String>,
}

impl KeyIter {
    pub(crate) fn new(keys: Vec<String>) -> Self {
        KeyIter {
            inner: keys.into_iter(),
        }
    }
}

impl Iterator for KeyIter {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Split a materialized entry list into a `(key-iterator, value-iterator)`
/// pair positioned identically, matching `kvbegin`/`kvend` (§4.5).
pub(crate) fn key_value_iters(entries: Vec<(String, Value)>) -> (KeyIter, ValueIter) {
    let (keys, values): (Vec<String>, Vec<Value>) = entries.into_iter().unzip();
    (KeyIter::new(keys), ValueIter::new(values))
}
