// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A small open-addressing, linear-probed hash map.
//!
//! §2's component budget calls out "linear-probed map semantics in heap" as
//! distinct from the logarithmic binary search used over a *finalized*
//! object's sorted vtable (§4.1.7). A [`std::collections::HashMap`] would
//! give us the right asymptotics but none of the specified probing
//! structure, and heap objects don't need the stable iteration order a
//! chaining map's buckets would suggest anyway (finalization is the only
//! place order becomes observable, via the sorted vtable it emits). This is
//! a direct, from-scratch implementation of that probing scheme instead.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const INITIAL_CAPACITY: usize = 8;
const MAX_LOAD_NUM: usize = 7;
const MAX_LOAD_DEN: usize = 10;

#[derive(Clone)]
enum Slot<K, V> {
    Empty,
    Tombstone,
    Occupied(K, V),
}

/// A hash map from `K` to `V` using open addressing with linear probing.
#[derive(Clone)]
pub struct LinearMap<K, V> {
    slots: Vec<Slot<K, V>>,
    len: usize,
    tombstones: usize,
}

impl<K, V> Default for LinearMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> LinearMap<K, V> {
    pub fn new() -> Self {
        LinearMap {
            slots: Vec::new(),
            len: 0,
            tombstones: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.len = 0;
        self.tombstones = 0;
    }
}

impl<K: Hash + Eq + Clone, V> LinearMap<K, V> {
    fn hash_of<Q: Hash + ?Sized>(key: &Q) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    fn needs_grow(&self) -> bool {
        self.slots.is_empty()
            || (self.len + self.tombstones + 1) * MAX_LOAD_DEN > self.slots.len() * MAX_LOAD_NUM
    }

    fn grow(&mut self) {
        let new_capacity = if self.slots.is_empty() {
            INITIAL_CAPACITY
        } else {
            self.slots.len() * 2
        };

        let mut old = std::mem::replace(
            &mut self.slots,
            (0..new_capacity).map(|_| Slot::Empty).collect(),
        );
        self.len = 0;
        self.tombstones = 0;

        for slot in old.drain(..) {
            if let Slot::Occupied(k, v) = slot {
                self.insert_no_grow(k, v);
            }
        }
    }

    fn probe_for_insert<Q>(&self, key: &Q) -> usize
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let capacity = self.slots.len();
        let mut index = (Self::hash_of(key) as usize) % capacity;
        let mut first_tombstone: Option<usize> = None;
        loop {
            match &self.slots[index] {
                Slot::Empty => return first_tombstone.unwrap_or(index),
                Slot::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Slot::Occupied(k, _) if k.borrow() == key => return index,
                Slot::Occupied(_, _) => {}
            }
            index = (index + 1) % capacity;
        }
    }

    fn probe_for_lookup<Q>(&self, key: &Q) -> Option<usize>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.slots.is_empty() {
            return None;
        }
        let capacity = self.slots.len();
        let mut index = (Self::hash_of(key) as usize) % capacity;
        let start = index;
        loop {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied(k, _) if k.borrow() == key => return Some(index),
                _ => {}
            }
            index = (index + 1) % capacity;
            if index == start {
                return None;
            }
        }
    }

    fn insert_no_grow(&mut self, key: K, value: V) -> Option<V> {
        let index = self.probe_for_insert(&key);
        match std::mem::replace(&mut self.slots[index], Slot::Empty) {
            Slot::Occupied(existing_key, existing_value) => {
                self.slots[index] = Slot::Occupied(existing_key, value);
                Some(existing_value)
            }
            Slot::Tombstone => {
                self.tombstones -= 1;
                self.slots[index] = Slot::Occupied(key, value);
                self.len += 1;
                None
            }
            Slot::Empty => {
                self.slots[index] = Slot::Occupied(key, value);
                self.len += 1;
                None
            }
        }
    }

    /// Insert `value` under `key`, returning the previous value if `key`
    /// was already present (§4.2.1 `add_field`/`set`: "If `k` present:
    /// replaces value. Else inserts.").
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.needs_grow() {
            self.grow();
        }
        self.insert_no_grow(key, value)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.probe_for_lookup(key)?;
        match &self.slots[index] {
            Slot::Occupied(_, v) => Some(v),
            _ => None,
        }
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.probe_for_lookup(key)?;
        match &mut self.slots[index] {
            Slot::Occupied(_, v) => Some(v),
            _ => None,
        }
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.probe_for_lookup(key).is_some()
    }

    /// Remove `key`, returning its value. No-op (returns `None`) if absent
    /// (§4.2.1 `remove_field`/`erase`: "No-op if absent").
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.probe_for_lookup(key)?;
        match std::mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied(_, v) => {
                self.len -= 1;
                self.tombstones += 1;
                Some(v)
            }
            other => {
                self.slots[index] = other;
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get() {
        let mut m: LinearMap<String, i32> = LinearMap::new();
        assert_eq!(m.insert("a".to_string(), 1), None);
        assert_eq!(m.get("a"), Some(&1));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn insert_replaces_without_growing_len() {
        let mut m: LinearMap<String, i32> = LinearMap::new();
        m.insert("a".to_string(), 1);
        assert_eq!(m.insert("a".to_string(), 2), Some(1));
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("a"), Some(&2));
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut m: LinearMap<String, i32> = LinearMap::new();
        assert_eq!(m.remove("missing"), None);
    }

    #[test]
    fn remove_then_reinsert() {
        let mut m: LinearMap<String, i32> = LinearMap::new();
        m.insert("a".to_string(), 1);
        assert_eq!(m.remove("a"), Some(1));
        assert_eq!(m.get("a"), None);
        assert_eq!(m.len(), 0);
        m.insert("a".to_string(), 9);
        assert_eq!(m.get("a"), Some(&9));
    }

    #[test]
    fn survives_many_insertions_and_probe_chains() {
        let mut m: LinearMap<String, i32> = LinearMap::new();
        for i in 0..500 {
            m.insert(format!("key{i}"), i);
        }
        assert_eq!(m.len(), 500);
        for i in 0..500 {
            assert_eq!(m.get(&format!("key{i}")), Some(&i));
        }
    }

    #[test]
    fn iter_yields_all_entries() {
        let mut m: LinearMap<String, i32> = LinearMap::new();
        for i in 0..20 {
            m.insert(format!("k{i}"), i);
        }
        let mut seen: Vec<i32> = m.iter().map(|(_, v)| *v).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..20).collect::<Vec<_>>());
    }
}
