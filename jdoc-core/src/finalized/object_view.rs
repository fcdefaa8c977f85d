// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Finalized object access: header/vtable walk and binary-search lookup
//! (§4.1.1, §4.1.7).

use super::buffer::{Buffer, FinalizedValue};
use super::codec;
use crate::error::{DocError, Result};
use jdoc_types::header::VTableEntryRaw;
use jdoc_types::RawType;

impl<B: Buffer> FinalizedValue<B> {
    /// Number of entries in an object or array region. Panics (via
    /// `debug_assert`) if called on a non-aggregate in debug builds; release
    /// builds simply return 0, since a caller that mismatches kinds has
    /// already violated the introspection contract elsewhere.
    pub fn size(&self) -> usize {
        debug_assert!(self.raw_type.is_aggregate(), "size() on a non-aggregate");
        let mut offset = 0usize;
        match codec::read_aggregate_header(&mut offset, self.region()) {
            Ok(header) => header.count as usize,
            Err(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn require_object(&self) -> Result<()> {
        if self.raw_type != RawType::Object {
            return Err(DocError::type_error(
                jdoc_types::UserKind::Object,
                self.raw_type.user_kind(),
            ));
        }
        Ok(())
    }

    fn vtable_entry(&self, index: usize) -> Result<VTableEntryRaw> {
        codec::read_vtable_entry(self.region(), index)
    }

    /// Decode the key string stored at vtable entry `index`.
    fn key_at(&self, index: usize) -> Result<&str> {
        let entry = self.vtable_entry(index)?;
        let mut offset = entry.offset.get() as usize;
        codec::read_string(&mut offset, self.region())
    }

    /// Decode the value region addressed by vtable entry `index`: the key
    /// region immediately precedes it, padded up to the value's alignment.
    fn value_at(&self, index: usize) -> Result<FinalizedValue<B>> {
        let entry = self.vtable_entry(index)?;
        let raw_type =
            RawType::try_from(entry.raw_type).map_err(|_| DocError::from(
                jdoc_types::ParseError::UnknownRawType(entry.raw_type),
            ))?;
        let mut key_offset = entry.offset.get() as usize;
        codec::read_string(&mut key_offset, self.region())?;
        let value_offset = codec::align_for(key_offset, raw_type);
        let value_len = codec::region_len_at(self.region(), raw_type, value_offset)?;
        Ok(self.child(raw_type, value_offset..value_offset + value_len))
    }

    /// Binary search the sorted vtable for `key`, per §4.1.7. Each
    /// comparison decodes one candidate key and compares it lexicographically
    /// against the probe.
    fn binary_search_key(&self, key: &str) -> Result<core::result::Result<usize, usize>> {
        let count = self.size();
        let mut low = 0usize;
        let mut high = count;
        while low < high {
            let mid = low + (high - low) / 2;
            let candidate = self.key_at(mid)?;
            match candidate.cmp(key) {
                core::cmp::Ordering::Equal => return Ok(Ok(mid)),
                core::cmp::Ordering::Less => low = mid + 1,
                core::cmp::Ordering::Greater => high = mid,
            }
        }
        Ok(Err(low))
    }

    pub fn has_key(&self, key: &str) -> Result<bool> {
        self.require_object()?;
        Ok(matches!(self.binary_search_key(key)?, Ok(_)))
    }

    /// `None` on miss, matching the heap-side `find`'s `Option` style.
    pub fn find(&self, key: &str) -> Result<Option<FinalizedValue<B>>> {
        self.require_object()?;
        match self.binary_search_key(key)? {
            Ok(index) => Ok(Some(self.value_at(index)?)),
            Err(_) => Ok(None),
        }
    }

    pub fn get(&self, key: &str) -> Result<Option<FinalizedValue<B>>> {
        self.find(key)
    }

    pub fn at(&self, key: &str) -> Result<FinalizedValue<B>> {
        self.find(key)?
            .ok_or(DocError::InvalidArgument("key not present in object"))
    }

    /// Keys in stored (ascending) order (§4.5).
    pub fn keys(&self) -> Result<Vec<&str>> {
        self.require_object()?;
        (0..self.size()).map(|i| self.key_at(i)).collect()
    }

    pub fn iter(&self) -> Result<Vec<(&str, FinalizedValue<B>)>> {
        self.require_object()?;
        (0..self.size())
            .map(|i| Ok((self.key_at(i)?, self.value_at(i)?)))
            .collect()
    }
}
