// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Finalized array access: O(1) index lookup via the vtable (§4.1.2, §4.1.7).

use super::buffer::{Buffer, FinalizedValue};
use super::codec;
use crate::error::{DocError, Result};
use jdoc_types::RawType;

impl<B: Buffer> FinalizedValue<B> {
    fn require_array(&self) -> Result<()> {
        if self.raw_type != RawType::Array {
            return Err(DocError::type_error(
                jdoc_types::UserKind::Array,
                self.raw_type.user_kind(),
            ));
        }
        Ok(())
    }

    fn array_value_at(&self, index: usize) -> Result<FinalizedValue<B>> {
        let entry = codec::read_vtable_entry(self.region(), index)?;
        let raw_type = RawType::try_from(entry.raw_type)
            .map_err(|_| DocError::from(jdoc_types::ParseError::UnknownRawType(entry.raw_type)))?;
        let offset = entry.offset.get() as usize;
        let len = codec::region_len_at(self.region(), raw_type, offset)?;
        Ok(self.child(raw_type, offset..offset + len))
    }

    /// Throws `out_of_range` on a miss.
    pub fn at_index(&self, index: usize) -> Result<FinalizedValue<B>> {
        self.require_array()?;
        let len = self.size();
        if index >= len {
            return Err(DocError::OutOfRange { index, len });
        }
        self.array_value_at(index)
    }

    /// `None` on a miss, for forgiving accessors.
    pub fn get_index(&self, index: usize) -> Result<Option<FinalizedValue<B>>> {
        self.require_array()?;
        if index >= self.size() {
            return Ok(None);
        }
        Ok(Some(self.array_value_at(index)?))
    }

    pub fn iter_array(&self) -> Result<Vec<FinalizedValue<B>>> {
        self.require_array()?;
        (0..self.size()).map(|i| self.array_value_at(i)).collect()
    }
}
