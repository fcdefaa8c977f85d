// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text format parsing and serialization (§6.2), delegated to `serde_json`
//! (and, behind the `yaml` feature, `serde_yaml`) for grammar recognition;
//! this module supplies the `Visitor`/event-consuming side that builds a
//! heap tree, plus the JSON writer that is this crate's addition to the
//! distilled spec (see SPEC_FULL.md's supplemented-features section).

pub mod json;
#[cfg(feature = "yaml")]
pub mod yaml;

use crate::error::Result;
use crate::heap::HeapValue;

/// Parser/serializer knob set (§6.2). All fields default to `false`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParserOptions {
    /// Allow `//` and `/* */` comments in JSON input.
    pub permit_comments: bool,
    /// Accept bare `NaN`, `Infinity`, `-Infinity` tokens as decimals.
    pub permit_nan_infinity: bool,
    /// Accept a trailing comma before a closing `]`/`}` in JSON input.
    pub permit_trailing_commas: bool,
    /// On serialization, write `NaN`/`Infinity`/`-Infinity` rather than
    /// raising `parse_error` for non-finite floats.
    pub emit_nan_infinity: bool,
}

/// Entry point for text-format parsing and serialization, carrying a fixed
/// [`ParserOptions`] knob set.
#[derive(Clone, Copy, Debug, Default)]
pub struct Parser {
    pub options: ParserOptions,
}

impl Parser {
    pub fn new(options: ParserOptions) -> Self {
        Parser { options }
    }

    pub fn from_json_str(&self, input: &str) -> Result<HeapValue> {
        json::parse_json(input, &self.options)
    }

    pub fn to_json_string(&self, value: &HeapValue) -> Result<String> {
        json::to_json_string(value, &self.options)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(&self, input: &str) -> Result<HeapValue> {
        yaml::parse_yaml(input)
    }
}
