// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Message identifiers shared by extraction and baking.

use crate::entry::BLANK;
use crate::tree::FieldPath;

/// Tag of the conventional main field of a record.
pub const VALUE: &str = "Value";

/// Sections and fields which use location based message ids.
///
/// By default the `msgid` of a field is its source text. Sections
/// listed here use `<Key>.<Field>` instead, for example `Flour.Unit`
/// for the `Unit` field of the `Flour` reagent, so that records
/// sharing the same source text can be translated independently.
/// The `Value` field is identified by the key alone.
///
/// Items are either a section tag (`Keys`) or a section and field tag
/// separated by a dot (`Reagents.Unit`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Simplified {
    parts: Vec<String>,
}

impl Simplified {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn applies(&self, section: &str, field: &str) -> bool {
        self.parts.iter().any(|part| match part.split_once('.') {
            Some((part_section, part_field)) => part_section == section && part_field == field,
            None => part == section,
        })
    }
}

/// How a field is looked up in a catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldIdentity {
    pub context: String,
    pub id: String,
    /// Source text, [`BLANK`] if the field is empty.
    pub original: String,
}

impl FieldIdentity {
    pub fn new(
        section: &str,
        key: &str,
        field: &FieldPath,
        source_text: &str,
        simplified: &Simplified,
    ) -> Self {
        let original = blank_if_empty(source_text);
        let id = if simplified.applies(section, &field.tag) {
            let mut id = String::from(key);
            if field.tag != VALUE {
                id.push('.');
                id.push_str(&field.tag);
            }
            if field.index > 0 {
                id.push_str(&format!("[{}]", field.index + 1));
            }
            id
        } else {
            original.clone()
        };
        Self {
            context: String::from(section),
            id,
            original,
        }
    }

    /// Whether the id is a location rather than the source text.
    pub fn is_simplified(&self) -> bool {
        self.id != self.original
    }
}

/// Message id of a free-text tip.
pub fn tip_id(text: &str) -> String {
    blank_if_empty(text)
}

pub fn blank_if_empty(text: &str) -> String {
    if text.is_empty() {
        String::from(BLANK)
    } else {
        String::from(text)
    }
}
