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

//! Extraction of catalog entries from language documents.

use xmltree::Element;

use crate::entry::{Entries, Entry};
use crate::error::{Error, Result};
use crate::identity::{blank_if_empty, FieldIdentity, Simplified};
use crate::tips::{extract_tips, has_tips};
use crate::tree::{self, FieldPath, RecordPath, KEY};

/// Build the entries for the `original` language document.
///
/// Translations are taken from `translated`, a previous translation of
/// the same document, when it has a record with the same path and key.
/// A missing record or field simply leaves the translation empty.
///
/// Documents with a tip section are handled by [`extract_tips`].
///
/// The result is sorted, see [`Entries::sort`].
pub fn extract(
    original: &[u8],
    translated: Option<&[u8]>,
    simplified: &Simplified,
) -> Result<Entries> {
    let source = tree::parse(original)?;
    let language = tree::language(&source)?;
    let prior = match translated {
        Some(data) if !data.is_empty() => Some(tree::parse(data)?),
        _ => None,
    };
    let prior_language = prior.as_ref().filter(|root| tree::language(root).is_ok());

    if has_tips(language) {
        return Ok(extract_tips(language, prior_language));
    }

    let mut entries = Entries::new();
    for section in tree::sections(language) {
        for record in tree::child_elements(section) {
            entries.extend(extract_record(section, record, prior_language, simplified)?);
        }
    }
    entries.sort();
    Ok(entries)
}

fn extract_record(
    section: &Element,
    record: &Element,
    prior_language: Option<&Element>,
    simplified: &Simplified,
) -> Result<Vec<Entry>> {
    let key = tree::record_key(record).ok_or_else(|| {
        Error::Schema(format!(
            "record /{}/{}/{} has no <{KEY}>",
            tree::LANGUAGE,
            section.name,
            record.name
        ))
    })?;
    let path = RecordPath::new(section, record, &key);
    let prior_record = prior_language.and_then(|language| path.resolve(language));

    let mut entries = Vec::new();
    for field_path in FieldPath::fields(record) {
        if field_path.tag == KEY {
            continue;
        }
        let Some(field) = field_path.resolve(record) else {
            continue;
        };
        let identity = FieldIdentity::new(
            &section.name,
            &key,
            &field_path,
            &tree::text(field),
            simplified,
        );
        let translation = prior_record
            .and_then(|prior| field_path.resolve(prior))
            .map(|prior| blank_if_empty(&tree::text(prior)))
            .unwrap_or_default();
        let translator_comment = if identity.is_simplified() {
            format!("Original: {:?}", identity.original)
        } else {
            String::new()
        };
        entries.push(Entry {
            file: section.name.clone(),
            context: identity.context,
            id: identity.id,
            original: identity.original,
            translation,
            reference: format!("{path}/{field_path}"),
            translator_comment,
        });
    }
    Ok(entries)
}
