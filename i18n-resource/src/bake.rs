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

//! Injection of catalog translations into a language document.

use std::collections::HashMap;

use xmltree::{Element, XMLNode};

use crate::catalog::CatalogSet;
use crate::entry::BLANK;
use crate::error::{Error, Result};
use crate::identity::{tip_id, FieldIdentity, Simplified};
use crate::tree::{self, FieldPath, RecordPath, KEY};

/// Field which is never shipped in a translated document.
pub const DESCRIPTION: &str = "Description";

/// Scalar options for [`bake`].
#[derive(Clone, Copy, Debug)]
pub struct BakeOptions<'a> {
    /// Language code written to `<Code>`, required.
    pub code: &'a str,
    /// Display name written to `<Name>`. `<Name>` is removed when empty.
    pub name: &'a str,
    /// Font written to `<Font>`. `<Font>` is removed when empty.
    pub font: &'a str,
    pub simplified: &'a Simplified,
}

/// Translate the `source` document with the given PO `catalogs`.
///
/// Catalogs are queried in order and the first translation found wins.
/// Keyed records with an untranslated field are left out of the result,
/// as are tips without a translation. A translation equal to
/// [`BLANK`] empties the field.
///
/// Returns the translated document, indented with two spaces.
pub fn bake<B: AsRef<[u8]>>(
    source: &[u8],
    catalogs: &[B],
    options: &BakeOptions,
) -> Result<Vec<u8>> {
    if options.code.is_empty() {
        return Err(Error::Config(String::from(
            "a language code is required to bake a translation",
        )));
    }
    let catalogs = CatalogSet::from_buffers(catalogs)?;
    let root = tree::parse(source)?;
    let language = tree::language(&root)?;
    let translated = bake_language(language, &catalogs, options);
    tree::write(&translated)
}

/// Like [`bake`], with a parsed source and catalogs.
pub fn bake_language(
    language: &Element,
    catalogs: &CatalogSet,
    options: &BakeOptions,
) -> Element {
    let mut translated = language.clone();
    set_metadata(&mut translated, "Code", options.code);
    set_metadata(&mut translated, "Name", options.name);
    set_metadata(&mut translated, "Font", options.font);

    let baker = Baker {
        language,
        catalogs,
        simplified: options.simplified,
    };
    for node in &mut translated.children {
        let XMLNode::Element(section) = node else {
            continue;
        };
        if tree::is_metadata(&section.name) {
            continue;
        }
        let records = std::mem::take(&mut section.children);
        for node in records {
            match node {
                XMLNode::Element(record) => {
                    if let Some(record) = baker.bake_record(section, record) {
                        section.children.push(XMLNode::Element(record));
                    }
                }
                other => section.children.push(other),
            }
        }
    }
    translated
}

/// Set the text of the metadata element `tag`, creating it after the
/// existing metadata if needed. An empty value removes the element.
fn set_metadata(language: &mut Element, tag: &str, value: &str) {
    if value.is_empty() {
        language
            .children
            .retain(|node| node.as_element().map_or(true, |element| element.name != tag));
        return;
    }
    if let Some(element) = language.get_mut_child(tag) {
        tree::set_text(element, value);
        return;
    }
    let mut element = Element::new(tag);
    tree::set_text(&mut element, value);
    let position = language
        .children
        .iter()
        .rposition(|node| {
            node.as_element()
                .is_some_and(|element| tree::is_metadata(&element.name))
        })
        .map_or(0, |idx| idx + 1);
    language.children.insert(position, XMLNode::Element(element));
}

struct Baker<'a> {
    /// The untouched source document, used to derive message ids.
    language: &'a Element,
    catalogs: &'a CatalogSet,
    simplified: &'a Simplified,
}

impl Baker<'_> {
    /// Translate one child of `section`, returning `None` if it should
    /// be left out.
    fn bake_record(&self, section: &Element, record: Element) -> Option<Element> {
        match tree::record_key(&record) {
            Some(key) => self.bake_keyed_record(section, record, &key),
            None if tree::child_elements(&record).next().is_none() => self.bake_tip(record),
            None => {
                log::debug!(
                    "Keeping /{}/{}/{}: record has no <{KEY}>",
                    tree::LANGUAGE,
                    section.name,
                    record.name
                );
                Some(record)
            }
        }
    }

    fn bake_keyed_record(
        &self,
        section: &Element,
        mut record: Element,
        key: &str,
    ) -> Option<Element> {
        let path = RecordPath::new(section, &record, key);
        let Some(source_record) = path.resolve(self.language) else {
            log::debug!("Keeping {path}: not found in the source document");
            return Some(record);
        };

        let mut seen: HashMap<String, usize> = HashMap::new();
        let fields = std::mem::take(&mut record.children);
        for node in fields {
            let XMLNode::Element(mut field) = node else {
                record.children.push(node);
                continue;
            };
            let index = seen.entry(field.name.clone()).or_default();
            let field_path = FieldPath {
                tag: field.name.clone(),
                index: *index,
            };
            *index += 1;

            if field.name == KEY {
                record.children.push(XMLNode::Element(field));
                continue;
            }
            if field.name == DESCRIPTION {
                log::debug!("Stripping {path}/{field_path}");
                continue;
            }
            let Some(source_field) = field_path.resolve(source_record) else {
                record.children.push(XMLNode::Element(field));
                continue;
            };

            let identity = FieldIdentity::new(
                &section.name,
                key,
                &field_path,
                &tree::text(source_field),
                self.simplified,
            );
            let Some(translation) = self.catalogs.lookup(Some(&identity.context), &identity.id)
            else {
                log::debug!("Dropping {path}: {field_path} is not translated");
                return None;
            };
            if translation.msgstr == identity.id && identity.is_simplified() {
                log::debug!("Dropping {path}: {field_path} translates to its id");
                return None;
            }
            if translation.msgstr == BLANK {
                field.children.clear();
            } else {
                tree::set_text(&mut field, translation.msgstr);
            }
            record.children.push(XMLNode::Element(field));
        }
        Some(record)
    }

    fn bake_tip(&self, mut tip: Element) -> Option<Element> {
        let text = tree::text(&tip);
        let translation = self.catalogs.lookup(None, &tip_id(&text))?;
        if translation.msgstr == text {
            return None;
        }
        if translation.msgstr == BLANK {
            tip.children.clear();
        } else {
            tree::set_text(&mut tip, translation.msgstr);
        }
        Some(tip)
    }
}
