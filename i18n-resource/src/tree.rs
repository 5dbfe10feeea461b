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

//! Typed access to language documents.
//!
//! A language document looks like this:
//!
//! ```xml
//! <Language>
//!   <Name>English</Name>
//!   <Code>EN</Code>
//!   <Colors>
//!     <RecordColor>
//!       <Key>Red</Key>
//!       <Value>Red</Value>
//!     </RecordColor>
//!   </Colors>
//! </Language>
//! ```
//!
//! Paths are built and resolved here so that extraction and baking
//! locate the same elements in the same way.

use std::fmt;

use xmltree::{Element, EmitterConfig, ParserConfig, XMLNode};

use crate::error::{Error, Result};

/// Tag of the document root.
pub const LANGUAGE: &str = "Language";
/// Tag of the child identifying a record.
pub const KEY: &str = "Key";
/// Metadata children of the root, these are not translated.
pub const METADATA: [&str; 3] = ["Name", "Code", "Font"];

/// Parse a document, keeping whitespace-only text such as
/// `<Value> </Value>`.
pub fn parse(data: &[u8]) -> Result<Element> {
    let config = ParserConfig::new().whitespace_to_characters(true);
    let mut root = Element::parse_with_config(data, config)?;
    drop_layout(&mut root);
    Ok(root)
}

/// Remove the indentation between child elements. Text of elements
/// without child elements is left alone.
fn drop_layout(element: &mut Element) {
    if !element.children.iter().any(|node| matches!(node, XMLNode::Element(_))) {
        return;
    }
    element
        .children
        .retain(|node| !matches!(node, XMLNode::Text(text) if text.trim().is_empty()));
    for child in &mut element.children {
        if let XMLNode::Element(child) = child {
            drop_layout(child);
        }
    }
}

/// Serialize `root` with two-space indentation.
pub fn write(root: &Element) -> Result<Vec<u8>> {
    let config = EmitterConfig::new()
        .perform_indent(true)
        .indent_string("  ");
    let mut buffer = Vec::new();
    root.write_with_config(&mut buffer, config)
        .map_err(|err| Error::XmlWrite(err.to_string()))?;
    Ok(buffer)
}

/// Check that `root` is a `Language` element.
pub fn language(root: &Element) -> Result<&Element> {
    if root.name == LANGUAGE {
        Ok(root)
    } else {
        Err(Error::Schema(format!(
            "expected <{LANGUAGE}> root element, found <{}>",
            root.name
        )))
    }
}

pub fn is_metadata(tag: &str) -> bool {
    METADATA.contains(&tag)
}

pub fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(XMLNode::as_element)
}

/// Translatable sections of a `Language` element.
pub fn sections(language: &Element) -> impl Iterator<Item = &Element> {
    child_elements(language).filter(|section| !is_metadata(&section.name))
}

/// The text content of `element`, empty if there is none.
pub fn text(element: &Element) -> String {
    element
        .get_text()
        .map(|text| text.into_owned())
        .unwrap_or_default()
}

/// Replace the text content of `element`, keeping child elements.
pub fn set_text(element: &mut Element, text: &str) {
    element
        .children
        .retain(|node| !matches!(node, XMLNode::Text(_) | XMLNode::CData(_)));
    element.children.insert(0, XMLNode::Text(String::from(text)));
}

/// Value of the `Key` child, if the element is a keyed record.
pub fn record_key(record: &Element) -> Option<String> {
    record.get_child(KEY).map(text)
}

/// Location of a keyed record: `/Language/<section>/<record>[Key='<key>']`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordPath {
    pub section: String,
    pub record: String,
    pub key: String,
}

impl RecordPath {
    pub fn new(section: &Element, record: &Element, key: &str) -> Self {
        Self {
            section: section.name.clone(),
            record: record.name.clone(),
            key: String::from(key),
        }
    }

    /// Find the first record matching this path below `language`.
    pub fn resolve<'a>(&self, language: &'a Element) -> Option<&'a Element> {
        child_elements(language)
            .filter(|section| section.name == self.section)
            .flat_map(child_elements)
            .find(|record| {
                record.name == self.record
                    && record_key(record).as_deref() == Some(self.key.as_str())
            })
    }
}

impl fmt::Display for RecordPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/{LANGUAGE}/{}/{}[{KEY}='{}']",
            self.section, self.record, self.key
        )
    }
}

/// Location of a field relative to its record.
///
/// Fields are addressed by tag and by position among the siblings
/// sharing that tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPath {
    pub tag: String,
    pub index: usize,
}

impl FieldPath {
    /// The paths of all fields of `record`, in document order.
    pub fn fields(record: &Element) -> Vec<FieldPath> {
        let mut paths: Vec<FieldPath> = Vec::new();
        for field in child_elements(record) {
            let index = paths.iter().filter(|path| path.tag == field.name).count();
            paths.push(FieldPath {
                tag: field.name.clone(),
                index,
            });
        }
        paths
    }

    pub fn resolve<'a>(&self, record: &'a Element) -> Option<&'a Element> {
        child_elements(record)
            .filter(|field| field.name == self.tag)
            .nth(self.index)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            0 => write!(f, "{}", self.tag),
            index => write!(f, "{}[{}]", self.tag, index + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = "<Language>\
        <Name>English</Name>\
        <Code>EN</Code>\
        <Colors>\
          <RecordColor><Key>Red</Key><Value>Red</Value></RecordColor>\
          <RecordColor><Key>Blue</Key><Value>Blue</Value><Value>Azure</Value></RecordColor>\
        </Colors>\
        </Language>";

    #[test]
    fn test_language_root() {
        let root = parse(DOCUMENT.as_bytes()).unwrap();
        assert!(language(&root).is_ok());

        let root = parse(b"<Other/>").unwrap();
        assert!(matches!(language(&root), Err(Error::Schema(_))));
    }

    #[test]
    fn test_sections_skip_metadata() {
        let root = parse(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(
            sections(&root).map(|s| s.name.as_str()).collect::<Vec<_>>(),
            &["Colors"]
        );
    }

    #[test]
    fn test_record_path_round_trip() {
        let root = parse(DOCUMENT.as_bytes()).unwrap();
        let section = sections(&root).next().unwrap();
        let record = child_elements(section).nth(1).unwrap();
        let path = RecordPath::new(section, record, "Blue");
        assert_eq!(
            path.to_string(),
            "/Language/Colors/RecordColor[Key='Blue']"
        );
        assert_eq!(path.resolve(&root), Some(record));

        let missing = RecordPath {
            key: String::from("Green"),
            ..path
        };
        assert_eq!(missing.resolve(&root), None);
    }

    #[test]
    fn test_field_paths() {
        let root = parse(DOCUMENT.as_bytes()).unwrap();
        let section = sections(&root).next().unwrap();
        let record = child_elements(section).nth(1).unwrap();
        let paths = FieldPath::fields(record);
        assert_eq!(
            paths.iter().map(ToString::to_string).collect::<Vec<_>>(),
            &["Key", "Value", "Value[2]"]
        );
        assert_eq!(text(paths[2].resolve(record).unwrap()), "Azure");
    }

    #[test]
    fn test_parse_keeps_whitespace_text() -> anyhow::Result<()> {
        let root =
            parse(b"<Language>\n  <Colors>\n    <Value> </Value>\n  </Colors>\n</Language>")?;
        let section = sections(&root).next().unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(section.children.len(), 1);
        assert_eq!(section.get_child("Value").map(text).as_deref(), Some(" "));

        let written = String::from_utf8(write(&root)?)?;
        assert!(written.contains("<Value> </Value>"));
        assert_eq!(parse(written.as_bytes())?, root);
        Ok(())
    }

    #[test]
    fn test_set_text_replaces_content() {
        let mut root = parse(b"<Value>old</Value>").unwrap();
        set_text(&mut root, "new");
        assert_eq!(text(&root), "new");
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_write_indents_with_two_spaces() {
        let root = parse(b"<Language><Code>RU</Code></Language>").unwrap();
        let written = String::from_utf8(write(&root).unwrap()).unwrap();
        assert!(written.contains("\n  <Code>RU</Code>"), "{written}");
    }
}
