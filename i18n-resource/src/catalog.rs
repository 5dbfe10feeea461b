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

//! Translation lookups across several catalogs.

use std::io::Write;

use polib::catalog::Catalog;
use polib::message::MessageView;
use polib::po_file;

use crate::error::{Error, Result};
use crate::po::{header_entry, unquote, PLURAL_FORMS};

/// Header fields polib expects in every catalog, with the value used
/// when a catalog lacks them.
const REQUIRED_FIELDS: [(&str, &str); 5] = [
    ("POT-Creation-Date", ""),
    ("PO-Revision-Date", ""),
    ("Language-Team", ""),
    ("Language", ""),
    ("Plural-Forms", PLURAL_FORMS),
];

/// Parse `data` as a PO file.
///
/// Missing header fields are filled in, so catalogs edited by hand
/// parse as long as their strings are well formed. Malformed strings
/// and header lines give [`Error::Schema`].
pub fn parse_catalog(name: &str, data: &[u8]) -> Result<Catalog> {
    let text = std::str::from_utf8(data)
        .map_err(|err| Error::Schema(format!("{name} is not UTF-8: {err}")))?;
    check_literals(name, text)?;
    let text = complete_header(name, text)?;

    // polib parses from a path.
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    po_file::parse(file.path())
        .map_err(|err| Error::Schema(format!("could not parse {name}: {err}")))
}

/// Whether `text` is a quoted string whose closing quote is not escaped.
fn is_literal(text: &str) -> bool {
    let Some(inner) = text.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) else {
        return false;
    };
    let escapes = inner.chars().rev().take_while(|&ch| ch == '\\').count();
    escapes % 2 == 0
}

/// Check that every `msg*` value and continuation line is a string.
fn check_literals(name: &str, text: &str) -> Result<()> {
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        let literal = if line.starts_with('"') {
            line
        } else if line.starts_with("msg") {
            line.split_once(char::is_whitespace)
                .map(|(_, value)| value.trim())
                .unwrap_or_default()
        } else {
            continue;
        };
        if !is_literal(literal) {
            return Err(Error::Schema(format!(
                "{name}:{}: malformed string in {line:?}",
                idx + 1
            )));
        }
    }
    Ok(())
}

/// Rewrite the header entry of `text` with every [`REQUIRED_FIELDS`]
/// present, adding a header when there is none.
fn complete_header(name: &str, text: &str) -> Result<String> {
    let lines = text.lines().collect::<Vec<_>>();
    let start = lines.iter().position(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    });
    let has_header = start.is_some_and(|start| {
        lines[start].trim() == "msgid \"\""
            && lines
                .get(start + 1)
                .is_some_and(|line| line.trim_start().starts_with("msgstr "))
    });

    let mut fields = Vec::new();
    let (before, after) = match start {
        Some(start) if has_header => {
            let mut end = start + 1;
            let mut metadata = String::new();
            let first = lines[end].trim_start().trim_start_matches("msgstr").trim();
            metadata.push_str(&unquote(first).unwrap_or_default());
            end += 1;
            while let Some(line) = lines.get(end).map(|line| line.trim()) {
                if !line.starts_with('"') {
                    break;
                }
                metadata.push_str(&unquote(line).unwrap_or_default());
                end += 1;
            }
            for line in metadata.split('\n').map(str::trim).filter(|line| !line.is_empty()) {
                let (field, value) = line.split_once(':').ok_or_else(|| {
                    Error::Schema(format!("{name}: malformed header line {line:?}"))
                })?;
                fields.push((String::from(field.trim()), String::from(value.trim())));
            }
            (&lines[..start], &lines[end..])
        }
        _ => (&lines[..0], &lines[..]),
    };

    for (field, default) in REQUIRED_FIELDS {
        match fields.iter_mut().find(|(existing, _)| existing == field) {
            Some((_, value)) if value.is_empty() => *value = String::from(default),
            Some(_) => {}
            None => fields.push((String::from(field), String::from(default))),
        }
    }

    let mut completed = String::with_capacity(text.len() + 256);
    for line in before {
        completed.push_str(line);
        completed.push('\n');
    }
    completed.push_str(&header_entry(&fields));
    if !has_header {
        completed.push('\n');
    }
    for line in after {
        completed.push_str(line);
        completed.push('\n');
    }
    Ok(completed)
}

/// A translation found in a [`CatalogSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Translation<'a> {
    pub msgstr: &'a str,
    /// Name of the catalog the translation came from.
    pub catalog: &'a str,
}

/// An ordered list of catalogs.
///
/// Lookups query the catalogs in order and stop at the first catalog
/// with a non-empty translation, so earlier catalogs win. This lets
/// per-section catalogs be combined at bake time.
#[derive(Default)]
pub struct CatalogSet {
    catalogs: Vec<(String, Catalog)>,
}

impl CatalogSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse each buffer as a PO file, naming them by position.
    pub fn from_buffers<B: AsRef<[u8]>>(buffers: &[B]) -> Result<Self> {
        let mut catalogs = Self::new();
        for (idx, buffer) in buffers.iter().enumerate() {
            catalogs.parse(format!("catalog #{}", idx + 1), buffer.as_ref())?;
        }
        Ok(catalogs)
    }

    pub fn add(&mut self, name: impl Into<String>, catalog: Catalog) {
        self.catalogs.push((name.into(), catalog));
    }

    /// Parse `data` as a PO file and append it.
    pub fn parse(&mut self, name: impl Into<String>, data: &[u8]) -> Result<()> {
        let name = name.into();
        let catalog = parse_catalog(&name, data)?;
        self.add(name, catalog);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Find the translation of `msgid`.
    ///
    /// A message with the same `msgctxt` is preferred. Otherwise any
    /// message with the same `msgid` is used, regardless of its context.
    /// Empty translations are skipped.
    pub fn lookup(&self, msgctxt: Option<&str>, msgid: &str) -> Option<Translation<'_>> {
        self.catalogs
            .iter()
            .find_map(|(name, catalog)| {
                catalog
                    .find_message(msgctxt, msgid, None)
                    .and_then(|message| message.msgstr().ok())
                    .filter(|msgstr| !msgstr.is_empty())
                    .map(|msgstr| Translation {
                        msgstr,
                        catalog: name,
                    })
            })
            .or_else(|| {
                self.catalogs.iter().find_map(|(name, catalog)| {
                    catalog
                        .messages()
                        .filter(|message| message.msgid() == msgid)
                        .filter_map(|message| message.msgstr().ok())
                        .find(|msgstr| !msgstr.is_empty())
                        .map(|msgstr| Translation {
                            msgstr,
                            catalog: name,
                        })
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Entries, Entry};
    use crate::po::CatalogHeader;
    use pretty_assertions::assert_eq;

    const COLORS: &str = r#"msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"

msgctxt "Colors"
msgid "Red"
msgstr "Красный"

msgctxt "Colors"
msgid "Blue"
msgstr ""
"#;

    const THINGS: &str = r#"msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"

msgctxt "Things"
msgid "Red"
msgstr "Красная"

msgctxt "Things"
msgid "Blue"
msgstr "Синяя"
"#;

    fn catalogs() -> CatalogSet {
        CatalogSet::from_buffers(&[COLORS, THINGS]).unwrap()
    }

    #[test]
    fn test_lookup_prefers_context() {
        let catalogs = catalogs();
        assert_eq!(
            catalogs.lookup(Some("Things"), "Red"),
            Some(Translation {
                msgstr: "Красная",
                catalog: "catalog #2"
            })
        );
        assert_eq!(
            catalogs.lookup(Some("Colors"), "Red").map(|t| t.msgstr),
            Some("Красный")
        );
    }

    #[test]
    fn test_lookup_falls_back_to_msgid() {
        let catalogs = catalogs();
        // The first catalog wins when the context does not match.
        assert_eq!(
            catalogs.lookup(Some("Gases"), "Red").map(|t| t.msgstr),
            Some("Красный")
        );
        assert_eq!(catalogs.lookup(None, "Red").map(|t| t.msgstr), Some("Красный"));
    }

    #[test]
    fn test_lookup_skips_empty_translations() {
        let catalogs = catalogs();
        assert_eq!(
            catalogs.lookup(Some("Colors"), "Blue").map(|t| t.msgstr),
            Some("Синяя")
        );
        assert_eq!(catalogs.lookup(None, "Green"), None);
    }

    #[test]
    fn test_parse_serialized_catalog() -> anyhow::Result<()> {
        let entries = Entries::from(vec![Entry {
            file: String::from("Colors"),
            context: String::from("Colors"),
            id: String::from("Red"),
            original: String::from("Red"),
            translation: String::from("Красный"),
            reference: String::from("/Language/Colors/RecordColor[Key='Red']/Value"),
            translator_comment: String::new(),
        }]);
        let header = CatalogHeader {
            language: String::from("ru"),
            ..CatalogHeader::default()
        };
        let catalogs = CatalogSet::from_buffers(&[
            entries.to_po_string("Colors", &header),
            entries.to_pot_string("Colors", &header),
        ])?;
        assert_eq!(catalogs.len(), 2);
        assert_eq!(
            catalogs.lookup(Some("Colors"), "Red"),
            Some(Translation {
                msgstr: "Красный",
                catalog: "catalog #1"
            })
        );
        Ok(())
    }

    #[test]
    fn test_parse_completes_header() -> anyhow::Result<()> {
        let catalog = parse_catalog("partial.po", COLORS.as_bytes())?;
        assert_eq!(catalog.count(), 2);

        let headerless = "msgctxt \"Colors\"\nmsgid \"Red\"\nmsgstr \"Красный\"\n";
        let catalogs = CatalogSet::from_buffers(&[headerless])?;
        assert_eq!(
            catalogs.lookup(Some("Colors"), "Red").map(|t| t.msgstr),
            Some("Красный")
        );
        Ok(())
    }

    #[test]
    fn test_complete_header() -> anyhow::Result<()> {
        let completed = complete_header(
            "test.po",
            "# comment\nmsgid \"\"\nmsgstr \"\"\n\"Language: ru\\n\"\n\"Plural-Forms: \\n\"\n\nmsgid \"Red\"\nmsgstr \"\"\n",
        )?;
        assert_eq!(
            completed,
            "# comment\n\
             msgid \"\"\n\
             msgstr \"\"\n\
             \"Language: ru\\n\"\n\
             \"Plural-Forms: nplurals=2; plural=(n != 1);\\n\"\n\
             \"POT-Creation-Date: \\n\"\n\
             \"PO-Revision-Date: \\n\"\n\
             \"Language-Team: \\n\"\n\
             \n\
             msgid \"Red\"\n\
             msgstr \"\"\n"
        );
        Ok(())
    }

    #[test]
    fn test_parse_rejects_malformed_strings() {
        for data in [
            "msgid \"Red\"\nmsgstr \"\n",
            "msgid \"Red\"\nmsgstr \"\"\n\"\n",
            "msgid \"Red\"\nmsgstr \"Красн\n",
            "msgid \"Red\"\nmsgstr \"Red\\\"\n",
            "msgid Red\nmsgstr \"\"\n",
        ] {
            let result = CatalogSet::from_buffers(&[data]);
            assert!(
                matches!(result, Err(Error::Schema(_))),
                "accepted {data:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_malformed_header() {
        let data = "msgid \"\"\nmsgstr \"no colon here\\n\"\n";
        assert!(matches!(
            parse_catalog("broken.po", data.as_bytes()),
            Err(Error::Schema(_))
        ));
        assert!(matches!(
            parse_catalog("binary.po", &[0xff, 0xfe]),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn test_empty_set() {
        let catalogs = CatalogSet::new();
        assert!(catalogs.is_empty());
        assert_eq!(catalogs.lookup(None, "Red"), None);
    }
}
