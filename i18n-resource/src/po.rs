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

//! Rendering of entries as PO and POT files.
//!
//! The output is written line by line rather than through a catalog
//! writer: every entry is a single `msgid`/`msgstr` line pair without
//! wrapping, in entry order, so regenerated files diff cleanly and the
//! merge step can work on the text directly.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::entry::{Entries, Entry};

/// Metadata written in the header entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogHeader {
    pub project_id_version: String,
    pub language: String,
}

impl Default for CatalogHeader {
    fn default() -> Self {
        Self {
            project_id_version: String::from("i18n-resource"),
            language: String::new(),
        }
    }
}

/// Plural rule written in every header.
pub const PLURAL_FORMS: &str = "nplurals=2; plural=(n != 1);";

/// Quote `text` as a PO string literal.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// Decode a PO string literal, the inverse of [`quote`].
///
/// Returns `None` when `literal` is not a complete quoted string.
pub fn unquote(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            text.push(ch);
            continue;
        }
        match chars.next()? {
            'n' => text.push('\n'),
            'r' => text.push('\r'),
            't' => text.push('\t'),
            other => text.push(other),
        }
    }
    Some(text)
}

/// Render the header entry made of `fields`.
pub fn header_entry(fields: &[(String, String)]) -> String {
    let mut entry = String::from("msgid \"\"\nmsgstr \"\"\n");
    for (name, value) in fields {
        entry.push_str(&quote(&format!("{name}: {value}\n")));
        entry.push('\n');
    }
    entry
}

fn write_header<W: Write>(header: &CatalogHeader, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "# Translation of {}", header.project_id_version)?;
    writeln!(writer, "#")?;
    let fields = [
        ("Project-Id-Version", header.project_id_version.as_str()),
        ("Report-Msgid-Bugs-To", ""),
        ("POT-Creation-Date", ""),
        ("PO-Revision-Date", ""),
        ("Last-Translator", ""),
        ("Language-Team", ""),
        ("Language", header.language.as_str()),
        ("MIME-Version", "1.0"),
        ("Content-Type", "text/plain; charset=UTF-8"),
        ("Content-Transfer-Encoding", "8bit"),
        ("Plural-Forms", PLURAL_FORMS),
    ]
    .map(|(name, value)| (String::from(name), String::from(value)));
    write!(writer, "{}", header_entry(&fields))
}

fn write_entry<W: Write>(
    entry: &Entry,
    extra_references: &[&str],
    msgstr: &str,
    writer: &mut W,
) -> io::Result<()> {
    writeln!(writer)?;
    if !entry.translator_comment.is_empty() {
        writeln!(writer, "# {}", entry.translator_comment)?;
    }
    for reference in std::iter::once(entry.reference.as_str()).chain(extra_references.iter().copied()) {
        if !reference.is_empty() {
            writeln!(writer, "#: {reference}")?;
        }
    }
    if !entry.context.is_empty() {
        writeln!(writer, "msgctxt {}", quote(&entry.context))?;
    }
    writeln!(writer, "msgid {}", quote(&entry.id))?;
    writeln!(writer, "msgstr {}", quote(msgstr))
}

/// Group the entries of `file` by `(context, id)`, keeping the first
/// occurrence's position.
fn unique_entries<'a>(entries: &'a Entries, file: &'a str) -> Vec<(&'a Entry, Vec<&'a str>)> {
    let mut unique: Vec<(&Entry, Vec<&str>)> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    for entry in entries.in_file(file) {
        let key = (entry.context.as_str(), entry.id.as_str());
        match index.get(&key) {
            Some(&idx) => unique[idx].1.push(&entry.reference),
            None => {
                index.insert(key, unique.len());
                unique.push((entry, Vec::new()));
            }
        }
    }
    unique
}

impl Entries {
    /// Write the PO file for `file`, with the current translations.
    ///
    /// Entries sharing a context and id are written once, using the
    /// first entry's translation and listing every reference.
    pub fn write_file<W: Write>(
        &self,
        file: &str,
        header: &CatalogHeader,
        writer: &mut W,
    ) -> io::Result<()> {
        write_header(header, writer)?;
        for (entry, references) in unique_entries(self, file) {
            write_entry(entry, &references, &entry.translation, writer)?;
        }
        Ok(())
    }

    /// Write the POT file for `file`: like [`Entries::write_file`] but
    /// with empty translations.
    pub fn write_template_file<W: Write>(
        &self,
        file: &str,
        header: &CatalogHeader,
        writer: &mut W,
    ) -> io::Result<()> {
        write_header(header, writer)?;
        for (entry, references) in unique_entries(self, file) {
            write_entry(entry, &references, "", writer)?;
        }
        Ok(())
    }

    /// Render [`Entries::write_file`] to a string.
    pub fn to_po_string(&self, file: &str, header: &CatalogHeader) -> String {
        let mut buffer = Vec::new();
        // Writing to a `Vec` does not fail.
        let _ = self.write_file(file, header, &mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Render [`Entries::write_template_file`] to a string.
    pub fn to_pot_string(&self, file: &str, header: &CatalogHeader) -> String {
        let mut buffer = Vec::new();
        let _ = self.write_template_file(file, header, &mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "# Translation of i18n-resource\n\
                          #\n\
                          msgid \"\"\n\
                          msgstr \"\"\n\
                          \"Project-Id-Version: i18n-resource\\n\"\n\
                          \"Report-Msgid-Bugs-To: \\n\"\n\
                          \"POT-Creation-Date: \\n\"\n\
                          \"PO-Revision-Date: \\n\"\n\
                          \"Last-Translator: \\n\"\n\
                          \"Language-Team: \\n\"\n\
                          \"Language: \\n\"\n\
                          \"MIME-Version: 1.0\\n\"\n\
                          \"Content-Type: text/plain; charset=UTF-8\\n\"\n\
                          \"Content-Transfer-Encoding: 8bit\\n\"\n\
                          \"Plural-Forms: nplurals=2; plural=(n != 1);\\n\"\n";

    fn entry(file: &str, id: &str, translation: &str, reference: &str) -> Entry {
        Entry {
            file: String::from(file),
            context: String::from(file),
            id: String::from(id),
            original: String::from(id),
            translation: String::from(translation),
            reference: String::from(reference),
            translator_comment: String::new(),
        }
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
        assert_eq!(quote("line\nbreak\ttab"), "\"line\\nbreak\\ttab\"");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"plain\"").as_deref(), Some("plain"));
        assert_eq!(
            unquote(&quote("say \"hi\"\\\nnext\ttab")).as_deref(),
            Some("say \"hi\"\\\nnext\ttab")
        );
        assert_eq!(unquote("\"\"").as_deref(), Some(""));
        assert_eq!(unquote("\""), None);
        assert_eq!(unquote("\"open"), None);
        assert_eq!(unquote("\"dangling\\\""), None);
    }

    #[test]
    fn test_write_file() {
        let entries = Entries::from(vec![
            entry("Colors", "Red", "Красный", "/Language/Colors/RecordColor[Key='Red']/Value"),
            entry("Things", "Kit", "Набор", "/Language/Things/RecordThing[Key='Kit']/Value"),
        ]);
        assert_eq!(
            entries.to_po_string("Colors", &CatalogHeader::default()),
            format!(
                "{HEADER}\n\
                 #: /Language/Colors/RecordColor[Key='Red']/Value\n\
                 msgctxt \"Colors\"\n\
                 msgid \"Red\"\n\
                 msgstr \"Красный\"\n"
            )
        );
    }

    #[test]
    fn test_write_template_file() {
        let mut simplified = entry("Reagents", "Flour.Unit", "г", "/Language/Reagents/RecordReagent[Key='Flour']/Unit");
        simplified.original = String::from("g");
        simplified.translator_comment = String::from("Original: \"g\"");
        let entries = Entries::from(vec![simplified]);
        assert_eq!(
            entries.to_pot_string("Reagents", &CatalogHeader::default()),
            format!(
                "{HEADER}\n\
                 # Original: \"g\"\n\
                 #: /Language/Reagents/RecordReagent[Key='Flour']/Unit\n\
                 msgctxt \"Reagents\"\n\
                 msgid \"Flour.Unit\"\n\
                 msgstr \"\"\n"
            )
        );
    }

    #[test]
    fn test_duplicates_are_written_once() {
        let entries = Entries::from(vec![
            entry("Reagents", "g", "г", "/Language/Reagents/RecordReagent[Key='Flour']/Unit"),
            entry("Reagents", "g", "гр", "/Language/Reagents/RecordReagent[Key='Milk']/Unit"),
        ]);
        let po = entries.to_po_string("Reagents", &CatalogHeader::default());
        assert_eq!(po.matches("msgid \"g\"").count(), 1);
        assert!(po.contains(
            "#: /Language/Reagents/RecordReagent[Key='Flour']/Unit\n\
             #: /Language/Reagents/RecordReagent[Key='Milk']/Unit\n"
        ));
        assert!(po.contains("msgstr \"г\"\n"));
    }

    #[test]
    fn test_many_duplicates() {
        let entries = (0..2000)
            .map(|idx| {
                let id = format!("unit {}", idx % 10);
                let mut entry = entry("Reagents", &id, "", &format!("ref{idx}"));
                if idx % 20 >= 10 {
                    entry.context = String::from("Other");
                }
                entry
            })
            .collect::<Vec<_>>();
        let po = Entries::from(entries).to_po_string("Reagents", &CatalogHeader::default());
        assert_eq!(po.matches("\nmsgid \"unit ").count(), 20);
        assert_eq!(po.matches("#: ref").count(), 2000);
        let first = po.find("msgid \"unit 0\"").unwrap_or_default();
        let last = po.find("msgid \"unit 9\"").unwrap_or_default();
        assert!(first < last);
    }

    #[test]
    fn test_header_language() {
        let header = CatalogHeader {
            project_id_version: String::from("Stationeers"),
            language: String::from("ru"),
        };
        let po = Entries::new().to_po_string("Colors", &header);
        assert!(po.starts_with("# Translation of Stationeers\n"));
        assert!(po.contains("\"Language: ru\\n\"\n"));
    }
}
