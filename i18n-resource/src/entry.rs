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

//! The format independent representation of a translatable unit.

use std::collections::HashSet;
use std::ops::Deref;

/// Stands for "the field is present but empty".
///
/// This distinguishes an intentionally blank field from a field which
/// has not been translated yet.
pub const BLANK: &str = "{BLANK}";

/// One translatable unit extracted from a language file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entry {
    /// Section the entry belongs to. Catalogs are split per file.
    pub file: String,
    /// Disambiguating `msgctxt`, empty when not needed.
    pub context: String,
    /// The `msgid` used for catalog lookups.
    pub id: String,
    /// Source language text, [`BLANK`] for empty fields.
    pub original: String,
    /// Previous translation, empty if there is none yet.
    pub translation: String,
    /// Location of the element in the source document.
    pub reference: String,
    /// Set when `id` differs from `original`.
    pub translator_comment: String,
}

/// An ordered list of entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entries(Vec<Entry>);

impl Entries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: Entry) {
        self.0.push(entry);
    }

    /// Sort by `(file, id)`.
    ///
    /// The sort is stable: entries with equal keys keep their document
    /// order, so regenerating catalogs from the same input produces the
    /// same output.
    pub fn sort(&mut self) {
        self.0
            .sort_by(|a, b| (&a.file, &a.id).cmp(&(&b.file, &b.id)));
    }

    /// Distinct file names in entry order.
    pub fn files(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut files: Vec<&str> = Vec::new();
        for entry in &self.0 {
            if seen.insert(entry.file.as_str()) {
                files.push(&entry.file);
            }
        }
        files
    }

    /// Entries belonging to `file`.
    pub fn in_file<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a Entry> + 'a {
        self.0.iter().filter(move |entry| entry.file == file)
    }

    pub fn into_inner(self) -> Vec<Entry> {
        self.0
    }
}

impl Deref for Entries {
    type Target = [Entry];

    fn deref(&self) -> &[Entry] {
        &self.0
    }
}

impl From<Vec<Entry>> for Entries {
    fn from(entries: Vec<Entry>) -> Self {
        Self(entries)
    }
}

impl Extend<Entry> for Entries {
    fn extend<T: IntoIterator<Item = Entry>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Entries {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Entries {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
