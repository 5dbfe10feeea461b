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

use polib::catalog::Catalog;
use std::fmt::{self, Display, Formatter};

use crate::entry::Entries;

impl Entries {
    /// Number of entries with a translation.
    pub fn translated_count(&self) -> usize {
        self.iter()
            .filter(|entry| !entry.translation.is_empty())
            .count()
    }

    /// Number of translated entries whose translation differs from the
    /// source text.
    pub fn different_from_original(&self) -> usize {
        self.iter()
            .filter(|entry| !entry.translation.is_empty() && entry.translation != entry.original)
            .count()
    }

    pub fn stats(&self) -> EntryStats {
        EntryStats {
            total: self.len(),
            translated: self.translated_count(),
            different: self.different_from_original(),
        }
    }
}

/// Translation progress of extracted entries.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EntryStats {
    pub total: usize,
    pub translated: usize,
    /// Translated entries whose translation is not the source text.
    pub different: usize,
}

impl Display for EntryStats {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{} / {} translated, {} different from the original",
            self.translated, self.total, self.different
        )
    }
}

/// Counts of translation message statuses.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MessageStats {
    pub language: String,
    pub non_translated_count: u32,
    pub translated_count: u32,
    pub fuzzy_non_translated_count: u32,
    pub fuzzy_translated_count: u32,
}

impl MessageStats {
    /// Returns the total number of messages.
    pub fn total(&self) -> u32 {
        self.non_translated_count
            + self.translated_count
            + self.fuzzy_non_translated_count
            + self.fuzzy_translated_count
    }

    /// Percentage of messages translated and not fuzzy.
    pub fn translated_percent(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => 100.0 * f64::from(self.translated_count) / f64::from(total),
        }
    }

    /// Returns counts of messages statuses in the given catalog.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let mut stats = Self {
            language: catalog.metadata.language.clone(),
            ..Self::default()
        };
        for message in catalog.messages() {
            if message.is_translated() {
                if message.is_fuzzy() {
                    stats.fuzzy_translated_count += 1;
                } else {
                    stats.translated_count += 1;
                }
            } else if message.is_fuzzy() {
                stats.fuzzy_non_translated_count += 1;
            } else {
                stats.non_translated_count += 1;
            }
        }
        stats
    }
}

impl Display for MessageStats {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}, {}) / {}, {:.1}% done",
            self.language,
            self.translated_count,
            self.fuzzy_translated_count,
            self.fuzzy_non_translated_count,
            self.total(),
            self.translated_percent(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use crate::catalog::parse_catalog;
    use pretty_assertions::assert_eq;

    fn entry(original: &str, translation: &str) -> Entry {
        Entry {
            file: String::from("Colors"),
            id: String::from(original),
            original: String::from(original),
            translation: String::from(translation),
            ..Entry::default()
        }
    }

    #[test]
    fn test_entry_stats() {
        let entries = Entries::from(vec![
            entry("Red", "Красный"),
            entry("Blue", "Blue"),
            entry("Green", ""),
        ]);
        assert_eq!(entries.translated_count(), 2);
        assert_eq!(entries.different_from_original(), 1);
        assert_eq!(
            entries.stats().to_string(),
            "2 / 3 translated, 1 different from the original"
        );
    }

    #[test]
    fn test_message_stats() -> anyhow::Result<()> {
        let catalog = parse_catalog(
            "ru.po",
            r#"msgid ""
msgstr ""
"Language: ru\n"
"Content-Type: text/plain; charset=UTF-8\n"

msgid "Red"
msgstr "Красный"

#, fuzzy
msgid "Dark red"
msgstr "Красный"

msgid "Blue"
msgstr ""

msgid "Green"
msgstr "Зелёный"
"#
            .as_bytes(),
        )?;
        let stats = MessageStats::for_catalog(&catalog);
        assert_eq!(
            stats,
            MessageStats {
                language: String::from("ru"),
                non_translated_count: 1,
                translated_count: 2,
                fuzzy_non_translated_count: 0,
                fuzzy_translated_count: 1,
            }
        );
        assert_eq!(stats.to_string(), "ru: 2 (1, 0) / 4, 50.0% done");
        Ok(())
    }

    #[test]
    fn test_empty_catalog_percent() {
        assert_eq!(MessageStats::default().translated_percent(), 0.0);
    }
}
