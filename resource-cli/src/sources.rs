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

//! Discovery of language documents on disk.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use i18n_resource::{extract, Entries, Simplified};
use walkdir::WalkDir;

use crate::config::{Language, SOURCE_PREFIX};

/// Postfix of the main language document, `english.xml`.
pub const MAIN_POSTFIX: &str = ".xml";

/// A source language document, such as
/// `Scenarios/Mars/english_mars_mission.xml`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    /// Directory relative to the searched root.
    pub dir: PathBuf,
    /// File name after the language prefix, `_mars_mission.xml`.
    pub postfix: String,
}

impl SourceFile {
    pub fn source_path(&self, root: &Path) -> PathBuf {
        root.join(&self.dir)
            .join(format!("{SOURCE_PREFIX}{}", self.postfix))
    }

    pub fn translated_path(&self, root: &Path, language: &Language) -> PathBuf {
        root.join(&self.dir)
            .join(format!("{}{}", language.prefix(), self.postfix))
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.dir
                .join(format!("{SOURCE_PREFIX}{}", self.postfix))
                .display()
        )
    }
}

/// Find the `english*.xml` documents below `root`, sorted by path.
///
/// With `recursive` unset only `root` itself is searched. Directories
/// listed in `ignore`, either relative to `root` or as given, are
/// skipped.
pub fn find_sources(
    root: &Path,
    recursive: bool,
    ignore: &[PathBuf],
) -> anyhow::Result<Vec<SourceFile>> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let skip = entry.file_type().is_dir()
                && entry.depth() > 0
                && ignore.iter().any(|ignored| {
                    entry.path() == ignored || entry.path() == root.join(ignored)
                });
            if skip {
                log::info!("Skipping {}", entry.path().display());
            }
            !skip
        });

    let mut sources = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Could not walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        let Some(postfix) = name.strip_prefix(SOURCE_PREFIX) else {
            continue;
        };
        if !postfix.ends_with(".xml") {
            continue;
        }
        let dir = entry
            .path()
            .parent()
            .and_then(|parent| parent.strip_prefix(root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        sources.push(SourceFile {
            dir,
            postfix: String::from(postfix),
        });
    }
    Ok(sources)
}

/// Read the translated document at `path`.
///
/// Only the main document must exist: a missing secondary document
/// gives `None`.
pub fn read_translation(path: &Path, postfix: &str) -> anyhow::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(err) if err.kind() == ErrorKind::NotFound && postfix != MAIN_POSTFIX => {
            log::debug!("No translation at {}", path.display());
            Ok(None)
        }
        Err(err) => Err(err).with_context(|| format!("Could not read {}", path.display())),
    }
}

/// Extract the entries of `language` for every source document.
///
/// Source documents are read from `source_root` and translated
/// documents from `translated_root`.
pub fn extract_language(
    sources: &[SourceFile],
    source_root: &Path,
    translated_root: &Path,
    language: &Language,
    simplified: &Simplified,
) -> anyhow::Result<Entries> {
    let mut entries = Entries::new();
    for source in sources {
        let source_path = source.source_path(source_root);
        let original = fs::read(&source_path)
            .with_context(|| format!("Could not read {}", source_path.display()))?;
        let translated_path = source.translated_path(translated_root, language);
        let translated = read_translation(&translated_path, &source.postfix)?;
        let extracted = extract(&original, translated.as_deref(), simplified)
            .with_context(|| format!("Could not extract {}", source_path.display()))?;
        entries.extend(extracted);
    }
    Ok(entries)
}

/// Every `.po` file below `dir`, sorted by path.
pub fn catalog_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Could not walk {}", dir.display()))?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "po") {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn touch(root: &Path, path: &str) -> anyhow::Result<()> {
        let path = root.join(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, "<Language/>")?;
        Ok(())
    }

    fn source(dir: &str, postfix: &str) -> SourceFile {
        SourceFile {
            dir: PathBuf::from(dir),
            postfix: String::from(postfix),
        }
    }

    #[test]
    fn test_find_sources() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        touch(dir.path(), "english.xml")?;
        touch(dir.path(), "english_tutorial.xml")?;
        touch(dir.path(), "russian.xml")?;
        touch(dir.path(), "english.txt")?;
        touch(dir.path(), "Scenarios/Mars/english_mars_mission.xml")?;
        touch(dir.path(), "game/english.xml")?;

        assert_eq!(
            find_sources(dir.path(), false, &[])?,
            vec![source("", ".xml"), source("", "_tutorial.xml")]
        );
        assert_eq!(
            find_sources(dir.path(), true, &[PathBuf::from("game")])?,
            vec![
                source("Scenarios/Mars", "_mars_mission.xml"),
                source("", ".xml"),
                source("", "_tutorial.xml"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_source_paths() -> anyhow::Result<()> {
        let language: Language =
            serde_yaml::from_str("code: CN\nname: Simplified Chinese\n")?;
        let source = source("Scenarios", "_tutorial.xml");
        assert_eq!(
            source.translated_path(Path::new("out"), &language),
            Path::new("out/Scenarios/simplified_chinese_tutorial.xml")
        );
        assert_eq!(source.to_string(), "Scenarios/english_tutorial.xml");
        Ok(())
    }

    #[test]
    fn test_read_translation() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("russian_tutorial.xml");
        assert_eq!(read_translation(&missing, "_tutorial.xml")?, None);
        assert!(read_translation(&missing, MAIN_POSTFIX).is_err());
        Ok(())
    }

    #[test]
    fn test_catalog_files() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        touch(dir.path(), "ru/Colors.po")?;
        touch(dir.path(), "ru/Colors.pot")?;
        touch(dir.path(), "ru/nested/Things.po")?;
        assert_eq!(
            catalog_files(&dir.path().join("ru"))?,
            vec![
                dir.path().join("ru/Colors.po"),
                dir.path().join("ru/nested/Things.po"),
            ]
        );
        Ok(())
    }
}
