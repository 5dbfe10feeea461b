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

//! The `bake` command: catalogs to translated language documents.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use i18n_resource::{bake, BakeOptions};

use crate::config::{Config, Language};
use crate::sources::{catalog_files, find_sources, SourceFile};

pub struct Bake<'a> {
    /// Directory with one catalog directory per locale.
    pub input: &'a Path,
    /// Directory searched for source documents. Translated documents
    /// are written next to them.
    pub output: &'a Path,
    /// File listing every written document, relative to `output`
    /// unless absolute.
    pub list: &'a Path,
    pub limit: &'a [String],
    pub ignore: &'a [PathBuf],
}

impl Bake<'_> {
    pub fn run(&self, config: &Config) -> anyhow::Result<()> {
        let sources = find_sources(self.output, true, self.ignore)?;
        if sources.is_empty() {
            bail!("No source documents found in {}", self.output.display());
        }
        log::info!("Sources: {}", sources.len());

        let list = self.output.join(self.list);
        let list_file =
            File::create(&list).with_context(|| format!("Could not create {}", list.display()))?;
        let mut assets = BufWriter::new(list_file);

        for language in config.selected(self.limit) {
            if language.is_source() {
                log::info!("Skipping {}, it is the source language", language.name);
                continue;
            }
            for written in self.bake_language(config, language, &sources)? {
                writeln!(assets, "{}", written.display())
                    .with_context(|| format!("Could not write {}", list.display()))?;
            }
        }
        assets
            .flush()
            .with_context(|| format!("Could not write {}", list.display()))
    }

    /// Bake every source document for `language`, returning the paths
    /// written.
    fn bake_language(
        &self,
        config: &Config,
        language: &Language,
        sources: &[SourceFile],
    ) -> anyhow::Result<Vec<PathBuf>> {
        log::info!("{} ({})", language.name, language.code);
        let locale_dir = self.input.join(language.locale());
        let mut catalogs = Vec::new();
        for path in catalog_files(&locale_dir)? {
            let catalog =
                fs::read(&path).with_context(|| format!("Could not read {}", path.display()))?;
            catalogs.push(catalog);
        }
        if catalogs.is_empty() {
            bail!("No catalogs found in {}", locale_dir.display());
        }

        let simplified = config.simplified();
        let font = language.font();
        let mut written = Vec::new();
        for source in sources {
            let named = config.is_named(&source.postfix);
            let options = BakeOptions {
                code: &language.code,
                name: if named { language.name.as_str() } else { "" },
                font: if named { font.as_str() } else { "" },
                simplified: &simplified,
            };
            let source_path = source.source_path(self.output);
            let original = fs::read(&source_path)
                .with_context(|| format!("Could not read {}", source_path.display()))?;
            let translated = bake(&original, &catalogs, &options)
                .with_context(|| format!("Could not bake {}", source_path.display()))?;
            let output = source.translated_path(self.output, language);
            fs::write(&output, translated)
                .with_context(|| format!("Could not write {}", output.display()))?;
            log::info!("  {}", output.display());
            written.push(output);
        }
        Ok(written)
    }
}
