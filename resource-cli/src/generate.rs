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

//! The `generate` command: language documents to catalogs.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context as _};
use i18n_resource::{CatalogHeader, Entries, Error, MergeTool};

use crate::config::Config;
use crate::sources::{extract_language, find_sources};

pub struct Generate<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub limit: &'a [String],
    /// Only write templates, keeping existing catalogs.
    pub template_only: bool,
    /// Prefix of the catalog file names.
    pub prefix: &'a str,
    pub merge_tool: &'a MergeTool,
}

impl Generate<'_> {
    pub fn run(&self, config: &Config) -> anyhow::Result<()> {
        let sources = find_sources(self.input, false, &[])?;
        if sources.is_empty() {
            bail!("No source documents found in {}", self.input.display());
        }
        log::info!(
            "Sources: {}",
            sources
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let simplified = config.simplified();
        for language in config.selected(self.limit) {
            log::info!(
                "{} (prefix {}, code {}, locale {})",
                language.name,
                language.prefix(),
                language.code,
                language.locale()
            );
            let entries =
                extract_language(&sources, self.input, self.input, language, &simplified)?;
            log::info!("  {}", entries.stats());

            let target = self.output.join(language.locale());
            fs::create_dir_all(&target)
                .with_context(|| format!("Could not create {}", target.display()))?;
            let header = CatalogHeader {
                language: language.locale(),
                ..CatalogHeader::default()
            };
            for file in entries.files() {
                self.write_catalogs(&entries, file, &header, &target)?;
            }
        }
        Ok(())
    }

    fn write_catalogs(
        &self,
        entries: &Entries,
        file: &str,
        header: &CatalogHeader,
        target: &Path,
    ) -> anyhow::Result<()> {
        let catalog = target.join(format!("{}{file}.po", self.prefix));
        let template = target.join(format!("{}{file}.pot", self.prefix));

        if !self.template_only || !catalog.exists() {
            write_with(&catalog, |writer| entries.write_file(file, header, writer))?;
        }
        write_with(&template, |writer| {
            entries.write_template_file(file, header, writer)
        })?;

        match self.merge_tool.merge(&catalog, &catalog, &template) {
            Ok(()) => Ok(()),
            Err(err @ Error::Subprocess { .. }) => {
                log::warn!("{err}");
                Ok(())
            }
            Err(err) => {
                Err(err).with_context(|| format!("Could not merge {}", catalog.display()))
            }
        }
    }
}

fn write_with<F>(path: &Path, write: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path).with_context(|| format!("Could not create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Could not write {}", path.display()))
}
