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

//! The YAML configuration of the tool.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context as _};
use i18n_resource::Simplified;
use serde::Deserialize;

/// Used when no configuration file is given or found.
const DEFAULT_CONFIG: &str = include_str!("../config/default.yml");

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "resource-l10n.yml";

/// Code of the source language.
pub const SOURCE_CODE: &str = "EN";

/// File name prefix of the source language documents.
pub const SOURCE_PREFIX: &str = "english";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Language {
    pub code: String,
    pub name: String,
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    locale: Option<String>,
    #[serde(default)]
    font: Option<String>,
}

impl Language {
    /// File name prefix of the language documents, `russian` in
    /// `russian_tutorial.xml`.
    pub fn prefix(&self) -> String {
        match &self.prefix {
            Some(prefix) if !prefix.is_empty() => prefix.clone(),
            _ => self.name.replace(' ', "_").to_lowercase(),
        }
    }

    /// Name of the catalog directory.
    pub fn locale(&self) -> String {
        match &self.locale {
            Some(locale) if !locale.is_empty() => locale.clone(),
            _ => self.code.to_lowercase(),
        }
    }

    /// Font written to baked documents, empty if none is configured.
    pub fn font(&self) -> String {
        match &self.font {
            Some(font) if !font.is_empty() => format!("font_{font}"),
            _ => String::new(),
        }
    }

    pub fn is_source(&self) -> bool {
        self.code == SOURCE_CODE
    }

    /// Whether the language is selected by `limit`, a list of names or
    /// codes. An empty list selects every language.
    pub fn is_selected(&self, limit: &[String]) -> bool {
        limit.is_empty()
            || limit.iter().any(|selected| {
                selected.eq_ignore_ascii_case(&self.name) || selected.eq_ignore_ascii_case(&self.code)
            })
    }
}

fn default_named_files() -> Vec<String> {
    [".xml", "_tutorial.xml", "_mars_mission.xml"]
        .map(String::from)
        .to_vec()
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub languages: Vec<Language>,
    /// Sections and `Section.Field` pairs using location based ids.
    #[serde(default)]
    pub simplified: Vec<String>,
    /// Postfixes of the documents which keep their Name and Font.
    #[serde(default = "default_named_files")]
    pub named_files: Vec<String>,
}

impl Config {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(text)?;
        let sources = config
            .languages
            .iter()
            .filter(|language| language.is_source())
            .count();
        if sources != 1 {
            bail!("Expected exactly one language with code {SOURCE_CODE}, found {sources}");
        }
        Ok(config)
    }

    /// Load `path`, or `resource-l10n.yml` in the working directory, or
    /// the built-in configuration.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(CONFIG_FILE).is_file() => Path::new(CONFIG_FILE),
            None => {
                log::debug!("Using the built-in configuration");
                return Self::parse(DEFAULT_CONFIG);
            }
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    pub fn simplified(&self) -> Simplified {
        Simplified::new(self.simplified.iter().cloned())
    }

    /// The languages selected by `limit`, see [`Language::is_selected`].
    pub fn selected<'a>(&'a self, limit: &'a [String]) -> impl Iterator<Item = &'a Language> {
        self.languages
            .iter()
            .filter(move |language| language.is_selected(limit))
    }

    /// Whether documents with this postfix have their own Name and Font.
    pub fn is_named(&self, postfix: &str) -> bool {
        self.named_files.iter().any(|named| named == postfix)
    }
}
