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

//! Localization of XML language resources with Gettext catalogs.
//!
//! `generate` turns the English documents into catalogs per language,
//! `bake` turns translated catalogs back into language documents.

mod bake;
mod config;
mod generate;
mod sources;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use clap::{ArgAction, Parser, Subcommand};
use i18n_resource::{parse_catalog, EntryStats, Error, MergeTool, MessageStats};

use crate::bake::Bake;
use crate::config::Config;
use crate::generate::Generate;
use crate::sources::{catalog_files, extract_language, find_sources};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file, `resource-l10n.yml` by default.
    #[arg(long, global = true, value_name = "config.yml")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Copy the English documents from the game into the repository.
    #[command(alias = "u")]
    Update {
        /// Game directory with the English documents.
        #[arg(short, long, default_value = "game")]
        input: PathBuf,
        /// Repository directory receiving them, keeping relative paths.
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Generate catalogs and templates from the English documents.
    #[command(alias = "gen")]
    Generate {
        /// Directory with the language documents.
        #[arg(short, long, default_value = ".")]
        input: PathBuf,
        /// Directory receiving one catalog directory per locale.
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// Only process these languages, by name or code.
        #[arg(long, value_delimiter = ',')]
        limit: Vec<String>,
        /// Only write templates, existing catalogs are merged but not
        /// regenerated. Pass `-t false` to rewrite the catalogs from the
        /// translated documents.
        #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
        template_only: bool,
        /// Prefix of the catalog file names.
        #[arg(short, long, default_value = "")]
        prefix: String,
    },
    /// Translate the English documents with the catalogs.
    Bake {
        /// Directory with one catalog directory per locale.
        #[arg(short, long, default_value = "locales")]
        input: PathBuf,
        /// Directory with the English documents.
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// File receiving the list of written documents.
        #[arg(short, long, default_value = "assets.txt")]
        list: PathBuf,
        /// Only process these languages, by name or code.
        #[arg(long, value_delimiter = ',')]
        limit: Vec<String>,
        /// Directories to skip.
        #[arg(long, value_delimiter = ',', default_value = "game")]
        ignore: Vec<PathBuf>,
    },
    /// Merge the catalogs of a directory with their templates.
    Merge {
        /// Directory with the previous catalogs.
        #[arg(short, long, default_value = "game")]
        input: PathBuf,
        /// Directory with the templates, receiving the merged catalogs.
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Compare the translated documents of two directories.
    Diff {
        /// Directory with the English and the reference documents.
        #[arg(short, long, default_value = ".")]
        original: PathBuf,
        /// Directory with the documents to compare.
        #[arg(short, long, default_value = ".")]
        modified: PathBuf,
        /// Only process these languages, by name or code.
        #[arg(long, value_delimiter = ',')]
        limit: Vec<String>,
    },
    /// Show the translation status of catalogs.
    Status {
        #[arg(id = "catalog.po", required = true)]
        catalogs: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let cli = Cli::parse();

    match cli.command {
        Command::Update { input, output } => {
            let copied = update(&input, &output)?;
            log::info!("Copied {copied} documents");
        }
        Command::Generate {
            input,
            output,
            limit,
            template_only,
            prefix,
        } => {
            let config = Config::load(cli.config.as_deref())?;
            Generate {
                input: &input,
                output: &output,
                limit: &limit,
                template_only,
                prefix: &prefix,
                merge_tool: &MergeTool::default(),
            }
            .run(&config)?;
        }
        Command::Bake {
            input,
            output,
            list,
            limit,
            ignore,
        } => {
            let config = Config::load(cli.config.as_deref())?;
            Bake {
                input: &input,
                output: &output,
                list: &list,
                limit: &limit,
                ignore: &ignore,
            }
            .run(&config)?;
        }
        Command::Merge { input, output } => {
            merge(&input, &output, &MergeTool::default())?;
        }
        Command::Diff {
            original,
            modified,
            limit,
        } => {
            let config = Config::load(cli.config.as_deref())?;
            diff(&config, &original, &modified, &limit)?;
        }
        Command::Status { catalogs } => {
            status(&catalogs)?;
        }
    }

    Ok(())
}

/// Merge every catalog below `output` with its sibling template,
/// starting from the catalog at the same relative path below `input`.
///
/// Returns the number of merged catalogs.
fn merge(input: &Path, output: &Path, tool: &MergeTool) -> anyhow::Result<usize> {
    let mut merged = 0;
    for path in catalog_files(output)? {
        let relative = path.strip_prefix(output)?;
        let existing = input.join(relative);
        let template = path.with_extension("pot");
        if !template.is_file() {
            log::warn!("Skipping {}: no template", path.display());
            continue;
        }
        log::info!("Merging {} into {}", existing.display(), path.display());
        match tool.merge(&existing, &path, &template) {
            Ok(()) => merged += 1,
            Err(err @ Error::Subprocess { .. }) => log::warn!("{err}"),
            Err(err) => {
                return Err(err).with_context(|| format!("Could not merge {}", path.display()))
            }
        }
    }
    Ok(merged)
}

/// Copy every `english*.xml` document below `input` to the same
/// relative path below `output`.
///
/// Returns the number of copied documents.
fn update(input: &Path, output: &Path) -> anyhow::Result<usize> {
    let sources = find_sources(input, true, &[])?;
    if sources.is_empty() {
        bail!("No source documents found in {}", input.display());
    }
    if fs::canonicalize(input).ok() == fs::canonicalize(output).ok() {
        bail!("{} is both input and output", input.display());
    }
    for source in &sources {
        let from = source.source_path(input);
        let to = source.source_path(output);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }
        fs::copy(&from, &to)
            .with_context(|| format!("Could not copy {} to {}", from.display(), to.display()))?;
        log::info!("{} -> {}", from.display(), to.display());
    }
    Ok(sources.len())
}

/// Entry stats of every selected language, extracted from the
/// translated documents of `original` and of `modified`.
fn diff_stats(
    config: &Config,
    original: &Path,
    modified: &Path,
    limit: &[String],
) -> anyhow::Result<Vec<(String, EntryStats, EntryStats)>> {
    let sources = find_sources(original, true, &[])?;
    if sources.is_empty() {
        bail!("No source documents found in {}", original.display());
    }
    let simplified = config.simplified();
    let mut stats = Vec::new();
    for language in config.selected(limit) {
        let reference = extract_language(&sources, original, original, language, &simplified)?;
        let compared = extract_language(&sources, original, modified, language, &simplified)?;
        stats.push((language.name.clone(), reference.stats(), compared.stats()));
    }
    Ok(stats)
}

/// Prints how many entries differ from the English text in each
/// directory.
#[allow(clippy::print_stdout)]
fn diff(
    config: &Config,
    original: &Path,
    modified: &Path,
    limit: &[String],
) -> anyhow::Result<()> {
    let stats = diff_stats(config, original, modified, limit)?;
    println!("Counts are \"translated / total, different from the original\"");
    for (name, reference, compared) in stats {
        println!("{name}:");
        println!("  original {reference}");
        println!("  modified {compared}");
    }
    Ok(())
}

fn catalog_stats(path: &Path) -> anyhow::Result<MessageStats> {
    let data = fs::read(path).with_context(|| format!("Could not read {}", path.display()))?;
    let catalog = parse_catalog(&path.display().to_string(), &data)
        .with_context(|| format!("Could not parse {}", path.display()))?;
    Ok(MessageStats::for_catalog(&catalog))
}

/// Prints the message stats of each catalog.
#[allow(clippy::print_stdout)]
fn status(catalogs: &[PathBuf]) -> anyhow::Result<()> {
    println!("Counts are \"translated (fuzzy, fuzzy untranslated) / total\"");
    for path in catalogs {
        println!("{}: {}", path.display(), catalog_stats(path)?);
    }
    Ok(())
}
