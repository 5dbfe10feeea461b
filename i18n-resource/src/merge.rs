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

//! Updating translated catalogs from a regenerated template.
//!
//! The structural merge is left to `msgmerge`. Its fuzzy matching
//! guesses translations for entries whose source text changed; when the
//! previous catalog has an entry with the same reference, the guess is
//! replaced by the translation the translator wrote for that reference.
//! The work is done on the text, block by block, so that untouched
//! entries keep their exact formatting.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// The external program used for the structural merge.
///
/// It is invoked as `<program> <leading args> -U --no-wrap --backup=off
/// <catalog> <template>` and must update `<catalog>` in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeTool {
    pub program: OsString,
    pub leading_args: Vec<OsString>,
}

impl Default for MergeTool {
    fn default() -> Self {
        Self::new("msgmerge")
    }
}

impl MergeTool {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Merge `template` into the catalog at `existing` and write the
    /// result to `output`, which may be the same path.
    ///
    /// Nothing is written if an input cannot be read or the merge tool
    /// fails.
    pub fn merge(&self, existing: &Path, output: &Path, template: &Path) -> Result<()> {
        let original = fs::read_to_string(existing)?;
        fs::metadata(template)?;

        let directory = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut catalog = tempfile::Builder::new()
            .prefix(".merge-")
            .suffix(".po")
            .tempfile_in(directory)?;
        catalog.write_all(original.as_bytes())?;
        catalog.flush()?;

        self.run(catalog.path(), template, existing)?;

        let merged = fs::read_to_string(catalog.path())?;
        fs::write(output, merge_catalogs(&original, &merged))?;
        Ok(())
    }

    fn run(&self, catalog: &Path, template: &Path, name: &Path) -> Result<()> {
        log::debug!(
            "Running {:?} on {} with {}",
            self.program,
            name.display(),
            template.display()
        );
        let result = Command::new(&self.program)
            .args(&self.leading_args)
            .args(["-U", "--no-wrap", "--backup=off"])
            .arg(catalog)
            .arg(template)
            .output();
        let output = result.map_err(|err| Error::Subprocess {
            catalog: name.display().to_string(),
            reason: format!("could not run {:?}: {err}", self.program),
            output: String::new(),
        })?;
        if output.status.success() {
            return Ok(());
        }
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(Error::Subprocess {
            catalog: name.display().to_string(),
            reason: format!("{:?} exited with {}", self.program, output.status),
            output: combined,
        })
    }
}

/// Merge with the default [`MergeTool`].
pub fn merge(existing: &Path, output: &Path, template: &Path) -> Result<()> {
    MergeTool::default().merge(existing, output, template)
}

/// Blank line separated groups of lines. Lines keep their terminators.
fn blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut block = Vec::new();
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            if !block.is_empty() {
                blocks.push(std::mem::take(&mut block));
            }
        } else {
            block.push(line);
        }
    }
    if !block.is_empty() {
        blocks.push(block);
    }
    blocks
}

/// The value of the last `#:` line of `block`.
fn block_reference<'a>(block: &[&'a str]) -> Option<&'a str> {
    block
        .iter()
        .rev()
        .find_map(|line| line.strip_prefix("#:"))
        .map(str::trim)
}

fn is_fuzzy(block: &[&str]) -> bool {
    block.iter().any(|line| {
        line.strip_prefix("#,")
            .is_some_and(|flags| flags.split(',').any(|flag| flag.trim() == "fuzzy"))
    })
}

fn msgstr_start(block: &[&str]) -> Option<usize> {
    block.iter().position(|line| line.starts_with("msgstr"))
}

/// Restore translations that `msgmerge` replaced with fuzzy guesses.
///
/// `original` is the catalog before the merge and `merged` the output of
/// `msgmerge`. Every fuzzy block of `merged` whose reference also
/// appears in `original` gets the `msgstr` lines of the original block.
/// The fuzzy flag is kept so the entry is still reviewed. All other
/// lines are passed through byte for byte, line endings included.
pub fn merge_catalogs(original: &str, merged: &str) -> String {
    let mut translations: HashMap<&str, Vec<&str>> = HashMap::new();
    for block in blocks(original) {
        let (Some(reference), Some(start)) = (block_reference(&block), msgstr_start(&block)) else {
            continue;
        };
        translations.insert(reference, block[start..].to_vec());
    }

    let mut result = String::with_capacity(merged.len());
    let mut block: Vec<&str> = Vec::new();
    for line in merged.split_inclusive('\n') {
        if line.trim().is_empty() {
            push_block(&mut result, &block, &translations);
            block.clear();
            result.push_str(line);
        } else {
            block.push(line);
        }
    }
    push_block(&mut result, &block, &translations);
    result
}

fn push_block(result: &mut String, block: &[&str], translations: &HashMap<&str, Vec<&str>>) {
    let restored = if is_fuzzy(block) {
        block_reference(block)
            .and_then(|reference| translations.get(reference))
            .zip(msgstr_start(block))
    } else {
        None
    };
    match restored {
        Some((msgstr, start)) => {
            result.extend(block[..start].iter().copied());
            for line in msgstr {
                result.push_str(line);
                if !line.ends_with('\n') {
                    result.push('\n');
                }
            }
        }
        None => result.extend(block.iter().copied()),
    }
}
