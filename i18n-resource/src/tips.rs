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

//! Extraction of free-text tips.
//!
//! Tips have no key. A tip is recognized across document versions by
//! the placeholders it embeds, such as `{KEY:InventorySelect}`: two tips
//! are the same tip when their placeholder sequences are equal, even if
//! the surrounding prose differs.

use std::sync::OnceLock;

use regex::Regex;
use xmltree::Element;

use crate::entry::{Entries, Entry};
use crate::identity::tip_id;
use crate::tree;

/// Tag of the section holding tips.
pub const TIP_SECTION: &str = "GameTip";
/// File name used for tip entries.
pub const TIP_FILE: &str = "Tips";

/// A `{Type:Name}` placeholder embedded in a tip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TipReference {
    pub kind: String,
    pub name: String,
}

/// Parse the placeholders of `text`, in order.
///
/// Parsing stops at the first braced text without a `:`.
pub fn parse_references(text: &str) -> Vec<TipReference> {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let placeholder = PLACEHOLDER.get_or_init(|| Regex::new(r"\{([^{}]*)\}").unwrap());

    let mut references = Vec::new();
    for captures in placeholder.captures_iter(text) {
        let Some((kind, name)) = captures[1].split_once(':') else {
            break;
        };
        references.push(TipReference {
            kind: String::from(kind),
            name: String::from(name),
        });
    }
    references
}

/// Whether `language` contains a non-empty tip section.
pub fn has_tips(language: &Element) -> bool {
    language
        .get_child(TIP_SECTION)
        .is_some_and(|section| tree::child_elements(section).next().is_some())
}

#[derive(Debug)]
struct Tip {
    text: String,
    references: Vec<TipReference>,
    reference: String,
}

fn collect_tips(language: &Element) -> Vec<Tip> {
    let mut tips = Vec::new();
    for section in tree::sections(language) {
        for (idx, tip) in tree::child_elements(section).enumerate() {
            let text = tree::text(tip);
            tips.push(Tip {
                references: parse_references(&text),
                reference: format!(
                    "/{}/{}/{}[{}]",
                    tree::LANGUAGE,
                    section.name,
                    tip.name,
                    idx + 1
                ),
                text,
            });
        }
    }
    tips
}

/// Pair every tip of `source` with a tip of `prior`.
///
/// Each source tip, in document order, takes the first prior tip with
/// an equal placeholder sequence that no earlier source tip has taken.
/// Tips without placeholders therefore pair up with placeholder-free
/// prior tips in document order. When several tips share a sequence,
/// the pairing follows document order and may be wrong; this cannot be
/// resolved without a key.
///
/// Returns, for each source tip, the index of its prior tip.
fn match_tips(source: &[Tip], prior: &[Tip]) -> Vec<Option<usize>> {
    let mut taken = vec![false; prior.len()];
    source
        .iter()
        .map(|tip| {
            let idx = (0..prior.len())
                .find(|&idx| !taken[idx] && prior[idx].references == tip.references)?;
            taken[idx] = true;
            Some(idx)
        })
        .collect()
}

/// Build the entries for a document with a tip section.
///
/// The text of a tip is its message id.
pub fn extract_tips(language: &Element, prior_language: Option<&Element>) -> Entries {
    let source = collect_tips(language);
    let prior = prior_language.map(collect_tips).unwrap_or_default();
    let matches = match_tips(&source, &prior);

    let mut entries = Entries::new();
    for (tip, matched) in source.into_iter().zip(matches) {
        let id = tip_id(&tip.text);
        entries.push(Entry {
            file: String::from(TIP_FILE),
            context: String::new(),
            original: id.clone(),
            id,
            translation: matched
                .map(|idx| prior[idx].text.clone())
                .unwrap_or_default(),
            reference: tip.reference,
            translator_comment: String::new(),
        });
    }
    entries.sort();
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reference(kind: &str, name: &str) -> TipReference {
        TipReference {
            kind: String::from(kind),
            name: String::from(name),
        }
    }

    fn document(tips: &[&str]) -> Element {
        let mut xml = String::from("<Language><Code>EN</Code><GameTip>");
        for tip in tips {
            xml.push_str(&format!("<RecordTip>{tip}</RecordTip>"));
        }
        xml.push_str("</GameTip></Language>");
        tree::parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_references() {
        assert_eq!(
            parse_references("Press {KEY:InventorySelect} to open {THING:ItemKit}."),
            vec![
                reference("KEY", "InventorySelect"),
                reference("THING", "ItemKit")
            ]
        );
    }

    #[test]
    fn test_parse_references_none() {
        assert_eq!(parse_references("Plain text"), Vec::<TipReference>::new());
    }

    #[test]
    fn test_parse_references_stops_at_malformed() {
        assert_eq!(
            parse_references("{KEY:Jump} then {oops} and {KEY:Crouch}"),
            vec![reference("KEY", "Jump")]
        );
    }

    #[test]
    fn test_has_tips() {
        assert!(has_tips(&document(&["A tip"])));
        assert!(!has_tips(&document(&[])));
    }

    #[test]
    fn test_tips_match_by_placeholders() {
        let english = document(&[
            "Press {KEY:Jump} to jump.",
            "Use {KEY:Crouch} to crouch.",
        ]);
        let russian = document(&[
            "Нажмите {KEY:Crouch}, чтобы присесть.",
            "Нажмите {KEY:Jump}, чтобы прыгнуть.",
        ]);
        let entries = extract_tips(&english, Some(&russian));
        assert_eq!(
            entries
                .iter()
                .map(|e| (e.id.as_str(), e.translation.as_str()))
                .collect::<Vec<_>>(),
            &[
                ("Press {KEY:Jump} to jump.", "Нажмите {KEY:Jump}, чтобы прыгнуть."),
                ("Use {KEY:Crouch} to crouch.", "Нажмите {KEY:Crouch}, чтобы присесть."),
            ]
        );
        assert!(entries.iter().all(|e| e.file == TIP_FILE));
        assert!(entries.iter().all(|e| e.id == e.original));
    }

    #[test]
    fn test_tips_without_placeholders_match_in_order() {
        let english = document(&["First", "Second", "Third {KEY:Jump}"]);
        let russian = document(&["Первый", "Второй"]);
        let entries = extract_tips(&english, Some(&russian));
        assert_eq!(
            entries
                .iter()
                .map(|e| (e.id.as_str(), e.translation.as_str()))
                .collect::<Vec<_>>(),
            &[
                ("First", "Первый"),
                ("Second", "Второй"),
                ("Third {KEY:Jump}", ""),
            ]
        );
    }

    #[test]
    fn test_tips_prior_used_once() {
        let english = document(&["A {KEY:Jump}", "B {KEY:Jump}"]);
        let russian = document(&["А {KEY:Jump}"]);
        let entries = extract_tips(&english, Some(&russian));
        assert_eq!(
            entries
                .iter()
                .map(|e| e.translation.as_str())
                .collect::<Vec<_>>(),
            &["А {KEY:Jump}", ""]
        );
    }

    #[test]
    fn test_tips_reference_locates_element() {
        let entries = extract_tips(&document(&["Only tip"]), None);
        assert_eq!(entries[0].reference, "/Language/GameTip/RecordTip[1]");
        assert_eq!(entries[0].translation, "");
    }
}
