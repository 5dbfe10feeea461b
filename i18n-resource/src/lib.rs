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

//! Helpers for translating XML language resources with Gettext.
//!
//! A game ships one XML document per language, with the same records in
//! each. The workflow implemented here is:
//!
//! 1. [`extract`] the translatable fields of the English document,
//!    together with the existing translation of each field, and render
//!    them as PO files with [`Entries::write_file`].
//! 2. Translate the PO files with any Gettext tool. When the English
//!    document changes, regenerate the templates and [`merge`] them into
//!    the translated catalogs.
//! 3. [`bake`] the catalogs back into a copy of the English document to
//!    produce the translated document.

pub mod bake;
pub mod catalog;
pub mod entry;
pub mod error;
pub mod extract;
pub mod identity;
pub mod merge;
pub mod po;
pub mod stats;
pub mod tips;
pub mod tree;

pub use bake::{bake, BakeOptions};
pub use catalog::{parse_catalog, CatalogSet};
pub use entry::{Entries, Entry, BLANK};
pub use error::{Error, Result};
pub use extract::extract;
pub use identity::Simplified;
pub use merge::{merge, merge_catalogs, MergeTool};
pub use po::CatalogHeader;
pub use stats::{EntryStats, MessageStats};
