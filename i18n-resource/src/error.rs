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

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The input does not have the shape the pipeline relies on.
    #[error("Schema error: {0}")]
    Schema(String),
    /// A required option is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML Error: {0}")]
    Xml(#[from] xmltree::ParseError),
    #[error("Failed to write XML: {0}")]
    XmlWrite(String),
    /// The external catalog merge tool failed to start or exited with an
    /// error. `output` holds its combined stdout and stderr.
    #[error("Failed to merge {catalog}: {reason}\n{output}")]
    Subprocess {
        catalog: String,
        reason: String,
        output: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
