// Dweve YamlSense - YAML Document Modeling for Editors
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Heuristic structural tree.
//!
//! The structural tree approximates the shape of a YAML file from indentation
//! and three line patterns alone. It is meant for text that is being edited
//! and may be incomplete or invalid: every line ends up somewhere in the tree
//! and parsing never fails.
//!
//! ```text
//! ROOT
//! └── DOC            one per `---` (or an implicit one at offset 0)
//!     ├── KEY        `key: value` line
//!     │   └── SEQ    `- item` line
//!     │       └── KEY  inline `- key: value`
//!     └── RAW        anything else, including blanks and comments
//! ```
//!
//! # Examples
//!
//! ```
//! use yamlsense_core::{parse_structure, SNodeType, YamlDocument};
//!
//! let doc = YamlDocument::new("foo:\n  bar: 1\n");
//! let tree = parse_structure(&doc);
//!
//! let bar = tree.find(9).unwrap();
//! assert_eq!(bar.kind(), SNodeType::Key);
//! assert_eq!(bar.key(), Some("bar"));
//! assert_eq!(bar.path().to_prop_string(), "foo.bar");
//! ```

mod aliases;
mod line;
mod node;
mod parser;
mod tree;

pub use aliases::KeyAliases;
pub use line::{classify, LineClass};
pub use node::SNode;
pub use parser::{parse_structure, StructureParser};
pub use tree::{NodeId, StructureTree};

use std::fmt;

/// Kind of a structural node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SNodeType {
    Root,
    Doc,
    Key,
    Seq,
    Raw,
}

impl fmt::Display for SNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Root => "ROOT",
            Self::Doc => "DOC",
            Self::Key => "KEY",
            Self::Seq => "SEQ",
            Self::Raw => "RAW",
        };
        f.write_str(name)
    }
}
