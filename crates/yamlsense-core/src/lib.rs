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

//! Document model and structural parser for YAML files being edited.
//!
//! This crate holds everything that works without a conforming YAML parser:
//!
//! - [`YamlDocument`]: text plus line table, offset/line/column conversion
//!   and per-line indentation
//! - [`structure`]: the heuristic indentation-based tree
//!   (ROOT/DOC/KEY/SEQ/RAW), which always parses
//! - [`YamlPath`]: paths shared by the structural and semantic trees
//! - [`YamlError`] and [`Limits`]/[`ParseOptions`] used by the semantic layer
//!
//! The semantic tree lives in `yamlsense-ast`.

mod document;
mod error;
mod limits;
pub mod path;
mod span;
pub mod structure;

pub use document::{indentation_of, Line, YamlDocument};
pub use error::{YamlError, YamlErrorKind, YamlResult};
pub use limits::{Limits, ParseOptions, ParseOptionsBuilder};
pub use path::{YamlNavigable, YamlPath, YamlPathSegment};
pub use span::{SourcePos, TextRange};
pub use structure::{
    parse_structure, KeyAliases, NodeId, SNode, SNodeType, StructureParser, StructureTree,
};
