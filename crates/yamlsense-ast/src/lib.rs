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

//! Semantic YAML trees for editor tooling.
//!
//! Where the structural tree in `yamlsense-core` guesses shape from
//! indentation, this crate runs a conforming YAML parser and keeps what it
//! produces: one root [`YamlNode`] per document, every node carrying its
//! offset range in the source text.
//!
//! - [`parse_ast`] builds a [`YamlFileAst`] from a document
//! - [`YamlFileAst::find_path`] maps an offset to an [`AstPath`] of
//!   [`NodeRef`] steps, which can read or replace the node it addresses
//! - [`MergeResolver`] flattens `<<` merge keys, reporting malformed merge
//!   targets to a [`ProblemCollector`]
//! - [`AstCache`] and [`CachingAstProvider`] memoize trees per document
//!   URI and version
//!
//! # Examples
//!
//! ```
//! use yamlsense_ast::{parse_ast, NodeRef};
//! use yamlsense_core::YamlDocument;
//!
//! let doc = YamlDocument::new("server:\n  port: 8080\n");
//! let ast = parse_ast(&doc).unwrap();
//!
//! let path = ast.find_path(16);
//! assert_eq!(path.last(), Some(NodeRef::TupleValue(0)));
//! assert_eq!(ast.get(&path).and_then(|n| n.as_scalar()), Some("8080"));
//! assert_eq!(
//!     path.to_yaml_path(&ast).unwrap().to_prop_string(),
//!     "[0].server.port"
//! );
//! ```

mod cache;
mod compose;
mod merge;
mod node;
mod problems;
mod provider;
mod tree;

pub use cache::{AstCache, CacheStatistics, DEFAULT_MAX_CACHED_DOCUMENTS};
pub use compose::{parse_ast, parse_ast_with_options};
pub use merge::{flatten_mapping, MergeResolver};
pub use node::{AnchorNode, MappingNode, NodeKind, NodeTuple, NodeValue, ScalarStyle, YamlNode};
pub use problems::{ProblemCollector, ProblemKind, ProblemList, SchemaProblem};
pub use provider::{CachingAstProvider, DirectAstProvider, YamlAstProvider};
pub use tree::{AstPath, NodeRef, YamlFileAst};
