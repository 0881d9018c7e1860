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

//! # YamlSense - YAML Document Modeling for Editors
//!
//! Two complementary views of a YAML file that is being edited:
//!
//! - a **structural tree**, built from indentation alone, which always parses
//!   and tells where the caret sits and which scope it belongs to;
//! - a **semantic tree**, built by a conforming YAML parser, which tells what
//!   the text actually means, with anchors, aliases and merge keys.
//!
//! Both answer `find(offset)` and are navigated with the same [`YamlPath`].
//!
//! ## Quick Start
//!
//! ```rust
//! use yamlsense::{get_ast, parse, YamlDocument, YamlPath};
//!
//! let doc = YamlDocument::new("server:\n  port: 8080\n  host: local\n");
//!
//! // Where is offset 12?
//! let tree = parse(&doc);
//! let node = tree.find(12).unwrap();
//! assert_eq!(node.path().to_prop_string(), "server.port");
//!
//! // What does that path hold?
//! let ast = get_ast(&doc).unwrap();
//! let value = ast.traverse(&node.full_path()).unwrap();
//! assert_eq!(value.as_scalar(), Some("8080"));
//! # let _ = YamlPath::empty();
//! ```
//!
//! ## Modules
//!
//! - [`structure`]: structural tree types
//! - [`ast`]: semantic tree, merge resolution and caching
//! - [`path`]: path segments and the navigation trait

// Re-export core types
pub use yamlsense_core::{
    indentation_of,
    // Document
    Line,
    // Config
    Limits,
    ParseOptions,
    ParseOptionsBuilder,
    SourcePos,
    TextRange,
    YamlDocument,
    // Errors
    YamlError,
    YamlErrorKind,
    YamlNavigable,
    YamlPath,
    YamlPathSegment,
    YamlResult,
};

// Re-export structural tree
pub mod structure {
    //! Heuristic indentation-based tree
    pub use yamlsense_core::structure::{
        classify, parse_structure, KeyAliases, LineClass, NodeId, SNode, SNodeType,
        StructureParser, StructureTree,
    };
}

// Re-export path model
pub mod path {
    //! Paths shared by both trees
    pub use yamlsense_core::path::{YamlNavigable, YamlPath, YamlPathSegment};
}

// Re-export semantic tree
pub mod ast {
    //! Semantic tree, merge keys and caching
    pub use yamlsense_ast::{
        flatten_mapping, parse_ast, parse_ast_with_options, AnchorNode, AstCache, AstPath,
        CacheStatistics, CachingAstProvider, DirectAstProvider, MappingNode, MergeResolver,
        NodeKind, NodeRef, NodeTuple, NodeValue, ProblemCollector, ProblemKind, ProblemList,
        ScalarStyle, SchemaProblem, YamlAstProvider, YamlFileAst, YamlNode,
        DEFAULT_MAX_CACHED_DOCUMENTS,
    };
}

pub use structure::{SNode, SNodeType, StructureTree};
pub use ast::{YamlFileAst, YamlNode};

/// Build the structural tree of `doc`. Never fails.
///
/// # Examples
///
/// ```rust
/// use yamlsense::{parse, SNodeType, YamlDocument};
///
/// let tree = parse(&YamlDocument::new("a:\n  - b\n"));
/// assert_eq!(tree.find(5).unwrap().kind(), SNodeType::Seq);
/// ```
#[inline]
pub fn parse(doc: &YamlDocument) -> StructureTree {
    yamlsense_core::parse_structure(doc)
}

/// Build the semantic tree of `doc`, one root node per document.
///
/// Merge keys are left in place; see [`get_ast_with_options`] or
/// [`YamlFileAst::flatten_merges`].
///
/// # Errors
///
/// Returns an error when the text is not valid YAML, refers to an undefined
/// anchor, or exceeds the default [`Limits`].
///
/// # Examples
///
/// ```rust
/// use yamlsense::{get_ast, YamlDocument};
///
/// let ast = get_ast(&YamlDocument::new("a: 1\n---\nb: 2\n")).unwrap();
/// assert_eq!(ast.nodes().len(), 2);
/// assert!(get_ast(&YamlDocument::new("a: [1, 2")).is_err());
/// ```
#[inline]
pub fn get_ast(doc: &YamlDocument) -> YamlResult<YamlFileAst> {
    yamlsense_ast::parse_ast(doc)
}

/// Build the semantic tree of `doc` with explicit limits and merge handling.
///
/// # Examples
///
/// ```rust
/// use yamlsense::{get_ast_with_options, ParseOptions, YamlDocument};
///
/// let options = ParseOptions::builder().resolve_merges(true).build();
/// let doc = YamlDocument::new("base: &b {x: 1}\nitem:\n  <<: *b\n  y: 2\n");
/// let ast = get_ast_with_options(&doc, &options).unwrap();
///
/// let item = ast.nodes()[0].get("item").unwrap();
/// assert_eq!(item.get("x").and_then(|n| n.as_scalar()), Some("1"));
/// ```
#[inline]
pub fn get_ast_with_options(doc: &YamlDocument, options: &ParseOptions) -> YamlResult<YamlFileAst> {
    yamlsense_ast::parse_ast_with_options(doc, options)
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
