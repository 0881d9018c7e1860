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

//! Indentation-driven structural parser.
//!
//! A single forward pass over the lines. Each line is classified as a
//! document separator, a simple key, a sequence item or anything else, and
//! attached to a parent chosen by indentation:
//!
//! - lines with undefined indentation (blank, comment) become RAW children of
//!   the current parent and never change scope;
//! - a separator starts a new DOC under ROOT;
//! - a key pops open KEY/SEQ nodes until one is indented strictly less;
//! - a sequence item pops the same way, except that a SEQ at the same
//!   indentation is popped too so consecutive items become siblings. The text
//!   after `"- "` is then parsed again as if it were its own line, so
//!   `- key: value` produces a SEQ with a nested KEY;
//! - anything else is a RAW child of the current parent.
//!
//! Popping never crosses a DOC. Parsing cannot fail.

use super::aliases::KeyAliases;
use super::line::{classify, is_document_separator, is_skippable_at_start, LineClass, LineReader};
use super::tree::{NodeData, NodeId, StructureTree};
use super::SNodeType;
use crate::document::{Line, YamlDocument};
use std::sync::Arc;
use tracing::debug;

/// Builds [`StructureTree`]s.
#[derive(Clone, Default)]
pub struct StructureParser {
    key_aliases: Option<Arc<dyn KeyAliases>>,
}

impl StructureParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `aliases` for key lookups on trees built by this parser.
    pub fn with_key_aliases(mut self, aliases: Arc<dyn KeyAliases>) -> Self {
        self.key_aliases = Some(aliases);
        self
    }

    /// Parse `doc` into a structural tree.
    pub fn parse(&self, doc: &YamlDocument) -> StructureTree {
        let mut builder = TreeBuilder {
            doc,
            tree: StructureTree::new(doc.clone(), self.key_aliases.clone()),
        };
        builder.run();
        let mut tree = builder.tree;
        tree.finish();

        debug!(
            uri = doc.uri().unwrap_or("<none>"),
            lines = doc.line_count(),
            nodes = tree.node_count(),
            documents = tree.root().child_count(),
            "parsed structure"
        );
        tree
    }
}

impl std::fmt::Debug for StructureParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructureParser")
            .field("key_aliases", &self.key_aliases.is_some())
            .finish()
    }
}

/// Parse `doc` with no key aliases.
pub fn parse_structure(doc: &YamlDocument) -> StructureTree {
    StructureParser::new().parse(doc)
}

struct TreeBuilder<'d> {
    doc: &'d YamlDocument,
    tree: StructureTree,
}

impl TreeBuilder<'_> {
    fn run(&mut self) {
        let mut input = LineReader::new(self.doc);
        let mut parent = NodeId::ROOT;

        // Comments and directives ahead of the first document are dropped
        while let Some(line) = input.peek() {
            if !is_skippable_at_start(&line, self.doc) {
                break;
            }
            input.next();
        }

        if let Some(line) = input.peek() {
            if !is_document_separator(&line, self.doc) {
                parent = self.tree.add_node(NodeId::ROOT, SNodeType::Doc, Some(0), 0, 0);
            }
        }

        for line in input {
            if line.indent().is_none() {
                self.create_raw(parent, &line);
            } else {
                parent = self.parse_line(parent, line, true);
            }
        }
    }

    /// Attach `line` under `parent` and return the parent for the next line.
    fn parse_line(&mut self, mut parent: NodeId, mut line: Line, mut create_raw: bool) -> NodeId {
        loop {
            let indent = line.indent().unwrap_or(0);
            match classify(&line, self.doc) {
                LineClass::DocumentSeparator => {
                    return self.tree.add_node(
                        NodeId::ROOT,
                        SNodeType::Doc,
                        Some(0),
                        line.start(),
                        line.end(),
                    );
                }
                LineClass::Key => {
                    parent = self.pop_to_level(parent, |node| node_indent(node) < indent);
                    return self.create_content(parent, SNodeType::Key, &line);
                }
                LineClass::Seq => {
                    parent = self.pop_to_level(parent, |node| {
                        let node_indent = node_indent(node);
                        node_indent < indent || (node.kind != SNodeType::Seq && node_indent <= indent)
                    });
                    parent = self.create_content(parent, SNodeType::Seq, &line);
                    // Re-read what follows "- " as a line of its own
                    line = line.move_indent_mark(2);
                    create_raw = false;
                }
                LineClass::Other => {
                    if create_raw {
                        self.create_raw(parent, &line);
                    }
                    return parent;
                }
            }
        }
    }

    /// Walk up from `parent` until `level` holds, stopping at DOC and at any
    /// node that contributes no path segment.
    fn pop_to_level(&self, mut parent: NodeId, level: impl Fn(&NodeData) -> bool) -> NodeId {
        loop {
            let node = self.tree.data(parent);
            let has_segment = matches!(node.kind, SNodeType::Key | SNodeType::Seq);
            if !has_segment || level(node) {
                return parent;
            }
            match node.parent {
                Some(up) => parent = up,
                None => return parent,
            }
        }
    }

    fn create_content(&mut self, parent: NodeId, kind: SNodeType, line: &Line) -> NodeId {
        self.tree
            .add_node(parent, kind, line.indent(), line.indent_mark(), line.end())
    }

    fn create_raw(&mut self, parent: NodeId, line: &Line) -> NodeId {
        self.tree
            .add_node(parent, SNodeType::Raw, line.indent(), line.indent_mark(), line.end())
    }
}

fn node_indent(node: &NodeData) -> usize {
    node.indent.unwrap_or(0)
}
