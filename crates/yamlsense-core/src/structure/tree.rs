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

//! Arena storage for the structural tree.
//!
//! Nodes live in a flat `Vec` indexed by [`NodeId`]. A node is always created
//! after its parent, so ids increase in source order along every root-to-leaf
//! chain. That ordering lets [`StructureTree::finish`] compute every tree end
//! in one reverse pass without recursion.

use super::aliases::KeyAliases;
use super::node::SNode;
use super::SNodeType;
use crate::document::YamlDocument;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Index of a node inside its [`StructureTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    /// Position of the node in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Key of the lazily built child index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum IndexKey {
    Key(String),
    Seq(usize),
}

#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: SNodeType,
    pub(crate) parent: Option<NodeId>,
    pub(crate) indent: Option<usize>,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) tree_end: usize,
    pub(crate) children: Vec<NodeId>,
    pub(crate) seq_children: usize,
    /// Ordinal among DOC siblings (DOC) or SEQ siblings (SEQ).
    pub(crate) index: usize,
    /// Absolute offset of the first `:` (KEY only).
    pub(crate) colon: usize,
    pub(crate) key_index: OnceLock<HashMap<IndexKey, Vec<NodeId>>>,
}

/// A parsed structural tree.
///
/// Immutable once built. Node handles ([`SNode`]) borrow the tree and are
/// `Copy`, so passing them around costs nothing.
pub struct StructureTree {
    doc: YamlDocument,
    nodes: Vec<NodeData>,
    key_aliases: Option<Arc<dyn KeyAliases>>,
}

impl StructureTree {
    pub(crate) fn new(doc: YamlDocument, key_aliases: Option<Arc<dyn KeyAliases>>) -> Self {
        let root = NodeData {
            kind: SNodeType::Root,
            parent: None,
            indent: Some(0),
            start: 0,
            end: 0,
            tree_end: 0,
            children: Vec::new(),
            seq_children: 0,
            index: 0,
            colon: 0,
            key_index: OnceLock::new(),
        };
        Self {
            doc,
            nodes: vec![root],
            key_aliases,
        }
    }

    /// Create a node and append it to `parent`'s children.
    pub(crate) fn add_node(
        &mut self,
        parent: NodeId,
        kind: SNodeType,
        indent: Option<usize>,
        start: usize,
        end: usize,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());

        let parent_data = &mut self.nodes[parent.0];
        parent_data.children.push(id);
        let index = match kind {
            SNodeType::Seq => {
                parent_data.seq_children += 1;
                parent_data.seq_children - 1
            }
            SNodeType::Doc => parent_data.children.len() - 1,
            _ => 0,
        };

        let colon = match kind {
            SNodeType::Key => self
                .doc
                .text_between(start, end)
                .find(':')
                .map_or(end, |rel| start + rel),
            _ => 0,
        };

        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            indent,
            start,
            end,
            tree_end: end,
            children: Vec::new(),
            seq_children: 0,
            index,
            colon,
            key_index: OnceLock::new(),
        });
        id
    }

    /// Compute tree ends once all nodes exist.
    pub(crate) fn finish(&mut self) {
        for i in (0..self.nodes.len()).rev() {
            let tree_end = match self.nodes[i].children.last() {
                Some(last) => self.nodes[last.0].tree_end,
                None => self.nodes[i].end,
            };
            self.nodes[i].tree_end = tree_end;
        }
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    pub(crate) fn key_aliases(&self) -> Option<&dyn KeyAliases> {
        self.key_aliases.as_deref()
    }

    /// The document this tree was parsed from.
    pub fn document(&self) -> &YamlDocument {
        &self.doc
    }

    /// The ROOT node.
    pub fn root(&self) -> SNode<'_> {
        SNode::new(self, NodeId::ROOT)
    }

    /// Handle for a node id, if it belongs to this tree.
    pub fn node(&self, id: NodeId) -> Option<SNode<'_>> {
        (id.0 < self.nodes.len()).then(|| SNode::new(self, id))
    }

    /// The DOC nodes in source order.
    pub fn documents(&self) -> impl Iterator<Item = SNode<'_>> + '_ {
        self.root().children()
    }

    /// Total number of nodes, ROOT included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Smallest node whose tree range contains `offset`.
    pub fn find(&self, offset: usize) -> Option<SNode<'_>> {
        self.root().find(offset)
    }

    /// Indented `KIND(indent): text` rendering of the whole tree.
    pub fn dump(&self) -> String {
        self.root().dump()
    }
}

impl fmt::Display for StructureTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

impl fmt::Debug for StructureTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructureTree")
            .field("doc", &self.doc)
            .field("nodes", &self.nodes.len())
            .field("key_aliases", &self.key_aliases.is_some())
            .finish()
    }
}
