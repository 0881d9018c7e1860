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

//! Borrowed handles onto structural tree nodes.

use super::tree::{IndexKey, NodeData, NodeId, StructureTree};
use super::SNodeType;
use crate::path::{YamlNavigable, YamlPath, YamlPathSegment};
use crate::span::TextRange;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;

/// A node of a [`StructureTree`].
///
/// Which accessors are meaningful depends on [`kind`](Self::kind): KEY nodes
/// have a key and a colon offset, SEQ and DOC nodes have an index. Accessors
/// that do not apply return `None`.
#[derive(Clone, Copy)]
pub struct SNode<'t> {
    tree: &'t StructureTree,
    id: NodeId,
}

impl<'t> SNode<'t> {
    pub(crate) fn new(tree: &'t StructureTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    #[inline]
    fn data(&self) -> &'t NodeData {
        self.tree.data(self.id)
    }

    fn handle(&self, id: NodeId) -> SNode<'t> {
        SNode::new(self.tree, id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t StructureTree {
        self.tree
    }

    pub fn kind(&self) -> SNodeType {
        self.data().kind
    }

    /// Indentation of the node's line; `None` for blank and comment lines.
    pub fn indent(&self) -> Option<usize> {
        self.data().indent
    }

    pub fn start(&self) -> usize {
        self.data().start
    }

    /// End of the node's own line text.
    pub fn node_end(&self) -> usize {
        self.data().end
    }

    /// End of the last descendant, or [`node_end`](Self::node_end) when
    /// there are no children.
    pub fn tree_end(&self) -> usize {
        self.data().tree_end
    }

    pub fn node_range(&self) -> TextRange {
        TextRange::new(self.start(), self.node_end())
    }

    pub fn tree_range(&self) -> TextRange {
        TextRange::new(self.start(), self.tree_end())
    }

    /// Half-open test against the node's own line, from its indent mark.
    pub fn node_contains(&self, offset: usize) -> bool {
        self.node_range().contains(offset)
    }

    /// Half-open test against the full tree range.
    pub fn tree_contains(&self, offset: usize) -> bool {
        self.tree_range().contains(offset)
    }

    /// The node's own line text.
    pub fn text(&self) -> &'t str {
        self.tree.document().text_between(self.start(), self.node_end())
    }

    // ==================== Tree structure ====================

    pub fn parent(&self) -> Option<SNode<'t>> {
        self.data().parent.map(|p| self.handle(p))
    }

    pub fn children(
        &self,
    ) -> impl DoubleEndedIterator<Item = SNode<'t>> + ExactSizeIterator + 't {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| SNode::new(tree, id))
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn child(&self, i: usize) -> Option<SNode<'t>> {
        self.data().children.get(i).map(|&id| self.handle(id))
    }

    pub fn last_child(&self) -> Option<SNode<'t>> {
        self.data().children.last().map(|&id| self.handle(id))
    }

    /// First child with a defined indentation (skips blanks and comments).
    pub fn first_real_child(&self) -> Option<SNode<'t>> {
        self.children().find(|c| c.indent().is_some())
    }

    /// Last child with a defined indentation (skips blanks and comments).
    pub fn last_real_child(&self) -> Option<SNode<'t>> {
        self.children().rev().find(|c| c.indent().is_some())
    }

    /// Number of SEQ children.
    pub fn seq_children_count(&self) -> usize {
        self.data().seq_children
    }

    pub fn root(&self) -> SNode<'t> {
        self.tree.root()
    }

    /// The enclosing DOC node (the node itself if it is one).
    pub fn doc_node(&self) -> Option<SNode<'t>> {
        let mut it = Some(*self);
        while let Some(node) = it {
            if node.kind() == SNodeType::Doc {
                return Some(node);
            }
            it = node.parent();
        }
        None
    }

    /// Ancestor chain from ROOT down to and including this node.
    pub fn path_nodes(&self) -> Vec<SNode<'t>> {
        let mut nodes = Vec::new();
        let mut it = Some(*self);
        while let Some(node) = it {
            nodes.push(node);
            it = node.parent();
        }
        nodes.reverse();
        nodes
    }

    /// The path segment this node contributes: a key segment for KEY, an
    /// index segment for SEQ, nothing for ROOT, DOC and RAW.
    pub fn segment(&self) -> Option<YamlPathSegment> {
        match self.kind() {
            SNodeType::Key => self.key().map(YamlPathSegment::key),
            SNodeType::Seq => Some(YamlPathSegment::index(self.data().index)),
            _ => None,
        }
    }

    /// Path from the enclosing document to this node.
    pub fn path(&self) -> YamlPath {
        self.path_nodes().iter().filter_map(SNode::segment).collect()
    }

    /// [`path`](Self::path) prefixed with the document index, so the result
    /// can be traversed starting from ROOT.
    pub fn full_path(&self) -> YamlPath {
        let path = self.path();
        match self.doc_node() {
            Some(doc) => path.prepend(YamlPathSegment::index(doc.data().index)),
            None => path,
        }
    }

    /// Smallest node in this subtree whose tree range contains `offset`.
    pub fn find(&self, offset: usize) -> Option<SNode<'t>> {
        if !self.tree_contains(offset) {
            return None;
        }
        let mut current = *self;
        while let Some(child) = current.children().find(|c| c.tree_contains(offset)) {
            current = child;
        }
        Some(current)
    }

    // ==================== KEY ====================

    /// Text before the first colon (KEY only).
    pub fn key(&self) -> Option<&'t str> {
        (self.kind() == SNodeType::Key).then(|| {
            self.tree
                .document()
                .text_between(self.start(), self.data().colon)
        })
    }

    /// Absolute offset of the first colon (KEY only).
    pub fn colon_offset(&self) -> Option<usize> {
        (self.kind() == SNodeType::Key).then(|| self.data().colon)
    }

    /// Text after the colon on the key's own line (KEY only).
    pub fn simple_value(&self) -> Option<&'t str> {
        self.colon_offset().map(|colon| {
            self.tree
                .document()
                .text_between(colon + 1, self.node_end())
        })
    }

    /// True from the key start up to and including the colon (KEY only).
    pub fn is_in_key(&self, offset: usize) -> bool {
        self.colon_offset()
            .map_or(false, |colon| self.start() <= offset && offset <= colon)
    }

    /// True after the colon (KEY) or after the dash (SEQ), up to and
    /// including the tree end.
    pub fn is_in_value(&self, offset: usize) -> bool {
        self.value_start()
            .map_or(false, |start| start <= offset && offset <= self.tree_end())
    }

    fn value_start(&self) -> Option<usize> {
        match self.kind() {
            SNodeType::Key => Some(self.data().colon + 1),
            SNodeType::Seq => {
                // A lone "-" has no trailing space.
                let dash_len = if self.node_end() - self.start() == 1 { 1 } else { 2 };
                Some(self.start() + dash_len)
            }
            _ => None,
        }
    }

    /// Range of the value text (KEY and SEQ); `None` when it is empty.
    pub fn value_range(&self) -> Option<TextRange> {
        let start = self.value_start()?;
        let range = TextRange::new(start, self.tree_end());
        (!range.is_empty()).then_some(range)
    }

    /// Value text after the colon through the end of the subtree, trailing
    /// whitespace trimmed and the key's own indentation removed from every
    /// continuation line (KEY only).
    pub fn value_with_relative_indent(&self) -> Option<String> {
        let colon = self.colon_offset()?;
        let text = self
            .tree
            .document()
            .text_between(colon + 1, self.tree_end())
            .trim_end();
        let indent = self.indent().unwrap_or(0);
        if indent == 0 {
            return Some(text.to_string());
        }

        let mut out = String::with_capacity(text.len());
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
                let strip = line.bytes().take(indent).take_while(|&b| b == b' ').count();
                out.push_str(&line[strip..]);
            } else {
                out.push_str(line);
            }
        }
        Some(out)
    }

    // ==================== SEQ / DOC ====================

    /// Ordinal among SEQ siblings (SEQ) or among documents (DOC).
    pub fn index(&self) -> Option<usize> {
        matches!(self.kind(), SNodeType::Seq | SNodeType::Doc).then(|| self.data().index)
    }

    /// The SEQ line text up to where its first inline child starts.
    pub fn text_without_children(&self) -> &'t str {
        let end = match self.child(0) {
            Some(child) => self.node_end().min(child.start()),
            None => self.node_end(),
        };
        self.tree.document().text_between(self.start(), end)
    }

    /// True if `path` resolves from this node.
    pub fn exists(&self, path: &YamlPath) -> bool {
        path.traverse(*self).is_some()
    }

    // ==================== Key lookup ====================

    fn key_index(&self) -> &'t HashMap<IndexKey, Vec<NodeId>> {
        let tree = self.tree;
        let data = self.data();
        data.key_index.get_or_init(|| {
            let mut index: HashMap<IndexKey, Vec<NodeId>> = HashMap::new();
            for &child in &data.children {
                let node = SNode::new(tree, child);
                let key = match node.kind() {
                    SNodeType::Key => node.key().map(|k| IndexKey::Key(k.to_string())),
                    SNodeType::Seq => Some(IndexKey::Seq(node.data().index)),
                    _ => None,
                };
                if let Some(key) = key {
                    index.entry(key).or_default().push(child);
                }
            }
            index
        })
    }

    /// KEY children named `key` or any of its aliases, in that order.
    pub fn children_with_key(&self, key: &str) -> Vec<SNode<'t>> {
        if self.child_count() == 0 {
            return Vec::new();
        }
        let index = self.key_index();
        let mut found: Vec<SNode<'t>> = index
            .get(&IndexKey::Key(key.to_string()))
            .into_iter()
            .flatten()
            .map(|&id| self.handle(id))
            .collect();
        if let Some(aliases) = self.tree.key_aliases() {
            for alias in aliases.aliases(key) {
                if let Some(ids) = index.get(&IndexKey::Key(alias)) {
                    found.extend(ids.iter().map(|&id| self.handle(id)));
                }
            }
        }
        found
    }

    pub fn child_with_key(&self, key: &str) -> Option<SNode<'t>> {
        self.children_with_key(key).into_iter().next()
    }

    /// The SEQ child at sequence position `index`.
    pub fn seq_child_with_index(&self, index: usize) -> Option<SNode<'t>> {
        self.key_index()
            .get(&IndexKey::Seq(index))
            .and_then(|ids| ids.first())
            .map(|&id| self.handle(id))
    }

    // ==================== Rendering ====================

    /// `KIND(indent): text` per node, two spaces per nesting level, one node
    /// per line. Undefined indentation prints as `-1`.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(*self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            for _ in 0..depth {
                out.push_str("  ");
            }
            let indent = node.indent().map_or(-1, |i| i as i64);
            let _ = writeln!(out, "{}({}): {}", node.kind(), indent, node.text());
            let children: Vec<_> = node.children().collect();
            for child in children.into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}

impl PartialEq for SNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SNode<'_> {}

impl fmt::Debug for SNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SNode")
            .field("kind", &self.kind())
            .field("indent", &self.indent())
            .field("range", &self.tree_range())
            .field("text", &self.text())
            .finish()
    }
}

impl fmt::Display for SNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

impl<'t> YamlNavigable for SNode<'t> {
    fn traverse_ambiguously(&self, segment: &YamlPathSegment) -> Vec<Self> {
        match (self.kind(), segment) {
            (SNodeType::Root, YamlPathSegment::ValAtIndex(i)) => {
                self.child(*i).into_iter().collect()
            }
            (SNodeType::Root | SNodeType::Raw, _) => Vec::new(),
            (_, YamlPathSegment::ValAtKey(key)) => self.children_with_key(key),
            (_, YamlPathSegment::ValAtIndex(i)) => {
                self.seq_child_with_index(*i).into_iter().collect()
            }
            (_, YamlPathSegment::KeyAtKey(_)) => Vec::new(),
        }
    }
}
