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

//! Offset-searchable semantic tree.
//!
//! [`YamlFileAst`] owns one root node per document. Locations inside it are
//! addressed by an [`AstPath`]: a chain of [`NodeRef`] steps, each naming a
//! slot in its parent collection.
//!
//! ```text
//! Root(0)            document 0
//!   TupleValue(1)    value of the second entry
//!     Seq(0)         first item
//!       TupleKey(0)  key of the first entry
//! ```
//!
//! A path can read ([`YamlFileAst::get`]) or replace ([`YamlFileAst::put`])
//! the node it addresses without walking back down from the root by key.

use crate::merge::MergeResolver;
use crate::node::{NodeTuple, NodeValue, YamlNode};
use crate::problems::{ProblemCollector, SchemaProblem};
use std::fmt;
use yamlsense_core::{YamlDocument, YamlNavigable, YamlPath, YamlPathSegment};

/// One step of an [`AstPath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// Index into the document list.
    Root(usize),
    /// Index into a sequence.
    Seq(usize),
    /// Key of the n-th mapping entry.
    TupleKey(usize),
    /// Value of the n-th mapping entry.
    TupleValue(usize),
}

impl NodeRef {
    pub fn index(self) -> usize {
        match self {
            Self::Root(i) | Self::Seq(i) | Self::TupleKey(i) | Self::TupleValue(i) => i,
        }
    }

    /// The child of `parent` this step addresses. `Root` steps address the
    /// document list and never resolve against a node.
    pub fn get(self, parent: &YamlNode) -> Option<&YamlNode> {
        match (self, &parent.value) {
            (Self::Seq(i), NodeValue::Sequence(items)) => items.get(i),
            (Self::TupleKey(i), NodeValue::Mapping(m)) => m.entries.get(i).map(|e| &e.key),
            (Self::TupleValue(i), NodeValue::Mapping(m)) => m.entries.get(i).map(|e| &e.value),
            _ => None,
        }
    }

    pub fn get_mut(self, parent: &mut YamlNode) -> Option<&mut YamlNode> {
        match (self, &mut parent.value) {
            (Self::Seq(i), NodeValue::Sequence(items)) => items.get_mut(i),
            (Self::TupleKey(i), NodeValue::Mapping(m)) => {
                m.entries.get_mut(i).map(|e| &mut e.key)
            }
            (Self::TupleValue(i), NodeValue::Mapping(m)) => {
                m.entries.get_mut(i).map(|e| &mut e.value)
            }
            _ => None,
        }
    }

    /// Replace the addressed child of `parent`, returning the old node.
    pub fn put(self, parent: &mut YamlNode, node: YamlNode) -> Option<YamlNode> {
        let old = std::mem::replace(self.get_mut(parent)?, node);
        if let (Self::TupleKey(_), NodeValue::Mapping(m)) = (self, &mut parent.value) {
            m.merged = m.entries.iter().any(|e| e.key.is_merge_key());
        }
        Some(old)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root(i) => write!(f, "root[{}]", i),
            Self::Seq(i) => write!(f, "seq[{}]", i),
            Self::TupleKey(i) => write!(f, "key[{}]", i),
            Self::TupleValue(i) => write!(f, "val[{}]", i),
        }
    }
}

/// A chain of [`NodeRef`]s from a document root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AstPath {
    refs: Vec<NodeRef>,
}

impl AstPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refs(&self) -> &[NodeRef] {
        &self.refs
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn last(&self) -> Option<NodeRef> {
        self.refs.last().copied()
    }

    pub fn push(&mut self, step: NodeRef) {
        self.refs.push(step);
    }

    /// Index into `refs` of the innermost key or value step, i.e. the entry
    /// being edited.
    pub fn last_tuple(&self) -> Option<usize> {
        self.refs
            .iter()
            .rposition(|r| matches!(r, NodeRef::TupleKey(_) | NodeRef::TupleValue(_)))
    }

    /// Path with the trailing `count` steps removed.
    pub fn truncate(&self, count: usize) -> Self {
        let keep = self.refs.len().saturating_sub(count);
        Self {
            refs: self.refs[..keep].to_vec(),
        }
    }

    /// Convert to a [`YamlPath`]: the document index first, then a key
    /// segment per value step, a key-at segment per key step and an index
    /// segment per sequence step. `None` when a step passes through an entry
    /// whose key is not a scalar.
    pub fn to_yaml_path(&self, ast: &YamlFileAst) -> Option<YamlPath> {
        let (first, rest) = self.refs.split_first()?;
        let NodeRef::Root(doc) = *first else {
            return None;
        };
        let mut node = ast.nodes.get(doc)?;
        let mut segments = Vec::with_capacity(self.refs.len());
        segments.push(YamlPathSegment::index(doc));
        for step in rest {
            let segment = match *step {
                NodeRef::Root(_) => return None,
                NodeRef::Seq(i) => YamlPathSegment::index(i),
                NodeRef::TupleKey(i) => YamlPathSegment::key_at(entry(node, i)?.key.as_scalar()?),
                NodeRef::TupleValue(i) => YamlPathSegment::key(entry(node, i)?.key.as_scalar()?),
            };
            segments.push(segment);
            node = step.get(node)?;
        }
        Some(YamlPath::new(segments))
    }
}

impl fmt::Display for AstPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.refs.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

fn entry(node: &YamlNode, i: usize) -> Option<&NodeTuple> {
    match &node.value {
        NodeValue::Mapping(m) => m.entries.get(i),
        _ => None,
    }
}

impl YamlNode {
    /// Steps to this node's children in source order: key and value of each
    /// entry for a mapping, each item for a sequence, nothing otherwise.
    pub fn child_refs(&self) -> Vec<NodeRef> {
        match &self.value {
            NodeValue::Mapping(m) => (0..m.entries.len())
                .flat_map(|i| [NodeRef::TupleKey(i), NodeRef::TupleValue(i)])
                .collect(),
            NodeValue::Sequence(items) => (0..items.len()).map(NodeRef::Seq).collect(),
            NodeValue::Scalar { .. } | NodeValue::Anchor(_) => Vec::new(),
        }
    }
}

/// Key segments match entries by scalar key; index segments select sequence
/// items. Aliases are looked through.
impl<'a> YamlNavigable for &'a YamlNode {
    fn traverse_ambiguously(&self, segment: &YamlPathSegment) -> Vec<Self> {
        let node: &'a YamlNode = (*self).resolved();
        match segment {
            YamlPathSegment::ValAtKey(key) => node
                .as_mapping()
                .map(|m| {
                    m.entries
                        .iter()
                        .filter(|e| e.key.as_scalar() == Some(key.as_str()))
                        .map(|e| &e.value)
                        .collect()
                })
                .unwrap_or_default(),
            YamlPathSegment::KeyAtKey(key) => node
                .as_mapping()
                .map(|m| {
                    m.entries
                        .iter()
                        .filter(|e| e.key.as_scalar() == Some(key.as_str()))
                        .map(|e| &e.key)
                        .collect()
                })
                .unwrap_or_default(),
            YamlPathSegment::ValAtIndex(i) => node
                .as_sequence()
                .and_then(|items| items.get(*i))
                .into_iter()
                .collect(),
        }
    }
}

/// Semantic tree of one file.
#[derive(Debug, Clone)]
pub struct YamlFileAst {
    doc: YamlDocument,
    nodes: Vec<YamlNode>,
    problems: Vec<SchemaProblem>,
}

impl YamlFileAst {
    pub fn new(doc: YamlDocument, nodes: Vec<YamlNode>) -> Self {
        Self {
            doc,
            nodes,
            problems: Vec::new(),
        }
    }

    pub(crate) fn with_problems(mut self, problems: Vec<SchemaProblem>) -> Self {
        self.problems = problems;
        self
    }

    /// The document this tree was parsed from.
    pub fn document(&self) -> &YamlDocument {
        &self.doc
    }

    /// One root node per document.
    pub fn nodes(&self) -> &[YamlNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [YamlNode] {
        &mut self.nodes
    }

    pub fn into_nodes(self) -> Vec<YamlNode> {
        self.nodes
    }

    /// Problems found while resolving merges at parse time.
    pub fn problems(&self) -> &[SchemaProblem] {
        &self.problems
    }

    /// Chain of refs from the document root down to the smallest node
    /// containing `offset`. Empty when no document contains it.
    pub fn find_path(&self, offset: usize) -> AstPath {
        let mut path = AstPath::new();
        let Some((doc, mut node)) = self
            .nodes
            .iter()
            .enumerate()
            .find(|(_, n)| n.contains(offset))
        else {
            return path;
        };
        path.push(NodeRef::Root(doc));

        while let Some((step, child)) = node.child_refs().into_iter().find_map(move |step| {
            step.get(node)
                .filter(|child| child.contains(offset))
                .map(|child| (step, child))
        }) {
            path.push(step);
            node = child;
        }
        path
    }

    /// Smallest node containing `offset`.
    pub fn find(&self, offset: usize) -> Option<&YamlNode> {
        self.get(&self.find_path(offset))
    }

    /// The node `path` addresses.
    pub fn get(&self, path: &AstPath) -> Option<&YamlNode> {
        let (first, rest) = path.refs().split_first()?;
        let NodeRef::Root(doc) = *first else {
            return None;
        };
        rest.iter()
            .try_fold(self.nodes.get(doc)?, |node, step| step.get(node))
    }

    pub fn get_mut(&mut self, path: &AstPath) -> Option<&mut YamlNode> {
        self.get_mut_at(path.refs())
    }

    /// Replace the node `path` addresses, returning the node it replaced.
    /// Nothing changes when the path does not resolve.
    pub fn put(&mut self, path: &AstPath, node: YamlNode) -> Option<YamlNode> {
        match path.refs() {
            [] => None,
            [NodeRef::Root(doc)] => self
                .nodes
                .get_mut(*doc)
                .map(|slot| std::mem::replace(slot, node)),
            [parent @ .., last] => {
                let parent = self.get_mut_at(parent)?;
                last.put(parent, node)
            }
        }
    }

    fn get_mut_at(&mut self, refs: &[NodeRef]) -> Option<&mut YamlNode> {
        let (first, rest) = refs.split_first()?;
        let NodeRef::Root(doc) = *first else {
            return None;
        };
        let mut node = self.nodes.get_mut(doc)?;
        for step in rest {
            node = step.get_mut(node)?;
        }
        Some(node)
    }

    /// Walk `path`; its first segment selects the document by index.
    pub fn traverse(&self, path: &YamlPath) -> Option<&YamlNode> {
        let doc = self.nodes.get(path.segment(0)?.as_index()?)?;
        path.drop_first(1).traverse(doc)
    }

    /// Every node `path` reaches, in source order.
    pub fn traverse_ambiguously(&self, path: &YamlPath) -> Vec<&YamlNode> {
        let Some(doc) = path
            .segment(0)
            .and_then(YamlPathSegment::as_index)
            .and_then(|i| self.nodes.get(i))
        else {
            return Vec::new();
        };
        path.drop_first(1).traverse_ambiguously(doc)
    }

    /// [`YamlPath`] of the smallest node containing `offset`.
    pub fn yaml_path_at(&self, offset: usize) -> Option<YamlPath> {
        let path = self.find_path(offset);
        if path.is_empty() {
            return None;
        }
        path.to_yaml_path(self)
    }

    /// Flatten merge keys in every mapping of every document, reporting into
    /// `problems` between `begin_collecting` and `end_collecting`.
    pub fn flatten_merges(&mut self, problems: &mut dyn ProblemCollector) {
        problems.begin_collecting();
        {
            let mut resolver = MergeResolver::new(&mut *problems);
            for node in &mut self.nodes {
                resolver.flatten_all(node);
            }
        }
        problems.end_collecting();
    }
}
