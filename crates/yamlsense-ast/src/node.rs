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

//! Semantic node model.
//!
//! Nodes own their children. An alias in the source becomes an
//! [`NodeValue::Anchor`] node that shares the anchored node through an `Arc`,
//! so the anchored subtree is stored once no matter how often it is
//! referenced.

use std::fmt;
use std::sync::Arc;
use yamlsense_core::TextRange;

/// How a scalar was written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

/// Shape of a semantic node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
    Anchor,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scalar => "scalar",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
            Self::Anchor => "anchor",
        };
        f.write_str(name)
    }
}

/// A node of the semantic tree.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlNode {
    /// Half-open source range.
    pub range: TextRange,
    /// Anchor name declared on this node (`&name`).
    pub anchor: Option<String>,
    /// Explicit tag, with its handle expanded.
    pub tag: Option<String>,
    pub value: NodeValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Scalar { value: String, style: ScalarStyle },
    Sequence(Vec<YamlNode>),
    Mapping(MappingNode),
    /// An alias (`*name`) referring to an anchored node.
    Anchor(AnchorNode),
}

/// Entries of a mapping in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappingNode {
    pub entries: Vec<NodeTuple>,
    /// Set while the mapping still holds `<<` merge keys.
    pub merged: bool,
}

/// One `key: value` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTuple {
    pub key: YamlNode,
    pub value: YamlNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnchorNode {
    pub name: String,
    pub target: Arc<YamlNode>,
}

impl YamlNode {
    pub fn scalar(value: impl Into<String>, range: TextRange) -> Self {
        Self::new(
            NodeValue::Scalar {
                value: value.into(),
                style: ScalarStyle::Plain,
            },
            range,
        )
    }

    pub fn sequence(items: Vec<YamlNode>, range: TextRange) -> Self {
        Self::new(NodeValue::Sequence(items), range)
    }

    /// A mapping; the merge flag is derived from the keys.
    pub fn mapping(entries: Vec<NodeTuple>, range: TextRange) -> Self {
        let merged = entries.iter().any(|e| e.key.is_merge_key());
        Self::new(NodeValue::Mapping(MappingNode { entries, merged }), range)
    }

    pub fn new(value: NodeValue, range: TextRange) -> Self {
        Self {
            range,
            anchor: None,
            tag: None,
            value,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn kind(&self) -> NodeKind {
        match self.value {
            NodeValue::Scalar { .. } => NodeKind::Scalar,
            NodeValue::Sequence(_) => NodeKind::Sequence,
            NodeValue::Mapping(_) => NodeKind::Mapping,
            NodeValue::Anchor(_) => NodeKind::Anchor,
        }
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.range.start
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.range.end
    }

    /// Half-open containment test.
    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        self.range.contains(offset)
    }

    /// This node, or the node an alias refers to.
    pub fn resolved(&self) -> &YamlNode {
        let mut node = self;
        while let NodeValue::Anchor(anchor) = &node.value {
            node = &anchor.target;
        }
        node
    }

    /// Scalar text, looking through aliases.
    pub fn as_scalar(&self) -> Option<&str> {
        match &self.resolved().value {
            NodeValue::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[YamlNode]> {
        match &self.resolved().value {
            NodeValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&MappingNode> {
        match &self.resolved().value {
            NodeValue::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Mutable access to a mapping owned by this node. Aliased mappings are
    /// shared and therefore not reachable here.
    pub fn as_mapping_mut(&mut self) -> Option<&mut MappingNode> {
        match &mut self.value {
            NodeValue::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// True for a plain untagged `<<` key or a key tagged as a merge.
    pub fn is_merge_key(&self) -> bool {
        match (&self.tag, &self.value) {
            (Some(tag), _) => tag.ends_with("merge"),
            (
                None,
                NodeValue::Scalar {
                    value,
                    style: ScalarStyle::Plain,
                },
            ) => value == "<<",
            _ => false,
        }
    }

    /// Value of the first entry whose key is the scalar `key` (mappings only).
    pub fn get(&self, key: &str) -> Option<&YamlNode> {
        self.as_mapping()?.get(key)
    }
}

impl MappingNode {
    /// Value of the first entry with scalar key `key`.
    pub fn get(&self, key: &str) -> Option<&YamlNode> {
        self.entries
            .iter()
            .find(|e| e.key.as_scalar() == Some(key))
            .map(|e| &e.value)
    }

    /// Scalar keys in entry order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().filter_map(|e| e.key.as_scalar())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NodeTuple {
    pub fn new(key: YamlNode, value: YamlNode) -> Self {
        Self { key, value }
    }

    /// Range from the key start to the value end.
    pub fn range(&self) -> TextRange {
        self.key.range.cover(self.value.range)
    }
}
