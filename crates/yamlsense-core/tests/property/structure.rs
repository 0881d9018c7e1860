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

//! Property-based tests for the structural parser.

use proptest::prelude::*;
use yamlsense_core::{parse_structure, SNode, SNodeType, YamlDocument};

/// Lines shaped like YAML being typed: keys, items, comments, separators
/// and fragments, at assorted indentation.
fn yamlish_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ ]{0,6}[a-z][a-z.-]{0,5}:( [a-z0-9]{0,5})?",
        "[ ]{0,6}- [a-z]{0,4}",
        "[ ]{0,6}- [a-z]{1,4}: [a-z]{0,3}",
        "[ ]{0,6}-",
        "[ ]{0,6}#[a-z ]{0,5}",
        "---",
        "\\.\\.\\.",
        "[ ]{0,6}[a-z ]{0,6}",
    ]
}

fn yamlish_text() -> impl Strategy<Value = String> {
    prop::collection::vec(yamlish_line(), 0..25).prop_map(|lines| lines.join("\n"))
}

fn all_nodes<'t>(node: SNode<'t>, out: &mut Vec<SNode<'t>>) {
    out.push(node);
    for child in node.children() {
        all_nodes(child, out);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Property: parsing the same text twice gives identical trees.
    #[test]
    fn prop_parse_is_deterministic(text in yamlish_text()) {
        let doc = YamlDocument::new(text.as_str());
        prop_assert_eq!(parse_structure(&doc).dump(), parse_structure(&doc).dump());
    }

    /// Property: every node is reachable from ROOT and DOCs hang off ROOT.
    #[test]
    fn prop_every_node_has_parent_except_root(text in yamlish_text()) {
        let doc = YamlDocument::new(text.as_str());
        let tree = parse_structure(&doc);
        let mut nodes = Vec::new();
        all_nodes(tree.root(), &mut nodes);
        prop_assert_eq!(nodes.len(), tree.node_count());
        for node in &nodes {
            match node.kind() {
                SNodeType::Root => prop_assert!(node.parent().is_none()),
                SNodeType::Doc => prop_assert_eq!(node.parent(), Some(tree.root())),
                _ => {
                    let parent = node.parent();
                    prop_assert!(parent.is_some());
                    prop_assert!(parent.unwrap().children().any(|c| c == *node));
                }
            }
        }
    }

    /// Property: find(o) contains o half-open and is the smallest
    /// containing node.
    #[test]
    fn prop_find_is_minimal_and_half_open(text in yamlish_text(), pick in 0usize..1000) {
        let doc = YamlDocument::new(text.as_str());
        let tree = parse_structure(&doc);
        let offset = pick % (doc.len() + 1);

        let mut nodes = Vec::new();
        all_nodes(tree.root(), &mut nodes);
        let containing: Vec<_> = nodes.iter().filter(|n| n.tree_contains(offset)).collect();

        match tree.find(offset) {
            None => prop_assert!(containing.is_empty()),
            Some(found) => {
                prop_assert!(found.start() <= offset && offset < found.tree_end());
                for other in containing {
                    prop_assert!(other.start() <= found.start());
                    prop_assert!(found.tree_end() <= other.tree_end());
                }
            }
        }
    }

    /// Property: a KEY's key is the node text before its first colon, and
    /// is_in_key holds exactly from the start through the colon.
    #[test]
    fn prop_key_and_colon(text in yamlish_text()) {
        let doc = YamlDocument::new(text.as_str());
        let tree = parse_structure(&doc);
        let mut nodes = Vec::new();
        all_nodes(tree.root(), &mut nodes);
        for node in nodes.iter().filter(|n| n.kind() == SNodeType::Key) {
            let node_text = node.text();
            let colon = node_text.find(':').unwrap();
            prop_assert_eq!(node.key().unwrap(), &node_text[..colon]);
            prop_assert_eq!(node.colon_offset(), Some(node.start() + colon));
            for o in node.start().saturating_sub(1)..=node.node_end() {
                let expected = node.start() <= o && o <= node.start() + colon;
                prop_assert_eq!(node.is_in_key(o), expected);
            }
        }
    }

    /// Property: a child's tree range lies inside its parent's.
    #[test]
    fn prop_children_nest_in_parent(text in yamlish_text()) {
        let doc = YamlDocument::new(text.as_str());
        let tree = parse_structure(&doc);
        let mut nodes = Vec::new();
        all_nodes(tree.root(), &mut nodes);
        for node in &nodes {
            for child in node.children() {
                prop_assert!(child.tree_end() <= node.tree_end());
                if node.kind() != SNodeType::Root {
                    prop_assert!(node.start() <= child.start());
                }
            }
        }
    }

    /// Property: the full path of any KEY or SEQ node leads back to it
    /// unless an earlier sibling shares its key.
    #[test]
    fn prop_full_path_round_trips(text in yamlish_text()) {
        let doc = YamlDocument::new(text.as_str());
        let tree = parse_structure(&doc);
        let mut nodes = Vec::new();
        all_nodes(tree.root(), &mut nodes);
        for node in nodes.iter().filter(|n| matches!(n.kind(), SNodeType::Key | SNodeType::Seq)) {
            let ambiguous = node.path_nodes().iter().any(|n| {
                n.key().map_or(false, |k| {
                    n.parent().map_or(false, |p| p.children_with_key(k).len() > 1)
                })
            });
            if !ambiguous {
                prop_assert_eq!(node.full_path().traverse(tree.root()), Some(*node));
            }
        }
    }
}
