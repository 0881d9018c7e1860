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

//! Merge key (`<<`) flattening.
//!
//! A mapping holding merge keys is rewritten in place: each merge key is
//! replaced by the entries of its target mapping (or of each mapping in a
//! target list), and the merge flag is cleared.
//!
//! # Precedence
//!
//! - the mapping's own keys win over merged keys, wherever the merge key
//!   appears;
//! - among merge targets, the first listed wins;
//! - a key repeated by the mapping itself replaces the earlier slot.
//!
//! ```text
//! m:                      m:
//!   a: 1                    a: 1
//!   <<: {a: 2, b: 2}  =>    b: 2
//! ```
//!
//! Badly shaped targets are reported to a [`ProblemCollector`] and skipped.
//! Entries whose key is not a scalar cannot be deduplicated and are dropped.

use crate::node::{NodeTuple, NodeValue, YamlNode};
use crate::problems::{ProblemCollector, ProblemKind, SchemaProblem};
use std::collections::HashMap;
use tracing::trace;

/// Flattens merge keys, reporting badly shaped targets.
pub struct MergeResolver<'c> {
    problems: &'c mut dyn ProblemCollector,
}

/// Scratch state of one `flatten_mapping` call.
#[derive(Default)]
struct MergeState {
    /// Scalar key to position in `values`.
    key_index: HashMap<String, usize>,
    values: Vec<NodeTuple>,
}

impl<'c> MergeResolver<'c> {
    pub fn new(problems: &'c mut dyn ProblemCollector) -> Self {
        Self { problems }
    }

    /// Flatten `node` if it is a mapping still flagged as merged. Calling
    /// this again on the same node does nothing.
    pub fn flatten_mapping(&mut self, node: &mut YamlNode) {
        let Some(mapping) = node.as_mapping_mut() else {
            return;
        };
        if !mapping.merged {
            return;
        }

        let own = std::mem::take(&mut mapping.entries);
        let before = own.len();
        let mut state = MergeState::default();
        self.merge_entries(own, true, &mut state);

        trace!(before, after = state.values.len(), "flattened merge keys");
        mapping.entries = state.values;
        mapping.merged = false;
    }

    /// Flatten every mapping under `node`, children first.
    pub fn flatten_all(&mut self, node: &mut YamlNode) {
        match &mut node.value {
            NodeValue::Mapping(mapping) => {
                for entry in &mut mapping.entries {
                    self.flatten_all(&mut entry.value);
                }
            }
            NodeValue::Sequence(items) => {
                for item in items {
                    self.flatten_all(item);
                }
            }
            NodeValue::Scalar { .. } | NodeValue::Anchor(_) => return,
        }
        self.flatten_mapping(node);
    }

    fn merge_entries(&mut self, entries: Vec<NodeTuple>, preferred: bool, state: &mut MergeState) {
        for entry in entries {
            if entry.key.is_merge_key() {
                self.merge_target(&entry.value, state);
                continue;
            }
            let Some(key) = entry.key.as_scalar().map(str::to_owned) else {
                continue;
            };
            match state.key_index.get(&key) {
                None => {
                    state.values.push(entry);
                    state.key_index.insert(key, state.values.len() - 1);
                }
                Some(&slot) if preferred => state.values[slot] = entry,
                Some(_) => {}
            }
        }
    }

    fn merge_target(&mut self, value: &YamlNode, state: &mut MergeState) {
        match &value.resolved().value {
            NodeValue::Mapping(target) => {
                self.merge_entries(target.entries.clone(), false, state);
            }
            NodeValue::Sequence(items) => {
                for item in items {
                    match &item.resolved().value {
                        NodeValue::Mapping(target) => {
                            self.merge_entries(target.entries.clone(), false, state);
                        }
                        _ => self.problems.accept(SchemaProblem::at(
                            ProblemKind::MergeTargetNotMapping,
                            format!(
                                "expected a mapping for merging, but found {}",
                                item.resolved().kind()
                            ),
                            item,
                        )),
                    }
                }
            }
            _ => self.problems.accept(SchemaProblem::at(
                ProblemKind::MergeTargetInvalid,
                format!(
                    "expected a mapping or list of mappings for merging, but found {}",
                    value.resolved().kind()
                ),
                value,
            )),
        }
    }
}

/// Flatten the merge keys of one mapping node.
///
/// # Examples
///
/// ```
/// use yamlsense_ast::{flatten_mapping, parse_ast, ProblemList};
/// use yamlsense_core::YamlDocument;
///
/// let mut ast = parse_ast(&YamlDocument::new("a: 1\n<<: {a: 2, b: 2}\n")).unwrap();
/// let mut problems = ProblemList::new();
/// flatten_mapping(&mut ast.nodes_mut()[0], &mut problems);
///
/// let keys: Vec<_> = ast.nodes()[0].as_mapping().unwrap().keys().collect();
/// assert_eq!(keys, vec!["a", "b"]);
/// assert_eq!(ast.nodes()[0].get("a").and_then(|n| n.as_scalar()), Some("1"));
/// ```
pub fn flatten_mapping(node: &mut YamlNode, problems: &mut dyn ProblemCollector) {
    MergeResolver::new(problems).flatten_mapping(node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{AnchorNode, MappingNode};
    use crate::problems::ProblemList;
    use std::sync::Arc;
    use yamlsense_core::TextRange;

    // Hand-built nodes keep these tests independent of the composer.

    fn s(value: &str) -> YamlNode {
        YamlNode::scalar(value, TextRange::new(0, value.len()))
    }

    fn map(pairs: Vec<(&str, YamlNode)>) -> YamlNode {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| NodeTuple::new(s(k), v))
            .collect();
        YamlNode::mapping(entries, TextRange::new(0, 1))
    }

    fn alias(target: YamlNode) -> YamlNode {
        YamlNode::new(
            NodeValue::Anchor(AnchorNode {
                name: "t".into(),
                target: Arc::new(target),
            }),
            TextRange::new(0, 2),
        )
    }

    fn flat(node: &mut YamlNode) -> ProblemList {
        let mut problems = ProblemList::new();
        flatten_mapping(node, &mut problems);
        problems
    }

    fn pairs(node: &YamlNode) -> Vec<(String, String)> {
        node.as_mapping()
            .unwrap()
            .entries
            .iter()
            .map(|e| {
                (
                    e.key.as_scalar().unwrap_or("?").to_string(),
                    e.value.as_scalar().unwrap_or("?").to_string(),
                )
            })
            .collect()
    }

    fn p(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    // ==================== Precedence ====================

    #[test]
    fn test_own_key_before_merge_wins() {
        let mut node = map(vec![
            ("a", s("1")),
            ("<<", map(vec![("a", s("2")), ("b", s("2"))])),
        ]);
        assert!(flat(&mut node).is_empty());
        assert_eq!(pairs(&node), vec![p("a", "1"), p("b", "2")]);
    }

    #[test]
    fn test_own_key_after_merge_wins_in_merged_slot() {
        let mut node = map(vec![
            ("<<", map(vec![("a", s("2")), ("b", s("2"))])),
            ("a", s("1")),
        ]);
        flat(&mut node);
        assert_eq!(pairs(&node), vec![p("a", "1"), p("b", "2")]);
    }

    #[test]
    fn test_first_listed_target_wins() {
        let list = YamlNode::sequence(
            vec![map(vec![("a", s("1"))]), map(vec![("a", s("2"))])],
            TextRange::new(0, 1),
        );
        let mut node = map(vec![("<<", list)]);
        flat(&mut node);
        assert_eq!(pairs(&node), vec![p("a", "1")]);
    }

    #[test]
    fn test_repeated_own_key_overrides() {
        let mut node = map(vec![
            ("<<", map(vec![("x", s("0"))])),
            ("a", s("1")),
            ("a", s("2")),
        ]);
        flat(&mut node);
        assert_eq!(pairs(&node), vec![p("x", "0"), p("a", "2")]);
    }

    #[test]
    fn test_nested_merge_in_target_is_followed() {
        let inner = map(vec![("a", s("inner")), ("c", s("3"))]);
        let outer = map(vec![("<<", inner), ("a", s("outer"))]);
        let mut node = map(vec![("<<", outer), ("b", s("2"))]);
        flat(&mut node);
        // Inside a target nothing is preferred, so the earlier "inner" value stays
        assert_eq!(pairs(&node), vec![p("a", "inner"), p("c", "3"), p("b", "2")]);
    }

    #[test]
    fn test_alias_targets_are_resolved() {
        let defaults = map(vec![("a", s("1")), ("b", s("1"))]);
        let mut node = map(vec![("<<", alias(defaults)), ("b", s("2"))]);
        flat(&mut node);
        assert_eq!(pairs(&node), vec![p("a", "1"), p("b", "2")]);
    }

    #[test]
    fn test_alias_targets_inside_list() {
        let list = YamlNode::sequence(
            vec![alias(map(vec![("a", s("1"))])), map(vec![("b", s("2"))])],
            TextRange::new(0, 1),
        );
        let mut node = map(vec![("<<", list)]);
        flat(&mut node);
        assert_eq!(pairs(&node), vec![p("a", "1"), p("b", "2")]);
    }

    // ==================== Problems ====================

    #[test]
    fn test_non_mapping_list_element_is_reported() {
        let list = YamlNode::sequence(
            vec![map(vec![("a", s("1"))]), YamlNode::scalar("oops", TextRange::new(20, 26))],
            TextRange::new(0, 1),
        );
        let mut node = map(vec![("<<", list)]);
        let problems = flat(&mut node);

        assert_eq!(problems.len(), 1);
        let problem = &problems.problems()[0];
        assert_eq!(problem.kind, ProblemKind::MergeTargetNotMapping);
        assert_eq!((problem.start, problem.end), (20, 26));
        assert!(problem.message.contains("scalar"));
        assert_eq!(pairs(&node), vec![p("a", "1")]);
    }

    #[test]
    fn test_scalar_target_is_reported_and_skipped() {
        let mut node = map(vec![("<<", s("nope")), ("a", s("1"))]);
        let problems = flat(&mut node);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems.problems()[0].kind, ProblemKind::MergeTargetInvalid);
        assert_eq!(pairs(&node), vec![p("a", "1")]);
    }

    // ==================== Flag handling ====================

    #[test]
    fn test_flatten_is_idempotent() {
        let mut node = map(vec![
            ("a", s("1")),
            ("<<", map(vec![("a", s("2")), ("b", s("2"))])),
        ]);
        flat(&mut node);
        let once = node.clone();
        flat(&mut node);
        assert_eq!(node, once);
        assert!(!node.as_mapping().unwrap().merged);
    }

    #[test]
    fn test_unmerged_mapping_is_untouched() {
        let key = YamlNode::sequence(vec![], TextRange::new(0, 1));
        let mut node = YamlNode::new(
            NodeValue::Mapping(MappingNode {
                entries: vec![NodeTuple::new(key, s("x"))],
                merged: false,
            }),
            TextRange::new(0, 1),
        );
        let before = node.clone();
        flat(&mut node);
        // Complex keys survive when there is nothing to merge
        assert_eq!(node, before);
    }

    #[test]
    fn test_non_scalar_keys_dropped_when_merging() {
        let key = YamlNode::sequence(vec![], TextRange::new(0, 1));
        let mut node = map(vec![("<<", map(vec![("a", s("1"))]))]);
        node.as_mapping_mut()
            .unwrap()
            .entries
            .push(NodeTuple::new(key, s("x")));
        flat(&mut node);
        assert_eq!(pairs(&node), vec![p("a", "1")]);
    }

    #[test]
    fn test_flatten_all_reaches_nested_mappings() {
        let nested = map(vec![("<<", map(vec![("a", s("1"))]))]);
        let items = YamlNode::sequence(vec![nested], TextRange::new(0, 1));
        let mut root = map(vec![("list", items)]);
        let mut problems = ProblemList::new();
        MergeResolver::new(&mut problems).flatten_all(&mut root);

        let item = &root.get("list").unwrap().as_sequence().unwrap()[0];
        assert_eq!(pairs(item), vec![p("a", "1")]);
    }

    #[test]
    fn test_scalar_is_ignored() {
        let mut node = s("plain");
        assert!(flat(&mut node).is_empty());
        assert_eq!(node, s("plain"));
    }
}
