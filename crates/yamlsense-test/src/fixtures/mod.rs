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

//! Canonical YAML documents.
//!
//! - **structure**: indentation shapes for the structural parser
//! - **semantic**: anchors, aliases and merge keys for the semantic tree

mod semantic;
mod structure;

pub use semantic::*;
pub use structure::*;

use crate::FixtureList;

/// Returns all fixtures for iteration.
///
/// Useful for running the same test across every document.
pub fn all() -> FixtureList {
    vec![
        ("simple", simple()),
        ("comments", comments()),
        ("siblings", siblings()),
        ("multi_docs", multi_docs()),
        ("root_sequence", root_sequence()),
        ("nested_sequences", nested_sequences()),
        ("inline_keys", inline_keys()),
        ("dotted_keys", dotted_keys()),
        ("mid_edit", mid_edit()),
        ("anchors", anchors()),
        ("merge_override", merge_override()),
        ("merge_list", merge_list()),
        ("merge_list_with_scalar", merge_list_with_scalar()),
        ("merge_scalar", merge_scalar()),
        ("merge_chain", merge_chain()),
        ("multi_doc_semantic", multi_doc_semantic()),
    ]
}
