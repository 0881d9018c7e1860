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

//! Documents exercising anchors, aliases and merge keys.

/// An anchored mapping referenced through an alias.
pub fn anchors() -> &'static str {
    "base: &base\n  a: 1\n  b: 2\ncopy: *base\n"
}

/// An explicit key overriding a merged one.
pub fn merge_override() -> &'static str {
    "m:\n  a: 1\n  <<: {a: 2, b: 2}\n"
}

/// Two merge sources; the first listed wins.
pub fn merge_list() -> &'static str {
    "m:\n  <<: [{a: 1}, {a: 2}]\n"
}

/// A merge list containing a scalar that is not a mapping.
pub fn merge_list_with_scalar() -> &'static str {
    "m:\n  <<: [{a: 1}, \"oops\"]\n"
}

/// A merge key whose value is a scalar.
pub fn merge_scalar() -> &'static str {
    "m:\n  <<: nope\n  a: 1\n"
}

/// Anchored mappings merged into each other.
pub fn merge_chain() -> &'static str {
    "defaults: &defaults\n  adapter: postgres\n  host: localhost\ndev: &dev\n  <<: *defaults\n  database: dev_db\ntest:\n  <<: *dev\n  database: test_db\n"
}

/// Two documents for the semantic tree.
pub fn multi_doc_semantic() -> &'static str {
    "--- \nfoo: 1\n---\nbar: 2"
}
