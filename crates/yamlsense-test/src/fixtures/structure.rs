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

//! Documents exercising the structural parser.

/// Nested keys with a trailing newline.
pub fn simple() -> &'static str {
    "hello:\n  world:\n    message\n"
}

/// Leading, indented and trailing comments.
pub fn comments() -> &'static str {
    "#A comment\nhello:\n  #Another comment\n  world:\n    message\n"
}

/// Sibling keys at several levels, including a misindented value.
pub fn siblings() -> &'static str {
    "world:\n  europe:\n    france:\n      cheese\n    belgium:\n    beer\n  canada:\n    montreal: poutine\n    vancouver:\n      salmon\nmoon:\n  moonbase-alfa:\n    moonstone\n"
}

/// Three documents separated by `---`, closed by `...`.
pub fn multi_docs() -> &'static str {
    "world:\n  europe:\n    france:\n      cheese\n    belgium:\n    beer\n---\n  canada:\n    montreal: poutine\n    vancouver:\n      salmon\n---\nmoon:\n  moonbase-alfa:\n    moonstone\n...\n"
}

/// A sequence at the top level.
pub fn root_sequence() -> &'static str {
    "- foo\n- bar\n- zor"
}

/// Sequences of sequences under a key.
pub fn nested_sequences() -> &'static str {
    "foo:\n- - a\n  - b\n- - c\n  - d"
}

/// Sequence items that open mappings inline.
pub fn inline_keys() -> &'static str {
    "foo:\n  bar: 1\n  baz:\n    - x\n    - y: 2\n"
}

/// Keys containing dots, as in property-style configuration.
pub fn dotted_keys() -> &'static str {
    "logging:\n  level:\n    some.package: DEBUG\n"
}

/// Text mid-keystroke: a dangling key, a tab and a stray flow marker.
pub fn mid_edit() -> &'static str {
    "spring:\n  application:\n    name: demo\n  datas\n\tbad: tab\n  profiles: [dev\n"
}
