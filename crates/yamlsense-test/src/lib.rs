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

//! Shared test fixtures and utilities for the YamlSense crates.
//!
//! # Quick Start
//!
//! ```rust
//! use yamlsense_test::{fixtures, MockEditor};
//!
//! // Canonical documents
//! let text = fixtures::nested_sequences();
//!
//! // Address offsets by snippet instead of counting characters
//! let editor = MockEditor::new("server:\n  port: 8080\n");
//! let offset = editor.start_of("port").unwrap();
//! assert_eq!(offset, 10);
//!
//! // Expected structure dumps as line lists
//! let expected = yamlsense_test::dump_lines(&["ROOT(0): ", "  DOC(0): "]);
//! assert_eq!(expected, "ROOT(0): \n  DOC(0): \n");
//! # let _ = text;
//! ```

/// Type alias for a list of fixtures as (name, yaml text) pairs.
pub type FixtureList = Vec<(&'static str, &'static str)>;

/// Canonical YAML documents.
pub mod fixtures;

/// Snippet-addressed editor buffer.
pub mod editor;

pub use editor::MockEditor;

/// Join expected dump lines, one per line with a trailing newline each.
pub fn dump_lines(lines: &[&str]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}
