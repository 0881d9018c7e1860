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

use yamlsense_core::{parse_structure, StructureTree, YamlDocument};

/// An editor buffer for tests, addressed by snippets of its own text.
#[derive(Debug, Clone)]
pub struct MockEditor {
    doc: YamlDocument,
}

impl MockEditor {
    pub fn new(text: &str) -> Self {
        Self {
            doc: YamlDocument::new(text),
        }
    }

    /// Same text, identified as `uri` at `version`.
    pub fn versioned(text: &str, uri: &str, version: u64) -> Self {
        Self {
            doc: YamlDocument::new(text).with_uri(uri).with_version(version),
        }
    }

    pub fn document(&self) -> &YamlDocument {
        &self.doc
    }

    pub fn text(&self) -> &str {
        self.doc.text()
    }

    /// Offset of the first occurrence of `snippet`.
    pub fn start_of(&self, snippet: &str) -> Option<usize> {
        self.doc.text().find(snippet)
    }

    /// Offset just past the first occurrence of `snippet`.
    pub fn end_of(&self, snippet: &str) -> Option<usize> {
        self.start_of(snippet).map(|start| start + snippet.len())
    }

    /// Offset of the last occurrence of `snippet`.
    pub fn last_start_of(&self, snippet: &str) -> Option<usize> {
        self.doc.text().rfind(snippet)
    }

    pub fn parse_structure(&self) -> StructureTree {
        parse_structure(&self.doc)
    }
}
