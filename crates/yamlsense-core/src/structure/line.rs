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

//! Line reading and classification for the structural parser.

use crate::document::{Line, YamlDocument};
use regex::Regex;
use std::sync::OnceLock;

/// `---` or `...`, optional trailing whitespace and comment.
const DOCUMENT_SEPARATOR: &str = r"^(---|\.\.\.)\s*(#.*)?$";

/// A word character followed by word characters, dots or dashes, then a colon
/// that is either the last character or followed by a space.
const SIMPLE_KEY_LINE: &str = r"^\w[\w.-]*:( .*)?$";

/// A dash that is either the last character or followed by a space.
const SEQ_LINE: &str = r"^-( .*)?$";

/// Comments and directives ahead of the first document.
const SKIP_AT_START_OF_DOC: &str = r"^(\s*#|%)";

static DOCUMENT_SEPARATOR_RE: OnceLock<Regex> = OnceLock::new();
static SIMPLE_KEY_LINE_RE: OnceLock<Regex> = OnceLock::new();
static SEQ_LINE_RE: OnceLock<Regex> = OnceLock::new();
static SKIP_AT_START_OF_DOC_RE: OnceLock<Regex> = OnceLock::new();

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("valid line pattern"))
}

/// How a line is treated by the structural parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    DocumentSeparator,
    Key,
    Seq,
    Other,
}

/// Classify a line by its text after the indent mark, in priority order.
pub fn classify(line: &Line, doc: &YamlDocument) -> LineClass {
    let text = line.text_without_indent(doc);
    if pattern(&DOCUMENT_SEPARATOR_RE, DOCUMENT_SEPARATOR).is_match(text) {
        LineClass::DocumentSeparator
    } else if pattern(&SIMPLE_KEY_LINE_RE, SIMPLE_KEY_LINE).is_match(text) {
        LineClass::Key
    } else if pattern(&SEQ_LINE_RE, SEQ_LINE).is_match(text) {
        LineClass::Seq
    } else {
        LineClass::Other
    }
}

/// True for a leading comment or directive line. Matched on the full text.
pub fn is_skippable_at_start(line: &Line, doc: &YamlDocument) -> bool {
    pattern(&SKIP_AT_START_OF_DOC_RE, SKIP_AT_START_OF_DOC).is_match(line.text(doc))
}

/// True when the line (after its indent mark) is `---` or `...`.
pub fn is_document_separator(line: &Line, doc: &YamlDocument) -> bool {
    pattern(&DOCUMENT_SEPARATOR_RE, DOCUMENT_SEPARATOR).is_match(line.text_without_indent(doc))
}

/// Forward-only cursor over the lines of a document.
pub struct LineReader<'d> {
    doc: &'d YamlDocument,
    next_line: usize,
}

impl<'d> LineReader<'d> {
    pub fn new(doc: &'d YamlDocument) -> Self {
        Self { doc, next_line: 0 }
    }

    /// The next line without consuming it. `None` at end of input.
    pub fn peek(&self) -> Option<Line> {
        self.doc.line_at(self.next_line)
    }
}

impl Iterator for LineReader<'_> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        let line = self.doc.line_at(self.next_line)?;
        self.next_line += 1;
        Some(line)
    }
}
