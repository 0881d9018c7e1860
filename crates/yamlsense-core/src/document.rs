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

//! Read-only line view over document text.
//!
//! [`YamlDocument`] owns the text (shared via `Arc`, so clones are cheap) and
//! a table of line extents computed once at construction. Every offset it
//! hands out or accepts is absolute to the whole document.
//!
//! Lines are split on `\n`. A `\r` immediately before the `\n` is not part of
//! the line extent. Text ending in `\n` has a final empty line, so an empty
//! document has exactly one line.

use crate::span::{SourcePos, TextRange};
use std::fmt;
use std::sync::Arc;

/// Indentation of a single line of text.
///
/// Returns the number of leading space characters, or `None` when the line is
/// blank or holds only a comment (a `#` before any other non-space character).
/// Tabs are not indentation: a tab ends the scan like any other character.
///
/// # Examples
///
/// ```
/// use yamlsense_core::indentation_of;
///
/// assert_eq!(indentation_of("   foo"), Some(3));
/// assert_eq!(indentation_of("    "), None);
/// assert_eq!(indentation_of("  # note"), None);
/// assert_eq!(indentation_of("\tfoo"), Some(0));
/// ```
pub fn indentation_of(line: &str) -> Option<usize> {
    for (i, b) in line.bytes().enumerate() {
        match b {
            b' ' => continue,
            b'#' => return None,
            b'\r' | b'\n' => return None,
            _ => return Some(i),
        }
    }
    None
}

/// A projected view of one physical line.
///
/// ```text
/// line = "    hello"
///         ^   ^    ^
///         |   |    end
///         |   indent mark
///         start
/// ```
///
/// The indent mark can be moved to the right with [`Line::move_indent_mark`]
/// to re-read the rest of a line as if it started further in, which keeps all
/// offsets absolute without slicing new strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Line {
    number: usize,
    start: usize,
    end: usize,
    indent: Option<usize>,
}

impl Line {
    /// Zero-based line number.
    #[inline]
    pub fn number(&self) -> usize {
        self.number
    }

    /// Offset of the first character of the line.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Offset just past the last character (line delimiter excluded).
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Indentation, or `None` for blank and comment-only lines.
    #[inline]
    pub fn indent(&self) -> Option<usize> {
        self.indent
    }

    /// Length of the line in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `start + max(0, indent)`.
    #[inline]
    pub fn indent_mark(&self) -> usize {
        self.start + self.indent.unwrap_or(0)
    }

    #[inline]
    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }

    /// Full text of the line.
    pub fn text<'d>(&self, doc: &'d YamlDocument) -> &'d str {
        doc.text_between(self.start, self.end)
    }

    /// Text from the indent mark to the end of the line.
    pub fn text_without_indent<'d>(&self, doc: &'d YamlDocument) -> &'d str {
        doc.text_between(self.indent_mark(), self.end)
    }

    /// The same line with its indent mark moved `by` columns to the right,
    /// never past the end of the line.
    pub fn move_indent_mark(&self, by: usize) -> Line {
        let indent = (self.indent.unwrap_or(0) + by).min(self.len());
        Line {
            indent: Some(indent),
            ..*self
        }
    }
}

/// A YAML document: text plus the identity used for caching.
#[derive(Clone)]
pub struct YamlDocument {
    uri: Option<Arc<str>>,
    version: u64,
    text: Arc<str>,
    /// Line extents as (start, end) with the delimiter excluded.
    line_offsets: Arc<[(usize, usize)]>,
}

impl YamlDocument {
    /// Create a document over `text` with no URI and version 0.
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text: Arc<str> = text.into();
        let line_offsets = compute_line_offsets(&text).into();
        Self {
            uri: None,
            version: 0,
            text,
            line_offsets,
        }
    }

    /// Attach a document identity (typically an editor URI).
    pub fn with_uri(mut self, uri: impl Into<Arc<str>>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Attach a document version. Versions grow monotonically per URI.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// The whole document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the document in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of lines. Never zero.
    pub fn line_count(&self) -> usize {
        self.line_offsets.len()
    }

    /// The line at zero-based index `n`, or `None` past the last line.
    pub fn line_at(&self, n: usize) -> Option<Line> {
        let &(start, end) = self.line_offsets.get(n)?;
        Some(Line {
            number: n,
            start,
            end,
            indent: indentation_of(&self.text[start..end]),
        })
    }

    /// Indentation of line `n`; `None` for blank, comment-only or missing lines.
    pub fn line_indentation(&self, n: usize) -> Option<usize> {
        self.line_at(n).and_then(|line| line.indent())
    }

    /// Iterate over all lines in order.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        (0..self.line_count()).filter_map(move |n| self.line_at(n))
    }

    /// Zero-based line containing `offset`. An offset on a line delimiter
    /// belongs to the line it terminates; `offset == len()` belongs to the
    /// last line.
    pub fn line_of_offset(&self, offset: usize) -> Option<usize> {
        if offset > self.text.len() {
            return None;
        }
        let idx = self
            .line_offsets
            .partition_point(|&(start, _)| start <= offset);
        Some(idx.saturating_sub(1))
    }

    /// 1-based line and column of `offset`.
    pub fn position_of(&self, offset: usize) -> Option<SourcePos> {
        let line = self.line_of_offset(offset)?;
        let (start, _) = self.line_offsets[line];
        Some(SourcePos::new(line + 1, offset - start + 1))
    }

    /// Offset of a 1-based position. Columns past the end of the line clamp
    /// to the line end.
    pub fn offset_of(&self, pos: SourcePos) -> Option<usize> {
        if pos.line() == 0 || pos.column() == 0 {
            return None;
        }
        let &(start, end) = self.line_offsets.get(pos.line() - 1)?;
        Some((start + pos.column() - 1).min(end))
    }

    /// Text between two offsets. Bounds are clamped to the document and
    /// rounded down to UTF-8 character boundaries, so this never panics.
    pub fn text_between(&self, start: usize, end: usize) -> &str {
        let start = floor_char_boundary(&self.text, start);
        let end = floor_char_boundary(&self.text, end).max(start);
        &self.text[start..end]
    }
}

impl fmt::Debug for YamlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YamlDocument")
            .field("uri", &self.uri)
            .field("version", &self.version)
            .field("len", &self.text.len())
            .field("lines", &self.line_offsets.len())
            .finish()
    }
}

impl From<&str> for YamlDocument {
    fn from(text: &str) -> Self {
        YamlDocument::new(text)
    }
}

impl From<String> for YamlDocument {
    fn from(text: String) -> Self {
        YamlDocument::new(text)
    }
}

fn floor_char_boundary(s: &str, pos: usize) -> usize {
    if pos >= s.len() {
        return s.len();
    }
    let mut pos = pos;
    while pos > 0 && !s.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

fn compute_line_offsets(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let estimated_lines = memchr::memchr_iter(b'\n', bytes).count() + 1;
    let mut offsets = Vec::with_capacity(estimated_lines);

    let mut start = 0;
    for nl in memchr::memchr_iter(b'\n', bytes) {
        let end = if nl > start && bytes[nl - 1] == b'\r' {
            nl - 1
        } else {
            nl
        };
        offsets.push((start, end));
        start = nl + 1;
    }

    // Last line (possibly empty when the text ends with a newline)
    offsets.push((start, bytes.len()));
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== indentation_of ====================

    #[test]
    fn test_indentation_counts_leading_spaces() {
        assert_eq!(indentation_of("foo"), Some(0));
        assert_eq!(indentation_of("  foo"), Some(2));
        assert_eq!(indentation_of("   foo"), Some(3));
    }

    #[test]
    fn test_indentation_blank_lines() {
        assert_eq!(indentation_of(""), None);
        assert_eq!(indentation_of("     "), None);
    }

    #[test]
    fn test_indentation_comment_lines() {
        assert_eq!(indentation_of("#comment"), None);
        assert_eq!(indentation_of("    # comment"), None);
    }

    #[test]
    fn test_indentation_comment_after_content() {
        assert_eq!(indentation_of("  foo # trailing"), Some(2));
    }

    #[test]
    fn test_tabs_are_not_indentation() {
        assert_eq!(indentation_of("\tfoo"), Some(0));
        assert_eq!(indentation_of("  \tfoo"), Some(2));
    }

    // ==================== line table ====================

    #[test]
    fn test_line_offsets_simple() {
        let doc = YamlDocument::new("a: 1\nb: 2");
        assert_eq!(doc.line_count(), 2);
        let l0 = doc.line_at(0).unwrap();
        assert_eq!((l0.start(), l0.end()), (0, 4));
        let l1 = doc.line_at(1).unwrap();
        assert_eq!((l1.start(), l1.end()), (5, 9));
        assert!(doc.line_at(2).is_none());
    }

    #[test]
    fn test_trailing_newline_gives_empty_last_line() {
        let doc = YamlDocument::new("a: 1\n");
        assert_eq!(doc.line_count(), 2);
        let last = doc.line_at(1).unwrap();
        assert!(last.is_empty());
        assert_eq!(last.indent(), None);
    }

    #[test]
    fn test_empty_document_has_one_line() {
        let doc = YamlDocument::new("");
        assert_eq!(doc.line_count(), 1);
        assert!(doc.line_at(0).unwrap().is_empty());
    }

    #[test]
    fn test_crlf_excluded_from_line() {
        let doc = YamlDocument::new("a: 1\r\nb: 2\r\n");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line_at(0).unwrap().text(&doc), "a: 1");
        assert_eq!(doc.line_at(1).unwrap().text(&doc), "b: 2");
        assert_eq!(doc.line_at(1).unwrap().start(), 6);
    }

    #[test]
    fn test_line_indentation() {
        let doc = YamlDocument::new("foo:\n  bar: 1\n  # c\n\n");
        assert_eq!(doc.line_indentation(0), Some(0));
        assert_eq!(doc.line_indentation(1), Some(2));
        assert_eq!(doc.line_indentation(2), None);
        assert_eq!(doc.line_indentation(3), None);
        assert_eq!(doc.line_indentation(99), None);
    }

    // ==================== offset conversions ====================

    #[test]
    fn test_line_of_offset() {
        let doc = YamlDocument::new("ab\ncd\n");
        assert_eq!(doc.line_of_offset(0), Some(0));
        assert_eq!(doc.line_of_offset(2), Some(0)); // the '\n'
        assert_eq!(doc.line_of_offset(3), Some(1));
        assert_eq!(doc.line_of_offset(6), Some(2));
        assert_eq!(doc.line_of_offset(7), None);
    }

    #[test]
    fn test_position_round_trip() {
        let doc = YamlDocument::new("foo:\n  bar: 1\n");
        let pos = doc.position_of(9).unwrap();
        assert_eq!(pos, SourcePos::new(2, 5));
        assert_eq!(doc.offset_of(pos), Some(9));
    }

    #[test]
    fn test_offset_of_clamps_column() {
        let doc = YamlDocument::new("ab\ncd");
        assert_eq!(doc.offset_of(SourcePos::new(1, 50)), Some(2));
        assert_eq!(doc.offset_of(SourcePos::new(3, 1)), None);
        assert_eq!(doc.offset_of(SourcePos::new(0, 1)), None);
    }

    #[test]
    fn test_text_between_clamps() {
        let doc = YamlDocument::new("hello");
        assert_eq!(doc.text_between(1, 3), "el");
        assert_eq!(doc.text_between(3, 100), "lo");
        assert_eq!(doc.text_between(4, 2), "");
    }

    #[test]
    fn test_text_between_respects_char_boundaries() {
        let doc = YamlDocument::new("a: é");
        // 'é' is two bytes starting at offset 3
        assert_eq!(doc.text_between(0, 4), "a: ");
        assert_eq!(doc.text_between(3, 5), "é");
    }

    // ==================== Line indent mark ====================

    #[test]
    fn test_move_indent_mark() {
        let doc = YamlDocument::new("  - foo: bar");
        let line = doc.line_at(0).unwrap();
        assert_eq!(line.indent(), Some(2));
        let moved = line.move_indent_mark(2);
        assert_eq!(moved.indent(), Some(4));
        assert_eq!(moved.text_without_indent(&doc), "foo: bar");
        assert_eq!(moved.start(), line.start());
    }

    #[test]
    fn test_move_indent_mark_clamps_to_line_length() {
        let doc = YamlDocument::new("-");
        let moved = doc.line_at(0).unwrap().move_indent_mark(2);
        assert_eq!(moved.indent(), Some(1));
        assert_eq!(moved.text_without_indent(&doc), "");
    }

    #[test]
    fn test_identity() {
        let doc = YamlDocument::new("a: 1")
            .with_uri("file:///app.yml")
            .with_version(4);
        assert_eq!(doc.uri(), Some("file:///app.yml"));
        assert_eq!(doc.version(), 4);
        assert!(format!("{:?}", doc).contains("file:///app.yml"));
    }
}
