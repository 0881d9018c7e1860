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

//! Semantic tree composition.
//!
//! The conforming parser emits a flat event stream. The composer folds it
//! into [`YamlNode`]s, one root node per document, tracking anchors so that
//! aliases can share the anchored node. Event markers count characters; node
//! ranges are converted to byte offsets so they line up with
//! [`YamlDocument`] offsets.

use crate::merge::MergeResolver;
use crate::node::{AnchorNode, NodeTuple, NodeValue, ScalarStyle, YamlNode};
use crate::problems::SchemaProblem;
use crate::tree::YamlFileAst;
use saphyr_parser::{Event, Parser, ScalarStyle as EventStyle, ScanError, Span, Tag};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use yamlsense_core::{Limits, ParseOptions, TextRange, YamlDocument, YamlError, YamlResult};

/// How far (in characters) to look back from a node for its `&anchor`.
const ANCHOR_LOOKBEHIND: usize = 256;

/// Parse `doc` into a semantic tree with default options.
///
/// # Examples
///
/// ```
/// use yamlsense_ast::parse_ast;
/// use yamlsense_core::YamlDocument;
///
/// let ast = parse_ast(&YamlDocument::new("a: 1\n---\nb: [x, y]\n")).unwrap();
/// assert_eq!(ast.nodes().len(), 2);
/// assert_eq!(ast.nodes()[0].get("a").and_then(|n| n.as_scalar()), Some("1"));
/// ```
pub fn parse_ast(doc: &YamlDocument) -> YamlResult<YamlFileAst> {
    parse_ast_with_options(doc, &ParseOptions::default())
}

/// Parse `doc` into a semantic tree.
///
/// # Errors
///
/// - `Syntax` when the text is not valid YAML
/// - `Alias` for an undefined alias or an alias to a node that contains it
/// - `Security` when a [`Limits`] bound is exceeded
pub fn parse_ast_with_options(
    doc: &YamlDocument,
    options: &ParseOptions,
) -> YamlResult<YamlFileAst> {
    let text = doc.text();
    let limits = &options.limits;
    if text.len() > limits.max_document_size {
        return Err(YamlError::security(
            format!(
                "document size {} bytes exceeds limit of {}",
                text.len(),
                limits.max_document_size
            ),
            1,
        ));
    }

    let offsets = Offsets::new(text);
    let events = collect_events(text, &offsets)?;
    let mut composer = Composer::new(offsets, limits);
    let mut nodes = composer.compose_stream(&mut EventCursor::new(&events))?;

    let mut problems: Vec<SchemaProblem> = Vec::new();
    if options.resolve_merges {
        let mut resolver = MergeResolver::new(&mut problems);
        for node in &mut nodes {
            resolver.flatten_all(node);
        }
    }

    debug!(
        uri = doc.uri().unwrap_or("<none>"),
        documents = nodes.len(),
        aliases = composer.alias_count,
        problems = problems.len(),
        "composed semantic tree"
    );
    Ok(YamlFileAst::new(doc.clone(), nodes).with_problems(problems))
}

fn collect_events<'a>(text: &'a str, offsets: &Offsets<'_>) -> YamlResult<Vec<(Event<'a>, Span)>> {
    let mut events = Vec::new();
    for result in Parser::new_from_str(text) {
        let (event, span) = result.map_err(|err| scan_error(&err, offsets))?;
        events.push((event, span));
    }
    Ok(events)
}

fn scan_error(err: &ScanError, offsets: &Offsets<'_>) -> YamlError {
    let marker = err.marker();
    let message = err.info().to_string();
    // The scanner resolves aliases itself and rejects unknown ones
    let error = if message.contains("unknown anchor") {
        YamlError::alias(message, marker.line())
    } else {
        YamlError::syntax(message, marker.line())
    };
    error
        .with_column(marker.col() + 1)
        .with_offset(offsets.byte(marker.index()))
}

/// Char index to byte offset conversion. ASCII text maps one to one.
struct Offsets<'a> {
    text: &'a str,
    char_starts: Option<Vec<usize>>,
}

impl<'a> Offsets<'a> {
    fn new(text: &'a str) -> Self {
        let char_starts = (!text.is_ascii()).then(|| {
            let mut starts: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
            starts.push(text.len());
            starts
        });
        Self { text, char_starts }
    }

    fn byte(&self, char_index: usize) -> usize {
        match &self.char_starts {
            None => char_index.min(self.text.len()),
            Some(starts) => starts.get(char_index).copied().unwrap_or(self.text.len()),
        }
    }
}

struct EventCursor<'e, 'a> {
    events: &'e [(Event<'a>, Span)],
    pos: usize,
}

impl<'e, 'a> EventCursor<'e, 'a> {
    fn new(events: &'e [(Event<'a>, Span)]) -> Self {
        Self { events, pos: 0 }
    }

    fn peek(&self) -> Option<&'e (Event<'a>, Span)> {
        self.events.get(self.pos)
    }

    fn next(&mut self) -> Option<&'e (Event<'a>, Span)> {
        let item = self.events.get(self.pos);
        if item.is_some() {
            self.pos += 1;
        }
        item
    }
}

enum AnchorState {
    /// The anchored node is still being composed.
    Composing(String),
    Ready(String, Arc<YamlNode>),
}

struct Composer<'a> {
    offsets: Offsets<'a>,
    limits: &'a Limits,
    anchors: HashMap<usize, AnchorState>,
    alias_count: usize,
    depth: usize,
}

impl<'a> Composer<'a> {
    fn new(offsets: Offsets<'a>, limits: &'a Limits) -> Self {
        Self {
            offsets,
            limits,
            anchors: HashMap::new(),
            alias_count: 0,
            depth: 0,
        }
    }

    fn compose_stream(&mut self, cursor: &mut EventCursor<'_, '_>) -> YamlResult<Vec<YamlNode>> {
        let mut nodes = Vec::new();
        while let Some((event, span)) = cursor.next() {
            match event {
                Event::StreamEnd => break,
                Event::DocumentStart(_) => nodes.push(self.compose_document(cursor, span)?),
                _ => {}
            }
        }
        Ok(nodes)
    }

    fn compose_document(
        &mut self,
        cursor: &mut EventCursor<'_, '_>,
        start: &Span,
    ) -> YamlResult<YamlNode> {
        let node = match cursor.peek() {
            // An empty document still occupies a slot in the document list
            Some((Event::DocumentEnd, _)) | None => {
                YamlNode::scalar("", TextRange::empty(self.offsets.byte(start.end.index())))
            }
            Some(_) => self.compose_node(cursor)?,
        };
        if let Some((Event::DocumentEnd, _)) = cursor.peek() {
            cursor.next();
        }
        Ok(node)
    }

    fn compose_node(&mut self, cursor: &mut EventCursor<'_, '_>) -> YamlResult<YamlNode> {
        let Some((event, span)) = cursor.next() else {
            return Err(YamlError::syntax("unexpected end of event stream", 0));
        };
        match event {
            Event::Scalar(value, style, anchor_id, tag) => {
                let mut node = YamlNode::new(
                    NodeValue::Scalar {
                        value: value.to_string(),
                        style: scalar_style(*style),
                    },
                    self.scalar_range(span, *style),
                );
                node.tag = tag.as_deref().map(tag_name);
                Ok(self.finish_anchor(node, *anchor_id, span))
            }
            Event::SequenceStart(anchor_id, tag) => {
                self.begin_anchor(*anchor_id, span);
                self.enter(span)?;
                let mut items = Vec::new();
                let end = loop {
                    match cursor.peek() {
                        Some((Event::SequenceEnd, end)) => {
                            cursor.next();
                            break end;
                        }
                        _ => items.push(self.compose_node(cursor)?),
                    }
                };
                self.depth -= 1;
                let mut node = YamlNode::sequence(items, self.collection_range(span, end));
                node.tag = tag.as_deref().map(tag_name);
                Ok(self.finish_anchor(node, *anchor_id, span))
            }
            Event::MappingStart(anchor_id, tag) => {
                self.begin_anchor(*anchor_id, span);
                self.enter(span)?;
                let mut entries = Vec::new();
                let end = loop {
                    match cursor.peek() {
                        Some((Event::MappingEnd, end)) => {
                            cursor.next();
                            break end;
                        }
                        _ => {
                            let key = self.compose_node(cursor)?;
                            let value = self.compose_node(cursor)?;
                            entries.push(NodeTuple::new(key, value));
                        }
                    }
                };
                self.depth -= 1;
                let mut node = YamlNode::mapping(entries, self.collection_range(span, end));
                node.tag = tag.as_deref().map(tag_name);
                Ok(self.finish_anchor(node, *anchor_id, span))
            }
            Event::Alias(id) => self.alias(*id, span),
            _ => Err(self.locate(YamlError::syntax("unexpected event", span.start.line()), span)),
        }
    }

    fn alias(&mut self, id: usize, span: &Span) -> YamlResult<YamlNode> {
        self.alias_count += 1;
        if self.alias_count > self.limits.max_aliases {
            let err = YamlError::security(
                format!("too many aliases: exceeds limit of {}", self.limits.max_aliases),
                span.start.line(),
            );
            return Err(self.locate(err, span));
        }
        match self.anchors.get(&id) {
            Some(AnchorState::Ready(name, target)) => Ok(YamlNode::new(
                NodeValue::Anchor(AnchorNode {
                    name: name.clone(),
                    target: Arc::clone(target),
                }),
                self.range(span),
            )),
            Some(AnchorState::Composing(name)) => {
                let err = YamlError::alias(
                    format!("alias *{} refers to a node that contains it", name),
                    span.start.line(),
                );
                Err(self.locate(err, span))
            }
            None => {
                let err = YamlError::alias("alias refers to an unknown anchor", span.start.line());
                Err(self.locate(err, span))
            }
        }
    }

    fn enter(&mut self, span: &Span) -> YamlResult<()> {
        self.depth += 1;
        if self.depth > self.limits.max_nesting_depth {
            let err = YamlError::security(
                format!(
                    "nesting depth {} exceeds limit of {}",
                    self.depth, self.limits.max_nesting_depth
                ),
                span.start.line(),
            );
            return Err(self.locate(err, span));
        }
        Ok(())
    }

    fn begin_anchor(&mut self, id: usize, span: &Span) {
        if id > 0 {
            let name = self.anchor_name(id, span);
            self.anchors.insert(id, AnchorState::Composing(name));
        }
    }

    fn finish_anchor(&mut self, mut node: YamlNode, id: usize, span: &Span) -> YamlNode {
        if id == 0 {
            return node;
        }
        let name = match self.anchors.remove(&id) {
            Some(AnchorState::Composing(name)) | Some(AnchorState::Ready(name, _)) => name,
            None => self.anchor_name(id, span),
        };
        node.anchor = Some(name.clone());
        self.anchors
            .insert(id, AnchorState::Ready(name, Arc::new(node.clone())));
        node
    }

    /// Recover the `&name` the parser only reports as a number.
    fn anchor_name(&self, id: usize, span: &Span) -> String {
        let text = self.offsets.text;
        let start = self.offsets.byte(span.start.index());
        let from = self
            .offsets
            .byte(span.start.index().saturating_sub(ANCHOR_LOOKBEHIND));
        let candidate = text[start..]
            .strip_prefix('&')
            .or_else(|| text[from..start].rfind('&').map(|i| &text[from + i + 1..]));
        candidate
            .map(|rest| rest.chars().take_while(|c| is_anchor_char(*c)).collect::<String>())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("anchor{}", id))
    }

    fn range(&self, span: &Span) -> TextRange {
        TextRange::new(
            self.offsets.byte(span.start.index()),
            self.offsets.byte(span.end.index()),
        )
    }

    /// Quoted scalars cover their delimiters, whichever way the parser
    /// reported them.
    fn scalar_range(&self, span: &Span, style: EventStyle) -> TextRange {
        let mut range = self.range(span);
        let quote = match style {
            EventStyle::SingleQuoted => b'\'',
            EventStyle::DoubleQuoted => b'"',
            _ => return range,
        };
        let bytes = self.offsets.text.as_bytes();
        if range.start > 0 && bytes[range.start - 1] == quote {
            range.start -= 1;
        }
        let closed = range.end > range.start + 1 && bytes[range.end - 1] == quote;
        if !closed && bytes.get(range.end) == Some(&quote) {
            range.end += 1;
        }
        range
    }

    fn collection_range(&self, start: &Span, end: &Span) -> TextRange {
        TextRange::new(
            self.offsets.byte(start.start.index()),
            self.offsets.byte(end.end.index()),
        )
    }

    fn locate(&self, err: YamlError, span: &Span) -> YamlError {
        err.with_column(span.start.col() + 1)
            .with_offset(self.offsets.byte(span.start.index()))
    }
}

fn scalar_style(style: EventStyle) -> ScalarStyle {
    match style {
        EventStyle::SingleQuoted => ScalarStyle::SingleQuoted,
        EventStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
        EventStyle::Literal => ScalarStyle::Literal,
        EventStyle::Folded => ScalarStyle::Folded,
        _ => ScalarStyle::Plain,
    }
}

fn tag_name(tag: &Tag) -> String {
    format!("{}{}", tag.handle, tag.suffix)
}

fn is_anchor_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '[' | ']' | '{' | '}' | ',')
}
