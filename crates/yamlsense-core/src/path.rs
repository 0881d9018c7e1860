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

//! Paths addressing locations in a YAML tree.
//!
//! A [`YamlPath`] is an immutable list of [`YamlPathSegment`]s. The same path
//! can be walked over the structural tree and over the semantic tree, since
//! both implement [`YamlNavigable`].
//!
//! # Examples
//!
//! ```
//! use yamlsense_core::{YamlPath, YamlPathSegment};
//!
//! let path = YamlPath::from_property("server.port");
//! assert_eq!(path.len(), 2);
//! assert_eq!(path.to_prop_string(), "server.port");
//!
//! let item = path.append(YamlPathSegment::index(0));
//! assert_eq!(item.to_nav_string(), ".server.port[0]");
//! ```

use std::fmt;

/// One step in a [`YamlPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum YamlPathSegment {
    /// The value stored under a map key.
    ValAtKey(String),
    /// The item at a sequence index.
    ValAtIndex(usize),
    /// The key node itself (not its value).
    KeyAtKey(String),
}

impl YamlPathSegment {
    /// Segment selecting the value under `key`.
    pub fn key(key: impl Into<String>) -> Self {
        Self::ValAtKey(key.into())
    }

    /// Segment selecting sequence item `index`.
    pub fn index(index: usize) -> Self {
        Self::ValAtIndex(index)
    }

    /// Segment selecting the key node `key`.
    pub fn key_at(key: impl Into<String>) -> Self {
        Self::KeyAtKey(key.into())
    }

    /// The key string for key segments.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::ValAtKey(k) | Self::KeyAtKey(k) => Some(k),
            Self::ValAtIndex(_) => None,
        }
    }

    /// The index for index segments.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::ValAtIndex(i) => Some(*i),
            _ => None,
        }
    }

    /// Rendering used for the first segment of a property name.
    pub fn to_prop_string(&self) -> String {
        match self {
            Self::ValAtKey(k) | Self::KeyAtKey(k) => k.clone(),
            Self::ValAtIndex(i) => format!("[{}]", i),
        }
    }

    /// Rendering used for every segment after the first.
    ///
    /// Keys containing a `.` are bracketed so the result stays unambiguous.
    pub fn to_nav_string(&self) -> String {
        match self {
            Self::ValAtKey(k) | Self::KeyAtKey(k) => {
                if k.contains('.') {
                    format!("[{}]", k)
                } else {
                    format!(".{}", k)
                }
            }
            Self::ValAtIndex(i) => format!("[{}]", i),
        }
    }

    /// Lossless single-string form: `.key`, `[index]` or `&key`.
    pub fn encode(&self) -> String {
        match self {
            Self::ValAtKey(k) => format!(".{}", k),
            Self::ValAtIndex(i) => format!("[{}]", i),
            Self::KeyAtKey(k) => format!("&{}", k),
        }
    }

    /// Inverse of [`encode`](Self::encode).
    pub fn decode(encoded: &str) -> Option<Self> {
        if let Some(key) = encoded.strip_prefix('.') {
            return Some(Self::ValAtKey(key.to_string()));
        }
        if let Some(key) = encoded.strip_prefix('&') {
            return Some(Self::KeyAtKey(key.to_string()));
        }
        encoded
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .and_then(|digits| digits.parse().ok())
            .map(Self::ValAtIndex)
    }
}

impl fmt::Display for YamlPathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_nav_string())
    }
}

/// Anything a [`YamlPathSegment`] can be applied to.
///
/// Implemented by structural node handles and semantic node references.
///
/// The root of either tree is navigable too; its children are the documents
/// of the file, selected by index segments.
pub trait YamlNavigable: Sized {
    /// All children matching `segment`, in source order.
    ///
    /// More than one result is possible for key segments when a mapping holds
    /// duplicate keys, or when key aliases match several spellings.
    fn traverse_ambiguously(&self, segment: &YamlPathSegment) -> Vec<Self>;

    /// First child matching `segment`.
    fn traverse(&self, segment: &YamlPathSegment) -> Option<Self> {
        self.traverse_ambiguously(segment).into_iter().next()
    }
}

/// An ordered, immutable sequence of path segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YamlPath {
    segments: Vec<YamlPathSegment>,
}

impl YamlPath {
    /// The empty path.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<YamlPathSegment>) -> Self {
        Self { segments }
    }

    /// Split a dotted property name into key segments.
    pub fn from_property(name: &str) -> Self {
        name.split('.').map(YamlPathSegment::key).collect()
    }

    /// A single key segment; dots are not treated as separators.
    pub fn from_simple_property(name: &str) -> Self {
        Self::new(vec![YamlPathSegment::key(name)])
    }

    pub fn segments(&self) -> &[YamlPathSegment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, YamlPathSegment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment(&self, i: usize) -> Option<&YamlPathSegment> {
        self.segments.get(i)
    }

    pub fn last_segment(&self) -> Option<&YamlPathSegment> {
        self.segments.last()
    }

    pub fn append(&self, segment: YamlPathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    pub fn prepend(&self, segment: YamlPathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.push(segment);
        segments.extend_from_slice(&self.segments);
        Self { segments }
    }

    /// Concatenate two paths.
    pub fn then(&self, other: &YamlPath) -> Self {
        self.segments
            .iter()
            .chain(other.segments.iter())
            .cloned()
            .collect()
    }

    /// Drop the first `count` segments (empty when `count >= len`).
    pub fn drop_first(&self, count: usize) -> Self {
        self.segments.iter().skip(count).cloned().collect()
    }

    /// Drop the last `count` segments (empty when `count >= len`).
    pub fn drop_last(&self, count: usize) -> Self {
        let keep = self.segments.len().saturating_sub(count);
        Self::new(self.segments[..keep].to_vec())
    }

    /// Everything but the first segment.
    pub fn tail(&self) -> Self {
        self.drop_first(1)
    }

    /// True when the path ends on a key node.
    pub fn points_at_key(&self) -> bool {
        matches!(self.last_segment(), Some(YamlPathSegment::KeyAtKey(_)))
    }

    /// True when the path ends on a value (map value or sequence item).
    pub fn points_at_value(&self) -> bool {
        matches!(
            self.last_segment(),
            Some(YamlPathSegment::ValAtKey(_) | YamlPathSegment::ValAtIndex(_))
        )
    }

    /// The last segment read as a property name, if it is a key segment.
    pub fn bean_property_name(&self) -> Option<&str> {
        self.last_segment().and_then(YamlPathSegment::as_key)
    }

    /// Longest shared prefix of two paths.
    pub fn common_prefix(&self, other: &YamlPath) -> Self {
        self.segments
            .iter()
            .zip(other.segments.iter())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.clone())
            .collect()
    }

    pub fn starts_with(&self, prefix: &YamlPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Property-style rendering, e.g. `server.ports[0]`.
    pub fn to_prop_string(&self) -> String {
        let mut buf = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i == 0 {
                buf.push_str(&segment.to_prop_string());
            } else {
                buf.push_str(&segment.to_nav_string());
            }
        }
        buf
    }

    /// Navigation-style rendering, e.g. `.server.ports[0]`.
    pub fn to_nav_string(&self) -> String {
        self.segments.iter().map(|s| s.to_nav_string()).collect()
    }

    /// One string per segment, see [`YamlPathSegment::encode`].
    pub fn encode(&self) -> Vec<String> {
        self.segments.iter().map(YamlPathSegment::encode).collect()
    }

    /// Inverse of [`encode`](Self::encode). `None` if any segment is malformed.
    pub fn decode<S: AsRef<str>>(encoded: &[S]) -> Option<Self> {
        encoded
            .iter()
            .map(|s| YamlPathSegment::decode(s.as_ref()))
            .collect()
    }

    /// Every node reached by applying each segment to every result of the
    /// previous step.
    pub fn traverse_ambiguously<T: YamlNavigable>(&self, start: T) -> Vec<T> {
        let mut current = vec![start];
        for segment in &self.segments {
            current = current
                .iter()
                .flat_map(|node| node.traverse_ambiguously(segment))
                .collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }

    /// The first node [`traverse_ambiguously`](Self::traverse_ambiguously)
    /// would produce, found depth-first without materializing the rest.
    pub fn traverse<T: YamlNavigable>(&self, start: T) -> Option<T> {
        first_match(start, &self.segments)
    }
}

fn first_match<T: YamlNavigable>(node: T, segments: &[YamlPathSegment]) -> Option<T> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(node);
    };
    node.traverse_ambiguously(head)
        .into_iter()
        .find_map(|child| first_match(child, rest))
}

impl fmt::Display for YamlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_nav_string())
    }
}

impl FromIterator<YamlPathSegment> for YamlPath {
    fn from_iter<I: IntoIterator<Item = YamlPathSegment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<YamlPathSegment>> for YamlPath {
    fn from(segments: Vec<YamlPathSegment>) -> Self {
        Self::new(segments)
    }
}

impl<'a> IntoIterator for &'a YamlPath {
    type Item = &'a YamlPathSegment;
    type IntoIter = std::slice::Iter<'a, YamlPathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
