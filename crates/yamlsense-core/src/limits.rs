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

//! Resource limits and parse options for semantic parsing.

/// Configurable limits for the semantic parser.
///
/// These bound the resources consumed when composing a node tree from
/// untrusted text. The structural parser is linear in the number of lines and
/// is not subject to them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Limits {
    /// Maximum document size in bytes (default: 64MB).
    pub max_document_size: usize,
    /// Maximum collection nesting depth (default: 256).
    pub max_nesting_depth: usize,
    /// Maximum number of alias nodes per file (default: 10k).
    pub max_aliases: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_document_size: 64 * 1024 * 1024, // 64MB
            max_nesting_depth: 256,
            max_aliases: 10_000,
        }
    }
}

impl Limits {
    /// Create limits with no restrictions (for testing).
    pub fn unlimited() -> Self {
        Self {
            max_document_size: usize::MAX,
            max_nesting_depth: usize::MAX,
            max_aliases: usize::MAX,
        }
    }
}

/// Options for building a semantic tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParseOptions {
    /// Security limits.
    pub limits: Limits,
    /// Flatten `<<` merge keys immediately after composition.
    pub resolve_merges: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            resolve_merges: false,
        }
    }
}

impl ParseOptions {
    /// Create a new builder for ParseOptions.
    ///
    /// # Examples
    ///
    /// ```
    /// use yamlsense_core::ParseOptions;
    ///
    /// let opts = ParseOptions::builder()
    ///     .max_depth(64)
    ///     .resolve_merges(true)
    ///     .build();
    /// assert_eq!(opts.limits.max_nesting_depth, 64);
    /// ```
    pub fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::new()
    }
}

/// Builder for ergonomic construction of ParseOptions.
#[derive(Debug, Clone)]
pub struct ParseOptionsBuilder {
    limits: Limits,
    resolve_merges: bool,
}

impl ParseOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
            resolve_merges: false,
        }
    }

    /// Set the maximum collection nesting depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.limits.max_nesting_depth = depth;
        self
    }

    /// Set the maximum document size in bytes.
    pub fn max_document_size(mut self, size: usize) -> Self {
        self.limits.max_document_size = size;
        self
    }

    /// Set the maximum number of alias nodes.
    pub fn max_aliases(mut self, count: usize) -> Self {
        self.limits.max_aliases = count;
        self
    }

    /// Replace all limits at once.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Flatten merge keys right after composing each document.
    pub fn resolve_merges(mut self, resolve: bool) -> Self {
        self.resolve_merges = resolve;
        self
    }

    /// Build the ParseOptions.
    pub fn build(self) -> ParseOptions {
        ParseOptions {
            limits: self.limits,
            resolve_merges: self.resolve_merges,
        }
    }
}

impl Default for ParseOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
