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

//! Schema problems and the sink they are reported into.
//!
//! Problems are not errors: the code reporting them carries on with whatever
//! input remains. Severity and presentation belong to the collector.

use crate::node::YamlNode;
use std::fmt;
use yamlsense_core::TextRange;

/// Kind of a schema problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    /// An element of a `<<: [...]` list is not a mapping.
    MergeTargetNotMapping,
    /// A `<<` value is neither a mapping nor a list of mappings.
    MergeTargetInvalid,
}

impl ProblemKind {
    /// Stable identifier for filtering and configuration.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MergeTargetNotMapping => "merge-target-not-mapping",
            Self::MergeTargetInvalid => "merge-target-invalid",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A problem located in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaProblem {
    pub kind: ProblemKind,
    pub message: String,
    /// Start offset of the offending node.
    pub start: usize,
    /// End offset (exclusive) of the offending node.
    pub end: usize,
}

impl SchemaProblem {
    pub fn new(kind: ProblemKind, message: impl Into<String>, range: TextRange) -> Self {
        Self {
            kind,
            message: message.into(),
            start: range.start,
            end: range.end,
        }
    }

    /// A problem spanning `node`.
    pub fn at(kind: ProblemKind, message: impl Into<String>, node: &YamlNode) -> Self {
        Self::new(kind, message, node.range)
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }
}

impl fmt::Display for SchemaProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}..{}]: {}", self.kind, self.start, self.end, self.message)
    }
}

/// Sink for schema problems.
///
/// A reporting pass calls `begin_collecting` once, `accept` for every
/// problem, then `end_collecting`.
pub trait ProblemCollector {
    fn begin_collecting(&mut self) {}

    fn accept(&mut self, problem: SchemaProblem);

    fn end_collecting(&mut self) {}
}

/// Collects problems into a list. `begin_collecting` discards the problems of
/// the previous pass.
#[derive(Debug, Clone, Default)]
pub struct ProblemList {
    problems: Vec<SchemaProblem>,
    collecting: bool,
}

impl ProblemList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn problems(&self) -> &[SchemaProblem] {
        &self.problems
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// True between `begin_collecting` and `end_collecting`.
    pub fn is_collecting(&self) -> bool {
        self.collecting
    }

    pub fn of_kind(&self, kind: ProblemKind) -> impl Iterator<Item = &SchemaProblem> + '_ {
        self.problems.iter().filter(move |p| p.kind == kind)
    }

    pub fn into_vec(self) -> Vec<SchemaProblem> {
        self.problems
    }
}

impl ProblemCollector for ProblemList {
    fn begin_collecting(&mut self) {
        self.problems.clear();
        self.collecting = true;
    }

    fn accept(&mut self, problem: SchemaProblem) {
        self.problems.push(problem);
    }

    fn end_collecting(&mut self) {
        self.collecting = false;
    }
}

impl ProblemCollector for Vec<SchemaProblem> {
    fn accept(&mut self, problem: SchemaProblem) {
        self.push(problem);
    }
}
