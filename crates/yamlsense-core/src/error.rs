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

//! Error types for YAML parsing.
//!
//! Only the semantic (conforming) parse can fail. The structural parser is
//! infallible and degrades unrecognized lines to raw nodes instead.

use std::fmt;
use thiserror::Error;

/// The kind of error that occurred while building a semantic tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YamlErrorKind {
    /// The conforming parser rejected the text.
    Syntax,
    /// Undefined or recursive alias.
    Alias,
    /// Security limit exceeded (document size, nesting depth, alias count).
    Security,
    /// I/O error while loading document text.
    Io,
}

impl fmt::Display for YamlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "SyntaxError"),
            Self::Alias => write!(f, "AliasError"),
            Self::Security => write!(f, "SecurityError"),
            Self::Io => write!(f, "IOError"),
        }
    }
}

/// An error raised while parsing YAML text into a semantic tree.
#[derive(Debug, Clone, Error)]
#[error("{kind} at line {line}: {message}")]
pub struct YamlError {
    /// The kind of error.
    pub kind: YamlErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Line number (1-based, 0 when unknown).
    pub line: usize,
    /// Column number (1-based, optional).
    pub column: Option<usize>,
    /// Absolute byte offset into the document (optional).
    pub offset: Option<usize>,
}

impl YamlError {
    /// Create a new error.
    pub fn new(kind: YamlErrorKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column: None,
            offset: None,
        }
    }

    /// Add column information.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Add the absolute document offset.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    // Convenience constructors for each error kind
    pub fn syntax(message: impl Into<String>, line: usize) -> Self {
        Self::new(YamlErrorKind::Syntax, message, line)
    }

    pub fn alias(message: impl Into<String>, line: usize) -> Self {
        Self::new(YamlErrorKind::Alias, message, line)
    }

    pub fn security(message: impl Into<String>, line: usize) -> Self {
        Self::new(YamlErrorKind::Security, message, line)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(YamlErrorKind::Io, message, 0)
    }
}

impl From<std::io::Error> for YamlError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

/// Result type for YAML operations.
pub type YamlResult<T> = Result<T, YamlError>;
