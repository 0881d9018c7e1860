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

//! Property-based tests for the line accessor.

use proptest::prelude::*;
use yamlsense_core::{indentation_of, YamlDocument};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Property: line extents plus delimiters cover the whole text.
    #[test]
    fn prop_lines_cover_text(text in "[a-z :#\\-\r\n]{0,200}") {
        let doc = YamlDocument::new(text.as_str());
        let mut rebuilt = String::new();
        let mut prev_end = None;
        for line in doc.lines() {
            if let Some(end) = prev_end {
                rebuilt.push_str(doc.text_between(end, line.start()));
            }
            rebuilt.push_str(line.text(&doc));
            prev_end = Some(line.end());
        }
        if let Some(end) = prev_end {
            rebuilt.push_str(doc.text_between(end, doc.len()));
        }
        prop_assert_eq!(rebuilt, text);
    }

    /// Property: no line contains a line delimiter, CRLF included.
    #[test]
    fn prop_lines_have_no_delimiters(text in "[a-z ]{0,10}(\r?\n[a-z ]{0,10}){0,10}") {
        let doc = YamlDocument::new(text.as_str());
        for line in doc.lines() {
            prop_assert!(!line.text(&doc).contains('\n'));
            prop_assert!(!line.text(&doc).contains('\r'));
        }
    }

    /// Property: offset -> position -> offset is the identity.
    #[test]
    fn prop_position_round_trip(text in "[a-z \n]{0,200}", pick in 0usize..1000) {
        let doc = YamlDocument::new(text.as_str());
        let offset = pick % (doc.len() + 1);
        let pos = doc.position_of(offset).unwrap();
        prop_assert_eq!(doc.offset_of(pos), Some(offset));
    }

    /// Property: indentation is the count of leading spaces, or None when
    /// the line has no content before a comment.
    #[test]
    fn prop_indentation_definition(spaces in 0usize..10, rest in "[a-z#\\t ]{0,10}") {
        let line = format!("{}{}", " ".repeat(spaces), rest);
        let first_non_space = line.bytes().position(|b| b != b' ');
        let expected = match first_non_space {
            None => None,
            Some(i) if line.as_bytes()[i] == b'#' => None,
            Some(i) => Some(i),
        };
        prop_assert_eq!(indentation_of(&line), expected);
    }
}
