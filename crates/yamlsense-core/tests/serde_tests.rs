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

//! Serialization of paths and ranges (requires the `serde` feature).

#![cfg(feature = "serde")]

use serde_json::json;
use yamlsense_core::{SNodeType, TextRange, YamlPath, YamlPathSegment};

#[test]
fn test_path_json_shape() {
    let path = YamlPath::from_property("server.ports").append(YamlPathSegment::index(1));
    let value = serde_json::to_value(&path).unwrap();
    assert_eq!(
        value,
        json!({
            "segments": [
                {"ValAtKey": "server"},
                {"ValAtKey": "ports"},
                {"ValAtIndex": 1}
            ]
        })
    );
}

#[test]
fn test_path_survives_json() {
    let path = YamlPath::new(vec![
        YamlPathSegment::index(0),
        YamlPathSegment::key("logging"),
        YamlPathSegment::key_at("some.package"),
    ]);
    let text = serde_json::to_string(&path).unwrap();
    let back: YamlPath = serde_json::from_str(&text).unwrap();
    assert_eq!(back, path);
    assert!(back.points_at_key());
}

#[test]
fn test_range_and_kind() {
    let range = TextRange::new(3, 9);
    assert_eq!(serde_json::to_value(range).unwrap(), json!({"start": 3, "end": 9}));
    assert_eq!(serde_json::to_value(SNodeType::Seq).unwrap(), json!("Seq"));
}
