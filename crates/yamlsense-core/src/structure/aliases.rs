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

/// Alternative spellings of a map key.
///
/// Key lookups on the structural tree match the key itself first, then each
/// alias in the order returned. The relation is supplied by the caller, for
/// example to treat `server-port` and `serverPort` as the same property.
///
/// Closures implement this trait:
///
/// ```
/// use yamlsense_core::KeyAliases;
///
/// let aliases = |key: &str| vec![key.replace('-', "_")];
/// assert_eq!(aliases.aliases("max-size"), vec!["max_size".to_string()]);
/// ```
pub trait KeyAliases: Send + Sync {
    /// Other spellings of `key`. Need not include `key` itself.
    fn aliases(&self, key: &str) -> Vec<String>;
}

impl<F> KeyAliases for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn aliases(&self, key: &str) -> Vec<String> {
        self(key)
    }
}
