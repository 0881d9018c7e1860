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

//! Semantic tree providers.
//!
//! Callers that need the semantic tree of a document go through a
//! [`YamlAstProvider`] so they can be handed either a fresh parse or a cached
//! one, optionally accepting a tree computed from an older version of the
//! document.

use crate::cache::AstCache;
use crate::compose::parse_ast_with_options;
use crate::tree::YamlFileAst;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;
use yamlsense_core::{ParseOptions, YamlDocument, YamlResult};

/// Source of semantic trees.
pub trait YamlAstProvider: Send + Sync {
    /// Semantic tree for `doc`.
    ///
    /// # Errors
    ///
    /// Whatever the underlying parse reports. Providers that allow stale
    /// results only fail when no tree for the document is available at all.
    fn get_ast(&self, doc: &YamlDocument) -> YamlResult<Arc<YamlFileAst>>;
}

/// Parses on every request.
#[derive(Debug, Clone, Default)]
pub struct DirectAstProvider {
    options: ParseOptions,
}

impl DirectAstProvider {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }
}

impl YamlAstProvider for DirectAstProvider {
    fn get_ast(&self, doc: &YamlDocument) -> YamlResult<Arc<YamlFileAst>> {
        parse_ast_with_options(doc, &self.options).map(Arc::new)
    }
}

/// Parses through a shared [`AstCache`] keyed by document URI and version.
///
/// Documents without a URI have no cache identity and are parsed directly.
/// Providers built with non-default [`ParseOptions`] key their entries by
/// URI plus an options fingerprint, so providers with different options can
/// share one cache without handing each other's trees back.
///
/// ```
/// use std::sync::Arc;
/// use yamlsense_ast::{AstCache, CachingAstProvider, YamlAstProvider};
/// use yamlsense_core::YamlDocument;
///
/// let cache = Arc::new(AstCache::default());
/// let provider = CachingAstProvider::new(Arc::clone(&cache), true);
///
/// let v1 = YamlDocument::new("a: 1").with_uri("file:///a.yml").with_version(1);
/// provider.get_ast(&v1).unwrap();
///
/// // Version 2 does not parse, the tree from version 1 is served instead
/// let v2 = YamlDocument::new("a: [").with_uri("file:///a.yml").with_version(2);
/// let ast = provider.get_ast(&v2).unwrap();
/// assert_eq!(ast.document().version(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CachingAstProvider {
    cache: Arc<AstCache>,
    parser: DirectAstProvider,
    allow_stale: bool,
    key_suffix: Option<String>,
}

impl CachingAstProvider {
    pub fn new(cache: Arc<AstCache>, allow_stale: bool) -> Self {
        Self {
            cache,
            parser: DirectAstProvider::default(),
            allow_stale,
            key_suffix: None,
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.key_suffix = (options != ParseOptions::default()).then(|| {
            let mut hasher = DefaultHasher::new();
            options.hash(&mut hasher);
            format!("#options-{:016x}", hasher.finish())
        });
        self.parser = DirectAstProvider::new(options);
        self
    }

    /// Key under which trees for `uri` are cached by this provider.
    pub fn cache_key(&self, uri: &str) -> String {
        match &self.key_suffix {
            Some(suffix) => format!("{}{}", uri, suffix),
            None => uri.to_string(),
        }
    }

    pub fn cache(&self) -> &Arc<AstCache> {
        &self.cache
    }

    pub fn allows_stale(&self) -> bool {
        self.allow_stale
    }
}

impl YamlAstProvider for CachingAstProvider {
    fn get_ast(&self, doc: &YamlDocument) -> YamlResult<Arc<YamlFileAst>> {
        let Some(uri) = doc.uri() else {
            debug!("document has no URI, parsing without cache");
            return self.parser.get_ast(doc);
        };
        self.cache
            .try_get(&self.cache_key(uri), doc.version(), self.allow_stale, || {
                parse_ast_with_options(doc, self.parser.options())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yamlsense_core::YamlErrorKind;

    fn doc(text: &str, version: u64) -> YamlDocument {
        YamlDocument::new(text)
            .with_uri("file:///test.yml")
            .with_version(version)
    }

    // ==================== DirectAstProvider ====================

    #[test]
    fn test_direct_parses_each_time() {
        let provider = DirectAstProvider::default();
        let d = doc("a: 1", 1);
        let first = provider.get_ast(&d).unwrap();
        let second = provider.get_ast(&d).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_direct_honors_options() {
        let provider = DirectAstProvider::new(ParseOptions::builder().max_depth(1).build());
        let err = provider.get_ast(&doc("a: {b: {c: 1}}", 1)).unwrap_err();
        assert_eq!(err.kind, YamlErrorKind::Security);
    }

    // ==================== CachingAstProvider ====================

    #[test]
    fn test_caching_reuses_tree() {
        let cache = Arc::new(AstCache::new(8));
        let provider = CachingAstProvider::new(Arc::clone(&cache), false);
        let first = provider.get_ast(&doc("a: 1", 1)).unwrap();
        let second = provider.get_ast(&doc("a: 1", 1)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.statistics().hits, 1);
    }

    #[test]
    fn test_caching_strict_reports_failure() {
        let provider = CachingAstProvider::new(Arc::new(AstCache::new(8)), false);
        provider.get_ast(&doc("a: 1", 1)).unwrap();
        let err = provider.get_ast(&doc("a: [", 2)).unwrap_err();
        assert_eq!(err.kind, YamlErrorKind::Syntax);
    }

    #[test]
    fn test_caching_stale_serves_older_version() {
        let provider = CachingAstProvider::new(Arc::new(AstCache::new(8)), true);
        provider.get_ast(&doc("a: 1", 1)).unwrap();
        let ast = provider.get_ast(&doc("a: 2", 2)).unwrap();
        assert_eq!(ast.document().version(), 1);
        assert_eq!(ast.nodes()[0].get("a").unwrap().as_scalar(), Some("1"));
    }

    #[test]
    fn test_caching_without_uri_is_uncached() {
        let cache = Arc::new(AstCache::new(8));
        let provider = CachingAstProvider::new(Arc::clone(&cache), true);
        provider.get_ast(&YamlDocument::new("a: 1")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_caching_with_merge_resolution() {
        let provider = CachingAstProvider::new(Arc::new(AstCache::new(8)), false)
            .with_options(ParseOptions::builder().resolve_merges(true).build());
        let ast = provider
            .get_ast(&doc("m:\n  <<: {x: 1}\n", 1))
            .unwrap();
        assert_eq!(
            ast.nodes()[0].get("m").unwrap().get("x").unwrap().as_scalar(),
            Some("1")
        );
    }

    #[test]
    fn test_shared_cache_keeps_options_apart() {
        let cache = Arc::new(AstCache::new(8));
        let raw = CachingAstProvider::new(Arc::clone(&cache), false);
        let merged = CachingAstProvider::new(Arc::clone(&cache), false)
            .with_options(ParseOptions::builder().resolve_merges(true).build());
        let d = doc("m:\n  <<: {x: 1}\n", 1);

        let raw_ast = raw.get_ast(&d).unwrap();
        let merged_ast = merged.get_ast(&d).unwrap();
        assert!(raw_ast.nodes()[0].get("m").unwrap().as_mapping().unwrap().merged);
        assert!(!merged_ast.nodes()[0].get("m").unwrap().as_mapping().unwrap().merged);

        // Each provider gets its own tree back
        assert!(Arc::ptr_eq(&raw.get_ast(&d).unwrap(), &raw_ast));
        assert!(Arc::ptr_eq(&merged.get_ast(&d).unwrap(), &merged_ast));
        assert_eq!(cache.len(), 2);
        assert_eq!(raw.cache_key("file:///test.yml"), "file:///test.yml");
        assert_ne!(merged.cache_key("file:///test.yml"), "file:///test.yml");
    }

    #[test]
    fn test_default_options_share_plain_uri_key() {
        let provider = CachingAstProvider::new(Arc::new(AstCache::new(8)), false)
            .with_options(ParseOptions::default());
        assert_eq!(provider.cache_key("file:///a.yml"), "file:///a.yml");
    }
}
