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

//! Per-document AST cache with version tracking and LRU eviction.
//!
//! # Responsibilities
//!
//! - Memoize one semantic tree per document URI, tagged with the document
//!   version it was computed from
//! - Serve an older tree without recomputing when the caller allows stale
//!   results
//! - Keep computation failures isolated to their own key
//! - Bound the number of cached documents, evicting the least recently used
//!
//! # Design
//!
//! Entries live in a [`DashMap`] of per-URI slots. Each slot is an
//! `Arc<Mutex<..>>`; a lookup clones the slot out of the map and then locks
//! only that slot, so concurrent requests for the same URI compute at most
//! once while requests for other URIs proceed in parallel. The map shard is
//! never held while a computation runs.

use crate::tree::YamlFileAst;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use yamlsense_core::YamlResult;

/// Default maximum number of cached documents (1000).
///
/// **Rationale**: An editor session rarely has more than a few dozen YAML
/// files open. 1000 leaves ample headroom while LRU eviction keeps memory
/// bounded for workspace-wide scans.
pub const DEFAULT_MAX_CACHED_DOCUMENTS: usize = 1000;

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStatistics {
    /// Requests answered with a tree at the requested version.
    pub hits: u64,
    /// Requests answered with a tree from an older version.
    pub stale_hits: u64,
    /// Requests that ran the computation successfully.
    pub misses: u64,
    /// Requests whose computation failed.
    pub failures: u64,
    /// Entries evicted due to the size limit.
    pub evictions: u64,
    /// Current number of cached documents.
    pub current_size: usize,
    /// Maximum number of cached documents.
    pub max_size: usize,
}

struct CachedAst<T> {
    version: u64,
    value: Arc<T>,
    last_access: u64,
}

type Slot<T> = Arc<Mutex<Option<CachedAst<T>>>>;

/// Memoized semantic trees keyed by document URI.
///
/// Safe to share across threads; construct one per host session and pass it
/// to whatever needs it.
///
/// # Example
///
/// ```
/// use yamlsense_ast::{parse_ast, AstCache};
/// use yamlsense_core::YamlDocument;
///
/// let cache: AstCache = AstCache::new(16);
/// let doc = YamlDocument::new("a: 1").with_uri("file:///a.yml").with_version(1);
///
/// let ast = cache.get("file:///a.yml", 1, false, || parse_ast(&doc)).unwrap();
/// assert_eq!(ast.nodes().len(), 1);
/// assert_eq!(cache.statistics().misses, 1);
/// ```
pub struct AstCache<T = YamlFileAst> {
    entries: DashMap<String, Slot<T>>,
    stats: Mutex<CacheStatistics>,
    max_entries: RwLock<usize>,
    clock: AtomicU64,
}

impl<T> AstCache<T> {
    /// Create a cache holding at most `max_entries` documents.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            stats: Mutex::new(CacheStatistics {
                max_size: max_entries,
                ..Default::default()
            }),
            max_entries: RwLock::new(max_entries),
            clock: AtomicU64::new(0),
        }
    }

    /// Tree for `uri` at `version`, computing it if necessary.
    ///
    /// - A tree cached at exactly `version` is returned as is.
    /// - With `allow_stale`, a tree cached at an older version is returned
    ///   without running `compute`.
    /// - Otherwise `compute` runs and its result is cached, unless a newer
    ///   version was cached in the meantime.
    ///
    /// When `compute` fails and `allow_stale` is set, any cached tree for the
    /// URI is served instead; otherwise the error is returned. A failure never
    /// disturbs other entries.
    pub fn try_get<F>(
        &self,
        uri: &str,
        version: u64,
        allow_stale: bool,
        compute: F,
    ) -> YamlResult<Arc<T>>
    where
        F: FnOnce() -> YamlResult<T>,
    {
        let slot = self.slot(uri);
        let mut guard = slot.lock();

        if let Some(cached) = guard.as_mut() {
            if cached.version == version || (allow_stale && cached.version < version) {
                cached.last_access = self.tick();
                let stale = cached.version != version;
                {
                    let mut stats = self.stats.lock();
                    if stale {
                        stats.stale_hits += 1;
                    } else {
                        stats.hits += 1;
                    }
                }
                debug!(uri, version, cached = cached.version, stale, "AST cache hit");
                return Ok(Arc::clone(&cached.value));
            }
        }

        match compute() {
            Ok(value) => {
                let value = Arc::new(value);
                self.stats.lock().misses += 1;
                let newer_cached = guard.as_ref().map_or(false, |c| c.version > version);
                if !newer_cached {
                    *guard = Some(CachedAst {
                        version,
                        value: Arc::clone(&value),
                        last_access: self.tick(),
                    });
                }
                debug!(uri, version, stored = !newer_cached, "AST cache miss");
                Ok(value)
            }
            Err(err) => {
                self.stats.lock().failures += 1;
                if let Some(cached) = guard.as_mut().filter(|_| allow_stale) {
                    warn!(
                        uri,
                        version,
                        cached = cached.version,
                        error = %err,
                        "AST computation failed, serving cached tree"
                    );
                    cached.last_access = self.tick();
                    return Ok(Arc::clone(&cached.value));
                }
                let empty = guard.is_none();
                drop(guard);
                if empty {
                    // Waiters holding a clone of this slot will store into it
                    self.entries
                        .remove_if(uri, |_, s| Arc::ptr_eq(s, &slot) && Arc::strong_count(s) == 2);
                }
                debug!(uri, version, error = %err, "AST computation failed");
                Err(err)
            }
        }
    }

    /// Like [`try_get`](Self::try_get), but a failed computation yields `None`
    /// instead of an error.
    pub fn get<F>(&self, uri: &str, version: u64, allow_stale: bool, compute: F) -> Option<Arc<T>>
    where
        F: FnOnce() -> YamlResult<T>,
    {
        match self.try_get(uri, version, allow_stale, compute) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(uri, version, error = %err, "no AST available");
                None
            }
        }
    }

    /// Version of the tree cached for `uri`.
    pub fn cached_version(&self, uri: &str) -> Option<u64> {
        let slot = self.entries.get(uri).map(|s| Arc::clone(s.value()))?;
        let guard = slot.lock();
        guard.as_ref().map(|c| c.version)
    }

    /// Drop the cached tree for `uri`. Returns whether one was present.
    pub fn invalidate(&self, uri: &str) -> bool {
        let removed = self.entries.remove(uri).is_some();
        if removed {
            debug!(uri, "AST cache entry invalidated");
        }
        removed
    }

    /// Drop every entry and reset the statistics.
    pub fn clear(&self) {
        self.entries.clear();
        let mut stats = self.stats.lock();
        let max_size = stats.max_size;
        *stats = CacheStatistics {
            max_size,
            ..Default::default()
        };
    }

    /// Snapshot of the cache statistics.
    pub fn statistics(&self) -> CacheStatistics {
        let mut stats = self.stats.lock();
        stats.current_size = self.entries.len();
        stats.clone()
    }

    /// Update the maximum number of cached documents. Takes effect on the
    /// next insertion.
    pub fn set_max_cached_documents(&self, new_max: usize) {
        *self.max_entries.write() = new_max;
        self.stats.lock().max_size = new_max;
        debug!(max = new_max, "AST cache size limit updated");
    }

    pub fn max_cached_documents(&self) -> usize {
        *self.max_entries.read()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Slot for `uri`, creating an empty one if needed.
    fn slot(&self, uri: &str) -> Slot<T> {
        if let Some(slot) = self.entries.get(uri) {
            return Arc::clone(slot.value());
        }
        let max = self.max_entries();
        while self.entries.len() >= max.max(1) {
            if !self.evict_lru() {
                break;
            }
        }
        Arc::clone(self.entries.entry(uri.to_string()).or_default().value())
    }

    fn max_entries(&self) -> usize {
        *self.max_entries.read()
    }

    /// Evict the least recently used entry. Slots held outside the map (a
    /// request is computing or about to read them) are skipped. Returns
    /// whether anything was evicted.
    fn evict_lru(&self) -> bool {
        let mut lru: Option<(String, u64)> = None;
        for entry in self.entries.iter() {
            if Arc::strong_count(entry.value()) > 1 {
                continue;
            }
            let Some(guard) = entry.value().try_lock() else {
                continue;
            };
            let Some(cached) = guard.as_ref() else {
                continue;
            };
            if lru.as_ref().map_or(true, |(_, t)| cached.last_access < *t) {
                lru = Some((entry.key().clone(), cached.last_access));
            }
        }

        let Some((uri, _)) = lru else {
            return false;
        };
        if self
            .entries
            .remove_if(&uri, |_, s| Arc::strong_count(s) == 1)
            .is_none()
        {
            return false;
        }
        let mut stats = self.stats.lock();
        stats.evictions += 1;
        debug!(
            uri = %uri,
            evictions = stats.evictions,
            size = self.entries.len(),
            max = stats.max_size,
            "evicted least recently used AST"
        );
        true
    }
}

impl<T> Default for AstCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CACHED_DOCUMENTS)
    }
}

impl<T> std::fmt::Debug for AstCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AstCache")
            .field("entries", &self.entries.len())
            .field("max_entries", &self.max_entries())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;
    use yamlsense_core::YamlError;

    fn ok(v: &'static str) -> impl FnOnce() -> YamlResult<&'static str> {
        move || Ok(v)
    }

    fn fail() -> YamlResult<&'static str> {
        Err(YamlError::syntax("broken", 1))
    }

    // ==================== Hits and misses ====================

    #[test]
    fn test_new_cache() {
        let cache: AstCache<&str> = AstCache::new(10);
        let stats = cache.statistics();
        assert_eq!(stats.max_size, 10);
        assert_eq!(stats.current_size, 0);
        assert_eq!(stats.hits + stats.misses + stats.evictions, 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_same_version_is_hit() {
        let cache = AstCache::new(10);
        let first = cache.try_get("u", 1, false, ok("one")).unwrap();
        let second = cache
            .try_get("u", 1, false, || -> YamlResult<&'static str> { panic!("recomputed") })
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let stats = cache.statistics();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.current_size, 1);
    }

    #[test]
    fn test_new_version_recomputes() {
        let cache = AstCache::new(10);
        cache.try_get("u", 1, false, ok("one")).unwrap();
        let v2 = cache.try_get("u", 2, false, ok("two")).unwrap();
        assert_eq!(*v2, "two");
        assert_eq!(cache.cached_version("u"), Some(2));
        assert_eq!(cache.statistics().misses, 2);
    }

    #[test]
    fn test_older_request_does_not_replace_newer() {
        let cache = AstCache::new(10);
        cache.try_get("u", 5, false, ok("five")).unwrap();
        let old = cache.try_get("u", 3, false, ok("three")).unwrap();
        assert_eq!(*old, "three");
        assert_eq!(cache.cached_version("u"), Some(5));
    }

    // ==================== Stale results ====================

    #[test]
    fn test_stale_allowed_serves_older_without_compute() {
        let cache = AstCache::new(10);
        cache.try_get("u", 1, false, ok("one")).unwrap();
        let value = cache
            .try_get("u", 4, true, || -> YamlResult<&'static str> { panic!("recomputed") })
            .unwrap();
        assert_eq!(*value, "one");
        assert_eq!(cache.statistics().stale_hits, 1);
        assert_eq!(cache.cached_version("u"), Some(1));
    }

    #[test]
    fn test_stale_never_serves_newer_version() {
        let cache = AstCache::new(10);
        cache.try_get("u", 4, false, ok("four")).unwrap();
        let value = cache.try_get("u", 2, true, ok("two")).unwrap();
        assert_eq!(*value, "two");
    }

    #[test]
    fn test_failure_with_stale_allowed_serves_cached() {
        let cache = AstCache::new(10);
        cache.try_get("u", 9, false, ok("nine")).unwrap();
        let value = cache.try_get("u", 2, true, fail).unwrap();
        assert_eq!(*value, "nine");
        assert_eq!(cache.statistics().failures, 1);
    }

    // ==================== Failures ====================

    #[test]
    fn test_failure_propagates_and_leaves_no_entry() {
        let cache = AstCache::new(10);
        let err = cache.try_get("u", 1, false, fail).unwrap_err();
        assert_eq!(err.message, "broken");
        assert!(cache.is_empty());
        assert_eq!(cache.statistics().failures, 1);
    }

    #[test]
    fn test_get_swallows_failure() {
        let cache = AstCache::new(10);
        assert!(cache.get("u", 1, true, fail).is_none());
        assert_eq!(cache.get("u", 1, true, ok("x")).as_deref(), Some(&"x"));
    }

    #[test]
    fn test_failure_keeps_existing_entry_and_others() {
        let cache = AstCache::new(10);
        cache.try_get("a", 1, false, ok("a1")).unwrap();
        cache.try_get("b", 1, false, ok("b1")).unwrap();
        assert!(cache.try_get("a", 2, false, fail).is_err());
        assert_eq!(cache.cached_version("a"), Some(1));
        assert_eq!(*cache.try_get("b", 1, false, ok("unused")).unwrap(), "b1");
        assert_eq!(cache.len(), 2);
    }

    // ==================== Eviction ====================

    #[test]
    fn test_lru_eviction() {
        let cache = AstCache::new(3);
        for uri in ["a", "b", "c"] {
            cache.try_get(uri, 1, false, ok("v")).unwrap();
        }
        // Touch "a" so that "b" is least recently used
        cache.try_get("a", 1, false, ok("v")).unwrap();
        cache.try_get("d", 1, false, ok("v")).unwrap();

        let stats = cache.statistics();
        assert_eq!(stats.current_size, 3);
        assert_eq!(stats.evictions, 1);
        assert!(cache.cached_version("b").is_none());
        assert!(cache.cached_version("a").is_some());
    }

    #[test]
    fn test_runtime_limit_update() {
        let cache = AstCache::new(4);
        for uri in ["a", "b", "c", "d"] {
            cache.try_get(uri, 1, false, ok("v")).unwrap();
        }
        cache.set_max_cached_documents(2);
        assert_eq!(cache.max_cached_documents(), 2);
        cache.try_get("e", 1, false, ok("v")).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.statistics().evictions, 3);
        assert_eq!(cache.statistics().max_size, 2);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = AstCache::new(10);
        cache.try_get("a", 1, false, ok("v")).unwrap();
        cache.try_get("b", 1, false, ok("v")).unwrap();
        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        let stats = cache.statistics();
        assert_eq!(stats.current_size, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.max_size, 10);
    }

    #[test]
    fn test_default_limit() {
        let cache: AstCache<&str> = AstCache::default();
        assert_eq!(cache.max_cached_documents(), DEFAULT_MAX_CACHED_DOCUMENTS);
    }

    // ==================== Concurrency ====================

    #[test]
    fn test_concurrent_requests_compute_once() {
        let cache: Arc<AstCache<usize>> = Arc::new(AstCache::new(10));
        let computed = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let computed = Arc::clone(&computed);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache
                        .try_get("shared", 1, false, || {
                            thread::sleep(Duration::from_millis(20));
                            Ok(computed.fetch_add(1, Ordering::SeqCst))
                        })
                        .unwrap()
                })
            })
            .collect();

        let results: Vec<Arc<usize>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(computed.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
    }

    #[test]
    fn test_failed_compute_keeps_slot_for_waiters() {
        let cache: Arc<AstCache<&'static str>> = Arc::new(AstCache::new(10));
        let (started_tx, started_rx) = std::sync::mpsc::channel();

        let failing = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                cache.try_get("u", 1, false, move || {
                    started_tx.send(()).unwrap();
                    thread::sleep(Duration::from_millis(50));
                    fail()
                })
            })
        };

        // Queue up behind the failing computation on the same slot
        started_rx.recv().unwrap();
        let waiting = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.try_get("u", 1, false, ok("seven")))
        };

        assert!(failing.join().unwrap().is_err());
        assert_eq!(*waiting.join().unwrap().unwrap(), "seven");
        assert_eq!(cache.cached_version("u"), Some(1));
        assert_eq!(
            *cache
                .try_get("u", 1, false, || -> YamlResult<&'static str> { panic!("recomputed") })
                .unwrap(),
            "seven"
        );
        let stats = cache.statistics();
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_eviction_skips_slots_in_use() {
        let cache: AstCache<&'static str> = AstCache::new(1);
        cache.try_get("a", 1, false, ok("a1")).unwrap();
        let held = cache.slot("a");
        assert!(!cache.evict_lru());
        assert_eq!(cache.cached_version("a"), Some(1));
        drop(held);
        assert!(cache.evict_lru());
        assert!(cache.is_empty());
        assert_eq!(cache.statistics().evictions, 1);
    }

    #[test]
    fn test_concurrent_distinct_keys() {
        let cache: Arc<AstCache<String>> = Arc::new(AstCache::new(100));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for version in 0..20 {
                        let uri = format!("file:///{}.yml", i % 4);
                        cache.get(&uri, version, version % 2 == 0, || Ok(format!("{}", version)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 4);
    }
}
