//! Fuzzy LRU response cache
//!
//! Bounded, in-process memoization of answer payloads. Lookups match
//! lexically similar queries, not just exact keys, and every hit or store
//! refreshes the matched entry's recency. Nothing here survives a restart.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use super::similarity::{key_for, normalize, similarity_ratio};
use crate::domain::answer::AnswerPayload;

/// Response cache parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries before LRU eviction.
    pub capacity: usize,
    /// Minimum similarity ratio for a fuzzy hit.
    pub similarity_threshold: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            similarity_threshold: 0.85,
        }
    }
}

impl CacheConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }
}

/// Cache size snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    key: String,
    original_query: String,
    normalized_query: String,
    payload: AnswerPayload,
    cached_at: DateTime<Utc>,
}

/// Fuzzy-matching LRU cache from normalized queries to answer payloads.
///
/// Entries are ordered front-to-back from least to most recently used;
/// the whole read-modify-write sequence of each operation runs under one
/// lock, so concurrent lookups and stores never interleave partially.
#[derive(Debug)]
pub struct ResponseCache {
    entries: Mutex<VecDeque<CacheEntry>>,
    config: CacheConfig,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a payload for a lexically similar query.
    ///
    /// Scans stored original queries and returns the first whose
    /// similarity ratio against the normalized incoming query meets the
    /// threshold. A hit moves the matched entry to the most-recently-used
    /// position even when the match was fuzzy.
    pub async fn lookup(&self, query: &str) -> Option<AnswerPayload> {
        let normalized = normalize(query);
        let mut entries = self.entries.lock().await;

        let position = entries.iter().position(|entry| {
            similarity_ratio(&normalized, &entry.normalized_query) >= self.config.similarity_threshold
        })?;

        let entry = entries.remove(position)?;
        let payload = entry.payload.clone();
        debug!(matched = %entry.original_query, "response cache hit");
        entries.push_back(entry);

        Some(payload)
    }

    /// Insert or refresh the payload for a query.
    ///
    /// An existing entry with the same key is removed first so the
    /// re-insertion lands at the most-recently-used end; overflow evicts
    /// from the least-recently-used end until size equals capacity.
    pub async fn store(&self, query: &str, payload: AnswerPayload) {
        let key = key_for(query);
        let mut entries = self.entries.lock().await;

        entries.retain(|entry| entry.key != key);
        entries.push_back(CacheEntry {
            key,
            original_query: query.to_string(),
            normalized_query: normalize(query),
            payload,
            cached_at: Utc::now(),
        });

        while entries.len() > self.config.capacity {
            if let Some(evicted) = entries.pop_front() {
                debug!(evicted = %evicted.original_query, "response cache eviction");
            }
        }
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.lock().await.len(),
            capacity: self.config.capacity,
        }
    }

    /// Age of the oldest entry, if any. Exposed for observability only.
    pub async fn oldest_entry_at(&self) -> Option<DateTime<Utc>> {
        self.entries.lock().await.front().map(|e| e.cached_at)
    }

    #[cfg(test)]
    async fn contains_exact(&self, query: &str) -> bool {
        let key = key_for(query);
        self.entries.lock().await.iter().any(|e| e.key == key)
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(answer: &str) -> AnswerPayload {
        AnswerPayload::new(answer)
    }

    #[tokio::test]
    async fn test_reflexive_hit() {
        let cache = ResponseCache::default();

        cache.store("how do I craft a torch?", payload("sticks and coal")).await;

        let hit = cache.lookup("how do I craft a torch?").await;
        assert_eq!(hit, Some(payload("sticks and coal")));
    }

    #[tokio::test]
    async fn test_fuzzy_hit_on_case_and_whitespace_variant() {
        let cache = ResponseCache::default();

        cache.store("craft a diamond sword", payload("2 diamonds, 1 stick")).await;

        let hit = cache.lookup("craft a Diamond sword ").await;
        assert_eq!(hit, Some(payload("2 diamonds, 1 stick")));
    }

    #[tokio::test]
    async fn test_fuzzy_miss_on_unrelated_query() {
        let cache = ResponseCache::default();

        cache.store("how to smelt iron", payload("use a furnace")).await;

        assert!(cache.lookup("how do I brew a potion").await.is_none());
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest_first() {
        let cache = ResponseCache::new(CacheConfig::default().with_capacity(50));

        for i in 0..51 {
            cache.store(&format!("query number {i}"), payload("a")).await;
        }

        let stats = cache.stats().await;
        assert_eq!(stats.size, 50);

        // The first inserted query, never re-accessed, is gone; the rest remain.
        assert!(!cache.contains_exact("query number 0").await);
        for i in 1..51 {
            assert!(cache.contains_exact(&format!("query number {i}")).await);
        }
    }

    #[tokio::test]
    async fn test_lookup_refreshes_recency() {
        let cache = ResponseCache::new(CacheConfig::default().with_capacity(2));

        cache.store("how to tame a wolf", payload("bones")).await;
        cache.store("how to breed sheep", payload("wheat")).await;

        // Bump A ahead of B.
        assert!(cache.lookup("how to tame a wolf").await.is_some());

        cache.store("how to fish at night", payload("rod")).await;

        // B was least recently used and must be the one evicted.
        assert!(cache.lookup("how to breed sheep").await.is_none());
        assert!(cache.lookup("how to tame a wolf").await.is_some());
        assert_eq!(cache.stats().await.size, 2);
    }

    #[tokio::test]
    async fn test_store_same_key_updates_payload_and_recency() {
        let cache = ResponseCache::new(CacheConfig::default().with_capacity(2));

        cache.store("how to tame a wolf", payload("old answer")).await;
        cache.store("how to breed sheep", payload("wheat")).await;
        cache.store("How To Tame A Wolf", payload("new answer")).await;

        assert_eq!(cache.stats().await.size, 2);
        assert_eq!(
            cache.lookup("how to tame a wolf").await,
            Some(payload("new answer"))
        );

        // The re-store refreshed the wolf entry, so sheep evicts next.
        cache.store("how to ride a pig", payload("saddle")).await;
        assert!(cache.lookup("how to breed sheep").await.is_none());
    }

    #[tokio::test]
    async fn test_clear_empties_cache() {
        let cache = ResponseCache::default();

        cache.store("q1 about torches", payload("a")).await;
        cache.store("q2 about beacons", payload("b")).await;
        cache.clear().await;

        assert_eq!(cache.stats().await.size, 0);
        assert!(cache.lookup("q1 about torches").await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_stores_never_exceed_capacity() {
        use std::sync::Arc;

        let cache = Arc::new(ResponseCache::new(CacheConfig::default().with_capacity(10)));

        let mut handles = Vec::new();
        for i in 0..40 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                cache
                    .store(&format!("concurrent query {i} {}", "q".repeat(i + 1)), payload("a"))
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.stats().await.size, 10);
    }
}
