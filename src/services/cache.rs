use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::SearchResults;

struct CacheSlot {
    results: SearchResults,
    expires_at: i64,
}

/// In-memory TTL cache for search results
///
/// Keys are the rendered `{query}-{author}-{locale}` tuples; values are full
/// match lists. Entries live for a fixed TTL from write with no refresh and
/// no eviction beyond expiry. Clones share the same underlying map, so one
/// instance can be handed to the provider and another kept for stats.
#[derive(Clone)]
pub struct SearchCache {
    entries: Arc<RwLock<HashMap<String, CacheSlot>>>,
    ttl_ms: i64,
}

impl SearchCache {
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl_ms: ttl_ms as i64,
        }
    }

    /// Get a cached result list, ignoring expired entries
    pub async fn get(&self, key: &str) -> Option<SearchResults> {
        let entries = self.entries.read().await;
        let slot = entries.get(key)?;

        let now = chrono::Utc::now().timestamp_millis();
        if slot.expires_at <= now {
            return None;
        }

        Some(slot.results.clone())
    }

    /// Store a result list under the fixed TTL
    pub async fn set(&self, key: &str, results: &SearchResults) {
        let expires_at = chrono::Utc::now().timestamp_millis() + self.ttl_ms;
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheSlot {
                results: results.clone(),
                expires_at,
            },
        );
    }

    /// Drop expired entries, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = chrono::Utc::now().timestamp_millis();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, slot| slot.expires_at > now);
        before - entries.len()
    }

    /// Number of entries currently held, expired ones included
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookMetadata;

    fn results_with_title(title: &str) -> SearchResults {
        SearchResults {
            matches: vec![BookMetadata {
                title: title.to_string(),
                ..Default::default()
            }],
        }
    }

    #[tokio::test]
    async fn test_miss_returns_none() {
        let cache = SearchCache::new(60_000);
        assert!(cache.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = SearchCache::new(60_000);
        let results = results_with_title("Night Watch");
        cache.set("key", &results).await;
        assert_eq!(cache.get("key").await, Some(results));
    }

    #[tokio::test]
    async fn test_expired_entry_not_returned() {
        let cache = SearchCache::new(0);
        cache.set("key", &results_with_title("Night Watch")).await;
        assert!(cache.get("key").await.is_none());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let cache = SearchCache::new(0);
        cache.set("key", &results_with_title("Night Watch")).await;
        assert_eq!(cache.entry_count().await, 1);
        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = SearchCache::new(60_000);
        let clone = cache.clone();
        cache.set("key", &results_with_title("Night Watch")).await;
        assert_eq!(clone.entry_count().await, 1);
    }
}
