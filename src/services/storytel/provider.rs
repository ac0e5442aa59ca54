//! Search coordination
//!
//! Orchestrates one logical search: cache lookup, upstream search, concurrent
//! per-result detail fetches, formatting, cache store. Upstream failures never
//! surface to the caller; a whole-search failure degrades to an empty match
//! list and a per-item failure drops only that item.

use futures::future::join_all;
use lazy_static::lazy_static;
use prometheus::{register_int_counter, IntCounter};
use regex::Regex;
use tracing::{debug, info, warn};

use super::client::StorytelError;
use super::formatter::MetadataFormatter;
use super::types::{BookDetails, SearchPage};
use crate::models::SearchResults;
use crate::services::cache::SearchCache;

lazy_static! {
    static ref WHITESPACE_RUNS: Regex = Regex::new(r"\s+").unwrap();

    static ref SEARCHES_TOTAL: IntCounter = register_int_counter!(
        "storytel_searches_total",
        "Total search requests handled"
    )
    .unwrap();
    static ref CACHE_HITS_TOTAL: IntCounter = register_int_counter!(
        "storytel_cache_hits_total",
        "Search requests answered from the cache"
    )
    .unwrap();
    static ref UPSTREAM_ERRORS_TOTAL: IntCounter = register_int_counter!(
        "storytel_upstream_errors_total",
        "Failed upstream search or detail calls"
    )
    .unwrap();
}

/// Upstream fetch capability: one search endpoint plus one detail endpoint
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    async fn search(&self, query: &str, locale: &str) -> Result<SearchPage, StorytelError>;
    async fn book_details(&self, book_id: i64, locale: &str)
        -> Result<BookDetails, StorytelError>;
}

/// Why a search produced fewer matches than the upstream result count
#[derive(Debug, Clone, PartialEq)]
pub enum SearchFailure {
    /// The upstream search call itself failed; the whole list is empty
    Search(String),
    /// A result stub carried no usable catalog ID
    MissingId,
    /// The detail fetch for one catalog ID failed
    Detail { book_id: i64, reason: String },
    /// The detail payload had no book facet or no edition
    Rejected { book_id: i64 },
}

/// Match list plus per-item degradation reasons
///
/// The HTTP layer serializes only `results`; the failures exist so callers of
/// the provider API can tell an empty catalog answer from a degraded one.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub results: SearchResults,
    pub failures: Vec<SearchFailure>,
}

/// Storytel metadata provider
pub struct StorytelProvider<S> {
    source: S,
    cache: SearchCache,
    default_locale: String,
}

impl<S: CatalogSource> StorytelProvider<S> {
    pub fn new(source: S, cache: SearchCache, default_locale: &str) -> Self {
        Self {
            source,
            cache,
            default_locale: default_locale.to_string(),
        }
    }

    /// Search the catalog and return canonical metadata for every result
    ///
    /// Never fails: upstream errors degrade to an empty match list. The
    /// `locale` argument overrides the configured default for this call only.
    pub async fn search(&self, query: &str, author: &str, locale: Option<&str>) -> SearchOutcome {
        let locale = locale.unwrap_or(&self.default_locale);

        // Anything past the first colon is subtitle noise for matching
        let clean_query = query.split(':').next().unwrap_or_default().trim();
        let formatted_query = WHITESPACE_RUNS.replace_all(clean_query, "+").into_owned();
        let cache_key = format!("{}-{}-{}", formatted_query, author, locale);

        SEARCHES_TOTAL.inc();
        debug!(query, clean_query, locale, "search request");

        if let Some(cached) = self.cache.get(&cache_key).await {
            CACHE_HITS_TOTAL.inc();
            debug!(key = %cache_key, "cache hit");
            return SearchOutcome {
                results: cached,
                failures: Vec::new(),
            };
        }

        let page = match self.source.search(&formatted_query, locale).await {
            Ok(page) => page,
            Err(e) => {
                UPSTREAM_ERRORS_TOTAL.inc();
                warn!(error = %e, "upstream search failed");
                return SearchOutcome {
                    results: SearchResults::default(),
                    failures: vec![SearchFailure::Search(e.to_string())],
                };
            }
        };

        // A response without a result list is not a catalog answer; leave the
        // cache alone so a transient upstream hiccup cannot stick for the TTL
        let Some(hits) = page.books else {
            debug!("search response carried no result list");
            return SearchOutcome::default();
        };

        info!(count = hits.len(), "search results received");

        let mut failures = Vec::new();
        let mut book_ids = Vec::new();
        for hit in &hits {
            match hit.book.as_ref().and_then(|stub| stub.id) {
                Some(id) => book_ids.push(id),
                None => failures.push(SearchFailure::MissingId),
            }
        }

        // Independent, unbounded fan-out; every fetch settles before we
        // aggregate and one failure never cancels its siblings
        let fetched = join_all(book_ids.iter().map(|&book_id| async move {
            (book_id, self.source.book_details(book_id, locale).await)
        }))
        .await;

        let mut matches = Vec::new();
        for (book_id, result) in fetched {
            match result {
                Ok(detail) => match MetadataFormatter::format(&detail, locale) {
                    Some(metadata) => matches.push(metadata),
                    None => failures.push(SearchFailure::Rejected { book_id }),
                },
                Err(e) => {
                    UPSTREAM_ERRORS_TOTAL.inc();
                    warn!(book_id, error = %e, "detail fetch failed");
                    failures.push(SearchFailure::Detail {
                        book_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            valid = matches.len(),
            dropped = failures.len(),
            "matches processed"
        );

        let results = SearchResults { matches };
        self.cache.set(&cache_key, &results).await;

        SearchOutcome { results, failures }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockSource {
        page: Option<SearchPage>,
        search_calls: AtomicUsize,
        detail_calls: AtomicUsize,
        fail_detail_for: Vec<i64>,
        last_query: Mutex<Option<String>>,
    }

    impl MockSource {
        fn with_page(page: serde_json::Value) -> Self {
            Self {
                page: Some(serde_json::from_value(page).expect("valid page fixture")),
                search_calls: AtomicUsize::new(0),
                detail_calls: AtomicUsize::new(0),
                fail_detail_for: Vec::new(),
                last_query: Mutex::new(None),
            }
        }

        fn failing_search() -> Self {
            Self {
                page: None,
                search_calls: AtomicUsize::new(0),
                detail_calls: AtomicUsize::new(0),
                fail_detail_for: Vec::new(),
                last_query: Mutex::new(None),
            }
        }

        fn valid_detail(book_id: i64) -> BookDetails {
            serde_json::from_value(json!({
                "slb": {
                    "book": { "name": format!("Book {}", book_id) },
                    "abook": { "length": 600_000 }
                }
            }))
            .expect("valid detail fixture")
        }
    }

    impl CatalogSource for &MockSource {
        async fn search(&self, query: &str, _locale: &str) -> Result<SearchPage, StorytelError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(query.to_string());
            match &self.page {
                Some(page) => Ok(page.clone()),
                None => Err(StorytelError::Http(503)),
            }
        }

        async fn book_details(
            &self,
            book_id: i64,
            _locale: &str,
        ) -> Result<BookDetails, StorytelError> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_detail_for.contains(&book_id) {
                return Err(StorytelError::Http(500));
            }
            Ok(MockSource::valid_detail(book_id))
        }
    }

    fn provider(source: &MockSource, ttl_ms: u64) -> StorytelProvider<&MockSource> {
        StorytelProvider::new(source, SearchCache::new(ttl_ms), "en")
    }

    fn three_hits() -> serde_json::Value {
        json!({
            "books": [
                { "book": { "id": 1 } },
                { "book": { "id": 2 } },
                { "book": { "id": 3 } }
            ]
        })
    }

    #[tokio::test]
    async fn test_repeat_search_served_from_cache() {
        let source = MockSource::with_page(three_hits());
        let provider = provider(&source, 60_000);

        let first = provider.search("Night Watch", "", None).await;
        let second = provider.search("Night Watch", "", None).await;

        assert_eq!(source.search_calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.detail_calls.load(Ordering::SeqCst), 3);
        assert_eq!(first.results, second.results);
    }

    #[tokio::test]
    async fn test_detail_failure_drops_single_item() {
        let mut source = MockSource::with_page(three_hits());
        source.fail_detail_for = vec![2];
        let provider = provider(&source, 60_000);

        let outcome = provider.search("Night Watch", "", None).await;

        assert_eq!(outcome.results.matches.len(), 2);
        assert!(outcome.failures.iter().any(|f| matches!(
            f,
            SearchFailure::Detail { book_id: 2, .. }
        )));
    }

    #[tokio::test]
    async fn test_search_failure_degrades_to_empty() {
        let source = MockSource::failing_search();
        let provider = provider(&source, 60_000);

        let outcome = provider.search("Night Watch", "", None).await;

        assert!(outcome.results.matches.is_empty());
        assert!(matches!(outcome.failures[0], SearchFailure::Search(_)));
    }

    #[tokio::test]
    async fn test_missing_result_list_not_cached() {
        let source = MockSource::with_page(json!({}));
        let provider = provider(&source, 60_000);

        provider.search("Night Watch", "", None).await;
        provider.search("Night Watch", "", None).await;

        assert_eq!(source.search_calls.load(Ordering::SeqCst), 2);
        assert_eq!(source.detail_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_result_list_cached_without_fetches() {
        let source = MockSource::with_page(json!({ "books": [] }));
        let provider = provider(&source, 60_000);

        let outcome = provider.search("Night Watch", "", None).await;
        assert!(outcome.results.matches.is_empty());
        assert!(outcome.failures.is_empty());

        provider.search("Night Watch", "", None).await;
        assert_eq!(source.search_calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.detail_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stub_without_id_dropped_before_fetch() {
        let source = MockSource::with_page(json!({
            "books": [
                { "book": { "id": 1 } },
                { "book": {} },
                {}
            ]
        }));
        let provider = provider(&source, 60_000);

        let outcome = provider.search("Night Watch", "", None).await;

        assert_eq!(source.detail_calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.results.matches.len(), 1);
        assert_eq!(
            outcome
                .failures
                .iter()
                .filter(|f| **f == SearchFailure::MissingId)
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_query_truncated_and_whitespace_collapsed() {
        let source = MockSource::with_page(json!({ "books": [] }));
        let provider = provider(&source, 60_000);

        provider
            .search("Night  Watch : A Novel of Discworld", "", None)
            .await;

        assert_eq!(
            source.last_query.lock().unwrap().as_deref(),
            Some("Night+Watch")
        );
    }

    #[tokio::test]
    async fn test_expired_cache_entry_triggers_upstream() {
        let source = MockSource::with_page(json!({ "books": [] }));
        let provider = provider(&source, 0);

        provider.search("Night Watch", "", None).await;
        provider.search("Night Watch", "", None).await;

        assert_eq!(source.search_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_locale_override_changes_cache_key() {
        let source = MockSource::with_page(json!({ "books": [] }));
        let provider = provider(&source, 60_000);

        provider.search("Night Watch", "", None).await;
        provider.search("Night Watch", "", Some("de")).await;

        assert_eq!(source.search_calls.load(Ordering::SeqCst), 2);
    }
}
