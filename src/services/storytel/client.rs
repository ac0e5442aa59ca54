//! Storytel Catalog API Client
//!
//! HTTP client for the public Storytel search and book-info endpoints.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

use super::provider::CatalogSource;
use super::types::{BookDetails, SearchPage};

/// Search endpoint; takes `request_locale` and the query term
const SEARCH_URL: &str = "https://www.storytel.com/api/search.action";
/// Detail endpoint; takes `bookId` and `request_locale`
const BOOK_INFO_URL: &str = "https://www.storytel.com/api/getBookInfoForContent.action";

/// Storytel API error types
#[derive(Debug, Error)]
pub enum StorytelError {
    /// Network/connection error
    #[error("Network error: {0}")]
    Network(String),
    /// HTTP error (non-2xx status)
    #[error("HTTP error: {0}")]
    Http(u16),
    /// JSON parsing error
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Storytel API client
pub struct StorytelClient {
    http: Client,
    user_agent: String,
}

impl StorytelClient {
    /// Create a new Storytel client
    ///
    /// # Arguments
    /// * `user_agent` - identifying header sent with every call
    /// * `timeout_ms` - per-request timeout in milliseconds
    pub fn new(user_agent: &str, timeout_ms: u64) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            user_agent: user_agent.to_string(),
        }
    }

    /// Make a GET request with query parameters
    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, StorytelError> {
        let response = self
            .http
            .get(url)
            .query(params)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| StorytelError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorytelError::Http(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| StorytelError::Network(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse Storytel response from {}: {}", url, e);
            debug!("Response text: {}", text.chars().take(500).collect::<String>());
            StorytelError::Parse(e.to_string())
        })
    }
}

impl CatalogSource for StorytelClient {
    async fn search(&self, query: &str, locale: &str) -> Result<SearchPage, StorytelError> {
        debug!(query, locale, "Storytel search request");
        self.get(SEARCH_URL, &[("request_locale", locale), ("q", query)])
            .await
    }

    async fn book_details(&self, book_id: i64, locale: &str) -> Result<BookDetails, StorytelError> {
        debug!(book_id, locale, "Storytel detail request");
        let id = book_id.to_string();
        self.get(
            BOOK_INFO_URL,
            &[("bookId", id.as_str()), ("request_locale", locale)],
        )
        .await
    }
}
