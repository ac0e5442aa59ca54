//! Metadata Search Routes
//!
//! The endpoint metadata clients call. Response shape is always
//! `{"matches": [...]}`; degradations never change the contract, they only
//! shrink the list.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub author: String,
    /// Overrides the configured locale for this request only
    pub locale: Option<String>,
}

/// GET /search - look up canonical book metadata
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> impl IntoResponse {
    let outcome = state
        .provider
        .search(&params.query, &params.author, params.locale.as_deref())
        .await;

    if !outcome.failures.is_empty() {
        tracing::debug!(
            dropped = outcome.failures.len(),
            "search degraded, returning partial matches"
        );
    }

    Json(outcome.results)
}
