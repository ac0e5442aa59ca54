//! Storytel Catalog API Types
//!
//! Type definitions for the search and book-info endpoint payloads. The
//! upstream schema is loose: nearly everything is optional, and a few fields
//! (`seriesOrder`, `isbn`) arrive as either number or string, so those are
//! held as raw JSON values until formatting.

use serde::Deserialize;
use serde_json::Value;

// ============================================================================
// Search Types
// ============================================================================

/// Response page from search.action
///
/// `books` is `None` when the response carries no result list at all, which
/// is distinct from an empty list.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub books: Option<Vec<SearchHit>>,
}

/// One search result stub
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub book: Option<SearchHitBook>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHitBook {
    #[serde(default)]
    pub id: Option<i64>,
}

// ============================================================================
// Detail Types
// ============================================================================

/// Response from getBookInfoForContent.action
#[derive(Debug, Clone, Deserialize)]
pub struct BookDetails {
    #[serde(default)]
    pub slb: Option<Slb>,
}

/// The book facet plus its audio and/or ebook editions
#[derive(Debug, Clone, Deserialize)]
pub struct Slb {
    #[serde(default)]
    pub book: Option<Book>,
    #[serde(default)]
    pub abook: Option<AudioBook>,
    #[serde(default)]
    pub ebook: Option<EBook>,
}

/// Work-level record shared by both editions
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub authors_as_string: Option<String>,
    #[serde(default)]
    pub series: Option<Vec<Series>>,
    /// Number or string upstream
    #[serde(default)]
    pub series_order: Option<Value>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub large_cover: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    #[serde(default)]
    pub iso_value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Publisher {
    #[serde(default)]
    pub name: Option<String>,
}

/// Audio edition
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioBook {
    /// Length in milliseconds
    #[serde(default)]
    pub length: Option<u64>,
    #[serde(default)]
    pub narrator_as_string: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub publisher: Option<Publisher>,
    #[serde(default)]
    pub release_date_format: Option<String>,
    /// Number or string upstream
    #[serde(default)]
    pub isbn: Option<Value>,
}

/// Ebook edition
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EBook {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub publisher: Option<Publisher>,
    #[serde(default)]
    pub release_date_format: Option<String>,
    /// Number or string upstream
    #[serde(default)]
    pub isbn: Option<Value>,
}
