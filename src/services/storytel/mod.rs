//! Storytel Catalog Integration
//!
//! Everything needed to turn a free-text book query into canonical metadata
//! records from the Storytel catalog:
//!
//! - **Client**: HTTP access to the search and book-info endpoints
//! - **Formatter**: raw detail payloads → canonical `BookMetadata`
//! - **Provider**: cache-fronted search orchestration with concurrent
//!   per-result detail fetches
//!
//! The provider talks to the upstream through the [`CatalogSource`] trait so
//! tests can substitute a scripted source for the real client.

pub mod client;
pub mod formatter;
pub mod provider;
pub mod types;

// Re-exports for convenience
pub use client::{StorytelClient, StorytelError};
pub use formatter::MetadataFormatter;
pub use provider::{CatalogSource, SearchFailure, SearchOutcome, StorytelProvider};
