pub mod metadata;

pub use metadata::{BookMetadata, SearchResults, SeriesInfo};
