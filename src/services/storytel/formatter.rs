//! Canonical metadata assembly
//!
//! Turns one raw detail payload into a `BookMetadata` record, or rejects it
//! when the payload has no book facet or no edition at all. Rejection is a
//! normal outcome, not an error.

use serde_json::Value;

use super::types::{AudioBook, Book, BookDetails, EBook};
use crate::models::{BookMetadata, SeriesInfo};
use crate::services::cleaner::TextCleaner;
use crate::services::title::TitleDecomposer;

/// Catalog host prefixed onto relative cover paths
const COVER_HOST: &str = "https://storytel.com";

/// Builds canonical records from raw detail payloads
pub struct MetadataFormatter;

impl MetadataFormatter {
    /// Format a detail payload into a canonical record
    ///
    /// Returns `None` when the book facet is missing or when neither an audio
    /// nor an ebook edition is present. When both editions exist the audio
    /// edition wins: `duration` and `narrator` are populated and the ebook
    /// fields are ignored.
    pub fn format(details: &BookDetails, locale: &str) -> Option<BookMetadata> {
        let slb = details.slb.as_ref()?;
        let book = slb.book.as_ref()?;

        if slb.abook.is_none() && slb.ebook.is_none() {
            return None;
        }

        let series = Self::resolve_series(book);
        let decomposed = TitleDecomposer::decompose(
            book.name.as_deref().unwrap_or_default(),
            series
                .as_ref()
                .map(|info| (info.series.as_str(), info.sequence.as_str())),
        );

        let genres = Self::resolve_genres(book);

        let mut metadata = BookMetadata {
            title: decomposed.title,
            subtitle: decomposed.subtitle,
            author: ensure_string(book.authors_as_string.as_deref()),
            language: Self::resolve_language(book, locale),
            genres: if genres.is_empty() {
                None
            } else {
                Some(genres.clone())
            },
            tags: if genres.is_empty() { None } else { Some(genres) },
            series: series.map(|info| vec![info]),
            cover: upgrade_cover_url(book.large_cover.as_deref()),
            ..Default::default()
        };

        if let Some(abook) = slb.abook.as_ref() {
            Self::apply_audio_edition(&mut metadata, abook);
        } else if let Some(ebook) = slb.ebook.as_ref() {
            Self::apply_ebook_edition(&mut metadata, ebook);
        }

        Some(metadata)
    }

    /// Series info only exists when both a name and an ordering value do
    fn resolve_series(book: &Book) -> Option<SeriesInfo> {
        let name = book
            .series
            .as_ref()
            .and_then(|series| series.first())
            .and_then(|entry| entry.name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())?;

        let sequence = stringify(book.series_order.as_ref());
        if sequence.is_empty() {
            return None;
        }

        Some(SeriesInfo {
            series: name.to_string(),
            sequence,
        })
    }

    fn resolve_genres(book: &Book) -> Vec<String> {
        let Some(title) = book.category.as_ref().and_then(|c| c.title.as_deref()) else {
            return Vec::new();
        };
        TextCleaner::clean_categories(&TextCleaner::split_genre(title.trim()))
    }

    fn resolve_language(book: &Book, locale: &str) -> String {
        book.language
            .as_ref()
            .and_then(|lang| lang.iso_value.as_deref())
            .map(str::trim)
            .filter(|iso| !iso.is_empty())
            .unwrap_or(locale)
            .to_string()
    }

    fn apply_audio_edition(metadata: &mut BookMetadata, abook: &AudioBook) {
        metadata.duration = abook
            .length
            .filter(|&length| length > 0)
            .map(|length| length / 60_000);
        metadata.narrator = abook
            .narrator_as_string
            .as_deref()
            .filter(|narrator| !narrator.is_empty())
            .map(str::to_string);
        metadata.description = Some(ensure_string(abook.description.as_deref()));
        metadata.publisher = Some(ensure_string(
            abook.publisher.as_ref().and_then(|p| p.name.as_deref()),
        ));
        metadata.published_year = abook
            .release_date_format
            .as_deref()
            .map(|date| date.chars().take(4).collect());
        metadata.isbn = Some(stringify(abook.isbn.as_ref()));
    }

    fn apply_ebook_edition(metadata: &mut BookMetadata, ebook: &EBook) {
        metadata.description = Some(ensure_string(ebook.description.as_deref()));
        metadata.publisher = Some(ensure_string(
            ebook.publisher.as_ref().and_then(|p| p.name.as_deref()),
        ));
        metadata.published_year = ebook
            .release_date_format
            .as_deref()
            .map(|date| date.chars().take(4).collect());
        metadata.isbn = Some(stringify(ebook.isbn.as_ref()));
    }
}

/// Null-safe stringify: absent text becomes "", never null
fn ensure_string(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Null-safe stringify for fields that arrive as number or string
fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Swap the 320x320 resolution token for 640x640 and prefix the catalog host
fn upgrade_cover_url(path: Option<&str>) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    Some(format!(
        "{}{}",
        COVER_HOST,
        path.replacen("320x320", "640x640", 1)
    ))
}
