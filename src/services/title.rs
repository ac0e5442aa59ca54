use regex::Regex;

use crate::services::cleaner::TextCleaner;

/// A raw catalog title split into its display parts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecomposedTitle {
    pub title: String,
    pub subtitle: Option<String>,
}

/// Splits cleaned titles into title/subtitle, series-aware
pub struct TitleDecomposer;

impl TitleDecomposer {
    /// Decompose a raw title, preferring series-derived subtitles over
    /// colon-split ones.
    ///
    /// With series info the subtitle is always `"<name>, <sequence>"` and the
    /// title is truncated to the portion before an embedded series name when
    /// one can be isolated. Without series info the first colon splits title
    /// from subtitle; later colons stay inside the subtitle.
    pub fn decompose(raw_title: &str, series: Option<(&str, &str)>) -> DecomposedTitle {
        let mut title = TextCleaner::clean_title(raw_title);
        let mut subtitle = None;

        if let Some((name, sequence)) = series {
            subtitle = Some(format!("{}, {}", name, sequence));

            if title.contains(name) {
                let pattern = format!(r"^(.+?)[-,]\s*{}", regex::escape(name));
                if let Ok(before_series) = Regex::new(&pattern) {
                    if let Some(caps) = before_series.captures(&title) {
                        title = caps[1].trim().to_string();
                    }
                }
            }

            // Truncation can expose a new matchable prefix or suffix
            title = TextCleaner::clean_title(&title);
        } else if title.contains(':') {
            if let Some((head, tail)) = title.split_once(':') {
                subtitle = Some(tail.trim().to_string());
                title = head.trim().to_string();
            }
        }

        DecomposedTitle {
            title: title.trim().to_string(),
            subtitle: subtitle.map(|s| s.trim().to_string()),
        }
    }
}
