use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // ============ TITLE NOISE PATTERNS ============
    // Ordered: the specific numeric prefixes (Folge/Band/dash) must fire
    // before the bare-number rule, which would otherwise swallow them.
    static ref TITLE_NOISE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)^.*?,\s*Folge\s*\d+:\s*").unwrap(),
        Regex::new(r"(?i)^.*?,\s*Band\s*\d+:\s*").unwrap(),
        Regex::new(r"(?i)^.*?\s+-\s+\d+:\s*").unwrap(),
        Regex::new(r"(?i)^.*?\s+\d+:\s*").unwrap(),
        Regex::new(r"(?i)^.*?,\s*Teil\s*\d+:\s*").unwrap(),
        Regex::new(r"(?i)^.*?,\s*Volume\s*\d+:\s*").unwrap(),
        Regex::new(r"(?i)\s*\((Ungekürzt|Gekürzt)\)\s*$").unwrap(),
        Regex::new(r"(?i),\s*Teil\s+\d+$").unwrap(),
        Regex::new(r"(?i)-\s*.*?(?:Reihe|Serie)\s+\d+$").unwrap(),
    ];

    // ============ CATEGORY PATTERNS ============
    static ref AGE_RANGE: Regex =
        Regex::new(r"(?i)\d+\s*(bis|-)\s*\d+\s*(Jahre|Year|Age)").unwrap();
}

/// Rule-based cleanup for raw catalog strings
pub struct TextCleaner;

impl TextCleaner {
    /// Strip episode/volume/series markers and abridgement tags from a title.
    ///
    /// Each rule removes its first match; a string matching no rule passes
    /// through unchanged.
    pub fn clean_title(title: &str) -> String {
        let mut cleaned = title.to_string();
        for pattern in TITLE_NOISE_PATTERNS.iter() {
            cleaned = pattern.replace(&cleaned, "").into_owned();
        }
        cleaned.trim().to_string()
    }

    /// Drop age-range entries ("6 bis 9 Jahre", "8-10 years") from a category
    /// list, keeping the relative order of the rest.
    pub fn clean_categories(categories: &[String]) -> Vec<String> {
        categories
            .iter()
            .filter(|cat| !AGE_RANGE.is_match(cat))
            .cloned()
            .collect()
    }

    /// Split a slash-delimited genre string into trimmed segments.
    ///
    /// Empty segments are kept as empty strings for shape compatibility with
    /// downstream consumers.
    pub fn split_genre(genre: &str) -> Vec<String> {
        if genre.is_empty() {
            return Vec::new();
        }
        genre.split('/').map(|g| g.trim().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_title_episode_prefix() {
        assert_eq!(
            TextCleaner::clean_title("Mystery, Folge 3: The Dark House"),
            "The Dark House"
        );
    }

    #[test]
    fn test_clean_title_volume_prefix() {
        assert_eq!(
            TextCleaner::clean_title("Die Saga, Band 2: Aufbruch"),
            "Aufbruch"
        );
        assert_eq!(
            TextCleaner::clean_title("The Cycle, Volume 4: Endgame"),
            "Endgame"
        );
    }

    #[test]
    fn test_clean_title_numbered_prefixes() {
        assert_eq!(
            TextCleaner::clean_title("Die Akte - 7: Schattenspiel"),
            "Schattenspiel"
        );
        assert_eq!(TextCleaner::clean_title("Saga 12: Neuland"), "Neuland");
    }

    #[test]
    fn test_clean_title_abridgement_suffix() {
        assert_eq!(
            TextCleaner::clean_title("Der Prozess (Ungekürzt)"),
            "Der Prozess"
        );
        assert_eq!(
            TextCleaner::clean_title("Der Prozess (Gekürzt)"),
            "Der Prozess"
        );
    }

    #[test]
    fn test_clean_title_part_suffix() {
        assert_eq!(TextCleaner::clean_title("Die Stadt, Teil 2"), "Die Stadt");
    }

    #[test]
    fn test_clean_title_series_suffix() {
        assert_eq!(
            TextCleaner::clean_title("Das Haus - Krimi Reihe 4"),
            "Das Haus"
        );
        assert_eq!(
            TextCleaner::clean_title("Der Wald - Mystery Serie 2"),
            "Der Wald"
        );
    }

    #[test]
    fn test_clean_title_passthrough() {
        assert_eq!(TextCleaner::clean_title("Plain Title"), "Plain Title");
        assert_eq!(TextCleaner::clean_title(""), "");
    }

    #[test]
    fn test_clean_title_idempotent() {
        let samples = [
            "Mystery, Folge 3: The Dark House",
            "Die Saga, Band 2: Aufbruch",
            "Die Akte - 7: Schattenspiel",
            "Saga 12: Neuland",
            "Der Prozess (Ungekürzt)",
            "Die Stadt, Teil 2",
            "Das Haus - Krimi Reihe 4",
            "Plain Title",
            "  padded  ",
            "",
        ];
        for sample in samples {
            let once = TextCleaner::clean_title(sample);
            assert_eq!(TextCleaner::clean_title(&once), once, "input: {sample:?}");
        }
    }

    #[test]
    fn test_clean_categories_drops_age_ranges() {
        let categories = vec![
            "Krimi".to_string(),
            "6 bis 9 Jahre".to_string(),
            "Thriller".to_string(),
            "8-10 Years".to_string(),
            "10 - 12 Age".to_string(),
        ];
        assert_eq!(
            TextCleaner::clean_categories(&categories),
            vec!["Krimi".to_string(), "Thriller".to_string()]
        );
    }

    #[test]
    fn test_split_genre() {
        assert_eq!(
            TextCleaner::split_genre("Crime / Thriller/Mystery"),
            vec!["Crime", "Thriller", "Mystery"]
        );
        assert!(TextCleaner::split_genre("").is_empty());
    }

    #[test]
    fn test_split_genre_keeps_empty_segments() {
        assert_eq!(TextCleaner::split_genre("Crime//Mystery"), vec!["Crime", "", "Mystery"]);
    }
}
