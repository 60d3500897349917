//! Query options, result records and index statistics.

use serde::{Deserialize, Serialize};

/// Result count used when a query is issued without an explicit cap.
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Result count for interactive, per-keystroke queries.
pub const INTERACTIVE_MAX_RESULTS: usize = 15;

/// Option flags for a single query.
///
/// Hashable so that the full option set is part of the result cache key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    /// Fall back to edit-distance matches when exact hits are scarce.
    pub fuzzy: bool,
    /// Only affects phrase mode; word mode is always case-normalized.
    pub case_sensitive: bool,
    /// Match the whole query as a phrase instead of as separate words.
    pub exact_phrase: bool,
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fuzzy: true,
            case_sensitive: false,
            exact_phrase: false,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl SearchOptions {
    /// Defaults for search-as-you-type callers.
    pub fn interactive() -> Self {
        Self {
            max_results: INTERACTIVE_MAX_RESULTS,
            ..Self::default()
        }
    }
}

/// Caption text around a hit: up to two segments either side.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResultContext {
    pub full_text: String,
    pub before_text: String,
    pub match_text: String,
    pub after_text: String,
}

/// A ranked hit, ready for rendering and seeking.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub segment_index: u32,
    /// Seconds to seek playback to.
    pub timestamp: u32,
    pub text: String,
    /// Distinct query words that hit this segment. Empty for phrase hits.
    pub matched_words: Vec<String>,
    pub score: i32,
    pub phrase_match: bool,
    pub fuzzy_match: bool,
    /// The indexed word a fuzzy match was accepted for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_word: Option<String>,
    pub context: ResultContext,
}

/// Size summary of a built index.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub segments: usize,
    pub unique_words: usize,
    pub ngrams: usize,
    /// End time of the last caption, in seconds.
    pub total_duration_secs: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = SearchOptions::default();
        assert!(opts.fuzzy);
        assert!(!opts.case_sensitive);
        assert!(!opts.exact_phrase);
        assert_eq!(opts.max_results, 20);
    }

    #[test]
    fn test_interactive_options() {
        let opts = SearchOptions::interactive();
        assert_eq!(opts.max_results, 15);
        assert!(opts.fuzzy);
    }

    #[test]
    fn test_options_deserialize_partial_camel_case() {
        let opts: SearchOptions =
            serde_json::from_str(r#"{"exactPhrase": true, "maxResults": 3}"#).unwrap();
        assert!(opts.exact_phrase);
        assert!(opts.fuzzy, "missing fields fall back to defaults");
        assert_eq!(opts.max_results, 3);
    }

    #[test]
    fn test_result_serializes_camel_case_without_empty_original_word() {
        let result = SearchResult {
            segment_index: 1,
            timestamp: 5,
            text: "world peace".to_string(),
            matched_words: vec!["world".to_string()],
            score: 10,
            phrase_match: false,
            fuzzy_match: false,
            original_word: None,
            context: ResultContext::default(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["segmentIndex"], 1);
        assert_eq!(json["matchedWords"][0], "world");
        assert!(json.get("originalWord").is_none());
    }
}
