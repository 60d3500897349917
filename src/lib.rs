//! # caption_search — Caption Search Engine
//!
//! Word and n-gram indexes over timestamped caption segments, with fuzzy
//! (edit-distance) and exact-phrase queries returning ranked results that
//! carry the surrounding caption context and a seekable timestamp.
//!
//! ## Library usage
//!
//! The binary wraps this crate with caption file loading, a per-video
//! segment store and a CLI. The core itself is pure and in-memory:
//!
//! ```
//! use caption_search::{CaptionSegment, SearchEngine, SearchOptions};
//!
//! let engine = SearchEngine::new();
//! assert!(engine.build_index(vec![
//!     CaptionSegment::new(0, 2, "hello world"),
//!     CaptionSegment::new(5, 2, "world peace"),
//! ]));
//!
//! let results = engine.search("world", &SearchOptions::default());
//! assert_eq!(results.len(), 2);
//! assert_eq!(results[0].timestamp, 0);
//! ```

use serde::{Deserialize, Serialize};

pub mod engine;
pub mod fuzzy;

pub use engine::{
    highlight_spans, CaptionIndex, IndexStats, ResultCache, ResultContext, SearchEngine,
    SearchOptions, SearchResult,
};
pub use fuzzy::{is_fuzzy_match, levenshtein_distance, similarity};

/// Tokens must be longer than this many characters to be indexed.
/// Single characters are noise in spoken captions.
pub const MIN_TOKEN_LEN: usize = 2;

// ─── Stable hashing ─────────────────────────────────────────────────

/// Stable FNV-1a hash (deterministic across Rust versions, unlike `DefaultHasher`).
///
/// Used to derive storage file names from video identifiers.
#[must_use]
pub fn stable_hash(parts: &[&[u8]]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;
    let mut hash = FNV_OFFSET;
    for part in parts {
        for &byte in *part {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}

// ─── Caption segments ────────────────────────────────────────────────

/// One utterance window of a caption track.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CaptionSegment {
    /// Seconds from the start of the video.
    pub start_time: u32,
    /// Seconds the caption stays on screen.
    pub duration: u32,
    pub text: String,
}

impl CaptionSegment {
    pub fn new(start_time: u32, duration: u32, text: impl Into<String>) -> Self {
        Self {
            start_time,
            duration,
            text: text.into(),
        }
    }

    pub fn end_time(&self) -> u32 {
        self.start_time.saturating_add(self.duration)
    }
}

/// A pointer from a token back to the segment it occurs in.
///
/// The segment text is not copied per token; resolve it through
/// [`CaptionIndex::segment`] with `segment_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Position of the segment in the ordered segment list of one index build.
    pub segment_index: u32,
    /// Start time of that segment, in seconds.
    pub timestamp: u32,
}

// ─── Tokenization ────────────────────────────────────────────────────

/// Tokenize caption or query text into normalized search tokens.
///
/// Lowercases, replaces everything that is not a letter, digit or whitespace
/// with a space (so `rock'n'roll` splits rather than merges), and drops tokens
/// shorter than [`MIN_TOKEN_LEN`] characters. Index build and query time must
/// both go through this function.
///
/// # Examples
///
/// ```
/// use caption_search::tokenize;
///
/// let tokens = tokenize("Hello, WORLD! It's a test.");
/// assert_eq!(tokens, vec!["hello", "world", "it", "test"]);
/// ```
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();
    stripped
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Clean raw caption text: decode the HTML entities caption tracks carry,
/// turn control characters into spaces, collapse whitespace and trim.
#[must_use]
pub fn clean_caption_text(raw: &str) -> String {
    let decoded = decode_entities(raw);
    let spaced: String = decoded
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        // Entities are short; anything longer is a literal ampersand.
        let semi = tail.find(';').filter(|&i| i <= 10);
        let decoded = semi.and_then(|i| decode_entity(&tail[1..i]).map(|c| (c, i)));
        match decoded {
            Some((c, i)) => {
                out.push(c);
                rest = &tail[i + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Normalize a caption track for indexing.
///
/// Cleans every text, drops segments that end up empty, and stable-sorts by
/// start time so segments sharing a start time keep their input order.
#[must_use]
pub fn prepare_segments(raw: Vec<CaptionSegment>) -> Vec<CaptionSegment> {
    let mut segments: Vec<CaptionSegment> = raw
        .into_iter()
        .filter_map(|seg| {
            let text = clean_caption_text(&seg.text);
            if text.is_empty() {
                None
            } else {
                Some(CaptionSegment { text, ..seg })
            }
        })
        .collect();
    segments.sort_by_key(|s| s.start_time);
    segments
}

/// Format seconds as `m:ss`, or `h:mm:ss` past the first hour.
#[must_use]
pub fn format_timestamp(secs: u32) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(tokenize("hello world"), vec!["hello", "world"]);
    }

    #[test]
    fn test_tokenize_strips_punctuation_without_merging() {
        assert_eq!(tokenize("rock'n'roll, baby!"), vec!["rock", "roll", "baby"]);
        assert_eq!(tokenize("snake_case"), vec!["snake", "case"]);
    }

    #[test]
    fn test_tokenize_drops_single_chars() {
        assert_eq!(tokenize("a bb ccc I"), vec!["bb", "ccc"]);
    }

    #[test]
    fn test_tokenize_collapses_whitespace() {
        assert_eq!(tokenize("  the \t quick\n\nfox  "), vec!["the", "quick", "fox"]);
    }

    #[test]
    fn test_tokenize_keeps_digits_and_repeats() {
        assert_eq!(tokenize("Area 51 is 51"), vec!["area", "51", "is", "51"]);
    }

    #[test]
    fn test_tokenize_unicode_letters() {
        assert_eq!(tokenize("Café über"), vec!["café", "über"]);
    }

    #[test]
    fn test_tokenize_empty_string() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("!!! ... ?").is_empty());
    }

    #[test]
    fn test_clean_caption_text_entities() {
        assert_eq!(clean_caption_text("rock &amp; roll"), "rock & roll");
        assert_eq!(clean_caption_text("it&#39;s &quot;fine&quot;"), "it's \"fine\"");
        assert_eq!(clean_caption_text("&#x41;&lt;&gt;"), "A<>");
    }

    #[test]
    fn test_clean_caption_text_unknown_entity_kept() {
        assert_eq!(clean_caption_text("AT&T rocks"), "AT&T rocks");
        assert_eq!(clean_caption_text("a &bogus; b"), "a &bogus; b");
    }

    #[test]
    fn test_clean_caption_text_control_chars_and_whitespace() {
        assert_eq!(clean_caption_text("  line one\nline\ttwo\u{0007} "), "line one line two");
        assert_eq!(clean_caption_text("\n\n"), "");
    }

    #[test]
    fn test_prepare_segments_drops_empty_and_sorts_stably() {
        let prepared = prepare_segments(vec![
            CaptionSegment::new(10, 2, "later"),
            CaptionSegment::new(0, 2, "   "),
            CaptionSegment::new(5, 1, "first at five"),
            CaptionSegment::new(5, 1, "second at five"),
        ]);
        let texts: Vec<&str> = prepared.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["first at five", "second at five", "later"]);
    }

    #[test]
    fn test_end_time() {
        assert_eq!(CaptionSegment::new(5, 3, "x").end_time(), 8);
        assert_eq!(CaptionSegment::new(u32::MAX, 3, "x").end_time(), u32::MAX);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "0:00");
        assert_eq!(format_timestamp(65), "1:05");
        assert_eq!(format_timestamp(3600), "1:00:00");
        assert_eq!(format_timestamp(3725), "1:02:05");
    }

    #[test]
    fn test_stable_hash_known_fnv1a_vector() {
        assert_eq!(stable_hash(&[]), 0xcbf2_9ce4_8422_2325);
    }

    #[test]
    fn test_stable_hash_multi_part_equivalent_to_concat() {
        assert_eq!(stable_hash(&[b"video", b"id"]), stable_hash(&[b"videoid"]));
    }
}

// ─── Property-based tests (proptest) ─────────────────────────────────
