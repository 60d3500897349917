//! Query evaluation: phrase and word matching, fuzzy fallback, ranking.

use std::collections::HashMap;
use std::ops::Range;

use crate::fuzzy::is_fuzzy_match;
use crate::{tokenize, IndexEntry};

use super::index::CaptionIndex;
use super::types::{ResultContext, SearchOptions, SearchResult};

/// Exact hits below this count trigger the fuzzy vocabulary scan.
pub const FUZZY_FALLBACK_BELOW: usize = 5;

/// Segments either side of a hit included in its context.
pub const CONTEXT_WINDOW: usize = 2;

/// Captions longer than this (in characters) are penalised.
pub const LONG_SEGMENT_CHARS: usize = 200;

const WORD_SCORE: i32 = 10;
const PHRASE_BONUS: i32 = 15;
const FUZZY_PENALTY: i32 = 3;
const PROXIMITY_MAX: i32 = 5;
const LONG_SEGMENT_PENALTY: i32 = 2;

/// A hit before context and scoring are attached.
#[derive(Debug, Clone)]
struct Match {
    entry: IndexEntry,
    /// `None` for phrase and substring hits.
    matched_words: Option<Vec<String>>,
    phrase_match: bool,
    fuzzy_match: bool,
    original_word: Option<String>,
}

impl Match {
    fn plain(entry: IndexEntry) -> Self {
        Self {
            entry,
            matched_words: None,
            phrase_match: false,
            fuzzy_match: false,
            original_word: None,
        }
    }
}

/// Evaluate an already-trimmed query against `index`.
pub(crate) fn run(index: &CaptionIndex, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
    let matches = if options.exact_phrase {
        phrase_matches(index, query, options.case_sensitive)
    } else {
        word_matches(index, query, options.fuzzy)
    };
    rank(index, matches, options.max_results)
}

// ─── Phrase mode ─────────────────────────────────────────────────────

fn phrase_matches(index: &CaptionIndex, query: &str, case_sensitive: bool) -> Vec<Match> {
    let needle = if case_sensitive {
        query.to_string()
    } else {
        query.to_lowercase()
    };

    if let Some(entries) = index.ngram_entries(&needle) {
        let mut seen = Vec::new();
        return entries
            .iter()
            .filter(|e| {
                // one hit per segment even if the phrase repeats inside it
                if seen.contains(&e.segment_index) {
                    false
                } else {
                    seen.push(e.segment_index);
                    true
                }
            })
            .map(|&entry| Match {
                phrase_match: true,
                ..Match::plain(entry)
            })
            .collect();
    }

    index
        .segments()
        .iter()
        .enumerate()
        .filter(|(_, seg)| {
            if case_sensitive {
                seg.text.contains(&needle)
            } else {
                seg.text.to_lowercase().contains(&needle)
            }
        })
        .map(|(i, seg)| {
            Match::plain(IndexEntry {
                segment_index: i as u32,
                timestamp: seg.start_time,
            })
        })
        .collect()
}

// ─── Word mode ───────────────────────────────────────────────────────

fn word_matches(index: &CaptionIndex, query: &str, fuzzy: bool) -> Vec<Match> {
    let mut query_words: Vec<String> = Vec::new();
    for word in tokenize(query) {
        if !query_words.contains(&word) {
            query_words.push(word);
        }
    }

    let mut merged: Vec<Match> = Vec::new();
    let mut by_timestamp: HashMap<u32, usize> = HashMap::new();

    for word in &query_words {
        for m in lookup_word(index, word, fuzzy) {
            match by_timestamp.get(&m.entry.timestamp) {
                Some(&slot) => {
                    let words = merged[slot].matched_words.get_or_insert_with(Vec::new);
                    if !words.contains(word) {
                        words.push(word.clone());
                    }
                }
                None => {
                    by_timestamp.insert(m.entry.timestamp, merged.len());
                    merged.push(Match {
                        matched_words: Some(vec![word.clone()]),
                        ..m
                    });
                }
            }
        }
    }
    merged
}

/// Exact lookup, plus a full-vocabulary fuzzy scan when exact hits are scarce.
fn lookup_word(index: &CaptionIndex, word: &str, fuzzy: bool) -> Vec<Match> {
    let mut matches: Vec<Match> = index
        .word_entries(word)
        .iter()
        .map(|&entry| Match::plain(entry))
        .collect();

    if fuzzy && matches.len() < FUZZY_FALLBACK_BELOW {
        for candidate in index.vocabulary() {
            if candidate == word || !is_fuzzy_match(word, candidate) {
                continue;
            }
            matches.extend(index.word_entries(candidate).iter().map(|&entry| Match {
                fuzzy_match: true,
                original_word: Some(candidate.to_string()),
                ..Match::plain(entry)
            }));
        }
    }
    matches
}

// ─── Ranking ─────────────────────────────────────────────────────────

fn rank(index: &CaptionIndex, matches: Vec<Match>, max_results: usize) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = matches
        .into_iter()
        .filter_map(|m| {
            let segment = index.segment(m.entry.segment_index)?;
            let score = score_match(&m, &segment.text);
            Some(SearchResult {
                segment_index: m.entry.segment_index,
                timestamp: m.entry.timestamp,
                text: segment.text.clone(),
                matched_words: m.matched_words.unwrap_or_default(),
                score,
                phrase_match: m.phrase_match,
                fuzzy_match: m.fuzzy_match,
                original_word: m.original_word,
                context: build_context(index, m.entry.segment_index as usize),
            })
        })
        .collect();

    // stable: equal scores keep encounter order
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results.truncate(max_results);
    results
}

fn score_match(m: &Match, text: &str) -> i32 {
    let mut score = match &m.matched_words {
        Some(words) => WORD_SCORE * words.len() as i32,
        None => WORD_SCORE,
    };
    if m.phrase_match {
        score += PHRASE_BONUS;
    }
    if m.fuzzy_match {
        score -= FUZZY_PENALTY;
    }
    if let Some(words) = &m.matched_words {
        if words.len() >= 2 {
            score += proximity_bonus(words, text);
        }
    }
    if text.chars().count() > LONG_SEGMENT_CHARS {
        score -= LONG_SEGMENT_PENALTY;
    }
    score
}

/// `max(0, 5 - spread)` over the first positions of each matched word in
/// `text`; zero when fewer than two of them occur verbatim.
fn proximity_bonus(words: &[String], text: &str) -> i32 {
    let tokens = tokenize(text);
    let positions: Vec<usize> = words
        .iter()
        .filter_map(|w| tokens.iter().position(|t| t == w))
        .collect();
    if positions.len() < 2 {
        return 0;
    }
    let min = positions.iter().copied().min().unwrap_or(0);
    let max = positions.iter().copied().max().unwrap_or(0);
    (PROXIMITY_MAX - (max - min) as i32).max(0)
}

fn build_context(index: &CaptionIndex, segment_index: usize) -> ResultContext {
    let segments = index.segments();
    if segment_index >= segments.len() {
        return ResultContext::default();
    }
    let start = segment_index.saturating_sub(CONTEXT_WINDOW);
    let end = (segment_index + CONTEXT_WINDOW).min(segments.len() - 1);
    let join = |range: Range<usize>| {
        segments[range]
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    };

    ResultContext {
        full_text: join(start..end + 1),
        before_text: join(start..segment_index),
        match_text: segments[segment_index].text.clone(),
        after_text: join(segment_index + 1..end + 1),
    }
}

/// Byte ranges in `text` of the words whose normalized form is one of `words`.
///
/// Words are the same alphanumeric runs the tokenizer produces, so callers
/// can wrap each range in highlight markup.
#[must_use]
pub fn highlight_spans(text: &str, words: &[String]) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut run_start: Option<usize> = None;

    let close = |start: usize, end: usize, spans: &mut Vec<Range<usize>>| {
        let candidate = text[start..end].to_lowercase();
        if words.iter().any(|w| *w == candidate) {
            spans.push(start..end);
        }
    };

    for (i, c) in text.char_indices() {
        if c.is_alphanumeric() {
            run_start.get_or_insert(i);
        } else if let Some(start) = run_start.take() {
            close(start, i, &mut spans);
        }
    }
    if let Some(start) = run_start {
        close(start, text.len(), &mut spans);
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_proximity_adjacent_words() {
        assert_eq!(proximity_bonus(&words(&["quick", "brown"]), "the quick brown fox"), 4);
    }

    #[test]
    fn test_proximity_far_apart_is_zero() {
        let text = "alpha one two three four five six omega";
        assert_eq!(proximity_bonus(&words(&["alpha", "omega"]), text), 0);
    }

    #[test]
    fn test_proximity_uses_first_position() {
        // first "cat" at 0, "dog" at 3 → spread 3
        assert_eq!(proximity_bonus(&words(&["cat", "dog"]), "cat and then dog cat"), 2);
    }

    #[test]
    fn test_proximity_needs_two_resolved_positions() {
        assert_eq!(proximity_bonus(&words(&["cat", "colour"]), "cat and color"), 0);
    }

    #[test]
    fn test_score_components() {
        let entry = IndexEntry { segment_index: 0, timestamp: 0 };
        let phrase = Match { phrase_match: true, ..Match::plain(entry) };
        assert_eq!(score_match(&phrase, "quick brown"), 25);

        let fuzzy = Match {
            matched_words: Some(words(&["colour"])),
            fuzzy_match: true,
            original_word: Some("color".to_string()),
            ..Match::plain(entry)
        };
        assert_eq!(score_match(&fuzzy, "nice color"), 7);

        let long_text = "word ".repeat(50);
        let plain = Match { matched_words: Some(words(&["word"])), ..Match::plain(entry) };
        assert_eq!(score_match(&plain, &long_text), 8);
    }

    #[test]
    fn test_highlight_spans() {
        let text = "Hello, World! hello-world";
        let spans = highlight_spans(text, &words(&["world"]));
        assert_eq!(spans, vec![7..12, 20..25]);
        assert_eq!(&text[spans[0].clone()], "World");
    }

    #[test]
    fn test_highlight_spans_trailing_word_and_unicode() {
        let text = "déjà vu";
        let spans = highlight_spans(text, &words(&["vu", "déjà"]));
        assert_eq!(spans.len(), 2);
        assert_eq!(&text[spans[0].clone()], "déjà");
        assert_eq!(&text[spans[1].clone()], "vu");
    }

    #[test]
    fn test_highlight_spans_no_words() {
        assert!(highlight_spans("anything here", &[]).is_empty());
    }
}
