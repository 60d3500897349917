//! Word and n-gram index construction over an ordered segment list.

use std::collections::HashMap;

use crate::{tokenize, CaptionSegment, IndexEntry};

use super::types::IndexStats;

/// Smallest and largest phrase window stored in the n-gram index.
pub const MIN_NGRAM: usize = 2;
pub const MAX_NGRAM: usize = 3;

/// Immutable index over one video's captions.
///
/// Built once per caption track and never mutated afterwards; a rebuild
/// produces a new `CaptionIndex`.
#[derive(Debug, Default)]
pub struct CaptionIndex {
    segments: Vec<CaptionSegment>,
    /// token → one entry per occurrence, in segment order
    words: HashMap<String, Vec<IndexEntry>>,
    /// tokens in first-seen order, for deterministic vocabulary scans
    vocabulary: Vec<String>,
    /// space-joined 2- and 3-token windows → entries, never crossing segments
    ngrams: HashMap<String, Vec<IndexEntry>>,
}

impl CaptionIndex {
    /// Index `segments`, which must already be cleaned and ordered by start
    /// time (see [`crate::prepare_segments`]). Position in the list becomes
    /// each segment's `segment_index`.
    pub fn build(segments: Vec<CaptionSegment>) -> Self {
        let mut words: HashMap<String, Vec<IndexEntry>> = HashMap::new();
        let mut vocabulary = Vec::new();
        let mut ngrams: HashMap<String, Vec<IndexEntry>> = HashMap::new();

        for (i, segment) in segments.iter().enumerate() {
            let entry = IndexEntry {
                segment_index: i as u32,
                timestamp: segment.start_time,
            };
            let tokens = tokenize(&segment.text);

            for token in &tokens {
                match words.get_mut(token) {
                    Some(entries) => entries.push(entry),
                    None => {
                        vocabulary.push(token.clone());
                        words.insert(token.clone(), vec![entry]);
                    }
                }
            }

            for n in MIN_NGRAM..=MAX_NGRAM {
                for window in tokens.windows(n) {
                    ngrams.entry(window.join(" ")).or_default().push(entry);
                }
            }
        }

        Self {
            segments,
            words,
            vocabulary,
            ngrams,
        }
    }

    pub fn segments(&self) -> &[CaptionSegment] {
        &self.segments
    }

    pub fn segment(&self, segment_index: u32) -> Option<&CaptionSegment> {
        self.segments.get(segment_index as usize)
    }

    /// Exact lookup of a normalized token.
    pub fn word_entries(&self, token: &str) -> &[IndexEntry] {
        self.words.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Exact lookup of a space-joined 2- or 3-token phrase.
    pub fn ngram_entries(&self, phrase: &str) -> Option<&[IndexEntry]> {
        self.ngrams.get(phrase).map(Vec::as_slice)
    }

    /// Every distinct indexed token, in the order it first appeared.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.iter().map(String::as_str)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            segments: self.segments.len(),
            unique_words: self.words.len(),
            ngrams: self.ngrams.len(),
            total_duration_secs: self.segments.iter().map(CaptionSegment::end_time).max().unwrap_or(0),
        }
    }
}
