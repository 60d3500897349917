//! Search engine: owns the active caption index and its result cache.
//!
//! A build indexes into fresh structures and publishes them with a single
//! pointer swap, so a concurrent reader sees either the previous index or the
//! complete new one. Each published index carries its own result cache, which
//! makes "clear the cache on rebuild" part of the same swap.

mod cache;
mod index;
mod query;
mod types;

pub use cache::{CacheKey, ResultCache, RESULT_CACHE_CAPACITY};
pub use index::{CaptionIndex, MAX_NGRAM, MIN_NGRAM};
pub use query::{highlight_spans, CONTEXT_WINDOW, FUZZY_FALLBACK_BELOW, LONG_SEGMENT_CHARS};
pub use types::*;

use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use tracing::{debug, info};

use crate::{prepare_segments, CaptionSegment};

/// Queries shorter than this (after trimming, in characters) return nothing.
pub const MIN_QUERY_LEN: usize = 2;

#[derive(Debug)]
struct ActiveIndex {
    index: Arc<CaptionIndex>,
    cache: Mutex<ResultCache>,
}

/// Caption search engine for one video context.
///
/// Create one per video (or key several by video id); there is no global
/// instance. All methods take `&self`, so an engine can be shared behind an
/// `Arc` and rebuilt from a background thread while queries run.
#[derive(Debug, Default)]
pub struct SearchEngine {
    active: RwLock<Option<Arc<ActiveIndex>>>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active index with one built from `segments`.
    ///
    /// Returns `false`, leaving any previous index active, when there are no
    /// segments with caption text. Missing captions are an expected state,
    /// not an error.
    pub fn build_index(&self, segments: Vec<CaptionSegment>) -> bool {
        if segments.is_empty() {
            debug!("No caption segments to index");
            return false;
        }

        let start = Instant::now();
        let raw_count = segments.len();
        let segments = prepare_segments(segments);
        if segments.is_empty() {
            debug!(raw_count, "All caption segments were empty after cleaning");
            return false;
        }

        let index = CaptionIndex::build(segments);
        let stats = index.stats();
        let fresh = Arc::new(ActiveIndex {
            index: Arc::new(index),
            cache: Mutex::new(ResultCache::default()),
        });
        *self.active.write().unwrap_or_else(|e| e.into_inner()) = Some(fresh);

        info!(
            segments = stats.segments,
            dropped = raw_count - stats.segments,
            words = stats.unique_words,
            ngrams = stats.ngrams,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Caption index built"
        );
        true
    }

    /// Ranked results for `query`, at most `options.max_results` of them.
    ///
    /// Returns an empty list before any successful build and for queries
    /// shorter than two characters. Repeating a query with the same options
    /// returns the cached list for the current index unchanged.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        let Some(active) = self.current() else {
            return Vec::new();
        };
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        let key = CacheKey::new(query, options);
        if let Some(hit) = active.cache.lock().unwrap_or_else(|e| e.into_inner()).get(&key) {
            debug!(query, results = hit.len(), "Result cache hit");
            return hit.clone();
        }

        let start = Instant::now();
        let results = query::run(&active.index, query, options);
        debug!(
            query,
            results = results.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Result cache miss"
        );
        active
            .cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, results.clone());
        results
    }

    pub fn is_indexed(&self) -> bool {
        self.current().is_some()
    }

    /// The published index, if any. Holding it keeps that build alive even
    /// if the engine is rebuilt meanwhile.
    pub fn index(&self) -> Option<Arc<CaptionIndex>> {
        self.current().map(|a| Arc::clone(&a.index))
    }

    pub fn segments(&self) -> Vec<CaptionSegment> {
        self.index().map(|i| i.segments().to_vec()).unwrap_or_default()
    }

    pub fn stats(&self) -> Option<IndexStats> {
        self.current().map(|a| a.index.stats())
    }

    /// Number of cached query results for the active index.
    pub fn cached_results(&self) -> usize {
        self.current()
            .map(|a| a.cache.lock().unwrap_or_else(|e| e.into_inner()).len())
            .unwrap_or(0)
    }

    /// Drop the active index; the engine returns to the "not indexed" state.
    pub fn clear(&self) {
        *self.active.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn current(&self) -> Option<Arc<ActiveIndex>> {
        self.active.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
