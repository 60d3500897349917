//! Bounded FIFO cache of final, ranked result lists.

use std::collections::{HashMap, VecDeque};

use super::types::{SearchOptions, SearchResult};

/// Maximum cached queries per index build.
pub const RESULT_CACHE_CAPACITY: usize = 50;

/// Structural cache key: the trimmed query plus every option flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: String,
    pub options: SearchOptions,
}

impl CacheKey {
    pub fn new(query: &str, options: &SearchOptions) -> Self {
        Self {
            query: query.to_string(),
            options: options.clone(),
        }
    }
}

/// Query cache that evicts the oldest inserted entry once full.
///
/// Lookups do not refresh an entry's position.
#[derive(Debug)]
pub struct ResultCache {
    capacity: usize,
    entries: HashMap<CacheKey, Vec<SearchResult>>,
    /// insertion order, oldest first
    order: VecDeque<CacheKey>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::with_capacity(RESULT_CACHE_CAPACITY)
    }
}

impl ResultCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<&Vec<SearchResult>> {
        self.entries.get(key)
    }

    /// Store `results` under `key`. Re-inserting an existing key replaces the
    /// value in place and keeps its original age.
    pub fn insert(&mut self, key: CacheKey, results: Vec<SearchResult>) {
        if self.capacity == 0 {
            return;
        }
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = results;
            return;
        }
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, results);
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
