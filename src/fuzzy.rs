//! Edit distance and the fuzzy-similarity rule used for word fallback.

/// Minimum similarity for two words to count as a fuzzy match.
pub const FUZZY_THRESHOLD: f64 = 0.7;

/// Words whose lengths differ by more than this never fuzzy-match.
pub const MAX_LENGTH_DIFF: usize = 3;

/// Classic Levenshtein distance (unit cost insert, delete, substitute).
///
/// Counts characters, not bytes, so accented words compare correctly.
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, &ac) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// `1 - distance / longer_length`, in `[0, 1]`. Two empty strings are identical.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / longest as f64
}

/// Whether `indexed` is close enough to `query` to be returned as a fuzzy hit.
#[must_use]
pub fn is_fuzzy_match(query: &str, indexed: &str) -> bool {
    let q_len = query.chars().count();
    let i_len = indexed.chars().count();
    if q_len.abs_diff(i_len) > MAX_LENGTH_DIFF {
        return false;
    }
    similarity(query, indexed) >= FUZZY_THRESHOLD
}
