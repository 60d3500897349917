//! Criterion benchmarks for caption search core operations.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the core operations in isolation,
//! using synthetic transcripts to ensure reproducibility across machines.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use caption_search::{levenshtein_distance, tokenize, CaptionSegment, SearchEngine, SearchOptions};

// ─── Helpers ─────────────────────────────────────────────────────────

const WORDS: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "today", "we",
    "are", "going", "to", "talk", "about", "colour", "theory", "and", "how", "light",
    "bends", "through", "prisms", "so", "let", "me", "show", "you", "an", "example",
];

/// Build a synthetic caption track: `num_segments` lines of 8 words each,
/// starting every 3 seconds, with a sprinkling of unique words.
fn synthetic_segments(num_segments: usize) -> Vec<CaptionSegment> {
    (0..num_segments)
        .map(|i| {
            let mut text: Vec<String> = (0..8)
                .map(|j| WORDS[(i * 7 + j * 3) % WORDS.len()].to_string())
                .collect();
            if i % 50 == 0 {
                text.push(format!("unique{}", i));
            }
            CaptionSegment::new(i as u32 * 3, 3, text.join(" "))
        })
        .collect()
}

fn built_engine(num_segments: usize) -> SearchEngine {
    let engine = SearchEngine::new();
    engine.build_index(synthetic_segments(num_segments));
    engine
}

// ─── Tokenizer Benchmarks ────────────────────────────────────────────

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    let short_line = "So, let's get started!";
    let long_line = "Today we're going to talk about colour theory &amp; how light bends \
                     through prisms, and I'll show you an example or two [Music]";

    group.bench_function("short_line", |b| b.iter(|| tokenize(black_box(short_line))));
    group.bench_function("long_line", |b| b.iter(|| tokenize(black_box(long_line))));

    group.finish();
}

// ─── Index Build Benchmarks ──────────────────────────────────────────

fn bench_build_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_index");

    // ~10 min, ~1 h and ~4 h of captions
    for &num_segments in &[200, 1_200, 5_000] {
        let segments = synthetic_segments(num_segments);
        group.bench_with_input(
            BenchmarkId::from_parameter(num_segments),
            &segments,
            |b, segments| {
                b.iter(|| {
                    let engine = SearchEngine::new();
                    black_box(engine.build_index(segments.clone()))
                })
            },
        );
    }

    group.finish();
}

// ─── Query Benchmarks ────────────────────────────────────────────────

/// Uncached query cost: every iteration runs against a fresh cache by
/// cycling through more distinct max_results values than the cache holds.
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for &num_segments in &[1_200, 5_000] {
        let engine = built_engine(num_segments);
        let cases = [
            ("word_common", "the", SearchOptions::default()),
            ("word_multi", "quick brown fox", SearchOptions::default()),
            ("word_fuzzy_fallback", "color", SearchOptions::default()),
            ("word_no_fuzzy", "color", SearchOptions { fuzzy: false, ..SearchOptions::default() }),
            ("phrase_ngram", "quick brown", SearchOptions { exact_phrase: true, ..SearchOptions::default() }),
            ("phrase_substring", "lazy dog today we", SearchOptions { exact_phrase: true, ..SearchOptions::default() }),
        ];

        for (name, query, options) in cases {
            let mut n = 0usize;
            group.bench_with_input(BenchmarkId::new(name, num_segments), &engine, |b, engine| {
                b.iter(|| {
                    n = (n + 1) % 1_000;
                    let opts = SearchOptions { max_results: 20 + n, ..options.clone() };
                    black_box(engine.search(black_box(query), &opts))
                })
            });
        }
    }

    group.finish();
}

fn bench_cached_search(c: &mut Criterion) {
    let engine = built_engine(5_000);
    let options = SearchOptions::interactive();
    engine.search("quick brown fox", &options);

    c.bench_function("search_cached/quick_brown_fox", |b| {
        b.iter(|| black_box(engine.search(black_box("quick brown fox"), &options)))
    });
}

// ─── Edit Distance Benchmarks ────────────────────────────────────────

fn bench_levenshtein(c: &mut Criterion) {
    let mut group = c.benchmark_group("levenshtein");

    group.bench_function("short", |b| {
        b.iter(|| levenshtein_distance(black_box("color"), black_box("colour")))
    });
    group.bench_function("long", |b| {
        b.iter(|| levenshtein_distance(black_box("internationalization"), black_box("internationalisation")))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_build_index,
    bench_search,
    bench_cached_search,
    bench_levenshtein,
);
criterion_main!(benches);
