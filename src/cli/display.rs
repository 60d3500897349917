//! Terminal rendering of search results.

use caption_search::{format_timestamp, highlight_spans, tokenize, SearchResult};

/// Wrap every highlighted word of `text` in `*…*`.
pub fn highlight(text: &str, words: &[String]) -> String {
    let mut out = String::with_capacity(text.len() + words.len() * 4);
    let mut last = 0;
    for span in highlight_spans(text, words) {
        out.push_str(&text[last..span.start]);
        out.push('*');
        out.push_str(&text[span.clone()]);
        out.push('*');
        last = span.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Words to highlight for a result: the matched query words, the indexed
/// word a fuzzy hit was accepted for, or the query tokens for phrase hits.
pub fn highlight_words(result: &SearchResult, query: &str) -> Vec<String> {
    let mut words = if result.matched_words.is_empty() {
        tokenize(query)
    } else {
        result.matched_words.clone()
    };
    if let Some(original) = &result.original_word {
        words.push(original.clone());
    }
    words
}

/// One result as a short block: timestamp, score, highlighted caption and
/// the surrounding context.
pub fn render_result(result: &SearchResult, query: &str) -> String {
    let words = highlight_words(result, query);
    let mut tags = Vec::new();
    if result.phrase_match {
        tags.push("phrase".to_string());
    }
    if let Some(original) = &result.original_word {
        tags.push(format!("fuzzy: {}", original));
    }
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!(" ({})", tags.join(", "))
    };

    let mut out = format!(
        "[{}] score {}{}\n  {}",
        format_timestamp(result.timestamp),
        result.score,
        tags,
        highlight(&result.text, &words)
    );
    let ctx = &result.context;
    if !ctx.before_text.is_empty() || !ctx.after_text.is_empty() {
        out.push_str(&format!("\n  ... {} | {} ...", ctx.before_text, ctx.after_text));
    }
    out
}
