//! info and list commands.

use std::fs;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use caption_search::format_timestamp;

use crate::error::CaptionError;
use crate::store::SegmentStore;

use super::args::InfoArgs;
use super::build_engine;

pub fn cmd_info(args: InfoArgs, store: &SegmentStore) -> Result<(), CaptionError> {
    let (label, engine) = build_engine(&args.source, store)?;
    if let Some(stats) = engine.stats() {
        println!("{}", label);
        println!("  segments:     {}", stats.segments);
        println!("  unique words: {}", stats.unique_words);
        println!("  phrases:      {}", stats.ngrams);
        println!("  duration:     {}", format_timestamp(stats.total_duration_secs));
    }
    Ok(())
}

pub fn cmd_list(store: &SegmentStore) {
    let records = store.list();
    if records.is_empty() {
        eprintln!(
            "No stored captions in {}. Use 'caption-search import <file> --video <id>' to add some.",
            store.base().display()
        );
        return;
    }

    eprintln!("Store directory: {}", store.base().display());
    eprintln!();

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs();
    for (path, record) in records {
        let age_hours = now.saturating_sub(record.created_at) as f64 / 3600.0;
        let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let duration = record.segments.iter().map(|s| s.end_time()).max().unwrap_or(0);
        println!(
            "  {} -- {} segments, {}, {:.1} KB, {:.1}h ago",
            record.video_id,
            record.segments.len(),
            format_timestamp(duration),
            size as f64 / 1024.0,
            age_hours
        );
    }
}
