//! CLI layer: argument parsing, command dispatch, and subcommand implementations.

pub mod args;
mod display;
mod info;

pub use args::*;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use caption_search::{prepare_segments, CaptionSegment, SearchEngine, SearchOptions};

use crate::captions::load_caption_file;
use crate::error::CaptionError;
use crate::store::{default_store_dir, SegmentStore};

// ─── CLI ─────────────────────────────────────────────────────────────

/// Search the spoken captions of a video and jump to the matching moment
#[derive(Parser, Debug)]
#[command(name = "caption-search", version, about, after_help = "\
Run 'caption-search <COMMAND> --help' for detailed options and examples.\n\
Common options: -v <VIDEO> (stored video id), -f <FILE> (caption file), -n <N> (max results)")]
pub(crate) struct Cli {
    /// Log level for stderr output (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Directory holding imported caption tracks
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Import a caption file into the store under a video id
    Import(ImportArgs),

    /// Run one query against a video's captions
    Search(SearchArgs),

    /// Read queries from stdin, one per line, against one index
    Interactive(InteractiveArgs),

    /// Show index statistics for a video's captions
    Info(InfoArgs),

    /// List imported videos
    List,

    /// Remove a video's captions from the store
    Remove(RemoveArgs),
}

// ─── Main entry point ───────────────────────────────────────────────

pub fn run() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let store = SegmentStore::new(cli.store_dir.clone().unwrap_or_else(default_store_dir));

    let result = match cli.command {
        Commands::Import(args) => cmd_import(args, &store),
        Commands::Search(args) => cmd_search(args, &store),
        Commands::Interactive(args) => cmd_interactive(args, &store),
        Commands::Info(args) => info::cmd_info(args, &store),
        Commands::List => {
            info::cmd_list(&store);
            Ok(())
        }
        Commands::Remove(args) => cmd_remove(args, &store),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

pub(crate) fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "info" => tracing::Level::INFO,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::WARN,
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

// ─── Caption sources ────────────────────────────────────────────────

/// Load segments from a stored video or a caption file. Returns a label
/// for messages along with the segments.
pub(crate) fn load_source(
    source: &SourceArgs,
    store: &SegmentStore,
) -> Result<(String, Vec<CaptionSegment>), CaptionError> {
    match (&source.video, &source.file) {
        (Some(video), None) => {
            let record = store.load(video)?;
            Ok((format!("video '{}'", video), record.segments))
        }
        (None, Some(file)) => Ok((file.display().to_string(), load_caption_file(file)?)),
        _ => Err(CaptionError::InvalidArgs(
            "Specify exactly one caption source: --video <ID> or --file <PATH>".to_string(),
        )),
    }
}

pub(crate) fn build_engine(
    source: &SourceArgs,
    store: &SegmentStore,
) -> Result<(String, SearchEngine), CaptionError> {
    let (label, segments) = load_source(source, store)?;
    let engine = SearchEngine::new();
    if !engine.build_index(segments) {
        return Err(CaptionError::NoCaptions { source_name: label });
    }
    Ok((label, engine))
}

// ─── Commands ───────────────────────────────────────────────────────

fn cmd_import(args: ImportArgs, store: &SegmentStore) -> Result<(), CaptionError> {
    let raw = load_caption_file(&args.file)?;
    let raw_count = raw.len();
    let segments = prepare_segments(raw);
    if segments.is_empty() {
        return Err(CaptionError::NoCaptions {
            source_name: args.file.display().to_string(),
        });
    }
    let count = segments.len();
    let path = store.save(&args.video, segments)?;
    tracing::info!(video = %args.video, path = %path.display(), "Captions stored");
    eprintln!(
        "Imported {} segments ({} dropped as empty) for video '{}' into {}",
        count,
        raw_count - count,
        args.video,
        path.display()
    );
    Ok(())
}

fn cmd_search(args: SearchArgs, store: &SegmentStore) -> Result<(), CaptionError> {
    let (label, engine) = build_engine(&args.source, store)?;
    let options = args.flags.to_options();

    let start = Instant::now();
    let results = engine.search(&args.query, &options);
    let elapsed = start.elapsed();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for result in &results {
        println!("{}", display::render_result(result, &args.query));
    }
    eprintln!(
        "{} result(s) in {} for '{}' ({:.3}ms)",
        results.len(),
        label,
        args.query,
        elapsed.as_secs_f64() * 1000.0
    );
    Ok(())
}

/// A double-quoted line is a phrase query; anything else uses `base`.
pub(crate) fn options_for_line(line: &str, base: &SearchOptions) -> (String, SearchOptions) {
    let trimmed = line.trim();
    let quoted = trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"');
    if quoted {
        let inner = trimmed[1..trimmed.len() - 1].to_string();
        (inner, SearchOptions { exact_phrase: true, ..base.clone() })
    } else {
        (trimmed.to_string(), base.clone())
    }
}

fn cmd_interactive(args: InteractiveArgs, store: &SegmentStore) -> Result<(), CaptionError> {
    let (label, engine) = build_engine(&args.source, store)?;
    let base = args.flags.to_options();
    if let Some(stats) = engine.stats() {
        eprintln!(
            "Indexed {}: {} segments, {} words. Type a query (\"...\" for a phrase), :q to quit.",
            label, stats.segments, stats.unique_words
        );
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim() == ":q" {
            break;
        }
        let (query, options) = options_for_line(&line, &base);
        if query.trim().is_empty() {
            continue;
        }

        let start = Instant::now();
        let results = engine.search(&query, &options);
        let elapsed = start.elapsed();

        for result in &results {
            writeln!(stdout, "{}", display::render_result(result, &query))?;
        }
        writeln!(
            stdout,
            "-- {} result(s), {:.3}ms, {} cached queries",
            results.len(),
            elapsed.as_secs_f64() * 1000.0,
            engine.cached_results()
        )?;
        stdout.flush()?;
    }
    Ok(())
}

fn cmd_remove(args: RemoveArgs, store: &SegmentStore) -> Result<(), CaptionError> {
    if store.remove(&args.video)? {
        eprintln!("Removed captions for video '{}'.", args.video);
    } else {
        eprintln!("No stored captions for video '{}'.", args.video);
    }
    Ok(())
}
