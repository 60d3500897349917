//! CLI argument structs for all subcommands.

use std::path::PathBuf;

use clap::{Args, Parser};

use caption_search::engine::INTERACTIVE_MAX_RESULTS;
use caption_search::SearchOptions;

/// Where the captions for a command come from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Video id whose captions were imported into the store
    #[arg(short, long, conflicts_with = "file")]
    pub video: Option<String>,

    /// Caption file to index directly (.json, .srt or .vtt)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Query option flags shared by `search` and `interactive`.
#[derive(Args, Debug, Clone)]
pub struct QueryFlags {
    /// Disable the edit-distance fallback for rare words
    #[arg(long)]
    pub no_fuzzy: bool,

    /// Case-sensitive phrase matching (word matching is always case-insensitive)
    #[arg(long)]
    pub case_sensitive: bool,

    /// Match the whole query as a phrase
    #[arg(short, long)]
    pub phrase: bool,

    /// Maximum number of results
    #[arg(short = 'n', long, default_value_t = INTERACTIVE_MAX_RESULTS)]
    pub max_results: usize,
}

impl QueryFlags {
    pub fn to_options(&self) -> SearchOptions {
        SearchOptions {
            fuzzy: !self.no_fuzzy,
            case_sensitive: self.case_sensitive,
            exact_phrase: self.phrase,
            max_results: self.max_results,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Caption file to import (.json, .srt or .vtt)
    pub file: PathBuf,

    /// Video id to store the captions under
    #[arg(short, long)]
    pub video: String,
}

#[derive(Parser, Debug)]
#[command(after_long_help = r#"EXAMPLES:
  Word search:     caption-search search "quick brown" --video dQw4w9WgXcQ
  Exact phrase:    caption-search search "quick brown" --video dQw4w9WgXcQ --phrase
  From a file:     caption-search search "colour" --file talk.srt
  Exact words:     caption-search search "colour" --file talk.srt --no-fuzzy
  Top 3 as JSON:   caption-search search "the" --file talk.json -n 3 --json

NOTES:
  - Queries shorter than 2 characters return nothing
  - Word mode ranks segments matching more query words higher, with a bonus
    when they appear close together
  - Phrase mode looks up 2- and 3-word phrases directly, longer phrases by
    substring scan
"#)]
pub struct SearchArgs {
    /// Query text
    pub query: String,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub flags: QueryFlags,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(after_long_help = r#"USAGE:
  Type a query per line. Wrap it in double quotes for a phrase search.
  Repeating a query is answered from the result cache.
  Enter :q or send EOF to quit.
"#)]
pub struct InteractiveArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub flags: QueryFlags,
}

#[derive(Parser, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Video id to remove from the store
    #[arg(short, long)]
    pub video: String,
}
