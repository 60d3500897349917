//! Error type for the CLI, caption loading and the segment store.
//!
//! The search core itself never fails; these are the outer layers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptionError {
    /// I/O error (file read/write, directory access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error (bincode)
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Caption JSON did not parse
    #[error("Invalid caption JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Result serialization for --json output
    #[error("JSON output error: {0}")]
    JsonOutput(#[from] serde_json::Error),

    /// Caption file parsed but its content is malformed
    #[error("Invalid caption file {path}: {message}")]
    InvalidCaptionFile { path: String, message: String },

    /// Caption file extension is not one we read
    #[error("Unsupported caption format '{0}' (expected .json, .srt or .vtt)")]
    UnsupportedFormat(String),

    /// Nothing stored for this video
    #[error("No stored captions for video '{video_id}'. Import them first:\n  caption-search import <file> --video {video_id}")]
    VideoNotFound { video_id: String },

    /// Captions loaded but none had any text
    #[error("No caption text found in {source_name}")]
    NoCaptions { source_name: String },

    /// Mutually exclusive flags or other argument validation error
    #[error("{0}")]
    InvalidArgs(String),

    /// Failed to load a stored caption file
    #[error("Failed to load captions from {path}: {message}")]
    IndexLoad { path: String, message: String },
}
