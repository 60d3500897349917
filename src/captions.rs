//! Caption file loading: JSON cue lists, SubRip (.srt) and WebVTT (.vtt).
//!
//! Produces raw segments with whole-second timing; cleaning, ordering and
//! dropping empty cues happen when the engine prepares them for indexing.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use caption_search::CaptionSegment;

use crate::error::CaptionError;

#[derive(Deserialize, Debug)]
struct JsonCue {
    #[serde(alias = "startTime", alias = "start_time")]
    start: f64,
    #[serde(default, alias = "dur")]
    duration: f64,
    text: String,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum JsonCaptions {
    List(Vec<JsonCue>),
    Wrapped { segments: Vec<JsonCue> },
}

/// Whole seconds, floored; negative and NaN become 0.
fn whole_secs(secs: f64) -> u32 {
    secs.max(0.0).floor() as u32
}

/// Load a caption file, picking the parser from the extension.
pub fn load_caption_file(path: &Path) -> Result<Vec<CaptionSegment>, CaptionError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let content = fs::read_to_string(path)?;
    let path_str = path.display().to_string();

    match ext.as_str() {
        "json" => parse_json(&content, &path_str),
        "srt" | "vtt" => parse_cues(&content, &path_str),
        other => Err(CaptionError::UnsupportedFormat(other.to_string())),
    }
}

pub fn parse_json(content: &str, path: &str) -> Result<Vec<CaptionSegment>, CaptionError> {
    let parsed: JsonCaptions = serde_json::from_str(content).map_err(|source| CaptionError::Json {
        path: path.to_string(),
        source,
    })?;
    let cues = match parsed {
        JsonCaptions::List(cues) => cues,
        JsonCaptions::Wrapped { segments } => segments,
    };
    Ok(cues
        .into_iter()
        .map(|c| CaptionSegment::new(whole_secs(c.start), whole_secs(c.duration), c.text))
        .collect())
}

/// Parse SubRip or WebVTT cue blocks.
///
/// A block is an optional identifier line, a `start --> end [settings]`
/// timing line and one or more text lines. Blocks without a timing line
/// (the `WEBVTT` header, `NOTE` and `STYLE` blocks) are skipped.
pub fn parse_cues(content: &str, path: &str) -> Result<Vec<CaptionSegment>, CaptionError> {
    let content = content.trim_start_matches('\u{feff}');
    let mut segments = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    let mut block_start = 1usize;

    // `lines()` also strips a trailing `\r`; whitespace-only lines separate blocks.
    for (i, line) in content.lines().chain(std::iter::once("")).enumerate() {
        if !line.trim().is_empty() {
            if block.is_empty() {
                block_start = i + 1;
            }
            block.push(line);
            continue;
        }
        if block.is_empty() {
            continue;
        }
        if let Some(segment) = parse_block(&block, block_start, path)? {
            segments.push(segment);
        }
        block.clear();
    }
    Ok(segments)
}

fn parse_block(
    lines: &[&str],
    block_start: usize,
    path: &str,
) -> Result<Option<CaptionSegment>, CaptionError> {
    let Some(timing_pos) = lines.iter().position(|l| l.contains("-->")) else {
        return Ok(None);
    };
    let (start, end) = parse_timing(lines[timing_pos]).ok_or_else(|| {
        CaptionError::InvalidCaptionFile {
            path: path.to_string(),
            message: format!(
                "bad timing line {:?} near line {}",
                lines[timing_pos],
                block_start + timing_pos
            ),
        }
    })?;

    let text = lines[timing_pos + 1..]
        .iter()
        .map(|l| strip_tags(l))
        .collect::<Vec<_>>()
        .join(" ");
    Ok(Some(CaptionSegment::new(
        whole_secs(start),
        whole_secs(end - start),
        text,
    )))
}

fn parse_timing(line: &str) -> Option<(f64, f64)> {
    let (start, rest) = line.split_once("-->")?;
    let end = rest.split_whitespace().next()?;
    Some((parse_timestamp(start.trim())?, parse_timestamp(end)?))
}

/// `HH:MM:SS,mmm`, `HH:MM:SS.mmm` or `MM:SS.mmm` → seconds.
fn parse_timestamp(ts: &str) -> Option<f64> {
    let ts = ts.replace(',', ".");
    let parts: Vec<&str> = ts.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?, *s),
        [m, s] => (0, m.parse::<u32>().ok()?, *s),
        _ => return None,
    };
    let seconds: f64 = seconds.parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}

/// Remove `<i>`, `<b>`, `<c.color>` and similar inline markup.
fn strip_tags(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_tag = false;
    for c in line.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
