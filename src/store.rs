//! Per-video segment store: processed caption tracks saved on disk for reuse
//! across sessions.
//!
//! Each video gets one file holding magic bytes followed by an LZ4 frame of
//! bincode data. The store keeps everything until it is removed explicitly.

use std::fs;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use caption_search::{stable_hash, CaptionSegment};

use crate::error::CaptionError;

/// Magic bytes identifying a stored caption file.
pub const STORE_MAGIC: &[u8; 4] = b"CAPS";

/// File extension of stored caption files.
pub const STORE_EXT: &str = "captions";

/// The record persisted per video.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredCaptions {
    pub video_id: String,
    /// seconds since epoch
    pub created_at: u64,
    pub segments: Vec<CaptionSegment>,
}

/// Default production store directory: `<local data dir>/caption-search`.
/// Tests should NOT use this; pass a test-local directory instead.
pub fn default_store_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("caption-search")
}

/// Save a serializable value with LZ4 frame compression after the magic bytes.
pub fn save_compressed<T: Serialize>(path: &Path, data: &T) -> Result<(), CaptionError> {
    let start = Instant::now();

    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(STORE_MAGIC)?;
    let mut encoder = lz4_flex::frame::FrameEncoder::new(writer);
    bincode::serialize_into(&mut encoder, data)?;
    let mut writer = encoder.finish().map_err(std::io::Error::other)?;
    writer.flush()?;

    debug!(
        path = %path.display(),
        bytes = fs::metadata(path)?.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Saved compressed captions"
    );
    Ok(())
}

/// Load a value written by [`save_compressed`].
pub fn load_compressed<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CaptionError> {
    let path_str = path.display().to_string();
    let file = fs::File::open(path).map_err(|e| CaptionError::IndexLoad {
        path: path_str.clone(),
        message: format!("cannot open file: {}", e),
    })?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic).map_err(|e| CaptionError::IndexLoad {
        path: path_str.clone(),
        message: format!("read error (magic bytes): {}", e),
    })?;
    if &magic != STORE_MAGIC {
        return Err(CaptionError::IndexLoad {
            path: path_str,
            message: "not a caption store file (bad magic bytes)".to_string(),
        });
    }

    let decoder = lz4_flex::frame::FrameDecoder::new(reader);
    bincode::deserialize_from(decoder).map_err(|e| CaptionError::IndexLoad {
        path: path_str,
        message: format!("LZ4 deserialization failed: {}", e),
    })
}

/// Human-readable file-name prefix derived from a video id.
fn file_prefix(video_id: &str) -> String {
    let prefix: String = video_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .take(32)
        .collect();
    if prefix.is_empty() { "video".to_string() } else { prefix }
}

/// Caption segments keyed by video identifier.
#[derive(Debug, Clone)]
pub struct SegmentStore {
    base: PathBuf,
}

impl SegmentStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn path_for(&self, video_id: &str) -> PathBuf {
        let hash = stable_hash(&[video_id.as_bytes()]);
        self.base
            .join(format!("{}_{:08x}.{}", file_prefix(video_id), hash as u32, STORE_EXT))
    }

    /// Store `segments` for `video_id`, replacing anything stored before.
    pub fn save(&self, video_id: &str, segments: Vec<CaptionSegment>) -> Result<PathBuf, CaptionError> {
        fs::create_dir_all(&self.base)?;
        let record = StoredCaptions {
            video_id: video_id.to_string(),
            created_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            segments,
        };
        let path = self.path_for(video_id);
        save_compressed(&path, &record)?;
        Ok(path)
    }

    pub fn load(&self, video_id: &str) -> Result<StoredCaptions, CaptionError> {
        let path = self.path_for(video_id);
        if !path.exists() {
            return Err(CaptionError::VideoNotFound {
                video_id: video_id.to_string(),
            });
        }
        let record: StoredCaptions = load_compressed(&path)?;
        // Hash collisions between ids are possible in principle; never serve another video.
        if record.video_id != video_id {
            return Err(CaptionError::VideoNotFound {
                video_id: video_id.to_string(),
            });
        }
        Ok(record)
    }

    /// Returns `true` if something was removed.
    pub fn remove(&self, video_id: &str) -> Result<bool, CaptionError> {
        let path = self.path_for(video_id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        Ok(true)
    }

    /// All readable stored records with their file paths, sorted by video id.
    /// Unreadable files are skipped with a warning.
    pub fn list(&self) -> Vec<(PathBuf, StoredCaptions)> {
        let Ok(entries) = fs::read_dir(&self.base) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|e| e == STORE_EXT) {
                continue;
            }
            match load_compressed::<StoredCaptions>(&path) {
                Ok(record) => found.push((path, record)),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable caption file"),
            }
        }
        found.sort_by(|a, b| a.1.video_id.cmp(&b.1.video_id));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<CaptionSegment> {
        vec![
            CaptionSegment::new(0, 2, "hello world"),
            CaptionSegment::new(5, 2, "world peace"),
        ]
    }

    #[test]
    fn test_save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SegmentStore::new(tmp.path());
        let path = store.save("abc123", sample()).unwrap();
        assert!(path.exists());

        let record = store.load("abc123").unwrap();
        assert_eq!(record.video_id, "abc123");
        assert_eq!(record.segments, sample());
        assert!(record.created_at > 0);
    }

    #[test]
    fn test_load_missing_video() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SegmentStore::new(tmp.path());
        let err = store.load("nope").unwrap_err();
        assert!(matches!(err, CaptionError::VideoNotFound { .. }));
    }

    #[test]
    fn test_save_replaces_previous() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SegmentStore::new(tmp.path());
        store.save("vid", sample()).unwrap();
        store.save("vid", vec![CaptionSegment::new(1, 1, "replaced")]).unwrap();
        let record = store.load("vid").unwrap();
        assert_eq!(record.segments.len(), 1);
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SegmentStore::new(tmp.path());
        store.save("vid", sample()).unwrap();
        assert!(store.remove("vid").unwrap());
        assert!(!store.remove("vid").unwrap());
        assert!(store.load("vid").is_err());
    }

    #[test]
    fn test_list_sorted_and_skips_garbage() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SegmentStore::new(tmp.path());
        store.save("zeta", sample()).unwrap();
        store.save("alpha", sample()).unwrap();
        fs::write(tmp.path().join("junk.captions"), b"not a store file").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"ignored").unwrap();

        let ids: Vec<String> = store.list().into_iter().map(|(_, r)| r.video_id).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SegmentStore::new(tmp.path().join("does-not-exist"));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_load_rejects_bad_magic() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SegmentStore::new(tmp.path());
        fs::write(store.path_for("vid"), b"XXXXpayload").unwrap();
        let err = store.load("vid").unwrap_err();
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn test_path_for_sanitizes_and_distinguishes_ids() {
        let store = SegmentStore::new("/tmp/store");
        let a = store.path_for("https://youtu.be/abc");
        let b = store.path_for("https://youtu.be/abd");
        assert_ne!(a, b);
        let name = a.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("https___youtu_be_abc_"));
        assert!(name.ends_with(".captions"));
        assert!(store.path_for("").to_string_lossy().contains("video_"));
    }
}
