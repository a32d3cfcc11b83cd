use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use crate::foundation::error::StorycutResult;

/// An opened video file that can hand out individual frames.
///
/// Frame numbers are 1-based and count pictures in display order.
pub trait VideoSource {
    /// Frame width in pixels.
    fn width(&self) -> u32;

    /// Frame height in pixels.
    fn height(&self) -> u32;

    /// Decoder name of the video stream (for example `mpeg2video`).
    fn codec_name(&self) -> Option<&str>;

    /// Number of frames in the file.
    fn frame_count(&self) -> u64;

    /// Whether [`VideoSource::read_chunk`] can return compressed frames.
    fn supports_chunk_read(&self) -> bool;

    /// Compressed bytes of `source_frame`.
    ///
    /// Fails with [`crate::StorycutError::ChunkOverflow`] when the chunk is
    /// larger than `max_bytes`.
    fn read_chunk(&mut self, source_frame: u64, max_bytes: usize) -> StorycutResult<Vec<u8>>;

    /// Decoded RGB8 pixels of `source_frame`, when this source can decode.
    fn read_rgb(&mut self, _source_frame: u64) -> StorycutResult<Option<Vec<u8>>> {
        Ok(None)
    }
}

/// Opens video files by path.
pub trait VideoOpener {
    /// Open `path` for frame access.
    fn open(&self, path: &Path) -> StorycutResult<Box<dyn VideoSource>>;
}

/// Lazily opened video handles, keyed by path.
///
/// A path that failed to open is remembered and not retried.
pub struct VideoCache {
    opener: Box<dyn VideoOpener>,
    open: HashMap<PathBuf, Box<dyn VideoSource>>,
    failed: HashSet<PathBuf>,
}

impl VideoCache {
    /// Create an empty cache backed by `opener`.
    pub fn new(opener: impl VideoOpener + 'static) -> Self {
        Self {
            opener: Box::new(opener),
            open: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Handle for `path`, opening it on first use.
    pub fn get(&mut self, path: &Path) -> Option<&mut dyn VideoSource> {
        if self.failed.contains(path) {
            return None;
        }
        if !self.open.contains_key(path) {
            match self.opener.open(path) {
                Ok(src) => {
                    tracing::debug!(path = %path.display(), codec = ?src.codec_name(), "opened video");
                    self.open.insert(path.to_path_buf(), src);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to open video");
                    self.failed.insert(path.to_path_buf());
                    return None;
                }
            }
        }
        self.open.get_mut(path).map(|b| &mut **b as &mut dyn VideoSource)
    }

    /// Number of successfully opened handles.
    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// True when no handle has been opened yet.
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

impl std::fmt::Debug for VideoCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoCache")
            .field("open", &self.open.keys().collect::<Vec<_>>())
            .field("failed", &self.failed)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/video.rs"]
mod tests;
