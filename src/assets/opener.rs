use std::path::{Path, PathBuf};

use crate::{
    assets::{
        elementary::ElementaryStreamSource,
        media::{ProbedVideo, decode_video_frame_rgb8, probe_video},
        video::{VideoOpener, VideoSource},
    },
    foundation::error::{StorycutError, StorycutResult},
};

/// Opens files from disk: MPEG elementary streams natively, anything else
/// through `ffprobe`/`ffmpeg` when the `media-ffmpeg` feature is enabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileVideoOpener;

impl VideoOpener for FileVideoOpener {
    fn open(&self, path: &Path) -> StorycutResult<Box<dyn VideoSource>> {
        let es_err = match ElementaryStreamSource::open(path) {
            Ok(src) => return Ok(Box::new(src)),
            Err(e) => e,
        };
        match probe_video(path) {
            Ok(probe) => Ok(Box::new(ProbedVideoSource::new(probe))),
            Err(probe_err) => {
                tracing::debug!(path = %path.display(), error = %es_err, "not an elementary stream");
                Err(probe_err)
            }
        }
    }
}

/// A container or codec that can only be decoded, never passed through.
#[derive(Debug)]
pub struct ProbedVideoSource {
    probe: ProbedVideo,
}

impl ProbedVideoSource {
    /// Wrap a probe result.
    pub fn new(probe: ProbedVideo) -> Self {
        Self { probe }
    }

    /// Probed file path.
    pub fn path(&self) -> &PathBuf {
        &self.probe.source_path
    }
}

impl VideoSource for ProbedVideoSource {
    fn width(&self) -> u32 {
        self.probe.width
    }

    fn height(&self) -> u32 {
        self.probe.height
    }

    fn codec_name(&self) -> Option<&str> {
        self.probe.codec_name.as_deref()
    }

    fn frame_count(&self) -> u64 {
        self.probe.frame_count.unwrap_or(0)
    }

    fn supports_chunk_read(&self) -> bool {
        false
    }

    fn read_chunk(&mut self, _source_frame: u64, _max_bytes: usize) -> StorycutResult<Vec<u8>> {
        Err(StorycutError::decode(format!(
            "'{}' does not support compressed frame reads",
            self.probe.source_path.display()
        )))
    }

    fn read_rgb(&mut self, source_frame: u64) -> StorycutResult<Option<Vec<u8>>> {
        decode_video_frame_rgb8(
            &self.probe.source_path,
            self.probe.width,
            self.probe.height,
            source_frame,
        )
        .map(Some)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/opener.rs"]
mod tests;
