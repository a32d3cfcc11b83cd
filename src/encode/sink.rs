use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    bitstream::mpeg::{PictureType, SEQUENCE_END, classify_mpeg_picture},
    fetch::result::FetchResult,
    foundation::{
        core::MasterFrame,
        error::{StorycutError, StorycutResult},
    },
};

/// Configuration provided to a [`FrameSink`] at the start of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames per second.
    pub frame_rate: f64,
    /// Frames the run will push.
    pub total_frames: u64,
}

/// Consumer of fetch results in output order.
///
/// Ordering contract: `push` is called once per master frame, in strictly
/// increasing order starting at frame 1.
pub trait FrameSink {
    /// Called once before any frame is pushed.
    fn begin(&mut self, cfg: SinkConfig) -> StorycutResult<()>;
    /// Push the result for one master frame.
    fn push(&mut self, master: MasterFrame, frame: &FetchResult) -> StorycutResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> StorycutResult<()>;
}

/// In-memory sink for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(MasterFrame, FetchResult)>,
    ended: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured results in output order.
    pub fn frames(&self) -> &[(MasterFrame, FetchResult)] {
        &self.frames
    }

    /// Whether `end` has been called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> StorycutResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push(&mut self, master: MasterFrame, frame: &FetchResult) -> StorycutResult<()> {
        self.frames.push((master, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> StorycutResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes passed-through chunks back to back into an MPEG elementary stream
/// file and closes it with a sequence end code.
///
/// It cannot encode, so any frame that is not a compressed chunk fails the
/// run. Chunks are written in display order with their source temporal
/// references, which only decodes for I/P material: a B picture chunk fails
/// the run as well.
#[derive(Debug)]
pub struct ChunkFileSink {
    path: PathBuf,
    out: Option<BufWriter<File>>,
    bytes_written: u64,
}

impl ChunkFileSink {
    /// Sink writing to `path`; the file is created in `begin`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            out: None,
            bytes_written: 0,
        }
    }

    /// Output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written so far, end code included once the sink has ended.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn writer(&mut self) -> StorycutResult<&mut BufWriter<File>> {
        self.out
            .as_mut()
            .ok_or_else(|| StorycutError::validation("chunk sink used before begin"))
    }
}

impl FrameSink for ChunkFileSink {
    fn begin(&mut self, _cfg: SinkConfig) -> StorycutResult<()> {
        let f = File::create(&self.path)
            .with_context(|| format!("create output '{}'", self.path.display()))?;
        self.out = Some(BufWriter::new(f));
        self.bytes_written = 0;
        Ok(())
    }

    fn push(&mut self, master: MasterFrame, frame: &FetchResult) -> StorycutResult<()> {
        let FetchResult::CompressedChunk { bytes, .. } = frame else {
            return Err(StorycutError::render(format!(
                "frame {master} cannot be passed through ({}); a lossless cut needs every frame as a chunk",
                frame.kind_name()
            )));
        };
        if classify_mpeg_picture(bytes)
            .is_some_and(|p| p.picture_type == PictureType::Bidirectional)
        {
            return Err(StorycutError::render(format!(
                "frame {master} is a B picture; a display-order cut only supports I/P chunks"
            )));
        }
        self.writer()?
            .write_all(bytes)
            .context("write chunk")?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    fn end(&mut self) -> StorycutResult<()> {
        let end_code = [0x00, 0x00, 0x01, SEQUENCE_END];
        let Some(w) = self.out.as_mut() else {
            return Err(StorycutError::validation("chunk sink ended before begin"));
        };
        w.write_all(&end_code).context("write sequence end code")?;
        w.flush()
            .with_context(|| format!("flush output '{}'", self.path.display()))?;
        self.bytes_written += end_code.len() as u64;
        self.out = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
