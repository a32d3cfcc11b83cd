use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    composition::model::Storyboard,
    foundation::{
        core::Canvas,
        error::{StorycutError, StorycutResult},
        flags::CheckFlags,
    },
};

/// Default bound on a single compressed chunk.
pub const DEFAULT_MAX_CHUNK_BYTES: u32 = 4 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Per-run fetch options: everything a fetch call needs besides the master
/// frame number.
pub struct FetchOpts {
    /// Output frame width in pixels.
    pub target_width: u32,
    /// Output frame height in pixels.
    pub target_height: u32,
    /// Filter macro applied to every output frame; disables passthrough.
    pub filter_macro_file: Option<PathBuf>,
    /// Try to copy compressed chunks from the source.
    pub allow_chunk_passthrough: bool,
    /// Return decoded source pixels instead of a composite when possible.
    pub allow_raw_pixel_output: bool,
    /// Accepted codec names for [`CheckFlags::VCODEC_NAME`]; empty accepts any
    /// known codec.
    pub compatible_codec_names: Vec<String>,
    /// Largest chunk that may be read.
    pub max_chunk_bytes: u32,
    /// Output frame rate, used for rewritten timecodes.
    pub output_frame_rate: f64,
    /// Number of frames in the run.
    pub total_output_frames: u64,
    /// Properties an accepted chunk must have.
    pub check_flags: CheckFlags,
}

impl Default for FetchOpts {
    fn default() -> Self {
        Self {
            target_width: 0,
            target_height: 0,
            filter_macro_file: None,
            allow_chunk_passthrough: true,
            allow_raw_pixel_output: false,
            compatible_codec_names: Vec::new(),
            max_chunk_bytes: DEFAULT_MAX_CHUNK_BYTES,
            output_frame_rate: 25.0,
            total_output_frames: 0,
            check_flags: CheckFlags::NONE,
        }
    }
}

impl FetchOpts {
    /// Options sized to `storyboard`: its canvas, frame rate and length.
    pub fn for_storyboard(storyboard: &Storyboard) -> Self {
        Self {
            target_width: storyboard.canvas.width,
            target_height: storyboard.canvas.height,
            output_frame_rate: storyboard.frame_rate,
            total_output_frames: storyboard.total_frames(),
            ..Self::default()
        }
    }

    /// Check option values before a run.
    pub fn validate(&self) -> StorycutResult<()> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(StorycutError::validation(
                "target width/height must be > 0",
            ));
        }
        if !self.output_frame_rate.is_finite() || self.output_frame_rate <= 0.0 {
            return Err(StorycutError::validation(
                "output_frame_rate must be finite and > 0",
            ));
        }
        if self.max_chunk_bytes == 0 {
            return Err(StorycutError::validation("max_chunk_bytes must be > 0"));
        }
        Ok(())
    }

    /// Target frame size as a canvas.
    pub fn target_canvas(&self) -> Canvas {
        Canvas {
            width: self.target_width,
            height: self.target_height,
        }
    }

    /// Filter macro path, ignoring an empty one.
    pub fn filter_macro(&self) -> Option<&Path> {
        self.filter_macro_file
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Chunk bound as a buffer length.
    pub fn max_chunk_len(&self) -> usize {
        usize::try_from(self.max_chunk_bytes).unwrap_or(usize::MAX)
    }

    /// Read options from JSON; missing fields take their defaults.
    pub fn from_json_path(path: &Path) -> StorycutResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read fetch options '{}'", path.display()))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            StorycutError::serde(format!("parse fetch options '{}': {e}", path.display()))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/opts.rs"]
mod tests;
