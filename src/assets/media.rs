use std::path::{Path, PathBuf};

use crate::foundation::error::{StorycutError, StorycutResult};

#[derive(Clone, Debug)]
/// Stream facts reported by `ffprobe` for a video file.
pub struct ProbedVideo {
    /// Probed file.
    pub source_path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Decoder name of the first video stream.
    pub codec_name: Option<String>,
    /// Frame rate numerator.
    pub fps_num: u32,
    /// Frame rate denominator.
    pub fps_den: u32,
    /// Number of frames, when the container reports it.
    pub frame_count: Option<u64>,
}

impl ProbedVideo {
    /// Source frame rate, or `0.0` when unknown.
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }
}

#[cfg(feature = "media-ffmpeg")]
/// Probe `source_path` with `ffprobe`.
pub fn probe_video(source_path: &Path) -> StorycutResult<ProbedVideo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        codec_name: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        nb_frames: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
    }

    let out = std::process::Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(source_path)
        .output()
        .map_err(|e| StorycutError::decode(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(StorycutError::decode(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| StorycutError::decode(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .into_iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| StorycutError::decode("no video stream found"))?;
    let width = stream
        .width
        .ok_or_else(|| StorycutError::decode("missing video width from ffprobe"))?;
    let height = stream
        .height
        .ok_or_else(|| StorycutError::decode("missing video height from ffprobe"))?;
    let (fps_num, fps_den) = parse_ff_ratio(stream.r_frame_rate.as_deref().unwrap_or("0/1"))
        .ok_or_else(|| StorycutError::decode("invalid video r_frame_rate"))?;

    Ok(ProbedVideo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        codec_name: stream.codec_name,
        fps_num,
        fps_den,
        frame_count: stream.nb_frames.and_then(|n| n.parse().ok()),
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Probe `source_path`; always fails without the `media-ffmpeg` feature.
pub fn probe_video(_source_path: &Path) -> StorycutResult<ProbedVideo> {
    Err(StorycutError::decode(
        "probing video files requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(feature = "media-ffmpeg")]
/// Decode one 1-based `source_frame` of `path` to packed RGB8 with `ffmpeg`.
pub fn decode_video_frame_rgb8(
    path: &Path,
    width: u32,
    height: u32,
    source_frame: u64,
) -> StorycutResult<Vec<u8>> {
    let index = source_frame.saturating_sub(1);
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vf",
            &format!("select=eq(n\\,{index})"),
            "-vsync",
            "0",
            "-frames:v",
            "1",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "pipe:1",
        ])
        .output()
        .map_err(|e| StorycutError::decode(format!("failed to run ffmpeg for video decode: {e}")))?;

    if !out.status.success() {
        return Err(StorycutError::decode(format!(
            "ffmpeg video decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let expected_len = width as usize * height as usize * 3;
    if expected_len == 0 {
        return Err(StorycutError::decode(
            "decoded video frame size is zero (invalid source dimensions)",
        ));
    }
    if out.stdout.len() != expected_len {
        return Err(StorycutError::decode(format!(
            "decoded video frame has invalid size: got {} bytes, expected {expected_len}",
            out.stdout.len()
        )));
    }
    Ok(out.stdout)
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Decode one video frame; always fails without the `media-ffmpeg` feature.
pub fn decode_video_frame_rgb8(
    _path: &Path,
    _width: u32,
    _height: u32,
    _source_frame: u64,
) -> StorycutResult<Vec<u8>> {
    Err(StorycutError::decode(
        "decoding video frames requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(feature = "media-ffmpeg")]
fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
