use std::path::Path;

use anyhow::Context as _;

use crate::foundation::{
    core::{Canvas, Vec2},
    error::{StorycutError, StorycutResult},
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// A storyboard: the timeline an output video is assembled from.
///
/// Each track lays its elements out back to back starting at master frame 1.
/// Higher track indices are stacked on top of lower ones when compositing.
pub struct Storyboard {
    /// Output frame dimensions.
    pub canvas: Canvas,
    /// Output frame rate in frames per second.
    pub frame_rate: f64,
    /// Tracks in stacking order (index 0 at the bottom).
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// A track is an ordered run of frame range elements.
pub struct Track {
    /// Track name for authoring/debugging.
    pub name: String,
    /// Disabled tracks contribute nothing to any master frame.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Elements, played back to back.
    pub elements: Vec<FrameRangeElement>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// One timeline entry.
pub struct FrameRangeElement {
    /// Element identifier (for diagnostics).
    pub id: String,
    /// What the element shows.
    pub kind: ElementKind,
    /// Placement and appearance; identity by default.
    #[serde(default)]
    pub transform: ElementTransform,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// The closed set of element kinds a track can hold.
pub enum ElementKind {
    /// A frame range of a video file.
    Video(VideoRef),
    /// A single still image held for a number of frames.
    Image(ImageRef),
    /// A range of numbered image files.
    FrameSequence(SequenceRef),
    /// A solid color.
    Color(ColorRef),
    /// An empty (transparent, silent) stretch.
    Silence(SilenceRef),
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Reference to a frame range inside a video file.
pub struct VideoRef {
    /// Path of the video file, relative to the storyboard root.
    pub source: String,
    /// First source frame (1-based, inclusive).
    pub from_frame: u64,
    /// Last source frame (1-based, inclusive); below `from_frame` plays in reverse.
    pub to_frame: u64,
    /// Source frames advanced per master frame.
    #[serde(default = "default_step_density")]
    pub step_density: f64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Reference to a single still image.
pub struct ImageRef {
    /// Path of the image file, relative to the storyboard root.
    pub source: String,
    /// Number of master frames the image is shown for.
    pub frames: u64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Reference to numbered image files `basename + digits + "." + extension`.
pub struct SequenceRef {
    /// File name prefix, relative to the storyboard root.
    pub basename: String,
    /// File extension without the leading dot.
    pub extension: String,
    /// Zero-padded width of the frame number.
    #[serde(default = "default_digits")]
    pub digits: u32,
    /// First frame number (inclusive).
    pub from_frame: u64,
    /// Last frame number (inclusive); below `from_frame` plays in reverse.
    pub to_frame: u64,
    /// Frame numbers advanced per master frame.
    #[serde(default = "default_step_density")]
    pub step_density: f64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// A solid color stretch.
pub struct ColorRef {
    /// Straight-alpha RGBA8 color.
    pub rgba: [u8; 4],
    /// Number of master frames.
    pub frames: u64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// An empty stretch.
pub struct SilenceRef {
    /// Number of master frames.
    pub frames: u64,
}

fn default_step_density() -> f64 {
    1.0
}

fn default_digits() -> u32 {
    6
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Mirroring applied to an element.
pub enum FlipMode {
    /// No mirroring.
    #[default]
    None,
    /// Mirror left/right.
    Horizontal,
    /// Mirror top/bottom.
    Vertical,
    /// Mirror both axes.
    Both,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Per-element transformation record.
pub struct ElementTransform {
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Rotation in degrees.
    pub rotate_deg: f64,
    /// Scale factors; `(1, 1)` is unscaled.
    pub scale: Vec2,
    /// Offset in pixels.
    pub offset: Vec2,
    /// Stretch to canvas width.
    pub fit_width: bool,
    /// Stretch to canvas height.
    pub fit_height: bool,
    /// Keep the source aspect ratio when fitting.
    pub keep_proportions: bool,
    /// Mirroring.
    pub flip: FlipMode,
    /// Optional mask reference.
    pub mask: Option<String>,
    /// Optional filter macro file applied to the element.
    pub filter_macro: Option<String>,
    /// Optional motion path reference.
    pub motion_path: Option<String>,
}

impl Default for ElementTransform {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            rotate_deg: 0.0,
            scale: Vec2::new(1.0, 1.0),
            offset: Vec2::ZERO,
            fit_width: true,
            fit_height: true,
            keep_proportions: false,
            flip: FlipMode::None,
            mask: None,
            filter_macro: None,
            motion_path: None,
        }
    }
}

impl ElementTransform {
    /// True when the element is shown 1:1, full frame, without any processing.
    pub fn is_identity(&self) -> bool {
        self.opacity == 1.0
            && self.rotate_deg == 0.0
            && self.scale == Vec2::new(1.0, 1.0)
            && self.offset == Vec2::ZERO
            && self.fit_width
            && self.fit_height
            && !self.keep_proportions
            && self.flip == FlipMode::None
            && !has_ref(&self.mask)
            && !has_ref(&self.filter_macro)
            && !has_ref(&self.motion_path)
    }

    fn validate(&self, id: &str) -> StorycutResult<()> {
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(StorycutError::validation(format!(
                "element '{id}' opacity must be within [0, 1]"
            )));
        }
        if !self.rotate_deg.is_finite() || !self.offset.is_finite() {
            return Err(StorycutError::validation(format!(
                "element '{id}' has a non-finite rotation or offset"
            )));
        }
        if !self.scale.is_finite() || self.scale.x <= 0.0 || self.scale.y <= 0.0 {
            return Err(StorycutError::validation(format!(
                "element '{id}' scale must be finite and > 0"
            )));
        }
        Ok(())
    }
}

pub(crate) fn has_ref(r: &Option<String>) -> bool {
    r.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Source position shown by an element at a local (0-based) frame offset.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ElementSource {
    Video { source: String, source_frame: u64 },
    Image { source: String },
    FrameSequence { source: String, source_frame: u64 },
    Color { rgba: [u8; 4] },
    Silence,
}

impl FrameRangeElement {
    /// Number of master frames this element occupies.
    pub fn frame_count(&self) -> u64 {
        match &self.kind {
            ElementKind::Video(v) => stepped_len(v.from_frame, v.to_frame, v.step_density),
            ElementKind::FrameSequence(s) => stepped_len(s.from_frame, s.to_frame, s.step_density),
            ElementKind::Image(i) => i.frames,
            ElementKind::Color(c) => c.frames,
            ElementKind::Silence(s) => s.frames,
        }
    }

    pub(crate) fn source_at(&self, local: u64) -> ElementSource {
        match &self.kind {
            ElementKind::Video(v) => ElementSource::Video {
                source: v.source.clone(),
                source_frame: stepped_index(v.from_frame, v.to_frame, v.step_density, local),
            },
            ElementKind::FrameSequence(s) => {
                let n = stepped_index(s.from_frame, s.to_frame, s.step_density, local);
                ElementSource::FrameSequence {
                    source: s.file_name(n),
                    source_frame: n,
                }
            }
            ElementKind::Image(i) => ElementSource::Image {
                source: i.source.clone(),
            },
            ElementKind::Color(c) => ElementSource::Color { rgba: c.rgba },
            ElementKind::Silence(_) => ElementSource::Silence,
        }
    }

    fn validate(&self) -> StorycutResult<()> {
        let id = self.id.as_str();
        match &self.kind {
            ElementKind::Video(v) => {
                require_source(id, &v.source)?;
                validate_range(id, v.from_frame, v.to_frame, v.step_density)?;
            }
            ElementKind::FrameSequence(s) => {
                require_source(id, &s.basename)?;
                if s.extension.trim().is_empty() {
                    return Err(StorycutError::validation(format!(
                        "element '{id}' frame sequence extension must be non-empty"
                    )));
                }
                if s.digits > 12 {
                    return Err(StorycutError::validation(format!(
                        "element '{id}' frame sequence digits must be <= 12"
                    )));
                }
                validate_range(id, s.from_frame, s.to_frame, s.step_density)?;
            }
            ElementKind::Image(i) => {
                require_source(id, &i.source)?;
                require_frames(id, i.frames)?;
            }
            ElementKind::Color(c) => require_frames(id, c.frames)?,
            ElementKind::Silence(s) => require_frames(id, s.frames)?,
        }
        self.transform.validate(id)
    }
}

impl SequenceRef {
    /// File name of frame number `n`.
    pub fn file_name(&self, n: u64) -> String {
        format!(
            "{}{:0width$}.{}",
            self.basename,
            n,
            self.extension,
            width = self.digits as usize
        )
    }
}

fn stepped_len(from: u64, to: u64, step: f64) -> u64 {
    let span = from.abs_diff(to) + 1;
    if !(step.is_finite() && step > 0.0) {
        return span;
    }
    ((span as f64) / step).ceil().max(1.0) as u64
}

fn stepped_index(from: u64, to: u64, step: f64, local: u64) -> u64 {
    let span = from.abs_diff(to) + 1;
    let step = if step.is_finite() && step > 0.0 {
        step
    } else {
        1.0
    };
    let advance = ((local as f64) * step).floor() as u64;
    let advance = advance.min(span - 1);
    if to >= from {
        from + advance
    } else {
        from - advance
    }
}

fn require_source(id: &str, source: &str) -> StorycutResult<()> {
    if source.trim().is_empty() {
        return Err(StorycutError::validation(format!(
            "element '{id}' source must be non-empty"
        )));
    }
    Ok(())
}

fn require_frames(id: &str, frames: u64) -> StorycutResult<()> {
    if frames == 0 {
        return Err(StorycutError::validation(format!(
            "element '{id}' must span at least one frame"
        )));
    }
    Ok(())
}

fn validate_range(id: &str, from: u64, to: u64, step: f64) -> StorycutResult<()> {
    if from == 0 || to == 0 {
        return Err(StorycutError::validation(format!(
            "element '{id}' source frame numbers are 1-based"
        )));
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(StorycutError::validation(format!(
            "element '{id}' step_density must be finite and > 0"
        )));
    }
    Ok(())
}

impl Storyboard {
    /// Check the storyboard for structurally invalid data.
    pub fn validate(&self) -> StorycutResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(StorycutError::validation(
                "canvas width/height must be > 0",
            ));
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(StorycutError::validation("frame_rate must be > 0"));
        }
        for track in &self.tracks {
            let mut len = 0u64;
            for element in &track.elements {
                element.validate()?;
                len = len.checked_add(element.frame_count()).ok_or_else(|| {
                    StorycutError::validation(format!(
                        "track '{}' is longer than {} frames",
                        track.name,
                        u64::MAX
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Length of the output timeline: the longest enabled track.
    pub fn total_frames(&self) -> u64 {
        self.tracks
            .iter()
            .filter(|t| t.enabled)
            .map(|t| {
                t.elements
                    .iter()
                    .fold(0u64, |len, el| len.saturating_add(el.frame_count()))
            })
            .max()
            .unwrap_or(0)
    }

    /// Read and validate a storyboard JSON file.
    pub fn from_json_path(path: &Path) -> StorycutResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read storyboard '{}'", path.display()))?;
        let sb: Self = serde_json::from_slice(&bytes).map_err(|e| {
            StorycutError::serde(format!("parse storyboard '{}': {e}", path.display()))
        })?;
        sb.validate()?;
        Ok(sb)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
