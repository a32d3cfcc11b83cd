use crate::{
    composition::model::{
        ColorRef, ElementKind, ElementTransform, FrameRangeElement, ImageRef, SequenceRef,
        SilenceRef, Storyboard, Track, VideoRef,
    },
    foundation::core::Canvas,
    foundation::error::{StorycutError, StorycutResult},
};

/// Fluent builder for [`Storyboard`].
pub struct StoryboardBuilder {
    canvas: Canvas,
    frame_rate: f64,
    tracks: Vec<Track>,
}

impl StoryboardBuilder {
    /// Start a storyboard with the given output canvas and frame rate.
    pub fn new(canvas: Canvas, frame_rate: f64) -> Self {
        Self {
            canvas,
            frame_rate,
            tracks: Vec::new(),
        }
    }

    /// Append a track on top of the existing ones.
    pub fn track(mut self, track: Track) -> Self {
        self.tracks.push(track);
        self
    }

    /// Validate and build.
    pub fn build(self) -> StorycutResult<Storyboard> {
        let sb = Storyboard {
            canvas: self.canvas,
            frame_rate: self.frame_rate,
            tracks: self.tracks,
        };
        sb.validate()?;
        Ok(sb)
    }
}

/// Fluent builder for [`Track`].
pub struct TrackBuilder {
    name: String,
    enabled: bool,
    elements: Vec<FrameRangeElement>,
}

impl TrackBuilder {
    /// Start an empty, enabled track.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            elements: Vec::new(),
        }
    }

    /// Enable or disable the track.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Append an element with identity transform.
    pub fn element(self, id: impl Into<String>, kind: ElementKind) -> Self {
        self.element_with(id, kind, ElementTransform::default())
    }

    /// Append an element with an explicit transform.
    pub fn element_with(
        mut self,
        id: impl Into<String>,
        kind: ElementKind,
        transform: ElementTransform,
    ) -> Self {
        self.elements.push(FrameRangeElement {
            id: id.into(),
            kind,
            transform,
        });
        self
    }

    /// Build the track, rejecting duplicate element ids.
    pub fn build(self) -> StorycutResult<Track> {
        for (i, el) in self.elements.iter().enumerate() {
            if self.elements[..i].iter().any(|prev| prev.id == el.id) {
                return Err(StorycutError::validation(format!(
                    "duplicate element id '{}' in track '{}'",
                    el.id, self.name
                )));
            }
        }
        Ok(Track {
            name: self.name,
            enabled: self.enabled,
            elements: self.elements,
        })
    }
}

/// Video frame range `from..=to` played at normal speed.
pub fn video(source: impl Into<String>, from_frame: u64, to_frame: u64) -> ElementKind {
    ElementKind::Video(VideoRef {
        source: source.into(),
        from_frame,
        to_frame,
        step_density: 1.0,
    })
}

/// Still image held for `frames` master frames.
pub fn image(source: impl Into<String>, frames: u64) -> ElementKind {
    ElementKind::Image(ImageRef {
        source: source.into(),
        frames,
    })
}

/// Numbered image files `basename + n + "." + extension` for `n` in `from..=to`.
pub fn frame_sequence(
    basename: impl Into<String>,
    extension: impl Into<String>,
    digits: u32,
    from_frame: u64,
    to_frame: u64,
) -> ElementKind {
    ElementKind::FrameSequence(SequenceRef {
        basename: basename.into(),
        extension: extension.into(),
        digits,
        from_frame,
        to_frame,
        step_density: 1.0,
    })
}

/// Solid color for `frames` master frames.
pub fn color(rgba: [u8; 4], frames: u64) -> ElementKind {
    ElementKind::Color(ColorRef { rgba, frames })
}

/// Empty stretch of `frames` master frames.
pub fn silence(frames: u64) -> ElementKind {
    ElementKind::Silence(SilenceRef { frames })
}

#[cfg(test)]
#[path = "../../tests/unit/composition/dsl.rs"]
mod tests;
