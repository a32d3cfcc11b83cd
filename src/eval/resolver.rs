use std::path::{Path, PathBuf};

use crate::{
    composition::model::{ElementSource, ElementTransform, Storyboard},
    foundation::core::MasterFrame,
};

#[derive(Clone, Debug, PartialEq)]
/// What a track shows at one master frame, with source paths made absolute.
pub enum ResolvedSource {
    /// One frame of a video file.
    Video {
        /// Video file path.
        path: PathBuf,
        /// 1-based frame index inside the file.
        source_frame: u64,
    },
    /// A still image file.
    Image {
        /// Image file path.
        path: PathBuf,
    },
    /// One file of a numbered image sequence.
    FrameSequence {
        /// Image file path of this frame.
        path: PathBuf,
        /// Frame number inside the sequence.
        source_frame: u64,
    },
    /// A solid color.
    Color {
        /// Straight-alpha RGBA8 color.
        rgba: [u8; 4],
    },
    /// Nothing visible.
    Silence,
}

#[derive(Clone, Debug, PartialEq)]
/// A track's contribution to one master frame.
pub struct ResolvedElement {
    /// Resolved source position.
    pub source: ResolvedSource,
    /// Element transformation record.
    pub transform: ElementTransform,
}

/// Pure per-track timeline lookup.
///
/// Implementations must be free of side effects: the fetch engine calls
/// [`TrackResolver::resolve_track_element`] for frames it has not been asked to
/// fetch yet (lookahead) and relies on those calls not changing any state.
pub trait TrackResolver {
    /// Number of tracks (index 0 at the bottom of the stack).
    fn track_count(&self) -> usize;

    /// Element of `track` at `master`, or `None` when the track is disabled or
    /// has no element there.
    fn resolve_track_element(&self, master: MasterFrame, track: usize) -> Option<ResolvedElement>;
}

#[derive(Clone, Copy, Debug)]
struct ElementSpan {
    start: u64,
    end: u64, // exclusive
    element: usize,
}

/// [`TrackResolver`] over a [`Storyboard`], resolving relative sources against
/// a root directory.
pub struct TimelineResolver<'a> {
    storyboard: &'a Storyboard,
    root: PathBuf,
    spans: Vec<Vec<ElementSpan>>,
}

impl<'a> TimelineResolver<'a> {
    /// Index the element placement of every track.
    pub fn new(storyboard: &'a Storyboard, root: impl Into<PathBuf>) -> Self {
        let spans = storyboard
            .tracks
            .iter()
            .map(|track| {
                if !track.enabled {
                    return Vec::new();
                }
                let mut start = MasterFrame::FIRST.0;
                let mut out = Vec::with_capacity(track.elements.len());
                for (element, el) in track.elements.iter().enumerate() {
                    let end = start.saturating_add(el.frame_count());
                    out.push(ElementSpan {
                        start,
                        end,
                        element,
                    });
                    start = end;
                }
                out
            })
            .collect();

        Self {
            storyboard,
            root: root.into(),
            spans,
        }
    }

    /// Root directory used for relative source paths.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The storyboard being resolved.
    pub fn storyboard(&self) -> &Storyboard {
        self.storyboard
    }
}

impl TrackResolver for TimelineResolver<'_> {
    fn track_count(&self) -> usize {
        self.storyboard.tracks.len()
    }

    fn resolve_track_element(&self, master: MasterFrame, track: usize) -> Option<ResolvedElement> {
        let spans = self.spans.get(track)?;
        let idx = spans.partition_point(|s| s.end <= master.0);
        let span = spans.get(idx)?;
        if master.0 < span.start {
            return None;
        }

        let element = &self.storyboard.tracks[track].elements[span.element];
        let source = match element.source_at(master.0 - span.start) {
            ElementSource::Video {
                source,
                source_frame,
            } => ResolvedSource::Video {
                path: self.root.join(source),
                source_frame,
            },
            ElementSource::Image { source } => ResolvedSource::Image {
                path: self.root.join(source),
            },
            ElementSource::FrameSequence {
                source,
                source_frame,
            } => ResolvedSource::FrameSequence {
                path: self.root.join(source),
                source_frame,
            },
            ElementSource::Color { rgba } => ResolvedSource::Color { rgba },
            ElementSource::Silence => ResolvedSource::Silence,
        };

        Some(ResolvedElement {
            source,
            transform: element.transform.clone(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/resolver.rs"]
mod tests;
