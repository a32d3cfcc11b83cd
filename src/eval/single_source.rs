use std::path::PathBuf;

use crate::{
    eval::resolver::{ResolvedSource, TrackResolver},
    foundation::core::MasterFrame,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Kind of file a single-source frame is taken from.
pub enum SingleSourceKind {
    /// A frame of a video file.
    Video,
    /// A still image file.
    Image,
    /// One file of a numbered image sequence.
    FrameSequence,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// The one file that supplies a master frame unmodified.
pub struct SingleSource {
    /// Source file path.
    pub path: PathBuf,
    /// 1-based frame index inside the file (always 1 for still images).
    pub source_frame: u64,
    /// Source kind.
    pub kind: SingleSourceKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Why a master frame has no single unmodified source.
pub enum SingleSourceMiss {
    /// No track contributes anything but silence.
    Empty,
    /// More than one track contributes.
    MultipleTracks,
    /// The contributing element is a solid color.
    SolidColor,
    /// The contributing element is transformed, masked or filtered.
    Transformed,
}

impl std::fmt::Display for SingleSourceMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Empty => "no contributing track",
            Self::MultipleTracks => "more than one contributing track",
            Self::SolidColor => "solid color element",
            Self::Transformed => "non-identity transform",
        };
        f.write_str(s)
    }
}

/// Find the single video or image file that supplies `master` with no
/// competing track and no transformation.
pub fn resolve_single_source(
    resolver: &dyn TrackResolver,
    master: MasterFrame,
) -> Result<SingleSource, SingleSourceMiss> {
    let mut found = None;
    for track in (0..resolver.track_count()).rev() {
        let Some(el) = resolver.resolve_track_element(master, track) else {
            continue;
        };
        if el.source == ResolvedSource::Silence {
            continue;
        }
        if found.is_some() {
            return Err(SingleSourceMiss::MultipleTracks);
        }
        found = Some(el);
    }

    let el = found.ok_or(SingleSourceMiss::Empty)?;
    if !el.transform.is_identity() {
        return Err(SingleSourceMiss::Transformed);
    }

    match el.source {
        ResolvedSource::Video { path, source_frame } => Ok(SingleSource {
            path,
            source_frame,
            kind: SingleSourceKind::Video,
        }),
        ResolvedSource::Image { path } => Ok(SingleSource {
            path,
            source_frame: 1,
            kind: SingleSourceKind::Image,
        }),
        ResolvedSource::FrameSequence { path, source_frame } => Ok(SingleSource {
            path,
            source_frame,
            kind: SingleSourceKind::FrameSequence,
        }),
        ResolvedSource::Color { .. } => Err(SingleSourceMiss::SolidColor),
        ResolvedSource::Silence => Err(SingleSourceMiss::Empty),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/single_source.rs"]
mod tests;
