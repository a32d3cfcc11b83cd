use crate::{
    bitstream::mpeg::PictureType, eval::single_source::SingleSourceMiss,
    foundation::flags::CheckFlags,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Why a frame was not passed through as a compressed chunk.
///
/// Rejections are expected and only logged; the frame falls back to
/// composite rendering.
pub enum Rejection {
    /// A filter macro forces recompression.
    FilterMacro,
    /// No single unmodified source supplies the frame.
    NoSingleSource(SingleSourceMiss),
    /// The video file could not be opened.
    VideoUnavailable,
    /// The decoder cannot hand out compressed chunks.
    NoChunkRead,
    /// Source dimensions differ from the target.
    SizeMismatch {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },
    /// The chunk is larger than the allowed maximum.
    Overflow {
        /// Chunk size in bytes.
        size: usize,
        /// Allowed maximum in bytes.
        max: usize,
    },
    /// Reading the chunk or image file failed.
    ReadFailed(String),
    /// Standalone images never satisfy GOP reference checks.
    ImageWithoutReferences,
    /// No MPEG picture header in the chunk, or an unknown coding type.
    UnclassifiedPicture,
    /// The previous output frame was not this frame's source predecessor.
    BrokenChain(PictureType),
    /// Too few frames remain in the run to look ahead.
    EndOfRun,
    /// A lookahead frame does not continue the source contiguously.
    LookaheadMismatch {
        /// Frames ahead of the current one.
        distance: u64,
    },
    /// Requested check flags that the chunk does not satisfy.
    MissingFlags(CheckFlags),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FilterMacro => f.write_str("filter macro requested"),
            Self::NoSingleSource(miss) => write!(f, "no single source: {miss}"),
            Self::VideoUnavailable => f.write_str("video could not be opened"),
            Self::NoChunkRead => f.write_str("decoder cannot read compressed chunks"),
            Self::SizeMismatch { width, height } => {
                write!(f, "source size {width}x{height} differs from target")
            }
            Self::Overflow { size, max } => {
                write!(f, "chunk of {size} bytes exceeds the {max} byte limit")
            }
            Self::ReadFailed(msg) => write!(f, "read failed: {msg}"),
            Self::ImageWithoutReferences => {
                f.write_str("still image cannot satisfy mpeg_integrity")
            }
            Self::UnclassifiedPicture => f.write_str("no classifiable mpeg picture"),
            Self::BrokenChain(t) => write!(f, "{}-frame reference chain is broken", t.letter()),
            Self::EndOfRun => f.write_str("too close to the end of the run for a B-frame"),
            Self::LookaheadMismatch { distance } => {
                write!(f, "lookahead frame +{distance} does not continue the source")
            }
            Self::MissingFlags(flags) => write!(f, "unsatisfied check flags: {flags}"),
        }
    }
}
