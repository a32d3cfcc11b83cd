use crate::render::composite::CompositeImage;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Outcome of one fetch call.
pub enum FetchResult {
    /// Source chunk to copy into the output stream unchanged (apart from a
    /// rewritten GOP timecode).
    CompressedChunk {
        /// Chunk bytes.
        bytes: Vec<u8>,
        /// Length of `bytes`.
        total_size: usize,
        /// Length of the structural header at the start of `bytes`.
        header_size: usize,
        /// The chunk starts a passthrough run.
        force_keyframe: bool,
    },
    /// Frame rendered by the composite renderer.
    CompositeImage {
        /// Renderer handles.
        image: CompositeImage,
        /// The previous frame was a passed-through chunk.
        force_keyframe: bool,
    },
    /// Decoded source pixels, tightly packed RGB8.
    RawPixels {
        /// Pixel bytes, `width * height * 3` long.
        buffer: Vec<u8>,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// The previous frame was a passed-through chunk.
        force_keyframe: bool,
    },
}

impl FetchResult {
    /// Whether the encoder must start a new GOP at this frame.
    pub fn force_keyframe(&self) -> bool {
        match self {
            Self::CompressedChunk { force_keyframe, .. }
            | Self::CompositeImage { force_keyframe, .. }
            | Self::RawPixels { force_keyframe, .. } => *force_keyframe,
        }
    }

    /// True for [`FetchResult::CompressedChunk`].
    pub fn is_chunk(&self) -> bool {
        matches!(self, Self::CompressedChunk { .. })
    }

    /// Short variant name for logs and reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::CompressedChunk { .. } => "chunk",
            Self::CompositeImage { .. } => "composite",
            Self::RawPixels { .. } => "raw",
        }
    }
}
