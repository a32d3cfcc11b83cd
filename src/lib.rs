//! storycut assembles an output video frame by frame from a storyboard and
//! copies compressed source frames straight into the output ("lossless cut")
//! whenever that is provably safe.
//!
//! The entry point is [`FetchEngine::fetch`], called once per master frame in
//! increasing order with a run-owned [`FetchContext`]:
//!
//! - Build or load a [`Storyboard`] and wrap it in a [`TimelineResolver`]
//! - Open sources through a [`VideoCache`]
//! - Fetch frames one by one, or drive a whole run into a [`FrameSink`] with
//!   [`run_fetch`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod bitstream;
mod composition;
mod encode;
mod eval;
mod fetch;
mod foundation;
mod render;

pub use crate::foundation::core::{Canvas, MasterFrame, Vec2};
pub use crate::foundation::error::{StorycutError, StorycutResult};
pub use crate::foundation::flags::CheckFlags;

pub use crate::composition::dsl::{
    StoryboardBuilder, TrackBuilder, color, frame_sequence, image, silence, video,
};
pub use crate::composition::model::{
    ColorRef, ElementKind, ElementTransform, FlipMode, FrameRangeElement, ImageRef, SequenceRef,
    SilenceRef, Storyboard, Track, VideoRef,
};

pub use crate::eval::resolver::{
    ResolvedElement, ResolvedSource, TimelineResolver, TrackResolver,
};
pub use crate::eval::single_source::{
    SingleSource, SingleSourceKind, SingleSourceMiss, resolve_single_source,
};

pub use crate::assets::decode::{DecodedImage, decode_image_rgb8, image_dimensions};
pub use crate::assets::elementary::ElementaryStreamSource;
pub use crate::assets::media::{ProbedVideo, decode_video_frame_rgb8, probe_video};
pub use crate::assets::opener::{FileVideoOpener, ProbedVideoSource};
pub use crate::assets::video::{VideoCache, VideoOpener, VideoSource};

pub use crate::bitstream::FrameSniff;
pub use crate::bitstream::mpeg::{
    MpegPicture, PictureStructure, PictureType, SequenceHeader, classify_mpeg_picture,
    frame_rate_for_code, parse_sequence_header,
};
pub use crate::bitstream::still::{
    SNIFF_WINDOW, SniffVerdict, jpeg_is_complete, png_is_complete, sniff_jpeg, sniff_png,
};
pub use crate::bitstream::timecode::{GopTimecode, read_gop_timecode, rewrite_gop_timecodes};

pub use crate::render::composite::{
    CompositeImage, CompositeRenderer, ImageId, LayerId, PlanningCompositor,
};

pub use crate::fetch::chunk::{read_image_chunk, read_video_chunk};
pub use crate::fetch::context::{ChainLink, FetchContext};
pub use crate::fetch::engine::FetchEngine;
pub use crate::fetch::gate::check_video_eligibility;
pub use crate::fetch::integrity::{
    ChunkFacts, IntegrityValidator, LOOKAHEAD_FRAMES, codec_is_compatible, is_full_frame,
};
pub use crate::fetch::opts::{DEFAULT_MAX_CHUNK_BYTES, FetchOpts};
pub use crate::fetch::rejection::Rejection;
pub use crate::fetch::result::FetchResult;

pub use crate::encode::driver::{FetchStats, run_fetch};
pub use crate::encode::sink::{ChunkFileSink, FrameSink, InMemorySink, SinkConfig};
