//! Acceptance rules for a fetched chunk.
//!
//! The reference-chain rules assume fetches arrive in increasing master frame
//! order; [`FetchContext`] carries what the previous calls passed through.

use crate::{
    assets::decode::image_dimensions,
    bitstream::{
        FrameSniff,
        mpeg::{MpegPicture, PictureType},
        still::{jpeg_is_complete, png_is_complete},
    },
    eval::{
        resolver::TrackResolver,
        single_source::{SingleSource, SingleSourceKind, resolve_single_source},
    },
    fetch::{context::FetchContext, opts::FetchOpts, rejection::Rejection},
    foundation::{core::MasterFrame, flags::CheckFlags},
};

/// Master frames inspected ahead of a B-frame before it may be passed through.
///
/// This is a fixed heuristic, not derived from the stream's GOP structure. A
/// B-frame whose forward reference lies further away than this distance can
/// still be accepted while its reference never reaches the output.
pub const LOOKAHEAD_FRAMES: u64 = 3;

/// Everything known about one fetched chunk.
#[derive(Clone, Copy, Debug)]
pub struct ChunkFacts<'a> {
    /// Where the chunk came from.
    pub source: &'a SingleSource,
    /// Chunk bytes.
    pub bytes: &'a [u8],
    /// Format verdicts for `bytes`.
    pub sniff: &'a FrameSniff,
    /// Codec reported for the chunk.
    pub codec_name: Option<&'a str>,
    /// Source dimensions, when known without decoding.
    pub dimensions: Option<(u32, u32)>,
}

/// Decides whether a fetched chunk may be emitted standalone.
pub struct IntegrityValidator<'r> {
    resolver: &'r dyn TrackResolver,
}

impl<'r> IntegrityValidator<'r> {
    /// Validator that looks ahead through `resolver`.
    pub fn new(resolver: &'r dyn TrackResolver) -> Self {
        Self { resolver }
    }

    /// Check every requested flag of `opts` against `facts`.
    ///
    /// Succeeds only when the satisfied flags cover the whole requested set.
    pub fn evaluate(
        &self,
        ctx: &FetchContext,
        facts: &ChunkFacts<'_>,
        master: MasterFrame,
        opts: &FetchOpts,
    ) -> Result<(), Rejection> {
        let requested = opts.check_flags;
        let mut satisfied = CheckFlags::NONE;

        if requested.contains(CheckFlags::SIZE) {
            let dims = facts
                .dimensions
                .or_else(|| image_dimensions(facts.bytes).ok());
            satisfied.set_if(
                CheckFlags::SIZE,
                dims.is_some_and(|(w, h)| opts.target_canvas().matches(w, h)),
            );
        }

        satisfied.set_if(
            CheckFlags::FULL_FRAME,
            is_full_frame(facts.sniff, facts.bytes),
        );

        // JPG and PNG are alternatives: either format satisfies both requests
        let formats = requested & (CheckFlags::JPG | CheckFlags::PNG);
        let format_hit = (formats.contains(CheckFlags::JPG) && facts.sniff.jpeg.matches)
            || (formats.contains(CheckFlags::PNG) && facts.sniff.png.matches);
        if format_hit {
            satisfied.insert(formats);
        }

        satisfied.set_if(
            CheckFlags::VCODEC_NAME,
            codec_is_compatible(facts.codec_name, &opts.compatible_codec_names),
        );

        if requested.contains(CheckFlags::MPEG_INTEGRITY) {
            if facts.source.kind != SingleSourceKind::Video {
                return Err(Rejection::ImageWithoutReferences);
            }
            self.verify_references(
                ctx,
                facts.sniff.mpeg.as_ref(),
                facts.source,
                master,
                opts.total_output_frames,
            )?;
            satisfied.insert(CheckFlags::MPEG_INTEGRITY);
        }

        let missing = requested.missing_from(satisfied);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Rejection::MissingFlags(missing))
        }
    }

    /// Reference-chain rule for one MPEG picture.
    ///
    /// - I: always passes.
    /// - P: the previous output frame must be this file's preceding frame.
    /// - B: as P, and the next [`LOOKAHEAD_FRAMES`] master frames must
    ///   continue the same file contiguously.
    /// - unknown or missing picture: never passes.
    pub fn verify_references(
        &self,
        ctx: &FetchContext,
        picture: Option<&MpegPicture>,
        source: &SingleSource,
        master: MasterFrame,
        total_frames: u64,
    ) -> Result<(), Rejection> {
        let Some(picture) = picture else {
            return Err(Rejection::UnclassifiedPicture);
        };
        match picture.picture_type {
            PictureType::Intra => Ok(()),
            PictureType::Predicted | PictureType::Bidirectional => {
                if !ctx.extends_chain(&source.path, source.source_frame) {
                    return Err(Rejection::BrokenChain(picture.picture_type));
                }
                if picture.picture_type == PictureType::Bidirectional {
                    self.look_ahead(source, master, total_frames)?;
                }
                Ok(())
            }
            PictureType::Unknown => Err(Rejection::UnclassifiedPicture),
        }
    }

    fn look_ahead(
        &self,
        source: &SingleSource,
        master: MasterFrame,
        total_frames: u64,
    ) -> Result<(), Rejection> {
        if master.remaining_after(total_frames) < LOOKAHEAD_FRAMES {
            return Err(Rejection::EndOfRun);
        }
        for distance in 1..=LOOKAHEAD_FRAMES {
            let continues = resolve_single_source(self.resolver, master.offset(distance))
                .is_ok_and(|next| {
                    next.kind == SingleSourceKind::Video
                        && next.path == source.path
                        && Some(next.source_frame) == source.source_frame.checked_add(distance)
                });
            if !continues {
                return Err(Rejection::LookaheadMismatch { distance });
            }
        }
        Ok(())
    }
}

/// A complete, self-contained picture: an intra frame picture, or a still
/// image running to its end marker.
pub fn is_full_frame(sniff: &FrameSniff, bytes: &[u8]) -> bool {
    sniff.mpeg.is_some_and(|p| p.is_full_frame())
        || (sniff.jpeg.matches && jpeg_is_complete(bytes))
        || (sniff.png.matches && png_is_complete(bytes))
}

/// Codec-name rule: a known codec that is on `allowed`, or any known codec
/// when `allowed` is empty.
pub fn codec_is_compatible(codec: Option<&str>, allowed: &[String]) -> bool {
    let Some(name) = codec
        .map(str::trim)
        .filter(|n| !n.is_empty() && !n.eq_ignore_ascii_case("unknown"))
    else {
        return false;
    };
    allowed.is_empty() || allowed.iter().any(|a| a.trim().eq_ignore_ascii_case(name))
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/integrity.rs"]
mod tests;
