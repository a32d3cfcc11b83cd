use crate::{
    assets::{decode::decode_image_rgb8, video::VideoCache},
    bitstream::{FrameSniff, timecode::rewrite_gop_timecodes},
    eval::{
        resolver::TrackResolver,
        single_source::{SingleSource, SingleSourceKind, SingleSourceMiss, resolve_single_source},
    },
    fetch::{
        chunk::{read_image_chunk, read_video_chunk},
        context::{ChainLink, FetchContext},
        gate::check_video_eligibility,
        integrity::{ChunkFacts, IntegrityValidator},
        opts::FetchOpts,
        rejection::Rejection,
        result::FetchResult,
    },
    foundation::{core::MasterFrame, error::StorycutResult},
    render::composite::CompositeRenderer,
};

/// Per-frame fetch entry point.
///
/// Borrows the run's collaborators: the timeline, the open video handles and
/// the composite renderer. History lives in the [`FetchContext`] passed to
/// each call.
pub struct FetchEngine<'a> {
    resolver: &'a dyn TrackResolver,
    videos: &'a mut VideoCache,
    compositor: &'a mut dyn CompositeRenderer,
}

impl<'a> FetchEngine<'a> {
    /// Bind an engine to its collaborators.
    pub fn new(
        resolver: &'a dyn TrackResolver,
        videos: &'a mut VideoCache,
        compositor: &'a mut dyn CompositeRenderer,
    ) -> Self {
        Self {
            resolver,
            videos,
            compositor,
        }
    }

    /// Produce master frame `master`.
    ///
    /// Tries, in order: chunk passthrough (when allowed), raw source pixels
    /// (when allowed), composite rendering. Only a composite render failure
    /// or invalid `opts` is an error.
    #[tracing::instrument(level = "debug", skip(self, ctx, opts), fields(master = master.0))]
    pub fn fetch(
        &mut self,
        ctx: &mut FetchContext,
        master: MasterFrame,
        opts: &FetchOpts,
    ) -> StorycutResult<FetchResult> {
        opts.validate()?;
        ctx.begin(master);

        let single = resolve_single_source(self.resolver, master);

        if opts.allow_chunk_passthrough {
            match self.try_passthrough(ctx, master, opts, &single) {
                Ok(chunk) => return Ok(chunk),
                Err(reason) => tracing::debug!(%reason, "chunk passthrough rejected"),
            }
        }

        let force_keyframe = ctx.last_fetch_was_compressed();
        ctx.record_fallback();

        if opts.allow_raw_pixel_output
            && let Some(raw) = self.try_raw_pixels(opts, &single, force_keyframe)
        {
            return Ok(raw);
        }

        let image = self.compositor.render_composite(
            master,
            opts.target_width,
            opts.target_height,
            opts.filter_macro(),
        )?;
        Ok(FetchResult::CompositeImage {
            image,
            force_keyframe,
        })
    }

    fn try_passthrough(
        &mut self,
        ctx: &mut FetchContext,
        master: MasterFrame,
        opts: &FetchOpts,
        single: &Result<SingleSource, SingleSourceMiss>,
    ) -> Result<FetchResult, Rejection> {
        if opts.filter_macro().is_some() {
            return Err(Rejection::FilterMacro);
        }
        let source = single.as_ref().map_err(|miss| Rejection::NoSingleSource(*miss))?;

        let (mut bytes, codec_name, dimensions) = match source.kind {
            SingleSourceKind::Video => {
                let video = self
                    .videos
                    .get(&source.path)
                    .ok_or(Rejection::VideoUnavailable)?;
                check_video_eligibility(video, opts)?;
                let bytes = read_video_chunk(video, source.source_frame, opts.max_chunk_len())?;
                (
                    bytes,
                    video.codec_name().map(str::to_string),
                    Some((video.width(), video.height())),
                )
            }
            SingleSourceKind::Image | SingleSourceKind::FrameSequence => {
                let bytes = read_image_chunk(&source.path, opts.max_chunk_len(), opts.check_flags)?;
                (bytes, None, None)
            }
        };

        let sniff = FrameSniff::of(&bytes);
        tracing::trace!(
            mpeg = ?sniff.mpeg.map(|p| p.picture_type),
            jpeg = sniff.jpeg.matches,
            png = sniff.png.matches,
            size = bytes.len(),
            "sniffed chunk"
        );

        let codec_name = codec_name.or_else(|| still_codec_name(&sniff).map(str::to_string));
        let facts = ChunkFacts {
            source,
            bytes: &bytes,
            sniff: &sniff,
            codec_name: codec_name.as_deref(),
            dimensions,
        };
        IntegrityValidator::new(self.resolver).evaluate(ctx, &facts, master, opts)?;

        let force_keyframe = !ctx.last_fetch_was_compressed();
        let link = (source.kind == SingleSourceKind::Video).then(|| ChainLink {
            path: source.path.clone(),
            source_frame: source.source_frame,
        });
        ctx.record_chunk(link);

        if sniff.mpeg.is_some() {
            rewrite_gop_timecodes(&mut bytes, master, opts.output_frame_rate);
        }
        tracing::debug!(
            path = %source.path.display(),
            source_frame = source.source_frame,
            force_keyframe,
            "chunk passthrough"
        );
        Ok(FetchResult::CompressedChunk {
            total_size: bytes.len(),
            header_size: sniff.header_size(),
            bytes,
            force_keyframe,
        })
    }

    fn try_raw_pixels(
        &mut self,
        opts: &FetchOpts,
        single: &Result<SingleSource, SingleSourceMiss>,
        force_keyframe: bool,
    ) -> Option<FetchResult> {
        if opts.filter_macro().is_some() {
            return None;
        }
        let source = single.as_ref().ok()?;
        let target = opts.target_canvas();
        let (width, height) = (target.width, target.height);

        let buffer = match source.kind {
            SingleSourceKind::Video => {
                let video = self.videos.get(&source.path)?;
                if !target.matches(video.width(), video.height()) {
                    return None;
                }
                match video.read_rgb(source.source_frame) {
                    Ok(pixels) => pixels?,
                    Err(e) => {
                        tracing::debug!(error = %e, "raw pixel decode failed");
                        return None;
                    }
                }
            }
            SingleSourceKind::Image | SingleSourceKind::FrameSequence => {
                let decoded = std::fs::read(&source.path)
                    .map_err(|e| e.to_string())
                    .and_then(|b| decode_image_rgb8(&b).map_err(|e| e.to_string()));
                match decoded {
                    Ok(img) if target.matches(img.width, img.height) => img.rgb8,
                    Ok(_) => return None,
                    Err(e) => {
                        tracing::debug!(error = %e, "raw pixel decode failed");
                        return None;
                    }
                }
            }
        };

        if buffer.len() != width as usize * height as usize * 3 {
            return None;
        }
        Some(FetchResult::RawPixels {
            buffer,
            width,
            height,
            force_keyframe,
        })
    }
}

fn still_codec_name(sniff: &FrameSniff) -> Option<&'static str> {
    if sniff.jpeg.matches {
        Some("mjpeg")
    } else if sniff.png.matches {
        Some("png")
    } else {
        None
    }
}
