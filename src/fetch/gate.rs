use crate::{
    assets::video::VideoSource,
    fetch::{opts::FetchOpts, rejection::Rejection},
    foundation::flags::CheckFlags,
};

/// Preconditions checked on an open video before any chunk is read.
///
/// Fails when the decoder cannot read compressed chunks, or when
/// [`CheckFlags::SIZE`] is requested and the source size differs from the
/// target size.
pub fn check_video_eligibility(src: &dyn VideoSource, opts: &FetchOpts) -> Result<(), Rejection> {
    if !src.supports_chunk_read() {
        return Err(Rejection::NoChunkRead);
    }
    if opts.check_flags.contains(CheckFlags::SIZE)
        && !opts.target_canvas().matches(src.width(), src.height())
    {
        return Err(Rejection::SizeMismatch {
            width: src.width(),
            height: src.height(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/gate.rs"]
mod tests;
