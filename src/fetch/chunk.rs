use std::path::Path;

use crate::{
    assets::video::VideoSource,
    fetch::rejection::Rejection,
    foundation::{error::StorycutError, flags::CheckFlags},
};

/// Read the compressed chunk of `source_frame`, bounded by `max_bytes`.
///
/// Overflow and decoder failures are rejections, not errors.
pub fn read_video_chunk(
    src: &mut dyn VideoSource,
    source_frame: u64,
    max_bytes: usize,
) -> Result<Vec<u8>, Rejection> {
    match src.read_chunk(source_frame, max_bytes) {
        Ok(bytes) if bytes.len() > max_bytes => Err(Rejection::Overflow {
            size: bytes.len(),
            max: max_bytes,
        }),
        Ok(bytes) => Ok(bytes),
        Err(StorycutError::ChunkOverflow { size, max }) => Err(Rejection::Overflow { size, max }),
        Err(e) => Err(Rejection::ReadFailed(e.to_string())),
    }
}

/// Load a whole still image file as one chunk.
///
/// A still image has no reference chain, so a request for
/// [`CheckFlags::MPEG_INTEGRITY`] rejects before any I/O.
pub fn read_image_chunk(
    path: &Path,
    max_bytes: usize,
    flags: CheckFlags,
) -> Result<Vec<u8>, Rejection> {
    if flags.contains(CheckFlags::MPEG_INTEGRITY) {
        return Err(Rejection::ImageWithoutReferences);
    }
    let meta = std::fs::metadata(path)
        .map_err(|e| Rejection::ReadFailed(format!("{}: {e}", path.display())))?;
    let size = usize::try_from(meta.len()).unwrap_or(usize::MAX);
    if size > max_bytes {
        return Err(Rejection::Overflow {
            size,
            max: max_bytes,
        });
    }
    std::fs::read(path).map_err(|e| Rejection::ReadFailed(format!("{}: {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/chunk.rs"]
mod tests;
