use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::StorycutResult;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Still image decoded to packed RGB8.
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGB8 pixels.
    pub rgb8: Vec<u8>,
}

/// Read the pixel dimensions from an encoded image header without decoding
/// the pixel data.
pub fn image_dimensions(bytes: &[u8]) -> StorycutResult<(u32, u32)> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("guess image format")?;
    let dims = reader.into_dimensions().context("read image dimensions")?;
    Ok(dims)
}

/// Decode an encoded image to RGB8, dropping any alpha channel.
pub fn decode_image_rgb8(bytes: &[u8]) -> StorycutResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgb = dyn_img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(DecodedImage {
        width,
        height,
        rgb8: rgb.into_raw(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
