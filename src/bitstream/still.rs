//! JPEG and PNG signature checks.
//!
//! Both sniffers only look at the first [`SNIFF_WINDOW`] bytes of a chunk to
//! decide the format; completeness checks look at the tail.

/// Bytes inspected from the start of a chunk.
pub const SNIFF_WINDOW: usize = 32;

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const PNG_IHDR_LEN: u32 = 13;
/// Signature, IHDR length and type, IHDR payload and CRC.
const PNG_HEADER_LEN: usize = 8 + 8 + PNG_IHDR_LEN as usize + 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Outcome of a format sniff.
pub struct SniffVerdict {
    /// The chunk carries this format's signature.
    pub matches: bool,
    /// Length of the structural header in bytes (0 when not matching).
    pub header_size: usize,
}

impl SniffVerdict {
    const NO: Self = Self {
        matches: false,
        header_size: 0,
    };

    fn yes(header_size: usize) -> Self {
        Self {
            matches: true,
            header_size,
        }
    }
}

fn window(bytes: &[u8]) -> &[u8] {
    &bytes[..bytes.len().min(SNIFF_WINDOW)]
}

/// Check for a JPEG SOI marker followed by a well-formed first segment.
///
/// The header size covers the SOI marker and that first segment.
pub fn sniff_jpeg(bytes: &[u8]) -> SniffVerdict {
    let w = window(bytes);
    if w.len() < 6 || w[..2] != JPEG_SOI || w[2] != 0xFF {
        return SniffVerdict::NO;
    }
    let marker = w[3];
    // standalone markers (RSTn, SOI, EOI) cannot open a segment
    if !(0xC0..=0xFE).contains(&marker) || (0xD0..=0xD9).contains(&marker) {
        return SniffVerdict::NO;
    }
    let seg_len = usize::from(u16::from_be_bytes([w[4], w[5]]));
    if seg_len < 2 {
        return SniffVerdict::NO;
    }
    let header_size = 4 + seg_len;
    if header_size > bytes.len() {
        return SniffVerdict::NO;
    }
    SniffVerdict::yes(header_size)
}

/// A JPEG chunk that also ends with the EOI marker.
pub fn jpeg_is_complete(bytes: &[u8]) -> bool {
    sniff_jpeg(bytes).matches && bytes.ends_with(&JPEG_EOI)
}

/// Check for the PNG signature followed by an `IHDR` chunk.
pub fn sniff_png(bytes: &[u8]) -> SniffVerdict {
    let w = window(bytes);
    if w.len() < 24 || w[..8] != PNG_SIGNATURE {
        return SniffVerdict::NO;
    }
    let len = u32::from_be_bytes([w[8], w[9], w[10], w[11]]);
    if len != PNG_IHDR_LEN || &w[12..16] != b"IHDR" {
        return SniffVerdict::NO;
    }
    if bytes.len() < PNG_HEADER_LEN || png_dimensions(bytes).is_none() {
        return SniffVerdict::NO;
    }
    SniffVerdict::yes(PNG_HEADER_LEN)
}

/// Width and height from the `IHDR` chunk, if both are non-zero.
pub fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    let w = bytes.get(16..20)?;
    let h = bytes.get(20..24)?;
    let width = u32::from_be_bytes([w[0], w[1], w[2], w[3]]);
    let height = u32::from_be_bytes([h[0], h[1], h[2], h[3]]);
    (width > 0 && height > 0).then_some((width, height))
}

/// A PNG chunk whose final chunk is `IEND`.
pub fn png_is_complete(bytes: &[u8]) -> bool {
    let n = bytes.len();
    sniff_png(bytes).matches && n >= PNG_HEADER_LEN + 12 && &bytes[n - 8..n - 4] == b"IEND"
}

#[cfg(test)]
#[path = "../../tests/unit/bitstream/still.rs"]
mod tests;
