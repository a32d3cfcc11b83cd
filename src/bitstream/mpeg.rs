//! MPEG-1/MPEG-2 video elementary stream inspection.
//!
//! Only the handful of syntax elements needed to judge a single chunk are
//! parsed: start codes, the picture header, the picture coding extension and
//! the sequence header.

/// Picture start code value (`00 00 01 00`).
pub const PICTURE_START: u8 = 0x00;
/// First slice start code value.
pub const SLICE_FIRST: u8 = 0x01;
/// Last slice start code value.
pub const SLICE_LAST: u8 = 0xAF;
/// Sequence header start code value.
pub const SEQUENCE_HEADER: u8 = 0xB3;
/// Extension start code value.
pub const EXTENSION_START: u8 = 0xB5;
/// Sequence end code value.
pub const SEQUENCE_END: u8 = 0xB7;
/// Group of pictures start code value.
pub const GOP_START: u8 = 0xB8;

const EXT_SEQUENCE: u8 = 0x1;
const EXT_PICTURE_CODING: u8 = 0x8;

/// Minimum picture header length: start code, temporal reference, coding
/// type and vbv delay.
const PICTURE_HEADER_LEN: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Picture coding type.
pub enum PictureType {
    /// Intra coded; depends on no other picture.
    Intra,
    /// Predicted from the previous reference picture.
    Predicted,
    /// Predicted from both the previous and the next reference picture.
    Bidirectional,
    /// Anything else, including truncated headers.
    Unknown,
}

impl PictureType {
    /// Map the 3-bit `picture_coding_type` field.
    ///
    /// MPEG-1 D-pictures (type 4) are DC-only intra pictures.
    pub fn from_coding_type(code: u8) -> Self {
        match code {
            1 | 4 => Self::Intra,
            2 => Self::Predicted,
            3 => Self::Bidirectional,
            _ => Self::Unknown,
        }
    }

    /// Single-letter name (`I`, `P`, `B`, `?`).
    pub fn letter(self) -> char {
        match self {
            Self::Intra => 'I',
            Self::Predicted => 'P',
            Self::Bidirectional => 'B',
            Self::Unknown => '?',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Whether a picture codes a whole frame or a single field.
pub enum PictureStructure {
    /// Top field only.
    TopField,
    /// Bottom field only.
    BottomField,
    /// Complete frame (always the case for MPEG-1).
    Frame,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Result of classifying one chunk as an MPEG picture.
pub struct MpegPicture {
    /// Coding type.
    pub picture_type: PictureType,
    /// Display-order index inside the GOP.
    pub temporal_reference: u16,
    /// Offset of the first slice, i.e. where structural headers end.
    pub header_size: usize,
    /// Frame or field picture.
    pub structure: PictureStructure,
}

impl MpegPicture {
    /// True for an intra-coded frame picture.
    pub fn is_full_frame(&self) -> bool {
        self.picture_type == PictureType::Intra && self.structure == PictureStructure::Frame
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Fields of a sequence header relevant to chunk passthrough.
pub struct SequenceHeader {
    /// Horizontal size in pixels.
    pub width: u32,
    /// Vertical size in pixels.
    pub height: u32,
    /// 4-bit frame rate code.
    pub frame_rate_code: u8,
    /// A sequence extension follows (MPEG-2).
    pub mpeg2: bool,
}

impl SequenceHeader {
    /// Codec name as reported by common decoders.
    pub fn codec_name(&self) -> &'static str {
        if self.mpeg2 { "mpeg2video" } else { "mpeg1video" }
    }
}

/// Iterator over `(offset, code)` pairs of start codes in a buffer.
pub struct StartCodes<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Iterator for StartCodes<'_> {
    type Item = (usize, u8);

    fn next(&mut self) -> Option<(usize, u8)> {
        let at = next_start_code(self.bytes, self.pos)?;
        self.pos = at + 3;
        Some((at, self.bytes[at + 3]))
    }
}

/// Iterate the start codes of `bytes` from `from` onwards.
pub fn start_codes(bytes: &[u8], from: usize) -> StartCodes<'_> {
    StartCodes { bytes, pos: from }
}

/// Offset of the next `00 00 01 xx` prefix at or after `from` whose code
/// byte is inside the buffer.
pub fn next_start_code(bytes: &[u8], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(4)
        .position(|w| w[0] == 0 && w[1] == 0 && w[2] == 1)
        .map(|p| p + from)
}

/// Classify the first picture in `bytes`.
///
/// Returns `None` when the buffer holds no picture start code at all. A start
/// code whose header is truncated classifies as [`PictureType::Unknown`].
pub fn classify_mpeg_picture(bytes: &[u8]) -> Option<MpegPicture> {
    let p = start_codes(bytes, 0).find(|&(_, code)| code == PICTURE_START)?.0;

    if p + 6 > bytes.len() {
        return Some(MpegPicture {
            picture_type: PictureType::Unknown,
            temporal_reference: 0,
            header_size: bytes.len(),
            structure: PictureStructure::Frame,
        });
    }

    let temporal_reference = (u16::from(bytes[p + 4]) << 2) | u16::from(bytes[p + 5] >> 6);
    let picture_type = PictureType::from_coding_type((bytes[p + 5] >> 3) & 0x07);

    let mut header_size = (p + PICTURE_HEADER_LEN).min(bytes.len());
    let mut structure = PictureStructure::Frame;
    for (at, code) in start_codes(bytes, p + 4) {
        match code {
            SLICE_FIRST..=SLICE_LAST => {
                header_size = at;
                break;
            }
            EXTENSION_START => {
                if let Some(&b) = bytes.get(at + 6)
                    && bytes[at + 4] >> 4 == EXT_PICTURE_CODING
                {
                    structure = match b & 0x03 {
                        1 => PictureStructure::TopField,
                        2 => PictureStructure::BottomField,
                        _ => PictureStructure::Frame,
                    };
                }
            }
            PICTURE_START | SEQUENCE_HEADER | GOP_START | SEQUENCE_END => break,
            _ => {}
        }
    }

    Some(MpegPicture {
        picture_type,
        temporal_reference,
        header_size,
        structure,
    })
}

/// Parse the first sequence header in `bytes`.
pub fn parse_sequence_header(bytes: &[u8]) -> Option<SequenceHeader> {
    let s = start_codes(bytes, 0)
        .find(|&(_, code)| code == SEQUENCE_HEADER)?
        .0;
    let h = bytes.get(s + 4..s + 8)?;
    let width = (u32::from(h[0]) << 4) | u32::from(h[1] >> 4);
    let height = (u32::from(h[1] & 0x0F) << 8) | u32::from(h[2]);
    let frame_rate_code = h[3] & 0x0F;

    let mpeg2 = start_codes(bytes, s + 4)
        .take_while(|&(_, code)| code != PICTURE_START && code != GOP_START)
        .any(|(at, code)| {
            code == EXTENSION_START && bytes.get(at + 4).is_some_and(|b| b >> 4 == EXT_SEQUENCE)
        });

    Some(SequenceHeader {
        width,
        height,
        frame_rate_code,
        mpeg2,
    })
}

/// Frame rate for a sequence header `frame_rate_code`, if defined.
pub fn frame_rate_for_code(code: u8) -> Option<f64> {
    let rate = match code {
        1 => 24000.0 / 1001.0,
        2 => 24.0,
        3 => 25.0,
        4 => 30000.0 / 1001.0,
        5 => 30.0,
        6 => 50.0,
        7 => 60000.0 / 1001.0,
        8 => 60.0,
        _ => return None,
    };
    Some(rate)
}

#[cfg(test)]
#[path = "../../tests/unit/bitstream/mpeg.rs"]
mod tests;
