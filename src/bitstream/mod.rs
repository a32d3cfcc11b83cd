pub(crate) mod mpeg;
pub(crate) mod still;
pub(crate) mod timecode;

use crate::bitstream::{
    mpeg::{MpegPicture, classify_mpeg_picture},
    still::{SniffVerdict, sniff_jpeg, sniff_png},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Independent format verdicts for one compressed chunk.
pub struct FrameSniff {
    /// First MPEG picture in the chunk, if any.
    pub mpeg: Option<MpegPicture>,
    /// JPEG signature verdict.
    pub jpeg: SniffVerdict,
    /// PNG signature verdict.
    pub png: SniffVerdict,
}

impl FrameSniff {
    /// Run all sniffers over `bytes`.
    pub fn of(bytes: &[u8]) -> Self {
        let jpeg = sniff_jpeg(bytes);
        let png = sniff_png(bytes);
        // a still image signature wins over start-code lookalikes in entropy data
        let mpeg = if jpeg.matches || png.matches {
            None
        } else {
            classify_mpeg_picture(bytes)
        };
        Self { mpeg, jpeg, png }
    }

    /// Header size of whichever format matched, or 0.
    pub fn header_size(&self) -> usize {
        if self.jpeg.matches {
            self.jpeg.header_size
        } else if self.png.matches {
            self.png.header_size
        } else {
            self.mpeg.map_or(0, |p| p.header_size)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bitstream/sniff.rs"]
mod tests;
