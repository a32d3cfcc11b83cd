//! GOP header timecode rewriting.
//!
//! A passed-through chunk keeps the timecode of its source file; rewriting it
//! to the master position keeps the output stream monotonic.

use crate::{
    bitstream::mpeg::{GOP_START, start_codes},
    foundation::core::MasterFrame,
};

const TIMECODE_SHIFT: u32 = 7;
const MARKER_BIT: u32 = 1 << 12;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// The 25-bit `time_code` field of a GOP header.
pub struct GopTimecode {
    /// Drop-frame counting flag.
    pub drop_frame: bool,
    /// Hours (0-23).
    pub hours: u8,
    /// Minutes (0-59).
    pub minutes: u8,
    /// Seconds (0-59).
    pub seconds: u8,
    /// Pictures within the second.
    pub pictures: u8,
}

impl GopTimecode {
    /// Timecode of master frame `master` at `frame_rate` frames per second.
    ///
    /// The rate is rounded to an integer count of pictures per second.
    pub fn for_master_frame(master: MasterFrame, frame_rate: f64) -> Self {
        let fps = if frame_rate.is_finite() {
            frame_rate.round().clamp(1.0, 60.0) as u64
        } else {
            1
        };
        let n = master.zero_based();
        let secs = n / fps;
        Self {
            drop_frame: false,
            hours: ((secs / 3600) % 24) as u8,
            minutes: ((secs / 60) % 60) as u8,
            seconds: (secs % 60) as u8,
            pictures: (n % fps) as u8,
        }
    }

    fn pack(self) -> u32 {
        (u32::from(self.drop_frame) << 24)
            | (u32::from(self.hours & 0x1F) << 19)
            | (u32::from(self.minutes & 0x3F) << 13)
            | MARKER_BIT
            | (u32::from(self.seconds & 0x3F) << 6)
            | u32::from(self.pictures & 0x3F)
    }

    fn unpack(v: u32) -> Self {
        Self {
            drop_frame: (v >> 24) & 1 == 1,
            hours: ((v >> 19) & 0x1F) as u8,
            minutes: ((v >> 13) & 0x3F) as u8,
            seconds: ((v >> 6) & 0x3F) as u8,
            pictures: (v & 0x3F) as u8,
        }
    }
}

impl std::fmt::Display for GopTimecode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sep = if self.drop_frame { ';' } else { ':' };
        write!(
            f,
            "{:02}:{:02}:{:02}{sep}{:02}",
            self.hours, self.minutes, self.seconds, self.pictures
        )
    }
}

fn gop_word(bytes: &[u8], at: usize) -> Option<u32> {
    let b = bytes.get(at + 4..at + 8)?;
    Some(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

/// Timecode of the first GOP header in `bytes`.
pub fn read_gop_timecode(bytes: &[u8]) -> Option<GopTimecode> {
    start_codes(bytes, 0)
        .filter(|&(_, code)| code == GOP_START)
        .find_map(|(at, _)| gop_word(bytes, at))
        .map(|w| GopTimecode::unpack(w >> TIMECODE_SHIFT))
}

/// Overwrite every GOP header timecode in `bytes` with the timecode of
/// `master`, returning how many headers were rewritten.
///
/// The drop-frame flag, `closed_gop` and `broken_link` bits are kept.
pub fn rewrite_gop_timecodes(bytes: &mut [u8], master: MasterFrame, frame_rate: f64) -> usize {
    let gops: Vec<usize> = start_codes(bytes, 0)
        .filter(|&(_, code)| code == GOP_START)
        .map(|(at, _)| at)
        .collect();

    let mut rewritten = 0;
    for at in gops {
        let Some(old) = gop_word(bytes, at) else {
            continue;
        };
        let mut tc = GopTimecode::for_master_frame(master, frame_rate);
        tc.drop_frame = GopTimecode::unpack(old >> TIMECODE_SHIFT).drop_frame;
        let word = (tc.pack() << TIMECODE_SHIFT) | (old & 0x7F);
        bytes[at + 4..at + 8].copy_from_slice(&word.to_be_bytes());
        rewritten += 1;
    }
    rewritten
}

#[cfg(test)]
#[path = "../../tests/unit/bitstream/timecode.rs"]
mod tests;
