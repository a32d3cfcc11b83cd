use crate::foundation::error::{StorycutError, StorycutResult};

pub use kurbo::Vec2;

/// 1-based index of a frame in the assembled output timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct MasterFrame(pub u64);

impl MasterFrame {
    /// First frame of every output timeline.
    pub const FIRST: Self = Self(1);

    /// Construct a master frame number, rejecting `0`.
    pub fn new(nr: u64) -> StorycutResult<Self> {
        if nr == 0 {
            return Err(StorycutError::validation("master frame numbers are 1-based"));
        }
        Ok(Self(nr))
    }

    /// Frame `delta` positions later in the timeline.
    pub fn offset(self, delta: u64) -> Self {
        Self(self.0.saturating_add(delta))
    }

    /// Zero-based position of this frame.
    pub fn zero_based(self) -> u64 {
        self.0.saturating_sub(1)
    }

    /// Number of frames after this one in a run of `total` frames.
    pub fn remaining_after(self, total: u64) -> u64 {
        total.saturating_sub(self.0)
    }
}

impl std::fmt::Display for MasterFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// True when `width`/`height` match this canvas exactly.
    pub fn matches(self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
