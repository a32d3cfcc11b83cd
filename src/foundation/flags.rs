use std::ops::{BitAnd, BitOr, BitOrAssign};

use crate::foundation::error::{StorycutError, StorycutResult};

/// Set of validity properties a caller requires before a fetched chunk may be
/// passed through unchanged.
///
/// A fetch is accepted only when every requested flag has been verified for the
/// chunk at hand.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct CheckFlags(u8);

impl CheckFlags {
    /// No checks requested.
    pub const NONE: Self = Self(0);
    /// Source dimensions must equal the target dimensions.
    pub const SIZE: Self = Self(1 << 0);
    /// Chunk must be a complete, self-contained picture.
    pub const FULL_FRAME: Self = Self(1 << 1);
    /// P/B pictures require a verified reference chain in the output stream.
    pub const MPEG_INTEGRITY: Self = Self(1 << 2);
    /// Chunk must structurally validate as a JPEG picture.
    pub const JPG: Self = Self(1 << 3);
    /// Chunk must structurally validate as a PNG picture.
    pub const PNG: Self = Self(1 << 4);
    /// Source codec name must appear in the caller's allow-list.
    pub const VCODEC_NAME: Self = Self(1 << 5);

    const NAMED: [(Self, &'static str); 6] = [
        (Self::SIZE, "size"),
        (Self::FULL_FRAME, "full_frame"),
        (Self::MPEG_INTEGRITY, "mpeg_integrity"),
        (Self::JPG, "jpg"),
        (Self::PNG, "png"),
        (Self::VCODEC_NAME, "vcodec_name"),
    ];

    /// Raw bit representation.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True when no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every flag in `other` is also set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Add all flags of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Add `other` when `cond` holds.
    pub fn set_if(&mut self, other: Self, cond: bool) {
        if cond {
            self.insert(other);
        }
    }

    /// Flags of `self` that are absent from `satisfied`.
    pub const fn missing_from(self, satisfied: Self) -> Self {
        Self(self.0 & !satisfied.0)
    }

    /// Lowercase names of the set flags, in declaration order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }

    fn from_name(name: &str) -> StorycutResult<Self> {
        let norm = name.trim().to_ascii_lowercase();
        let flag = match norm.as_str() {
            "size" => Self::SIZE,
            "full_frame" | "fullframe" => Self::FULL_FRAME,
            "mpeg_integrity" | "mpeg" => Self::MPEG_INTEGRITY,
            "jpg" | "jpeg" => Self::JPG,
            "png" => Self::PNG,
            "vcodec_name" | "vcodec" => Self::VCODEC_NAME,
            _ => {
                return Err(StorycutError::validation(format!(
                    "unknown check flag '{name}'"
                )));
            }
        };
        Ok(flag)
    }
}

impl BitOr for CheckFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CheckFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CheckFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl std::fmt::Debug for CheckFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("CheckFlags(NONE)");
        }
        let names: Vec<String> = self.names().map(str::to_ascii_uppercase).collect();
        write!(f, "CheckFlags({})", names.join(" | "))
    }
}

impl std::fmt::Display for CheckFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.names().collect();
        f.write_str(&names.join(","))
    }
}

impl std::str::FromStr for CheckFlags {
    type Err = StorycutError;

    /// Parse a `,` or `|` separated list of flag names; an empty string is
    /// [`CheckFlags::NONE`].
    fn from_str(s: &str) -> StorycutResult<Self> {
        let mut out = Self::NONE;
        for part in s.split([',', '|']) {
            if part.trim().is_empty() {
                continue;
            }
            out |= Self::from_name(part)?;
        }
        Ok(out)
    }
}

impl TryFrom<Vec<String>> for CheckFlags {
    type Error = StorycutError;

    fn try_from(names: Vec<String>) -> StorycutResult<Self> {
        let mut out = Self::NONE;
        for name in &names {
            out |= Self::from_name(name)?;
        }
        Ok(out)
    }
}

impl From<CheckFlags> for Vec<String> {
    fn from(flags: CheckFlags) -> Self {
        flags.names().map(str::to_string).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/flags.rs"]
mod tests;
