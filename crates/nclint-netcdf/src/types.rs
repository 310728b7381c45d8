//! Format versions and writer options.

use std::fmt;

/// NetCDF classic format version.
///
/// | Version | magic byte | counts | offsets | extended types |
/// |---------|------------|--------|---------|----------------|
/// | Classic | 1          | 32-bit | 32-bit  | no             |
/// | Offset64 | 2         | 32-bit | 64-bit  | no             |
/// | Data64  | 5          | 64-bit | 64-bit  | yes            |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    /// CDF-1 (default, maximum compatibility).
    #[default]
    Classic,
    /// CDF-2, 64-bit offsets.
    Offset64,
    /// CDF-5, 64-bit data.
    Data64,
}

impl Version {
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Self::Classic),
            2 => Some(Self::Offset64),
            5 => Some(Self::Data64),
            _ => None,
        }
    }

    pub const fn byte(self) -> u8 {
        match self {
            Self::Classic => 1,
            Self::Offset64 => 2,
            Self::Data64 => 5,
        }
    }

    /// Width in bytes of element counts, lengths and dimension ids.
    pub const fn count_width(self) -> usize {
        match self {
            Self::Classic | Self::Offset64 => 4,
            Self::Data64 => 8,
        }
    }

    /// Width in bytes of variable data offsets.
    pub const fn offset_width(self) -> usize {
        match self {
            Self::Classic => 4,
            Self::Offset64 | Self::Data64 => 8,
        }
    }

    pub const fn supports_extended_types(self) -> bool {
        matches!(self, Self::Data64)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CDF-{}", self.byte())
    }
}

/// Options for [`NcWriter`](crate::NcWriter).
#[derive(Debug, Clone, Default)]
pub struct WriterOptions {
    pub version: Version,
}

impl WriterOptions {
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_bytes() {
        for version in [Version::Classic, Version::Offset64, Version::Data64] {
            assert_eq!(Version::from_byte(version.byte()), Some(version));
        }
        assert_eq!(Version::from_byte(3), None);
        assert_eq!(Version::Data64.to_string(), "CDF-5");
    }
}
