//! External data types of the NetCDF data model.

use std::fmt;

use serde::Serialize;

/// NetCDF external type.
///
/// The first six types exist in every classic file; the unsigned and 64-bit
/// types only in CDF-5 files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NcType {
    Byte,
    Char,
    Short,
    Int,
    Float,
    Double,
    UByte,
    UShort,
    UInt,
    Int64,
    UInt64,
}

impl NcType {
    /// Type tag as stored in a classic header.
    pub const fn code(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Char => 2,
            Self::Short => 3,
            Self::Int => 4,
            Self::Float => 5,
            Self::Double => 6,
            Self::UByte => 7,
            Self::UShort => 8,
            Self::UInt => 9,
            Self::Int64 => 10,
            Self::UInt64 => 11,
        }
    }

    pub const fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            1 => Self::Byte,
            2 => Self::Char,
            3 => Self::Short,
            4 => Self::Int,
            5 => Self::Float,
            6 => Self::Double,
            7 => Self::UByte,
            8 => Self::UShort,
            9 => Self::UInt,
            10 => Self::Int64,
            11 => Self::UInt64,
            _ => return None,
        })
    }

    /// Size of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::Byte | Self::Char | Self::UByte => 1,
            Self::Short | Self::UShort => 2,
            Self::Int | Self::Float | Self::UInt => 4,
            Self::Double | Self::Int64 | Self::UInt64 => 8,
        }
    }

    /// True for the types only CDF-5 files may carry.
    pub const fn is_extended(self) -> bool {
        matches!(
            self,
            Self::UByte | Self::UShort | Self::UInt | Self::Int64 | Self::UInt64
        )
    }

    pub const fn is_integer(self) -> bool {
        !matches!(self, Self::Float | Self::Double | Self::Char)
    }

    /// The library default fill value (`NC_FILL_*`).
    pub const fn default_fill(self) -> f64 {
        match self {
            Self::Byte => -127.0,
            Self::Char => 0.0,
            Self::Short => -32767.0,
            Self::Int => -2_147_483_647.0,
            Self::Float => 9.969_209_968_386_869e36_f32 as f64,
            Self::Double => 9.969_209_968_386_869e36,
            Self::UByte => 255.0,
            Self::UShort => 65535.0,
            Self::UInt => 4_294_967_295.0,
            Self::Int64 => -9_223_372_036_854_775_806_i64 as f64,
            Self::UInt64 => 18_446_744_073_709_551_614_u64 as f64,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
            Self::UByte => "ubyte",
            Self::UShort => "ushort",
            Self::UInt => "uint",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
        }
    }
}

impl fmt::Display for NcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
