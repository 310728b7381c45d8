//! Error types for NetCDF file operations.

use std::path::PathBuf;

use nclint_model::{DatasetError, NcType};
use thiserror::Error;

use crate::types::Version;

/// Errors that can occur when reading or writing NetCDF files.
#[derive(Debug, Error)]
pub enum NetcdfError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Not a NetCDF classic file.
    #[error("invalid NetCDF file: {message}")]
    InvalidFormat { message: String },

    /// Unknown format version byte after the `CDF` magic.
    #[error("unsupported NetCDF format version {version}")]
    UnsupportedVersion { version: u8 },

    /// Unknown external type tag.
    #[error("unknown NetCDF type code {code} at offset {offset}")]
    UnknownType { code: u32, offset: u64 },

    /// Header list tag does not match.
    #[error("expected {expected} tag at offset {offset}, found {found:#x}")]
    UnexpectedTag {
        expected: &'static str,
        found: u32,
        offset: u64,
    },

    /// Header or data ends early.
    #[error("file truncated at offset {offset}")]
    Truncated { offset: u64 },

    /// Variable refers to a dimension id that does not exist.
    #[error("variable {variable} refers to unknown dimension id {id}")]
    DimensionId { variable: String, id: u64 },

    /// Type not representable in the chosen version.
    #[error("variable or attribute {name} has type {nc_type}, which {version} files cannot store")]
    ExtendedType {
        name: String,
        nc_type: NcType,
        version: Version,
    },

    /// Size or offset does not fit the chosen version.
    #[error("{what} overflows the {version} layout")]
    Overflow { what: String, version: Version },

    /// Error from the dataset being written.
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for NetCDF operations.
pub type Result<T> = std::result::Result<T, NetcdfError>;

impl NetcdfError {
    /// Create an InvalidFormat error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Map end-of-file I/O errors to [`NetcdfError::Truncated`].
    pub(crate) fn from_read(error: std::io::Error, offset: u64) -> Self {
        if error.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::Truncated { offset }
        } else {
            Self::Io(error)
        }
    }
}

impl From<NetcdfError> for DatasetError {
    fn from(error: NetcdfError) -> Self {
        match error {
            NetcdfError::Dataset(inner) => inner,
            other => DatasetError::Backend(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NetcdfError::invalid_format("bad magic");
        assert_eq!(format!("{err}"), "invalid NetCDF file: bad magic");

        let err = NetcdfError::UnexpectedTag {
            expected: "NC_DIMENSION",
            found: 0x0b,
            offset: 8,
        };
        assert_eq!(
            format!("{err}"),
            "expected NC_DIMENSION tag at offset 8, found 0xb"
        );
    }

    #[test]
    fn test_truncated_mapping() {
        let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert!(matches!(
            NetcdfError::from_read(eof, 12),
            NetcdfError::Truncated { offset: 12 }
        ));
    }
}
