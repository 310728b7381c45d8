//! NetCDF classic header parsing and building.
//!
//! The header is a single variable-length block at the start of the file:
//!
//! ```text
//! header   = magic numrecs dim_list gatt_list var_list
//! magic    = 'C' 'D' 'F' VERSION
//! dim_list = ABSENT | NC_DIMENSION nelems [dim ...]
//! var      = name nelems [dimid ...] vatt_list nc_type vsize begin
//! ```
//!
//! Counts are 32-bit except in CDF-5; offsets are 32-bit only in CDF-1.
//! Every name and attribute value is padded to a 4-byte boundary.

mod build;
mod parse;

use nclint_model::{Attributes, NcType};

use crate::types::Version;

pub use build::build_header;
pub use parse::read_header;

/// File magic prefix.
pub const MAGIC: &[u8; 3] = b"CDF";

/// HDF5 signature (NetCDF-4 files).
pub const HDF5_MAGIC: &[u8; 4] = b"\x89HDF";

pub const NC_DIMENSION: u32 = 0x0A;
pub const NC_VARIABLE: u32 = 0x0B;
pub const NC_ATTRIBUTE: u32 = 0x0C;

/// `numrecs` value of a file still being written.
pub const STREAMING: u64 = u64::MAX;

/// Parsed header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub version: Version,
    /// Record count, or [`STREAMING`].
    pub numrecs: u64,
    pub dimensions: Vec<DimHeader>,
    pub attributes: Attributes,
    pub variables: Vec<VarHeader>,
}

/// A dimension as stored; length 0 marks the record dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimHeader {
    pub name: String,
    pub len: u64,
}

impl DimHeader {
    pub fn is_record(&self) -> bool {
        self.len == 0
    }
}

/// A variable as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct VarHeader {
    pub name: String,
    pub dim_ids: Vec<u64>,
    pub attributes: Attributes,
    pub nc_type: NcType,
    /// Bytes per variable (per record for record variables), padded.
    pub vsize: u64,
    /// File offset of the first byte of data.
    pub begin: u64,
}

impl Header {
    /// Index of the record dimension, if any.
    pub fn record_dimension(&self) -> Option<usize> {
        self.dimensions.iter().position(DimHeader::is_record)
    }

    /// True when the leftmost dimension of `var` is the record dimension.
    pub fn is_record_variable(&self, var: &VarHeader) -> bool {
        match (var.dim_ids.first(), self.record_dimension()) {
            (Some(&first), Some(record)) => first == record as u64,
            _ => false,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.numrecs == STREAMING
    }
}
