//! Data model for gridded NetCDF datasets.
//!
//! The checks in `nclint-checks` never talk to a file format directly. They
//! read through the [`Dataset`] trait, which exposes:
//!
//! - file-level (global) attributes,
//! - named dimensions, in file order,
//! - variables with their dimensions, shape, type and attributes,
//! - full or per-layer reads returning a [`MaskedArray`].
//!
//! [`MemoryDataset`] is an in-memory implementation used for fixtures and
//! tests; `nclint-netcdf` provides the on-disk one.

pub mod array;
pub mod attributes;
pub mod dataset;
pub mod error;
pub mod memory;
pub mod types;

pub use array::MaskedArray;
pub use attributes::{AttrValue, Attribute, Attributes};
pub use dataset::{Dataset, Dimension, Variable};
pub use error::{DatasetError, Result};
pub use memory::MemoryDataset;
pub use types::NcType;
