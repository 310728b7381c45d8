//! NetCDF classic format reader and writer.
//!
//! This crate reads and writes the three classic NetCDF layouts:
//!
//! - CDF-1 (classic, 32-bit offsets)
//! - CDF-2 (64-bit offsets)
//! - CDF-5 (64-bit data, unsigned and 64-bit integer types)
//!
//! NetCDF-4 files are HDF5 containers and are rejected with
//! [`NetcdfError::InvalidFormat`].
//!
//! An open [`NcFile`] implements [`nclint_model::Dataset`]. Header metadata
//! is parsed eagerly; variable data is read on demand, one variable or one
//! leftmost-axis layer at a time, and masked following the usual
//! `_FillValue` / `missing_value` / `valid_*` conventions.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use nclint_model::Dataset;
//! use nclint_netcdf::NcFile;
//!
//! let nc = NcFile::open(Path::new("tasmax_day.nc")).unwrap();
//! for var in nc.variables() {
//!     println!("{} {:?}", var.name, var.shape);
//! }
//! ```

mod codec;
mod error;
pub mod header;
mod mask;
mod reader;
mod types;
mod writer;

pub use error::{NetcdfError, Result};
pub use reader::NcFile;
pub use types::{Version, WriterOptions};
pub use writer::{NcWriter, write_netcdf, write_netcdf_with_options};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
