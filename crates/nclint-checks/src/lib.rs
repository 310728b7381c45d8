//! NetCDF file checks.
//!
//! A fixed catalog of named checks, registered once and looked up by name:
//!
//! - **Attribute checks**: required global attributes of CMIP5, CF and the
//!   PCIC metadata standard tables, reported per missing name with the
//!   table it comes from
//! - **Composite checks**: accumulating unions of attribute checks, and
//!   short-circuit gates over any checks
//! - **Structural checks**: fully missing layers, masked coordinate
//!   variables, missing units
//! - **Processability**: whether the climatology generator can derive the
//!   time variable and output filename
//!
//! # Example
//!
//! ```
//! use nclint_checks::{RunMode, builtin, run};
//! use nclint_model::MemoryDataset;
//!
//! let registry = builtin().unwrap();
//! let checks = registry.resolve("missing_cf_global_attrs").unwrap();
//! let dataset = MemoryDataset::new().with_attribute("title", "tasmax");
//!
//! let result = run(registry, &dataset, &checks, RunMode::RunAll).unwrap();
//! assert!(result.failed());
//! ```

mod catalog;
mod error;
mod outcome;
mod presence;
pub mod properties;
mod registry;
mod runner;
mod structural;

pub use catalog::{build, builtin};
pub use error::{PropertyError, RegistryError};
pub use outcome::{Detail, MissingAttribute, Outcome};
pub use presence::{missing_attrs, missing_from_set};
pub use registry::{Check, CheckFn, CheckKind, CheckRegistry};
pub use runner::{CheckResult, RunMode, RunResult, run};
pub use structural::{
    has_masked_dimensions, layer_one_missing, missing_time_units, vars_missing_units,
};
