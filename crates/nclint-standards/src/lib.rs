//! Metadata attribute tables.
//!
//! Global attribute names required or recommended by the CMIP5 output
//! metadata requirements, the CF Conventions (1.6) and the PCIC metadata
//! standard for downscaled data and hydrology modelling data (tables A
//! to E). Tables are built once, on first use, and never change.
//!
//! ```
//! use nclint_standards::{MODEL_CALIBRATION_MANDATORY, Table};
//!
//! assert_eq!(MODEL_CALIBRATION_MANDATORY.table(), Some(Table::D));
//! assert!(MODEL_CALIBRATION_MANDATORY.contains("calibration_dataset_id"));
//! ```

mod sets;
mod table;

pub use sets::{
    AttributeSet, CF, CMIP5, DOWNSCALING_OPTIONAL, DOWNSCALING_SPECIFIC_MANDATORY,
    DOWNSCALING_SPECIFIC_OPTIONAL, GRIDDED_DATASET_MANDATORY, GRIDDED_DATASET_OPTIONAL,
    HYDROMODEL_SPECIFIC_MANDATORY, HYDROMODEL_SPECIFIC_OPTIONAL, MODEL_CALIBRATION_MANDATORY,
    MODEL_CALIBRATION_OPTIONAL, MODEL_FORCING_DOWNSCALED_GCM_MANDATORY,
    MODEL_FORCING_DOWNSCALED_GCM_OPTIONAL, MODEL_FORCING_GENERAL_MANDATORY,
    MODEL_FORCING_GENERAL_OPTIONAL, MODEL_FORCING_OBSERVATIONAL_MANDATORY,
    MODEL_FORCING_OBSERVATIONAL_OPTIONAL, PCIC_COMMON_MANDATORY, SUMMARY_GCM_MANDATORY,
    SUMMARY_GCM_OPTIONAL, prefixed,
};
pub use table::Table;
