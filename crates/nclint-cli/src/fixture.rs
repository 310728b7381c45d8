//! Synthetic NetCDF files that satisfy a file type's mandatory attributes.

use anyhow::{Context, Result};
use clap::ValueEnum;
use nclint_checks::CheckRegistry;
use nclint_model::{MaskedArray, MemoryDataset, NcType};
use tracing::debug;

const TIME_STEPS: usize = 3;
const LAT: usize = 2;
const LON: usize = 2;

/// Value written to every required global attribute.
pub const ATTRIBUTE_VALUE: &str = "value";

/// Kind of PCIC data product a fixture stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FileType {
    #[value(name = "downscaled")]
    Downscaled,
    #[value(name = "hydromodel_gcm")]
    HydromodelGcm,
    #[value(name = "hydromodel_obs")]
    HydromodelObs,
}

impl FileType {
    /// The composite check listing every mandatory attribute of this type.
    pub fn mandatory_check(self) -> &'static str {
        match self {
            Self::Downscaled => "missing_downscaling_mandatory_global_attrs",
            Self::HydromodelGcm => "missing_hydromodel_gcm_mandatory_global_attrs",
            Self::HydromodelObs => "missing_hydromodel_obs_mandatory_global_attrs",
        }
    }
}

/// Build the fixture dataset.
///
/// Global attributes are the required attributes of the type's mandatory
/// check, each set to [`ATTRIBUTE_VALUE`]. Data is a `tas(time, lat, lon)`
/// grid of ones; `blank_layers` masks every time step after the first.
pub fn build_fixture(
    registry: &CheckRegistry,
    file_type: FileType,
    blank_layers: bool,
) -> Result<MemoryDataset> {
    let check = registry.lookup(file_type.mandatory_check())?;
    let mut ds = MemoryDataset::new();
    let required = registry.required_attributes(check);
    debug!(?file_type, attributes = required.len(), "building fixture");
    for name in &required {
        ds.set_attribute(name, ATTRIBUTE_VALUE);
    }

    ds.add_unlimited_dimension("time", TIME_STEPS)?;
    ds.add_dimension("lat", LAT)?;
    ds.add_dimension("lon", LON)?;

    let time: Vec<f64> = (0..TIME_STEPS).map(|step| step as f64).collect();
    let var = ds.add_variable(
        "time",
        &["time"],
        NcType::Double,
        MaskedArray::from_shape_vec(&[TIME_STEPS], time).context("time axis")?,
    )?;
    var.attributes.insert("units", "days since 1950-01-01");
    var.attributes.insert("calendar", "standard");
    var.attributes.insert("axis", "T");

    for (name, len, units, axis) in [
        ("lat", LAT, "degrees_north", "Y"),
        ("lon", LON, "degrees_east", "X"),
    ] {
        let values: Vec<f64> = (0..len).map(|idx| idx as f64).collect();
        let var = ds.add_variable(
            name,
            &[name],
            NcType::Double,
            MaskedArray::from_shape_vec(&[len], values).context("spatial axis")?,
        )?;
        var.attributes.insert("units", units);
        var.attributes.insert("axis", axis);
    }

    let mut tas = MaskedArray::filled(&[TIME_STEPS, LAT, LON], 1.0);
    if blank_layers {
        for step in 1..TIME_STEPS {
            for lat in 0..LAT {
                for lon in 0..LON {
                    tas.set_masked(&[step, lat, lon], true);
                }
            }
        }
    }
    let var = ds.add_variable("tas", &["time", "lat", "lon"], NcType::Float, tas)?;
    var.attributes.insert("units", "K");
    var.attributes.insert("_FillValue", 1.0e20_f32);

    Ok(ds)
}

#[cfg(test)]
mod tests {
    use nclint_checks::{builtin, layer_one_missing};
    use nclint_model::Dataset;

    use super::*;

    #[test]
    fn test_fixture_passes_its_mandatory_check() {
        let registry = builtin().unwrap();
        for file_type in [
            FileType::Downscaled,
            FileType::HydromodelGcm,
            FileType::HydromodelObs,
        ] {
            let ds = build_fixture(registry, file_type, false).unwrap();
            let check = registry.lookup(file_type.mandatory_check()).unwrap();
            assert!(registry.evaluate(check, &ds).unwrap().passed());
            assert!(layer_one_missing(&ds).unwrap().passed());
        }
    }

    #[test]
    fn test_blank_layers() {
        let ds = build_fixture(builtin().unwrap(), FileType::Downscaled, true).unwrap();
        assert!(layer_one_missing(&ds).unwrap().failed());
        let tas = ds.variable("tas").unwrap();
        assert!(!ds.read_layer(tas, 0).unwrap().is_masked());
    }
}
