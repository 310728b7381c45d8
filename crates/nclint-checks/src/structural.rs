//! Checks that look at variables and data rather than global attributes.

use nclint_model::{Dataset, DatasetError};
use tracing::{debug, trace};

use crate::outcome::Outcome;

/// Fails when any grid variable (three or more dimensions) has a fully
/// masked layer at index 1 along its leftmost axis.
///
/// This catches files where a multi-step temporal summary was computed on
/// data that was already a summary: the first step holds values and every
/// later step is missing.
pub fn layer_one_missing(dataset: &dyn Dataset) -> Result<Outcome, DatasetError> {
    for var in dataset.variables() {
        if var.rank() < 3 {
            continue;
        }
        if var.len().unwrap_or(0) < 2 {
            debug!(variable = %var.name, shape = ?var.shape, "no layer 1, skipping");
            continue;
        }
        let layer = dataset.read_layer(var, 1)?;
        if layer.all_masked() {
            debug!(variable = %var.name, "layer 1 fully masked");
            return Ok(Outcome::from_flag(true));
        }
    }
    Ok(Outcome::Pass)
}

/// Fails when any variable has no `units` attribute.
pub fn vars_missing_units(dataset: &dyn Dataset) -> Result<Outcome, DatasetError> {
    let missing = dataset
        .variables()
        .iter()
        .find(|var| !var.has_attribute("units"));
    if let Some(var) = missing {
        trace!(variable = %var.name, "no units attribute");
    }
    Ok(Outcome::from_flag(missing.is_some()))
}

/// Fails when there is no `time` variable or it has no `units` attribute.
pub fn missing_time_units(dataset: &dyn Dataset) -> Result<Outcome, DatasetError> {
    let has_units = dataset
        .variable("time")
        .is_some_and(|var| var.has_attribute("units"));
    Ok(Outcome::from_flag(!has_units))
}

/// Fails with the names of every dimension whose coordinate variable holds
/// at least one masked value. Dimensions without a coordinate variable are
/// skipped.
pub fn has_masked_dimensions(dataset: &dyn Dataset) -> Result<Outcome, DatasetError> {
    let mut masked = Vec::new();
    for dim in dataset.dimensions() {
        let Some(var) = dataset.variable(&dim.name) else {
            trace!(dimension = %dim.name, "no coordinate variable");
            continue;
        };
        if dataset.read(var)?.is_masked() {
            masked.push(dim.name.clone());
        }
    }
    Ok(Outcome::from_names(masked))
}
