//! Processability properties.
//!
//! The climatology generator needs a few derived properties of a file
//! before it can do anything: the time variable and the CMOR-style output
//! filename. Each property either yields its value or a [`PropertyError`]; the
//! `cant_generate_climos` check turns the first unavailable property into a
//! failing outcome.

mod calendar;

use std::collections::HashSet;

use nclint_model::{Dataset, DatasetError, Variable};
use tracing::debug;

use crate::error::PropertyError;
use crate::outcome::{Detail, Outcome};

pub use calendar::{Calendar, CalendarDate, TimeUnits};

/// Property names, in evaluation order.
pub const PROPERTIES: [&str; 2] = ["time_var", "cmor_filename"];

/// Attributes naming auxiliary variables of a data variable.
const REFERENCE_ATTRIBUTES: [&str; 4] = ["bounds", "climatology", "grid_mapping", "coordinates"];

/// The time variable: the one named `time`, otherwise the only variable
/// with `axis = "T"` or `standard_name = "time"`.
pub fn time_var(dataset: &dyn Dataset) -> Result<&Variable, PropertyError> {
    if let Some(var) = dataset.variable("time") {
        return Ok(var);
    }
    let candidates: Vec<&Variable> = dataset
        .variables()
        .iter()
        .filter(|var| {
            text_attr(var, "axis") == Some("T") || text_attr(var, "standard_name") == Some("time")
        })
        .collect();
    match candidates.as_slice() {
        [] => Err(PropertyError::NoTimeVariable),
        [var] => Ok(*var),
        many => Err(PropertyError::AmbiguousTimeVariable {
            names: many.iter().map(|var| var.name.clone()).collect(),
        }),
    }
}

/// Variables holding data rather than coordinates: rank two or more, not a
/// coordinate variable, and not referenced as bounds, climatology, grid
/// mapping or auxiliary coordinates of another variable.
pub fn dependent_variables(dataset: &dyn Dataset) -> Vec<&Variable> {
    let referenced: HashSet<&str> = dataset
        .variables()
        .iter()
        .flat_map(|var| {
            REFERENCE_ATTRIBUTES
                .iter()
                .filter_map(move |attr| text_attr(var, attr))
        })
        .flat_map(str::split_whitespace)
        .map(|name| name.trim_end_matches(':'))
        .collect();
    dataset
        .variables()
        .iter()
        .filter(|var| {
            var.rank() >= 2 && !var.is_coordinate() && !referenced.contains(var.name.as_str())
        })
        .collect()
}

/// First and last unmasked time values, as calendar dates.
pub fn time_range(dataset: &dyn Dataset) -> Result<(CalendarDate, CalendarDate), PropertyError> {
    let var = time_var(dataset)?;
    let units = text_attr(var, "units").ok_or_else(|| PropertyError::MissingTimeUnits {
        variable: var.name.clone(),
    })?;
    let units = TimeUnits::parse(units)?;
    let calendar = Calendar::parse(text_attr(var, "calendar").unwrap_or("standard"))?;

    let values = dataset.read(var)?.compressed();
    let (Some(&first), Some(&last)) = (values.first(), values.last()) else {
        return Err(PropertyError::NoTimeValues {
            variable: var.name.clone(),
        });
    };
    Ok((units.decode(first, calendar)?, units.decode(last, calendar)?))
}

/// CMOR-style filename of the file contents:
/// `<vars>_<frequency>_<model_id>_<experiment_id>_r<realization>i<initialization_method>p<physics_version>_<start>-<end>.nc`.
pub fn cmor_filename(dataset: &dyn Dataset) -> Result<String, PropertyError> {
    let variables = dependent_variables(dataset);
    if variables.is_empty() {
        return Err(PropertyError::NoDependentVariables);
    }
    let names: Vec<&str> = variables.iter().map(|var| var.name.as_str()).collect();

    let global = |name: &str| {
        dataset
            .global_attributes()
            .get(name)
            .map(ToString::to_string)
            .ok_or_else(|| PropertyError::MissingAttribute {
                name: name.to_string(),
            })
    };
    let frequency = global("frequency")?;
    let model_id = global("model_id")?;
    let experiment_id = global("experiment_id")?;
    let realization = global("realization")?;
    let initialization = global("initialization_method")?;
    let physics = global("physics_version")?;

    let (start, end) = time_range(dataset)?;
    Ok(format!(
        "{}_{frequency}_{model_id}_{experiment_id}_r{realization}i{initialization}p{physics}_{}-{}.nc",
        names.join("+"),
        start.stamp(&frequency),
        end.stamp(&frequency),
    ))
}

/// Fails with the first property whose value is unavailable or falsy.
///
/// Property errors, including read errors while evaluating a property, are
/// reported as the failure reason and never abort the file.
pub fn cant_generate_climos(dataset: &dyn Dataset) -> Result<Outcome, DatasetError> {
    let fail = |name: &str, reason: String| -> Result<Outcome, DatasetError> {
        debug!(property = name, %reason, "property failed");
        Ok(Outcome::Fail(Detail::Reason {
            name: name.to_string(),
            reason,
        }))
    };

    match time_var(dataset) {
        Err(error) => return fail(PROPERTIES[0], error.to_string()),
        Ok(var) if var.len() == Some(0) => {
            return fail(PROPERTIES[0], format!("Falsy value: {}", describe(var)));
        }
        Ok(_) => {}
    }
    match cmor_filename(dataset) {
        Err(error) => fail(PROPERTIES[1], error.to_string()),
        Ok(name) if name.is_empty() => fail(PROPERTIES[1], "Falsy value: ''".to_string()),
        Ok(name) => {
            debug!(cmor_filename = %name, "properties available");
            Ok(Outcome::Pass)
        }
    }
}

fn text_attr<'a>(var: &'a Variable, name: &str) -> Option<&'a str> {
    var.attribute(name).and_then(|value| value.as_text())
}

/// `name(dim=len, ...)`
fn describe(var: &Variable) -> String {
    let dims: Vec<String> = var
        .dimensions
        .iter()
        .zip(&var.shape)
        .map(|(dim, len)| format!("{dim}={len}"))
        .collect();
    format!("{}({})", var.name, dims.join(", "))
}
