//! The built-in check catalog.

use std::sync::LazyLock;

use nclint_standards::{
    AttributeSet, CF, CMIP5, DOWNSCALING_OPTIONAL, DOWNSCALING_SPECIFIC_MANDATORY,
    HYDROMODEL_SPECIFIC_MANDATORY, HYDROMODEL_SPECIFIC_OPTIONAL, MODEL_CALIBRATION_MANDATORY,
    MODEL_CALIBRATION_OPTIONAL, MODEL_FORCING_DOWNSCALED_GCM_MANDATORY,
    MODEL_FORCING_DOWNSCALED_GCM_OPTIONAL, MODEL_FORCING_GENERAL_MANDATORY,
    MODEL_FORCING_GENERAL_OPTIONAL, MODEL_FORCING_OBSERVATIONAL_MANDATORY,
    MODEL_FORCING_OBSERVATIONAL_OPTIONAL, PCIC_COMMON_MANDATORY, Table,
};

use crate::error::RegistryError;
use crate::properties::cant_generate_climos;
use crate::registry::{CheckKind, CheckRegistry};
use crate::structural::{
    has_masked_dimensions, layer_one_missing, missing_time_units, vars_missing_units,
};

static BUILTIN: LazyLock<Result<CheckRegistry, RegistryError>> = LazyLock::new(build);

/// The process-wide registry of built-in checks, built on first use.
pub fn builtin() -> Result<&'static CheckRegistry, &'static RegistryError> {
    BUILTIN.as_ref()
}

/// Reference lines naming the source document and, for PCIC tables, the
/// table labels.
fn reference(tables: &[Table]) -> String {
    let labels: Vec<&str> = tables.iter().map(Table::label).collect();
    let url = tables.first().map_or("", Table::reference);
    if tables.iter().all(Table::is_pcic) {
        let noun = if tables.len() > 1 { "Tables" } else { "Table" };
        format!("Reference: {url}\n{noun} {}", labels.join(", "))
    } else {
        format!("Reference: {url}")
    }
}

fn attribute_doc(summary: &str, set: &AttributeSet) -> String {
    match set.table() {
        Some(table) => format!("{summary}\n{}", reference(&[table])),
        None => summary.to_string(),
    }
}

fn register_attributes(
    registry: &mut CheckRegistry,
    name: &str,
    summary: &str,
    set: &'static AttributeSet,
) -> Result<(), RegistryError> {
    registry.register(name, CheckKind::Attributes(set), attribute_doc(summary, set))
}

/// Build the catalog. Registration order is the listing order.
pub fn build() -> Result<CheckRegistry, RegistryError> {
    let mut registry = CheckRegistry::new();

    registry.register(
        "layer_one_missing",
        CheckKind::predicate(layer_one_missing),
        "Checks an open NetCDF file for a missing layer at t=1\n\
         Files where a multidecadal mean was computed over data that was already a temporal \
         summary have a first time step with data and every later step missing. They are \
         found by testing whether the layer at index 1 of each grid variable is all missing.",
    )?;
    registry.register(
        "vars_missing_units",
        CheckKind::predicate(vars_missing_units),
        "Fails if any variable has no units attribute",
    )?;
    registry.register(
        "missing_time_units",
        CheckKind::predicate(missing_time_units),
        "Fails if the time variable is missing or has no units attribute",
    )?;

    let attribute_checks: [(&str, &str, &'static AttributeSet); 4] = [
        (
            "missing_cmip5_global_attrs",
            "Checks if any required CMIP5 output global attribute is missing.",
            &*CMIP5,
        ),
        (
            "missing_cf_global_attrs",
            "Checks if any CF Metadata Convention global attribute is missing.",
            &*CF,
        ),
        (
            "missing_pcic_common_mandatory_global_attrs",
            "Checks if any mandatory global attribute common to all PCIC data files is missing.",
            &*PCIC_COMMON_MANDATORY,
        ),
        (
            "missing_downscaling_specific_mandatory_global_attrs",
            "Checks if any mandatory global attribute describing downscaling is missing.\n\
             Only downscaling-specific attributes are checked; a complete downscaled output \
             file needs more.",
            &*DOWNSCALING_SPECIFIC_MANDATORY,
        ),
    ];
    for (name, summary, set) in attribute_checks {
        register_attributes(&mut registry, name, summary, set)?;
    }
    registry.register(
        "missing_downscaling_mandatory_global_attrs",
        CheckKind::all_of(&[
            "missing_pcic_common_mandatory_global_attrs",
            "missing_downscaling_specific_mandatory_global_attrs",
        ]),
        format!(
            "Checks if any mandatory global attribute for downscaled model products is missing.\n\
             This is the complete set of mandatory attributes for a downscaled output file.\n{}",
            reference(&[Table::A, Table::B])
        ),
    )?;
    register_attributes(
        &mut registry,
        "missing_downscaling_optional_global_attrs",
        "Checks if any optional global attribute for a downscaled output file is missing.",
        &DOWNSCALING_OPTIONAL,
    )?;
    registry.register(
        "missing_downscaling_any_global_attrs",
        CheckKind::all_of(&[
            "missing_downscaling_mandatory_global_attrs",
            "missing_downscaling_optional_global_attrs",
        ]),
        format!(
            "Checks if any mandatory or optional global attribute for downscaled model \
             products is missing.\n{}",
            reference(&[Table::A, Table::B])
        ),
    )?;

    let forcing_checks: [(&str, &str, &'static AttributeSet); 10] = [
        (
            "missing_model_forcing_general_mandatory_attrs",
            "Checks if any mandatory global attribute describing general model forcing is missing.",
            &*MODEL_FORCING_GENERAL_MANDATORY,
        ),
        (
            "missing_model_forcing_general_optional_attrs",
            "Checks if any optional global attribute describing general model forcing is missing.",
            &*MODEL_FORCING_GENERAL_OPTIONAL,
        ),
        (
            "missing_model_forcing_observational_mandatory_attrs",
            "Checks if any mandatory global attribute describing model forcing by \
             observational data is missing.",
            &*MODEL_FORCING_OBSERVATIONAL_MANDATORY,
        ),
        (
            "missing_model_forcing_observational_optional_attrs",
            "Checks if any optional global attribute describing model forcing by \
             observational data is missing.",
            &*MODEL_FORCING_OBSERVATIONAL_OPTIONAL,
        ),
        (
            "missing_model_forcing_downscaled_gcm_mandatory_attrs",
            "Checks if any mandatory global attribute describing model forcing by downscaled \
             GCM data is missing.",
            &*MODEL_FORCING_DOWNSCALED_GCM_MANDATORY,
        ),
        (
            "missing_model_forcing_downscaled_gcm_optional_attrs",
            "Checks if any optional global attribute describing model forcing by downscaled \
             GCM data is missing.",
            &*MODEL_FORCING_DOWNSCALED_GCM_OPTIONAL,
        ),
        (
            "missing_calibration_mandatory_attrs",
            "Checks if any mandatory global attribute describing the model calibration \
             dataset is missing.",
            &*MODEL_CALIBRATION_MANDATORY,
        ),
        (
            "missing_model_calibration_optional_attrs",
            "Checks if any optional global attribute describing the model calibration \
             dataset is missing.",
            &*MODEL_CALIBRATION_OPTIONAL,
        ),
        (
            "missing_hydromodel_specific_mandatory_global_attrs",
            "Checks if any mandatory global attribute specific to hydrological models is \
             missing.\nOnly hydromodel-specific attributes are checked; a complete hydromodel \
             output file needs more.",
            &*HYDROMODEL_SPECIFIC_MANDATORY,
        ),
        (
            "missing_hydromodel_specific_optional_global_attrs",
            "Checks if any optional global attribute specific to hydrological models is \
             missing.",
            &*HYDROMODEL_SPECIFIC_OPTIONAL,
        ),
    ];
    for (name, summary, set) in forcing_checks {
        register_attributes(&mut registry, name, summary, set)?;
    }

    registry.register(
        "missing_hydromodel_obs_mandatory_global_attrs",
        CheckKind::all_of(&[
            "missing_pcic_common_mandatory_global_attrs",
            "missing_model_forcing_general_mandatory_attrs",
            "missing_model_forcing_observational_mandatory_attrs",
            "missing_calibration_mandatory_attrs",
            "missing_hydromodel_specific_mandatory_global_attrs",
        ]),
        format!(
            "Checks if any mandatory global attribute for hydrological modelling output \
             products is missing.\nAll attributes needed for the output of a hydromodel forced \
             by observations.\n{}",
            reference(&[Table::A, Table::C1, Table::C2, Table::D, Table::E])
        ),
    )?;
    registry.register(
        "missing_hydromodel_gcm_mandatory_global_attrs",
        CheckKind::all_of(&[
            "missing_pcic_common_mandatory_global_attrs",
            "missing_model_forcing_general_mandatory_attrs",
            "missing_model_forcing_downscaled_gcm_mandatory_attrs",
            "missing_calibration_mandatory_attrs",
            "missing_hydromodel_specific_mandatory_global_attrs",
        ]),
        format!(
            "Checks if any mandatory global attribute for hydrological modelling output \
             products is missing.\nAll attributes needed for the output of a hydromodel forced \
             by downscaled GCM data.\n{}",
            reference(&[Table::A, Table::C1, Table::C3, Table::D, Table::E])
        ),
    )?;

    registry.register(
        "cant_generate_climos",
        CheckKind::predicate(cant_generate_climos),
        "Checks whether generate_climos would fail because of file metadata\n\
         Fails with the first of the properties generate_climos needs (time_var, \
         cmor_filename) that cannot be computed or is empty.",
    )?;
    registry.register(
        "has_masked_dimensions",
        CheckKind::predicate(has_masked_dimensions),
        "Checks for any dimension variables that have masked values\n\
         Fails with the name of each such dimension. A masked time variable makes \
         generate_climos omit time periods or miss the time resolution of the file.",
    )?;
    registry.register(
        "not_cf_compliant",
        CheckKind::any_of(&[
            "missing_time_units",
            "vars_missing_units",
            "missing_cf_global_attrs",
        ]),
        "Fails if the file misses time units, variable units or CF global attributes",
    )?;
    registry.register(
        "unfit_for_climos",
        CheckKind::any_of(&[
            "layer_one_missing",
            "has_masked_dimensions",
            "cant_generate_climos",
        ]),
        "Fails if the file has a missing layer, a masked dimension or cannot be processed by \
         generate_climos",
    )?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order() {
        let names: Vec<&str> = builtin().unwrap().names().collect();
        assert_eq!(names.len(), 26);
        assert_eq!(names[0], "layer_one_missing");
        assert_eq!(names[7], "missing_downscaling_mandatory_global_attrs");
        assert_eq!(names[8], "missing_downscaling_optional_global_attrs");
        assert_eq!(names[21], "missing_hydromodel_gcm_mandatory_global_attrs");
        assert_eq!(names[25], "unfit_for_climos");
    }

    #[test]
    fn test_downscaling_optional_is_attribute_check() {
        let registry = builtin().unwrap();
        let check = registry
            .lookup("missing_downscaling_optional_global_attrs")
            .unwrap();
        assert!(matches!(check.kind(), CheckKind::Attributes(_)));
        assert_eq!(registry.required_attributes(check).len(), 6);
        assert!(check.doc().ends_with("Table B"));
    }

    #[test]
    fn test_docs_reference_tables() {
        let check = builtin()
            .unwrap()
            .lookup("missing_model_forcing_downscaled_gcm_mandatory_attrs")
            .unwrap();
        assert!(check.doc().ends_with("Table C3"));
        let check = builtin().unwrap().lookup("missing_cmip5_global_attrs").unwrap();
        assert!(check.doc().contains("CMIP5_output_metadata_requirements"));
    }

    #[test]
    fn test_required_attributes_of_composites() {
        let registry = builtin().unwrap();
        let gcm = registry
            .lookup("missing_hydromodel_gcm_mandatory_global_attrs")
            .unwrap();
        let required = registry.required_attributes(gcm);
        assert_eq!(required.len(), 11 + 1 + 18 + 7 + 6);
        assert!(required.iter().any(|name| name == "forcing_driving_model_id"));

        let any = registry
            .lookup("missing_downscaling_any_global_attrs")
            .unwrap();
        assert_eq!(registry.required_attributes(any).len(), 11 + 18 + 6);
    }
}
