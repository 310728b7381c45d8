//! End-to-end lint runs against NetCDF files written to a temp directory.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use nclint_checks::{RegistryError, builtin};
use nclint_cli::cli::OutputFormatArg;
use nclint_cli::commands::{LintOptions, LintSummary, run_lint, run_list};
use nclint_cli::fixture::{FileType, build_fixture};
use nclint_model::MemoryDataset;
use nclint_netcdf::{NcFile, write_netcdf};
use tempfile::TempDir;

const GCM_CHECKS: &str = "missing_hydromodel_gcm_mandatory_global_attrs,layer_one_missing";

fn options(checks: &str, verbose: bool) -> LintOptions {
    LintOptions {
        checks: checks.to_string(),
        verbose,
        format: OutputFormatArg::Text,
    }
}

fn write_fixture(dir: &TempDir, name: &str, dataset: &MemoryDataset) -> PathBuf {
    let path = dir.path().join(name);
    write_netcdf(&path, dataset).unwrap();
    path
}

fn lint(files: &[PathBuf], options: &LintOptions) -> (LintSummary, String, String) {
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let summary = run_lint(
        builtin().unwrap(),
        files,
        options,
        NcFile::open,
        &mut out,
        &mut err,
    )
    .unwrap();
    (
        summary,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn test_unknown_check_opens_no_file() {
    let opened = Cell::new(0);
    let files = [PathBuf::from("a.nc"), PathBuf::from("b.nc")];
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let error = run_lint(
        builtin().unwrap(),
        &files,
        &options("layer_one_missing,no_such_check", false),
        |_: &Path| {
            opened.set(opened.get() + 1);
            Ok::<_, String>(MemoryDataset::new())
        },
        &mut out,
        &mut err,
    )
    .unwrap_err();

    assert_eq!(opened.get(), 0);
    let registry_error = error.downcast_ref::<RegistryError>().unwrap();
    assert_eq!(
        registry_error.to_string(),
        "NetCDF check 'no_such_check' does not exist"
    );
    assert!(out.is_empty());
}

#[test]
fn test_complete_hydromodel_gcm_file_passes() {
    let dir = TempDir::new().unwrap();
    let dataset = build_fixture(builtin().unwrap(), FileType::HydromodelGcm, false).unwrap();
    let path = write_fixture(&dir, "gcm.nc", &dataset);

    for verbose in [false, true] {
        let (summary, out, err) = lint(std::slice::from_ref(&path), &options(GCM_CHECKS, verbose));
        assert_eq!(summary.exit_code(), 0, "stdout: {out}, stderr: {err}");
        assert!(out.is_empty());
        assert!(err.is_empty());
    }
}

#[test]
fn test_missing_hydromodel_type_is_named() {
    let dir = TempDir::new().unwrap();
    let mut dataset = build_fixture(builtin().unwrap(), FileType::HydromodelGcm, false).unwrap();
    dataset.remove_attribute("hydromodel_type");
    let path = write_fixture(&dir, "gcm.nc", &dataset);

    let (summary, out, _) = lint(std::slice::from_ref(&path), &options(GCM_CHECKS, true));
    assert_eq!(summary.exit_code(), 1);
    assert_eq!(
        out,
        format!(
            "{} FAILED missing_hydromodel_gcm_mandatory_global_attrs: hydromodel_type (Table E)\n",
            path.display()
        )
    );

    let (_, out, _) = lint(std::slice::from_ref(&path), &options(GCM_CHECKS, false));
    assert_eq!(out, format!("{}\n", path.display()));
}

#[test]
fn test_blank_layers_fail_layer_check() {
    let dir = TempDir::new().unwrap();
    let dataset = build_fixture(builtin().unwrap(), FileType::Downscaled, true).unwrap();
    let path = write_fixture(&dir, "blank.nc", &dataset);

    let (summary, out, _) = lint(
        std::slice::from_ref(&path),
        &options("layer_one_missing,has_masked_dimensions", true),
    );
    assert_eq!(summary.failed, 1);
    assert_eq!(
        out,
        format!("{} FAILED layer_one_missing: true\n", path.display())
    );
}

#[test]
fn test_unreadable_file_counts_as_failure() {
    let dir = TempDir::new().unwrap();
    let good = write_fixture(
        &dir,
        "good.nc",
        &build_fixture(builtin().unwrap(), FileType::HydromodelObs, false).unwrap(),
    );
    let bogus = dir.path().join("bogus.nc");
    std::fs::write(&bogus, b"not a netcdf file").unwrap();
    let missing = dir.path().join("missing.nc");

    let (summary, out, err) = lint(
        &[bogus.clone(), good, missing.clone()],
        &options("missing_hydromodel_obs_mandatory_global_attrs", false),
    );
    assert_eq!(summary.files, 3);
    assert_eq!(summary.unreadable, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.exit_code(), 1);
    assert!(out.is_empty());
    let lines: Vec<&str> = err.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(&format!("error: {}: ", bogus.display())));
    assert!(lines[1].starts_with(&format!("error: {}: ", missing.display())));
}

#[test]
fn test_json_output() {
    let dir = TempDir::new().unwrap();
    let mut dataset = build_fixture(builtin().unwrap(), FileType::HydromodelGcm, false).unwrap();
    dataset.remove_attribute("domain");
    let path = write_fixture(&dir, "gcm.nc", &dataset);

    let mut json = options(GCM_CHECKS, true);
    json.format = OutputFormatArg::Json;
    let (_, out, _) = lint(std::slice::from_ref(&path), &json);
    let record: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
    assert_eq!(
        record["check"],
        "missing_hydromodel_gcm_mandatory_global_attrs"
    );
    assert_eq!(record["outcome"]["detail"]["value"][0]["name"], "domain");
    assert_eq!(record["outcome"]["detail"]["value"][0]["table"], "E");
}

#[test]
fn test_list_checks() {
    let mut out = Vec::new();
    run_list(builtin().unwrap(), false, &mut out).unwrap();
    let listing = String::from_utf8(out).unwrap();
    insta::assert_snapshot!(listing.trim_end(), @"Available checks: layer_one_missing,vars_missing_units,missing_time_units,missing_cmip5_global_attrs,missing_cf_global_attrs,missing_pcic_common_mandatory_global_attrs,missing_downscaling_specific_mandatory_global_attrs,missing_downscaling_mandatory_global_attrs,missing_downscaling_optional_global_attrs,missing_downscaling_any_global_attrs,missing_model_forcing_general_mandatory_attrs,missing_model_forcing_general_optional_attrs,missing_model_forcing_observational_mandatory_attrs,missing_model_forcing_observational_optional_attrs,missing_model_forcing_downscaled_gcm_mandatory_attrs,missing_model_forcing_downscaled_gcm_optional_attrs,missing_calibration_mandatory_attrs,missing_model_calibration_optional_attrs,missing_hydromodel_specific_mandatory_global_attrs,missing_hydromodel_specific_optional_global_attrs,missing_hydromodel_obs_mandatory_global_attrs,missing_hydromodel_gcm_mandatory_global_attrs,cant_generate_climos,has_masked_dimensions,not_cf_compliant,unfit_for_climos");
}

#[test]
fn test_verbose_list_checks() {
    let mut out = Vec::new();
    run_list(builtin().unwrap(), true, &mut out).unwrap();
    let listing = String::from_utf8(out).unwrap();
    assert!(listing.contains("Check"));
    assert!(listing.contains("unfit_for_climos"));
    assert!(listing.contains("Reference:"));
}
