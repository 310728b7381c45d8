//! Command-line entry point: argument parsing through exit code.

use clap::Parser;
use nclint_cli::cli::Cli;
use nclint_cli::commands::execute;
use nclint_cli::fixture::{FileType, build_fixture};
use nclint_checks::builtin;
use nclint_netcdf::write_netcdf;
use tempfile::TempDir;

fn run(args: &[&str]) -> (i32, String, String) {
    let cli = Cli::try_parse_from(args).unwrap();
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let code = execute(&cli, &mut out, &mut err);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn test_unknown_check_message_and_exit_code() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("never-opened.nc");
    let path = path.to_str().unwrap();

    let (code, out, err) = run(&["nclint", "-c", "layer_one_missing,bogus", path]);
    assert_eq!(code, 1);
    assert!(out.is_empty());
    assert_eq!(err, "NetCDF check 'bogus' does not exist\n");
}

#[test]
fn test_list_checks_exits_zero() {
    let (code, out, err) = run(&["nclint", "-l"]);
    assert_eq!(code, 0);
    assert!(out.starts_with("Available checks: layer_one_missing,"));
    assert!(err.is_empty());
}

#[test]
fn test_failing_and_unreadable_files() {
    let dir = TempDir::new().unwrap();
    let blank = dir.path().join("blank.nc");
    let dataset = build_fixture(builtin().unwrap(), FileType::Downscaled, true).unwrap();
    write_netcdf(&blank, &dataset).unwrap();
    let missing = dir.path().join("missing.nc");

    let (code, out, err) = run(&[
        "nclint",
        "-c",
        "layer_one_missing",
        blank.to_str().unwrap(),
        missing.to_str().unwrap(),
    ]);
    assert_eq!(code, 1);
    assert_eq!(out, format!("{}\n", blank.display()));
    assert_eq!(
        err,
        format!(
            "error: {}: file not found: {}\n",
            missing.display(),
            missing.display()
        )
    );
}
