use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use nclint_checks::{CheckRegistry, RegistryError, RunMode, builtin, run};
use nclint_model::Dataset;
use nclint_netcdf::NcFile;
use tracing::{debug, info, info_span};

use crate::cli::{Cli, OutputFormatArg};
use crate::fixture::{FileType, build_fixture};
use crate::report::{Reporter, write_check_list};

/// What to check and how to report it.
#[derive(Debug, Clone)]
pub struct LintOptions {
    /// Comma separated check names.
    pub checks: String,
    pub verbose: bool,
    pub format: OutputFormatArg,
}

/// Per-batch counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LintSummary {
    pub files: usize,
    pub failed: usize,
    pub unreadable: usize,
}

impl LintSummary {
    /// 0 when every file was read and passed every check, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.failed + self.unreadable > 0 { 1 } else { 0 }
    }
}

/// Run the linter as invoked from the command line and return the exit
/// code. Every error is reported on `err`; an unknown check name prints
/// only the registry message.
pub fn execute(cli: &Cli, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    match dispatch(cli, out, err) {
        Ok(code) => code,
        Err(error) => {
            let written = match error.downcast_ref::<RegistryError>() {
                Some(registry_error) => writeln!(err, "{registry_error}"),
                None => writeln!(err, "error: {error:#}"),
            };
            if written.is_err() {
                debug!(%error, "cannot report error");
            }
            1
        }
    }
}

fn dispatch(cli: &Cli, out: &mut dyn Write, err: &mut dyn Write) -> Result<i32> {
    let registry = builtin().map_err(|error| anyhow!("check catalog: {error}"))?;
    if cli.list_checks {
        run_list(registry, cli.verbose, out)?;
        return Ok(0);
    }
    let options = LintOptions {
        checks: cli.checks.clone(),
        verbose: cli.verbose,
        format: cli.output_format,
    };
    let summary = run_lint(registry, &cli.files, &options, NcFile::open, out, err)?;
    Ok(summary.exit_code())
}

pub fn run_list(registry: &CheckRegistry, verbose: bool, out: &mut dyn Write) -> Result<()> {
    write_check_list(registry, verbose, out).context("write check list")
}

/// Check every file in `files` with the checks named in `options`.
///
/// Check names are resolved before `open` is ever called, so an unknown
/// name fails the batch without touching a file. A file that cannot be
/// opened or read is reported on `err` and counted, and the batch moves on.
/// Each dataset is dropped, closing its file, before the next is opened.
pub fn run_lint<D, E, F>(
    registry: &CheckRegistry,
    files: &[PathBuf],
    options: &LintOptions,
    mut open: F,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<LintSummary>
where
    D: Dataset,
    E: Display,
    F: FnMut(&Path) -> Result<D, E>,
{
    let checks = registry.resolve(&options.checks)?;
    let mode = if options.verbose {
        RunMode::RunAll
    } else {
        RunMode::StopOnFirstFailure
    };
    info!(checks = checks.len(), files = files.len(), ?mode, "linting");

    let mut reporter = Reporter::new(out, options.format, options.verbose);
    let mut summary = LintSummary::default();
    for path in files {
        let _span = info_span!("file", path = %path.display()).entered();
        summary.files += 1;

        let dataset = match open(path) {
            Ok(dataset) => dataset,
            Err(open_error) => {
                debug!(error = %open_error, "cannot open file");
                writeln!(err, "error: {}: {open_error}", path.display())?;
                summary.unreadable += 1;
                continue;
            }
        };
        match run(registry, &dataset, &checks, mode) {
            Ok(result) if result.failed() => {
                debug!(failures = result.failures().count(), "file failed");
                summary.failed += 1;
                reporter
                    .file_failed(path, &result)
                    .context("write lint report")?;
            }
            Ok(_) => debug!("file passed"),
            Err(read_error) => {
                debug!(error = %read_error, "cannot read file");
                writeln!(err, "error: {}: {read_error}", path.display())?;
                summary.unreadable += 1;
            }
        }
    }
    reporter.flush().context("flush lint report")?;
    Ok(summary)
}

/// Write a fixture file of `file_type` to `path`.
pub fn run_fixture(
    registry: &CheckRegistry,
    path: &Path,
    file_type: FileType,
    blank_layers: bool,
) -> Result<()> {
    let dataset = build_fixture(registry, file_type, blank_layers)?;
    nclint_netcdf::write_netcdf(path, &dataset)
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), ?file_type, "fixture written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use nclint_checks::builtin;
    use nclint_model::MemoryDataset;

    use super::*;

    fn options(checks: &str, verbose: bool) -> LintOptions {
        LintOptions {
            checks: checks.to_string(),
            verbose,
            format: OutputFormatArg::Text,
        }
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(LintSummary::default().exit_code(), 0);
        let summary = LintSummary {
            files: 2,
            unreadable: 1,
            ..LintSummary::default()
        };
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_open_error_continues_batch() {
        let opened = Cell::new(0);
        let files = [PathBuf::from("missing.nc"), PathBuf::from("good.nc")];
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let summary = run_lint(
            builtin().unwrap(),
            &files,
            &options("layer_one_missing", false),
            |path| {
                opened.set(opened.get() + 1);
                if path == Path::new("missing.nc") {
                    Err("file not found")
                } else {
                    Ok(MemoryDataset::new())
                }
            },
            &mut out,
            &mut err,
        )
        .unwrap();

        assert_eq!(opened.get(), 2);
        assert_eq!(summary.unreadable, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.exit_code(), 1);
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "error: missing.nc: file not found\n"
        );
    }

    #[test]
    fn test_terse_mode_prints_each_failing_file_once() {
        let files = [PathBuf::from("a.nc")];
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let summary = run_lint(
            builtin().unwrap(),
            &files,
            &options("missing_time_units,missing_cf_global_attrs", false),
            |_| Ok::<_, String>(MemoryDataset::new()),
            &mut out,
            &mut err,
        )
        .unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "a.nc\n");
    }
}
