//! Lint report and check listing output.

use std::io::{self, Write};
use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, ColumnConstraint, ContentArrangement, Table, Width};
use nclint_checks::{CheckRegistry, Outcome, RunResult};
use serde::Serialize;

use crate::cli::OutputFormatArg;

/// One failing check of one file.
#[derive(Debug, Serialize)]
struct CheckFailure<'a> {
    file: String,
    check: &'a str,
    outcome: &'a Outcome,
}

/// One failing file.
#[derive(Debug, Serialize)]
struct FileFailure<'a> {
    file: String,
    failed_checks: Vec<&'a str>,
}

/// Writes failing files to the report stream.
///
/// Text output prints the bare path per failing file, or
/// `<file> FAILED <check>: <detail>` per failing check when verbose. JSON
/// output prints one object per line with the same granularity.
pub struct Reporter<'w> {
    out: &'w mut dyn Write,
    format: OutputFormatArg,
    verbose: bool,
}

impl<'w> Reporter<'w> {
    pub fn new(out: &'w mut dyn Write, format: OutputFormatArg, verbose: bool) -> Self {
        Self {
            out,
            format,
            verbose,
        }
    }

    pub fn file_failed(&mut self, path: &Path, result: &RunResult) -> io::Result<()> {
        let file = path.display().to_string();
        match (self.format, self.verbose) {
            (OutputFormatArg::Text, true) => {
                for failure in result.failures() {
                    writeln!(
                        self.out,
                        "{file} FAILED {}: {}",
                        failure.check, failure.outcome
                    )?;
                }
            }
            (OutputFormatArg::Text, false) => writeln!(self.out, "{file}")?,
            (OutputFormatArg::Json, true) => {
                for failure in result.failures() {
                    let record = CheckFailure {
                        file: file.clone(),
                        check: &failure.check,
                        outcome: &failure.outcome,
                    };
                    self.write_json(&record)?;
                }
            }
            (OutputFormatArg::Json, false) => {
                let record = FileFailure {
                    failed_checks: result
                        .failures()
                        .map(|failure| failure.check.as_str())
                        .collect(),
                    file,
                };
                self.write_json(&record)?;
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn write_json<T: Serialize>(&mut self, record: &T) -> io::Result<()> {
        serde_json::to_writer(&mut *self.out, record)?;
        writeln!(self.out)
    }
}

/// Print the check catalog: names on one line, or a table of names and
/// descriptions when verbose.
pub fn write_check_list(
    registry: &CheckRegistry,
    verbose: bool,
    out: &mut dyn Write,
) -> io::Result<()> {
    if !verbose {
        let names: Vec<&str> = registry.names().collect();
        return writeln!(out, "Available checks: {}", names.join(","));
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Check"), header_cell("Description")]);
    apply_table_style(&mut table);
    for (name, doc) in registry.list_with_docs() {
        table.add_row(vec![Cell::new(name), Cell::new(doc)]);
    }
    writeln!(out, "{table}")
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120)
        .set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(70)),
        ]);
}
