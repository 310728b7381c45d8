//! CLI argument definitions for the NetCDF linter and the fixture builder.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use colorchoice_clap::Color;

use crate::fixture::FileType;

#[derive(Parser)]
#[command(
    name = "nclint",
    version,
    about = "NetCDF linter - check climate data files for metadata and structure problems",
    long_about = "Check NetCDF files against metadata and structure rules.\n\n\
                  Each file is checked with the selected checks. Failing files are printed \
                  and the exit status is 1 when any file fails or cannot be read."
)]
pub struct Cli {
    /// Files to check.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Comma separated list of check names to be performed.
    #[arg(
        short = 'c',
        long = "checks",
        env = "NCLINT_CHECKS",
        default_value = "layer_one_missing"
    )]
    pub checks: String,

    /// List the names of all available checks and exit.
    #[arg(short = 'l', long = "list_checks", visible_alias = "list-checks")]
    pub list_checks: bool,

    /// Provide more detail about available checks and check failures.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Report format on stdout.
    #[arg(long = "output-format", value_enum, default_value = "text")]
    pub output_format: OutputFormatArg,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides RUST_LOG).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Parser)]
#[command(
    name = "nclint-fixture",
    version,
    about = "Write a NetCDF file carrying every mandatory global attribute of a file type"
)]
pub struct FixtureCli {
    /// Output file name.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output file type.
    #[arg(short = 't', long = "type", value_enum)]
    pub file_type: FileType,

    /// Mask every layer after the first.
    #[arg(long = "blank-layers")]
    pub blank_layers: bool,
}

/// Report format choices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    #[default]
    Text,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
