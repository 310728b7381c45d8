//! Writes NetCDF fixture files for exercising the linter.

use anyhow::{Result, anyhow};
use clap::Parser;
use nclint_checks::builtin;
use nclint_cli::cli::FixtureCli;
use nclint_cli::commands::run_fixture;
use nclint_cli::logging::{LogConfig, init_logging};

fn main() {
    let cli = FixtureCli::parse();
    if let Err(error) = init_logging(&LogConfig::default()) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    if let Err(error) = execute(&cli) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn execute(cli: &FixtureCli) -> Result<()> {
    let registry = builtin().map_err(|error| anyhow!("check catalog: {error}"))?;
    run_fixture(registry, &cli.file, cli.file_type, cli.blank_layers)
}
