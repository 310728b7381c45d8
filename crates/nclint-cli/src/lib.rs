//! CLI library components for the NetCDF linter.

pub mod cli;
pub mod commands;
pub mod fixture;
pub mod logging;
pub mod report;
