//! Check runner.

use nclint_model::{Dataset, DatasetError};
use serde::Serialize;
use tracing::{debug, info_span};

use crate::outcome::Outcome;
use crate::registry::{Check, CheckRegistry};

/// Stop policy for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Stop at the first failing check.
    #[default]
    StopOnFirstFailure,
    /// Evaluate every check and keep every outcome.
    RunAll,
}

/// Outcome of one check in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub check: String,
    pub outcome: Outcome,
}

/// Outcomes of the checks evaluated against one file, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub results: Vec<CheckResult>,
}

impl RunResult {
    /// True when no evaluated check failed.
    pub fn passed(&self) -> bool {
        self.results.iter().all(|result| result.outcome.passed())
    }

    pub fn failed(&self) -> bool {
        !self.passed()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|result| result.outcome.failed())
    }
}

/// Evaluate `checks`, in order, against `dataset`.
///
/// A read error raised by a check aborts the run; the caller reports it
/// against the file.
pub fn run(
    registry: &CheckRegistry,
    dataset: &dyn Dataset,
    checks: &[&Check],
    mode: RunMode,
) -> Result<RunResult, DatasetError> {
    let mut result = RunResult::default();
    for check in checks {
        let _span = info_span!("check", name = check.name()).entered();
        let outcome = registry.evaluate(check, dataset)?;
        debug!(passed = outcome.passed(), %outcome, "check evaluated");
        let failed = outcome.failed();
        result.results.push(CheckResult {
            check: check.name().to_string(),
            outcome,
        });
        if failed && mode == RunMode::StopOnFirstFailure {
            break;
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use nclint_model::MemoryDataset;

    use super::*;
    use crate::catalog::builtin;

    #[test]
    fn test_stop_on_first_failure() {
        let registry = builtin().unwrap();
        let checks = registry
            .resolve("missing_time_units,missing_cf_global_attrs")
            .unwrap();
        let ds = MemoryDataset::new();

        let result = run(registry, &ds, &checks, RunMode::StopOnFirstFailure).unwrap();
        assert_eq!(result.results.len(), 1);
        assert!(result.failed());

        let result = run(registry, &ds, &checks, RunMode::RunAll).unwrap();
        assert_eq!(result.results.len(), 2);
        assert_eq!(result.failures().count(), 2);
    }

    #[test]
    fn test_passing_run() {
        let registry = builtin().unwrap();
        let checks = registry.resolve("layer_one_missing").unwrap();
        let result = run(registry, &MemoryDataset::new(), &checks, RunMode::RunAll).unwrap();
        assert!(result.passed());
    }
}
