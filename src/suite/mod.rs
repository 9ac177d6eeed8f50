//! In-process test suite: one [`TestUnit`] per registry entry.
//!
//! This is the rendition `testsync run` uses. Each unit hands its own file to the backend and the
//! outcome is recorded against that unit only. A failing or erroring unit never stops the run.
//!
//! ## See also
//! - [`report`]: reporting hooks for a run
//! - [`crate::runtime`]: the generated-source rendition of the same units

pub mod report;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;

use testsync_core::{Registry, RelPath, TestUnitId};

use crate::exec::{ExecutionBackend, Outcome};

pub use report::{ConsoleReporter, TestReporter};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuiteError {
    #[error("suite '{suite}' has no unit named '{unit}'")]
    UnknownUnit { suite: String, unit: String },
}

/// One generated unit: a name and the test-data file it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestUnit {
    pub id: TestUnitId,
    pub source_path: RelPath,
}

impl TestUnit {
    /// Run this unit's file through `backend`, resolving it under `root`.
    ///
    /// A panicking backend is reported as [`Outcome::Error`] for this unit only.
    pub fn run(&self, root: &Path, backend: &dyn ExecutionBackend) -> Outcome {
        let path = self.source_path.to_path(root);
        match panic::catch_unwind(AssertUnwindSafe(|| backend.execute(&path))) {
            Ok(outcome) => outcome,
            Err(payload) => Outcome::Error(format!("backend panicked: {}", panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

/// Counts for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub duration: Duration,
    /// Every non-passing unit with its outcome, in run order.
    pub failures: Vec<(TestUnitId, Outcome)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

/// A named set of units over one test-data root.
#[derive(Debug, Clone)]
pub struct Suite {
    pub name: String,
    pub root: PathBuf,
    registry: Registry,
}

impl Suite {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, registry: Registry) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            registry,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// All units, ordered by source path.
    pub fn units(&self) -> Vec<TestUnit> {
        self.registry
            .iter()
            .map(|(path, id)| TestUnit {
                id: id.clone(),
                source_path: path.clone(),
            })
            .collect()
    }

    pub fn unit(&self, id: &str) -> Option<TestUnit> {
        self.registry
            .iter()
            .find(|(_, unit)| unit.as_str() == id)
            .map(|(path, unit)| TestUnit {
                id: unit.clone(),
                source_path: path.clone(),
            })
    }

    /// Run a single unit by id.
    pub fn run_unit(&self, id: &str, backend: &dyn ExecutionBackend) -> Result<Outcome, SuiteError> {
        let unit = self.unit(id).ok_or_else(|| SuiteError::UnknownUnit {
            suite: self.name.clone(),
            unit: id.to_string(),
        })?;
        Ok(unit.run(&self.root, backend))
    }

    /// Run every unit whose id contains `filter` (all of them without a filter).
    #[tracing::instrument(skip_all, fields(suite = %self.name, filter = ?filter))]
    pub fn run_all(
        &self,
        backend: &dyn ExecutionBackend,
        reporter: &mut dyn TestReporter,
        filter: Option<&str>,
    ) -> RunSummary {
        let start = Instant::now();
        let units: Vec<TestUnit> = self
            .units()
            .into_iter()
            .filter(|unit| filter.is_none_or(|f| unit.id.as_str().contains(f)))
            .collect();

        reporter.on_collection_complete(&self.name, units.len());

        let mut summary = RunSummary {
            total: units.len(),
            ..RunSummary::default()
        };
        for unit in &units {
            reporter.on_test_start(unit);
            let unit_start = Instant::now();
            let outcome = unit.run(&self.root, backend);
            reporter.on_test_complete(unit, &outcome, unit_start.elapsed());

            match &outcome {
                Outcome::Passed => summary.passed += 1,
                Outcome::Failed(_) => summary.failed += 1,
                Outcome::Error(_) => summary.errors += 1,
            }
            if !outcome.is_passed() {
                summary.failures.push((unit.id.clone(), outcome));
            }
        }
        summary.duration = start.elapsed();

        tracing::debug!(passed = summary.passed, failed = summary.failed, errors = summary.errors, "run finished");
        reporter.on_run_complete(&summary);
        summary
    }
}
