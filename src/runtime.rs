//! Support code called by generated suites at test time.
//!
//! A generated file declares one [`SuiteDefinition`] constant and calls back into this module from
//! every `#[test]`:
//!
//! ```rust,ignore
//! pub const SUITE: testsync::runtime::SuiteDefinition = testsync::runtime::SuiteDefinition { .. };
//!
//! #[test]
//! fn test_all_files_present_in_test_runner() {
//!     testsync::runtime::assert_all_files_present(&SUITE);
//! }
//!
//! #[test]
//! fn test_global_initializers() {
//!     testsync::runtime::run_test(&SUITE, "globalInitializers.kt", &super::Backend);
//! }
//! ```
//!
//! Both entry points panic with a readable message on failure, which is how the host test harness
//! learns about it.

use std::path::{Path, PathBuf};

use testsync_core::{
    CheckError, CheckReport, NamePattern, Registry, RelPath, ScanError, ScanSpec, verify_complete,
};

pub use testsync_core::StalePolicy;

use crate::exec::{ExecutionBackend, Outcome};

/// A suite as frozen into generated code. All fields are `'static` so it can be a `const`.
#[derive(Debug, Clone, Copy)]
pub struct SuiteDefinition {
    pub name: &'static str,
    /// `CARGO_MANIFEST_DIR` of the crate compiling the generated file.
    pub manifest_dir: &'static str,
    /// Test-data root, relative to `manifest_dir` unless absolute.
    pub root: &'static str,
    pub pattern: &'static str,
    pub exclude: &'static [&'static str],
    pub exclude_pattern: Option<&'static str>,
    pub recursive: bool,
    pub stale: StalePolicy,
    /// `(path, unit id)` pairs, sorted by path.
    pub entries: &'static [(&'static str, &'static str)],
}

impl SuiteDefinition {
    pub fn root_dir(&self) -> PathBuf {
        Path::new(self.manifest_dir).join(self.root)
    }

    pub fn scan_spec(&self) -> Result<ScanSpec, ScanError> {
        let mut spec = ScanSpec::parse(self.root_dir(), self.pattern, self.exclude.iter().copied())?;
        if let Some(raw) = self.exclude_pattern {
            let exclusions = std::mem::take(&mut spec.exclusions).with_pattern(NamePattern::new(raw)?);
            spec = spec.with_exclusions(exclusions);
        }
        Ok(spec.with_recursive(self.recursive))
    }

    pub fn registry(&self) -> Result<Registry, testsync_core::RegistryError> {
        Registry::from_pairs(self.entries.iter().copied())
    }

    /// Absolute location of a registered path.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, testsync_core::PathError> {
        Ok(RelPath::parse(path)?.to_path(&self.root_dir()))
    }

    /// Re-scan the test-data root and compare it against `entries`.
    pub fn verify(&self) -> Result<CheckReport, CheckError> {
        let spec = self.scan_spec()?;
        let registry = self.registry()?;
        verify_complete(&spec, &registry, self.stale)
    }
}

/// Fail the current test unless the suite covers exactly the files on disk.
///
/// The panic message lists every orphan and every stale entry.
pub fn assert_all_files_present(suite: &SuiteDefinition) {
    match suite.verify() {
        Ok(report) => {
            tracing::debug!(suite = suite.name, covered = report.covered, "suite complete");
        }
        Err(e) => panic!("suite '{}' is out of sync with {}:\n{}", suite.name, suite.root_dir().display(), e),
    }
}

/// Run one registered test-data file through `backend`.
///
/// Panics with the backend's message, verbatim, unless the outcome is a pass.
pub fn run_test(suite: &SuiteDefinition, path: &str, backend: &dyn ExecutionBackend) {
    let file = match suite.resolve(path) {
        Ok(file) => file,
        Err(e) => panic!("suite '{}': bad registry path '{}': {}", suite.name, path, e),
    };
    match backend.execute(&file) {
        Outcome::Passed => {}
        Outcome::Failed(message) | Outcome::Error(message) => {
            tracing::debug!(suite = suite.name, path, "unit did not pass");
            panic!("{}", message)
        }
    }
}
