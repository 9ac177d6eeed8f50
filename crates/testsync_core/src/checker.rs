//! Completeness checking: does the generated suite still cover exactly the files on disk?
//!
//! The check re-scans the test-data root with the same `(root, pattern, exclusions)` used at
//! generation time and diffs the result against the [`Registry`] key set. All discrepancies are
//! collected before failing, so one regeneration fixes everything that is reported.
//!
//! ## Notes
//!
//! - Registry keys are filtered through the same exclusion set as the scan. Excluding a path removes it
//!   from both directions of the diff, whether or not the registry mentions it.
//! - Files on disk without a unit ("orphans") always fail the check. Units whose file disappeared
//!   ("stale entries") fail under [`StalePolicy::Fail`] and are only reported under [`StalePolicy::Ignore`].
//! - Nothing is mutated: no registry edits, no file creation or deletion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CheckError;
use crate::path::RelPath;
use crate::registry::Registry;
use crate::scanner::{FileSource, ScanResult, ScanSpec, WalkDirSource, scan_with};

/// What to do with registry entries whose test-data file no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StalePolicy {
    /// Fail the check, like orphans.
    #[default]
    Fail,
    /// Report them but let the check pass. The affected units fail on their own when run.
    Ignore,
}

/// Set difference between a live scan and a registry, in both directions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    /// Matching files with no generated unit.
    pub orphans: Vec<RelPath>,
    /// Generated units whose file is gone.
    pub stale: Vec<RelPath>,
}

impl Discrepancy {
    /// Compare a scan with a registry after applying `spec`'s exclusions to the registry keys.
    pub fn between(live: &ScanResult, registry: &Registry, spec: &ScanSpec) -> Self {
        let orphans = live
            .iter()
            .filter(|path| !registry.contains(path))
            .cloned()
            .collect();
        let stale = registry
            .keys()
            .filter(|path| !spec.exclusions.excludes(path))
            .filter(|path| !live.contains(path))
            .cloned()
            .collect();
        Self { orphans, stale }
    }

    pub fn is_empty(&self) -> bool {
        self.orphans.is_empty() && self.stale.is_empty()
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.orphans.is_empty() {
            writeln!(f, "{} test-data file(s) without a generated test:", self.orphans.len())?;
            for path in &self.orphans {
                writeln!(f, "  - {}", path)?;
            }
        }
        if !self.stale.is_empty() {
            writeln!(f, "{} generated test(s) without a test-data file:", self.stale.len())?;
            for path in &self.stale {
                writeln!(f, "  - {}", path)?;
            }
        }
        Ok(())
    }
}

/// Summary of a passing check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Number of test-data files found and covered.
    pub covered: usize,
    /// Stale entries tolerated under [`StalePolicy::Ignore`].
    pub ignored_stale: Vec<RelPath>,
}

/// Verify that `registry` covers exactly the files `spec` selects on disk.
pub fn verify_complete(spec: &ScanSpec, registry: &Registry, policy: StalePolicy) -> Result<CheckReport, CheckError> {
    verify_complete_with(&WalkDirSource, spec, registry, policy)
}

/// [`verify_complete`] over an explicit [`FileSource`].
#[tracing::instrument(skip_all, fields(root = %spec.root.display(), registered = registry.len(), policy = ?policy))]
pub fn verify_complete_with(
    source: &dyn FileSource,
    spec: &ScanSpec,
    registry: &Registry,
    policy: StalePolicy,
) -> Result<CheckReport, CheckError> {
    let live = scan_with(source, spec)?;
    let mut discrepancy = Discrepancy::between(&live, registry, spec);

    let ignored_stale = match policy {
        StalePolicy::Fail => Vec::new(),
        StalePolicy::Ignore => std::mem::take(&mut discrepancy.stale),
    };

    if !discrepancy.orphans.is_empty() {
        tracing::debug!(orphans = discrepancy.orphans.len(), stale = discrepancy.stale.len(), "suite incomplete");
        return Err(CheckError::OrphanFiles(discrepancy));
    }
    if !discrepancy.stale.is_empty() {
        tracing::debug!(stale = discrepancy.stale.len(), "suite has stale entries");
        return Err(CheckError::StaleEntries(discrepancy));
    }
    if !ignored_stale.is_empty() {
        tracing::warn!(?ignored_stale, "ignoring generated tests without test-data files");
    }

    Ok(CheckReport {
        covered: live.len(),
        ignored_stale,
    })
}
