//! Emit a generated test suite as Rust source.
//!
//! The emitted file is a plain module meant to be included from a test crate. It contains:
//! - a `SUITE` constant ([`crate::runtime::SuiteDefinition`]) with the scan settings and the registry
//!   entries frozen at generation time,
//! - `test_all_files_present_in_<suite>`, which re-scans the test data and fails on any discrepancy,
//! - one `#[test]` per registry entry, forwarding its path to the configured backend.
//!
//! ## Notes
//!
//! - Emission builds a `syn` tree with `quote!` and formats it via `prettyplease`.
//! - Emission is codegen-only: it does not read/write files.
//! - `SUITE.entries` is the persisted registry; [`crate::manifest`] reads it back.
//!
//! ## See also
//! - [`program`]: file-level emission and formatting
//! - [`crate::runtime`]: what the emitted code calls at test time

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod errors;
mod program;

pub use errors::EmitError;
pub use program::CHECK_FN_PREFIX;

use std::path::Path;

use testsync_core::{Registry, ScanSpec, StalePolicy};

use crate::config::SuiteConfig;

/// Everything needed to emit one suite.
pub struct SuiteEmitter<'a> {
    /// Suite name as configured; used in the header.
    name: &'a str,
    /// Identifier form of the name; used in the check function name.
    ident: String,
    /// `SUITE.root` as written: relative to `CARGO_MANIFEST_DIR` unless absolute.
    root: String,
    spec: &'a ScanSpec,
    stale: StalePolicy,
    backend: &'a str,
    registry: &'a Registry,
}

impl<'a> SuiteEmitter<'a> {
    pub fn new(suite: &'a SuiteConfig, spec: &'a ScanSpec, registry: &'a Registry) -> Self {
        Self {
            name: &suite.name,
            ident: suite.ident(),
            root: portable_root(&suite.root),
            spec,
            stale: suite.stale,
            backend: &suite.backend,
            registry,
        }
    }

    /// Name of the completeness-check test function.
    pub fn check_fn_name(&self) -> String {
        format!("{}{}", CHECK_FN_PREFIX, self.ident)
    }
}

fn portable_root(root: &Path) -> String {
    let raw = root.to_string_lossy();
    if root.is_absolute() {
        raw.into_owned()
    } else {
        raw.replace('\\', "/").trim_end_matches('/').to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn relative_roots_use_forward_slashes() {
        assert_eq!(portable_root(Path::new(r"testData\codegen\")), "testData/codegen");
        assert_eq!(portable_root(Path::new("testData/box")), "testData/box");
    }
}
