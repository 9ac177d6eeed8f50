//! Discover test-data files and check that a generated test suite still covers all of them.
//!
//! This crate is the dependency-light half of `testsync`. It owns:
//! - [`path::RelPath`], the single normalization used for every path that is compared,
//! - [`scanner`], which lists the matching, non-excluded files under a test-data root,
//! - [`registry::Registry`], the path → generated-unit mapping produced at generation time,
//! - [`checker`], which compares a live scan against a registry and reports every discrepancy at once.
//!
//! ## Notes
//!
//! - No code generation, no process spawning, no CLI: those live in the `testsync` crate.
//! - Scans are never cached. Every verification walks the file system again.
//!
//! ## Examples
//! ```rust,no_run
//! use testsync_core::checker::{StalePolicy, verify_complete};
//! use testsync_core::registry::Registry;
//! use testsync_core::scanner::ScanSpec;
//!
//! let spec = ScanSpec::parse("testData/codegen", r"^(.+)\.kt$", ["excluded.kt"]).unwrap();
//! let registry = Registry::from_scan(&testsync_core::scanner::scan(&spec).unwrap(), &spec.pattern).unwrap();
//! verify_complete(&spec, &registry, StalePolicy::Fail).unwrap();
//! ```

pub mod checker;
pub mod errors;
pub mod exclusions;
pub mod naming;
pub mod path;
pub mod pattern;
pub mod registry;
pub mod scanner;

pub use checker::{CheckReport, Discrepancy, StalePolicy, verify_complete};
pub use errors::{CheckError, PathError, PatternError, RegistryError, ScanError};
pub use exclusions::ExclusionSet;
pub use path::RelPath;
pub use pattern::{DEFAULT_PATTERN, NamePattern};
pub use registry::{Registry, TestUnitId};
pub use scanner::{FileSource, ScanResult, ScanSpec, WalkDirSource, scan};
