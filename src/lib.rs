#![forbid(unsafe_code)]
//! testsync: keep generated test suites in sync with their test-data directories.
//!
//! A suite is a directory of test-data files plus a generated Rust test module with one unit per
//! file. This crate generates that module, checks it against the directory, and runs its units
//! through an execution backend. Discovery and the completeness check live in `testsync_core`.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `emit` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Run-time support**: [`runtime`] is called from inside `#[test]` functions and reports failures by
//!   panicking. That is the only place panics are part of the contract.

pub mod cli;
pub mod config;
pub mod emit;
pub mod exec;
pub mod generate;
pub mod manifest;
pub mod runtime;
pub mod suite;
pub mod version;

pub use config::{Config, ConfigError, SuiteConfig};
pub use exec::{CommandBackend, ExecutionBackend, Outcome};
pub use generate::{GenerateError, GeneratedSuite, generate_suite};
pub use manifest::{ManifestError, read_registry, read_registry_file};
pub use suite::{RunSummary, Suite, TestUnit};

pub use testsync_core;
